//! Persisted option flags.

use crate::hal::ByteStore;

/// Independent feature toggles, stored as one byte.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Options(u8);

impl Options {
    /// Forward realtime (clock/transport) bytes on the thru path.
    pub const PASS_REALTIME: u8 = 0x01;
    /// Forward everything else on the thru path.
    pub const PASS_OTHER: u8 = 0x02;
    /// Emit explicit START/STOP/CONTINUE transport messages.
    pub const START_STOP: u8 = 0x04;
    /// Animate LEDs from thru traffic instead of flickering.
    pub const THRU_ANIMATE: u8 = 0x08;
    /// Single-LED running indicator.
    pub const DISCREET: u8 = 0x10;

    pub const DEFAULT: Options =
        Options(Self::PASS_OTHER | Self::START_STOP | Self::THRU_ANIMATE);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Flag at a menu cursor position.
    pub const fn bit(self, index: u8) -> bool {
        self.0 & (1 << index) != 0
    }

    pub fn toggle_bit(&mut self, index: u8) {
        self.0 ^= 1 << index;
    }
}

/// Menu slots: five option bits plus the brightness selector.
pub const MENU_SIZE: u8 = 6;
/// Menu slot that cycles display brightness instead of toggling a flag.
pub const MENU_BRIGHTNESS_SLOT: u8 = 5;

pub const STORE_ADDR_COOKIE: u8 = 9;
pub const STORE_ADDR_OPTIONS: u8 = 10;
/// Sentinel proving the store holds a previously written record rather
/// than uninitialized memory.
pub const MAGIC_COOKIE: u8 = 0xA5;

/// Load the options record, falling back to the compiled-in defaults when
/// the validity cookie is missing or corrupt.
pub fn load<S: ByteStore>(store: &mut S) -> Options {
    let value = store.read(STORE_ADDR_OPTIONS);
    if store.read(STORE_ADDR_COOKIE) == MAGIC_COOKIE {
        Options::from_bits(value)
    } else {
        Options::DEFAULT
    }
}

/// Persist the options record together with its validity cookie.
pub fn save<S: ByteStore>(store: &mut S, options: Options) {
    store.write(STORE_ADDR_OPTIONS, options.bits());
    store.write(STORE_ADDR_COOKIE, MAGIC_COOKIE);
}
