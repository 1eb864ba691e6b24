//! Watchdog timer (WDT) registers

use crate::error::WatchdogError;

/// Frequency of the low-frequency clock that drives the countdown
pub const LFCLK_HZ: u32 = 32_768;

/// Value that must be written to a reload register to reload the watchdog
pub const RELOAD_TOKEN: u32 = 0x6E52_4635;

/// Number of reload registers (`RR[0]` to `RR[7]`)
pub const RELOAD_REGISTER_COUNT: usize = 8;

/// Smallest counter reload value accepted by the hardware
pub const CRV_MIN: u32 = 0xF;

/// `INTENSET` bit enabling the TIMEOUT interrupt
pub const INTENSET_TIMEOUT: u32 = 1 << 0;

/// Countdown behaviour while the CPU sleeps (`CONFIG.SLEEP`, bit 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepBehavior {
    /// Pause the countdown while the CPU sleeps
    Pause = 0,
    /// Keep counting while the CPU sleeps
    #[default]
    Run = 1,
}

/// Countdown behaviour while a debugger halts the CPU (`CONFIG.HALT`, bit 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HaltBehavior {
    /// Pause the countdown while halted
    #[default]
    Pause = 0,
    /// Keep counting while halted
    Run = 1,
}

/// `CONFIG` register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WdtConfigReg {
    pub sleep: SleepBehavior,
    pub halt: HaltBehavior,
}

impl WdtConfigReg {
    const SLEEP_POS: u32 = 0;
    const HALT_POS: u32 = 3;

    /// Encode the register value
    pub const fn bits(self) -> u32 {
        ((self.sleep as u32) << Self::SLEEP_POS) | ((self.halt as u32) << Self::HALT_POS)
    }

    /// Decode a register value, ignoring reserved bits
    pub const fn from_bits(bits: u32) -> Self {
        let sleep = if bits & (1 << Self::SLEEP_POS) != 0 {
            SleepBehavior::Run
        } else {
            SleepBehavior::Pause
        };
        let halt = if bits & (1 << Self::HALT_POS) != 0 {
            HaltBehavior::Run
        } else {
            HaltBehavior::Pause
        };
        Self { sleep, halt }
    }
}

/// Counter reload value (`CRV`)
///
/// The watchdog times out `CRV + 1` LFCLK ticks after it is started or
/// reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crv(u32);

impl Crv {
    /// Three seconds, the default countdown
    pub const THREE_SECONDS: Self = Self(3 * LFCLK_HZ - 1);

    /// Create from a raw register value
    pub const fn from_bits(bits: u32) -> Result<Self, WatchdogError> {
        if bits < CRV_MIN {
            return Err(WatchdogError::TimeoutTooShort);
        }
        Ok(Self(bits))
    }

    /// Create from a countdown length in LFCLK ticks
    pub const fn from_timeout_ticks(ticks: u64) -> Result<Self, WatchdogError> {
        if ticks <= CRV_MIN as u64 {
            return Err(WatchdogError::TimeoutTooShort);
        }
        if ticks - 1 > u32::MAX as u64 {
            return Err(WatchdogError::TimeoutTooLong);
        }
        Ok(Self((ticks - 1) as u32))
    }

    /// Create from a countdown length in milliseconds
    ///
    /// `from_millis(3000)` gives exactly `3 * 32768` ticks.
    pub const fn from_millis(ms: u32) -> Result<Self, WatchdogError> {
        Self::from_timeout_ticks(ms as u64 * LFCLK_HZ as u64 / 1000)
    }

    /// Raw register value
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Countdown length in LFCLK ticks
    pub const fn timeout_ticks(self) -> u64 {
        self.0 as u64 + 1
    }

    /// Countdown length in whole milliseconds
    pub const fn timeout_millis(self) -> u64 {
        self.timeout_ticks() * 1000 / LFCLK_HZ as u64
    }
}

/// Reload request enable mask (`RREN`)
///
/// Bit `n` enables reload register `RR[n]`. A reload only takes effect
/// once every enabled register has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReloadMask(u8);

impl ReloadMask {
    /// Only `RR[0]` enabled
    pub const RR0: Self = Self(1);

    /// Create from the raw mask, which must enable at least one register
    pub const fn from_bits(bits: u8) -> Result<Self, WatchdogError> {
        if bits == 0 {
            return Err(WatchdogError::NoReloadChannel);
        }
        Ok(Self(bits))
    }

    /// Raw mask value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check whether reload register `channel` is enabled
    pub const fn contains(self, channel: usize) -> bool {
        channel < RELOAD_REGISTER_COUNT && self.0 & (1 << channel) != 0
    }

    /// Iterate over the enabled reload registers
    pub fn channels(self) -> impl Iterator<Item = usize> {
        (0..RELOAD_REGISTER_COUNT).filter(move |&ch| self.contains(ch))
    }

    /// Number of enabled reload registers
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Check whether the mask is `RR[0]..RR[count - 1]` with no gaps
    pub const fn is_contiguous(self) -> bool {
        (self.0 as u32 + 1).is_power_of_two()
    }
}

impl Default for ReloadMask {
    fn default() -> Self {
        Self::RR0
    }
}
