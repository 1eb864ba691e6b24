//! Initialization errors
//!
//! Every failure the firmware can detect happens before the liveness loop
//! starts. A missed reload is not an error value: the watchdog resets the
//! chip.

/// Watchdog configuration and arming errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WatchdogError {
    /// Countdown shorter than the minimum `CRV` of 0xF
    TimeoutTooShort,
    /// Countdown does not fit the 32-bit `CRV` register
    TimeoutTooLong,
    /// Reload mask enables no reload register
    NoReloadChannel,
    /// Reload mask has gaps or does not start at `RR[0]`, which the
    /// nRF driver cannot configure
    NonContiguousReloadMask,
    /// Watchdog was started twice
    AlreadyRunning,
    /// Watchdog survived a soft reset with other settings and cannot be
    /// reconfigured until the next full reset
    RunningWithDifferentConfig,
}

/// Board configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A blocking delay is zero
    ZeroDelay,
    /// Startup toggle count outside 1..=32
    StartupTogglesOutOfRange,
    /// A pin number is outside port 0
    PinOutOfRange(u8),
    /// The same pin is assigned twice
    PinConflict(u8),
    /// GPIOTE channel outside 0..8
    ChannelOutOfRange(u8),
}

/// Interrupt handler registration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqError {
    /// A handler is already registered for this source
    AlreadyRegistered(crate::app::IrqSource),
    /// GPIOTE channel does not exist
    ChannelOutOfRange,
    /// Pin does not exist
    PinOutOfRange,
}

/// Any error raised while bringing the board up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    Config(ConfigError),
    Watchdog(WatchdogError),
    Irq(IrqError),
}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        InitError::Config(e)
    }
}

impl From<WatchdogError> for InitError {
    fn from(e: WatchdogError) -> Self {
        InitError::Watchdog(e)
    }
}

impl From<IrqError> for InitError {
    fn from(e: IrqError) -> Self {
        InitError::Irq(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let e: InitError = WatchdogError::NoReloadChannel.into();
        assert_eq!(e, InitError::Watchdog(WatchdogError::NoReloadChannel));

        let e: InitError = ConfigError::ZeroDelay.into();
        assert_eq!(e, InitError::Config(ConfigError::ZeroDelay));

        let e: InitError = IrqError::ChannelOutOfRange.into();
        assert_eq!(e, InitError::Irq(IrqError::ChannelOutOfRange));
    }
}
