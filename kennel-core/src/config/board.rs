//! Board configuration

use super::pins::PinMap;
use crate::error::ConfigError;
use crate::watchdog::WatchdogConfig;

/// Largest accepted startup toggle count
pub const MAX_STARTUP_TOGGLES: u8 = 32;

/// Blocking delays of the foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Delay between status LED toggles during the startup signal
    pub startup_toggle_us: u32,
    /// Number of status LED toggles in the startup signal
    pub startup_toggles: u8,
    /// Delay between status LED toggles in the main loop
    pub liveness_toggle_us: u32,
}

impl TimingConfig {
    pub const DEFAULT: Self = Self {
        startup_toggle_us: 200_000,
        startup_toggles: 7,
        liveness_toggle_us: 200_000 / 3,
    };

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.startup_toggle_us == 0 || self.liveness_toggle_us == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        if self.startup_toggles == 0 || self.startup_toggles > MAX_STARTUP_TOGGLES {
            return Err(ConfigError::StartupTogglesOutOfRange);
        }
        Ok(())
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How the reload indicator follows liveness button edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReloadIndicator {
    /// Toggle on every edge
    #[default]
    Toggle,
    /// Lit while the button is held
    MirrorButton,
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    pub watchdog: WatchdogConfig,
    pub timing: TimingConfig,
    pub reload_indicator: ReloadIndicator,
    pub pins: PinMap,
}

impl BoardConfig {
    pub const fn new(
        watchdog: WatchdogConfig,
        timing: TimingConfig,
        reload_indicator: ReloadIndicator,
        pins: PinMap,
    ) -> Self {
        Self {
            watchdog,
            timing,
            reload_indicator,
            pins,
        }
    }

    /// Check the whole configuration
    ///
    /// Watchdog limits are enforced by the `Crv` and `ReloadMask`
    /// constructors, so only timing and pins are checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;
        self.pins.validate()?;
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(
            WatchdogConfig::default(),
            TimingConfig::DEFAULT,
            ReloadIndicator::Toggle,
            PinMap::NRF52_DK,
        )
    }
}
