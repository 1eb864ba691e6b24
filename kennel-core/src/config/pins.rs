//! Pin assignments

use kennel_hal::{EdgePolarity, Pull, Sense};

use crate::error::{ConfigError, IrqError};
use crate::registers::gpio::{PinCnf, PIN_COUNT};
use crate::registers::gpiote::{GpioteConfig, CHANNEL_COUNT};
use crate::reset::ResetCause;

/// Number of reset-cause indicators, one per `ResetCause` flag
pub const CAUSE_INDICATOR_COUNT: usize = ResetCause::REPORT_ORDER.len();

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number on port 0
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create an active-low button with pull-up enabled
    pub const fn button(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }

    /// Bit of this pin in a port-wide register
    pub const fn mask(&self) -> u32 {
        1 << (self.pin & 0x1F)
    }

    pub const fn pull(&self) -> Pull {
        if self.pull_up {
            Pull::Up
        } else {
            Pull::None
        }
    }

    /// `PIN_CNF` for a plain input
    pub const fn input_cnf(&self) -> PinCnf {
        PinCnf::input(self.pull())
    }

    /// `PIN_CNF` for an input that wakes the chip from System OFF when
    /// it reaches its active level
    pub const fn wake_cnf(&self) -> PinCnf {
        let sense = if self.inverted { Sense::Low } else { Sense::High };
        PinCnf::sensed_input(self.pull(), sense)
    }
}

/// Board pin map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    /// Button whose edges reload the watchdog
    pub liveness_button: PinConfig,
    /// Button requesting a soft reset
    pub reset_button: PinConfig,
    /// Button requesting System OFF
    pub off_button: PinConfig,
    /// Button that wakes the chip from System OFF
    pub wake_button: PinConfig,
    /// Blinks during startup and in the main loop
    pub status_led: PinConfig,
    /// Follows liveness button edges
    pub reload_led: PinConfig,
    /// Toggled by the watchdog timeout interrupt
    pub timeout_led: PinConfig,
    /// Reset-cause indicators, in `ResetCause::REPORT_ORDER`
    pub cause_leds: [PinConfig; CAUSE_INDICATOR_COUNT],
    /// GPIOTE channel watching the liveness button
    pub liveness_channel: u8,
}

impl PinMap {
    /// nRF52-DK: buttons 1-4 on P0.13-P0.16 and LEDs 1-3 on P0.17-P0.19,
    /// all active low; cause indicators on P0.22-P0.28, active high
    pub const NRF52_DK: Self = Self {
        liveness_button: PinConfig::button(13),
        reset_button: PinConfig::button(14),
        off_button: PinConfig::button(15),
        wake_button: PinConfig::button(16),
        status_led: PinConfig::inverted(17),
        reload_led: PinConfig::inverted(18),
        timeout_led: PinConfig::inverted(19),
        cause_leds: [
            PinConfig::new(22),
            PinConfig::new(23),
            PinConfig::new(24),
            PinConfig::new(25),
            PinConfig::new(26),
            PinConfig::new(27),
            PinConfig::new(28),
        ],
        liveness_channel: 0,
    };

    /// GPIOTE channel config latching every liveness button edge
    pub const fn liveness_event(&self) -> Result<GpioteConfig, IrqError> {
        GpioteConfig::event(self.liveness_button.pin, EdgePolarity::Toggle)
    }

    /// Every output pin
    pub fn outputs(&self) -> impl Iterator<Item = &PinConfig> {
        [&self.status_led, &self.reload_led, &self.timeout_led]
            .into_iter()
            .chain(self.cause_leds.iter())
    }

    /// Every input pin
    pub fn inputs(&self) -> impl Iterator<Item = &PinConfig> {
        [
            &self.liveness_button,
            &self.reset_button,
            &self.off_button,
            &self.wake_button,
        ]
        .into_iter()
    }

    /// Port bits of the outputs that must be driven low to switch off
    /// (active-high indicators)
    pub fn active_high_outputs(&self) -> u32 {
        self.outputs()
            .filter(|p| !p.inverted)
            .fold(0, |acc, p| acc | p.mask())
    }

    /// Port bits of the outputs that must be driven high to switch off
    /// (active-low indicators)
    pub fn active_low_outputs(&self) -> u32 {
        self.outputs()
            .filter(|p| p.inverted)
            .fold(0, |acc, p| acc | p.mask())
    }

    /// Check pin ranges, duplicates and the GPIOTE channel
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.liveness_channel >= CHANNEL_COUNT {
            return Err(ConfigError::ChannelOutOfRange(self.liveness_channel));
        }

        let mut used: u32 = 0;
        for pin in self.inputs().chain(self.outputs()) {
            if pin.pin >= PIN_COUNT {
                return Err(ConfigError::PinOutOfRange(pin.pin));
            }
            if used & pin.mask() != 0 {
                return Err(ConfigError::PinConflict(pin.pin));
            }
            used |= pin.mask();
        }
        Ok(())
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::NRF52_DK
    }
}
