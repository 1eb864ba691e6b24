//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific HALs, plus the pin configuration values they accept.
//!
//! Output levels are logical: `set_high` lights an indicator regardless of
//! whether the LED is wired active-high or active-low. Implementations map
//! the logical level to the electrical one.

/// Push-pull output driving an indicator
pub trait OutputPin {
    /// Light the indicator
    fn set_high(&mut self);

    /// Switch the indicator off
    fn set_low(&mut self);

    /// Invert the current logical level
    fn toggle(&mut self);

    /// Light the indicator if `high`, switch it off otherwise
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Logical level last written
    fn is_set_high(&self) -> bool;

    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Input sampling the electrical pin level
pub trait InputPin {
    /// Pin reads high
    fn is_high(&self) -> bool;

    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// A group of indicator outputs that can be switched off together
///
/// On hardware this is a single port-wide write, so it also reaches pins
/// whose `OutputPin` handles are owned by interrupt handlers.
pub trait IndicatorPort {
    /// Switch every indicator in the group off
    fn all_off(&mut self);
}

/// Input pull resistor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull resistor
    #[default]
    None,
    /// Pull-up to VDD
    Up,
    /// Pull-down to GND
    Down,
}

/// Level detection used to wake the chip from its deepest sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sense {
    /// Pin does not take part in wake detection
    #[default]
    Disabled,
    /// Wake when the pin reads high
    High,
    /// Wake when the pin reads low
    Low,
}

impl Sense {
    /// Check whether a pin at the given level satisfies this sense setting
    pub fn is_triggered_by(self, high: bool) -> bool {
        match self {
            Sense::Disabled => false,
            Sense::High => high,
            Sense::Low => !high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Led {
        on: bool,
    }

    impl OutputPin for Led {
        fn set_high(&mut self) {
            self.on = true;
        }

        fn set_low(&mut self) {
            self.on = false;
        }

        fn toggle(&mut self) {
            self.on = !self.on;
        }

        fn is_set_high(&self) -> bool {
            self.on
        }
    }

    #[test]
    fn test_set_state() {
        let mut led = Led { on: false };
        led.set_state(true);
        assert!(led.is_set_high());
        led.set_state(false);
        assert!(led.is_set_low());
    }

    #[test]
    fn test_sense_trigger() {
        assert!(Sense::Low.is_triggered_by(false));
        assert!(!Sense::Low.is_triggered_by(true));
        assert!(Sense::High.is_triggered_by(true));
        assert!(!Sense::Disabled.is_triggered_by(true));
        assert!(!Sense::Disabled.is_triggered_by(false));
    }
}
