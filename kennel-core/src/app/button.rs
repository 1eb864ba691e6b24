//! Push buttons

use kennel_hal::InputPin;

use crate::config::PinConfig;

/// A push button on an input pin
#[derive(Debug)]
pub struct Button<I> {
    pin: I,
    active_low: bool,
}

impl<I: InputPin> Button<I> {
    pub fn new(pin: I, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Create with the polarity from the pin map
    pub fn from_config(pin: I, config: &PinConfig) -> Self {
        Self::new(pin, config.inverted)
    }

    pub fn is_pressed(&self) -> bool {
        self.pin.is_high() != self.active_low
    }
}
