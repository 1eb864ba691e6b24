//! GPIO pins

use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pin, Pull};
use embassy_nrf::Peri;
use kennel_core::config::{PinConfig, PinMap};
use kennel_hal::{IndicatorPort, InputPin, OutputPin};
use nrf52832_pac as pac;

fn port() -> &'static pac::p0::RegisterBlock {
    // Only OUTSET/OUTCLR and PIN_CNF of pins owned by this crate are written
    unsafe { &*pac::P0::ptr() }
}

/// Output pin with logical levels
///
/// `set_high` lights the indicator; active-low wiring is handled here.
pub struct NrfOutput {
    output: Output<'static>,
    active_low: bool,
}

impl NrfOutput {
    /// Configure `pin` as a standard-drive output, initially off
    pub fn new(pin: Peri<'static, impl Pin>, config: &PinConfig) -> Self {
        let off = if config.inverted { Level::High } else { Level::Low };
        Self {
            output: Output::new(pin, off, OutputDrive::Standard),
            active_low: config.inverted,
        }
    }
}

impl OutputPin for NrfOutput {
    fn set_high(&mut self) {
        if self.active_low {
            self.output.set_low();
        } else {
            self.output.set_high();
        }
    }

    fn set_low(&mut self) {
        if self.active_low {
            self.output.set_high();
        } else {
            self.output.set_low();
        }
    }

    fn toggle(&mut self) {
        self.output.toggle();
    }

    fn is_set_high(&self) -> bool {
        self.output.is_set_high() != self.active_low
    }
}

/// Input pin reading electrical levels
pub struct NrfInput {
    input: Input<'static>,
}

impl NrfInput {
    pub fn new(pin: Peri<'static, impl Pin>, config: &PinConfig) -> Self {
        let pull = if config.pull_up { Pull::Up } else { Pull::None };
        Self {
            input: Input::new(pin, pull),
        }
    }
}

impl InputPin for NrfInput {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}

/// Configure the System OFF wake pin
///
/// embassy-nrf has no input configuration with SENSE, so `PIN_CNF` is
/// written directly. The pin token is consumed so nothing else can
/// reconfigure it.
pub fn configure_wake_pin(_pin: Peri<'static, impl Pin>, config: &PinConfig) {
    let cnf = config.wake_cnf();
    port().pin_cnf[config.pin as usize].write(|w| unsafe { w.bits(cnf.bits()) });
}

/// Every indicator on port 0, switched off with one `OUTSET`/`OUTCLR`
/// write each
pub struct NrfIndicatorPort {
    /// Active-low indicators: driven high to switch off
    set: u32,
    /// Active-high indicators: driven low to switch off
    clear: u32,
}

impl NrfIndicatorPort {
    pub fn new(pins: &PinMap) -> Self {
        Self {
            set: pins.active_low_outputs(),
            clear: pins.active_high_outputs(),
        }
    }
}

impl IndicatorPort for NrfIndicatorPort {
    fn all_off(&mut self) {
        let p0 = port();
        p0.outset.write(|w| unsafe { w.bits(self.set) });
        p0.outclr.write(|w| unsafe { w.bits(self.clear) });
    }
}
