//! nRF52-DK peripheral acquisition
//!
//! Pin tokens are taken to match `PinMap::NRF52_DK`.

use embassy_nrf::Peripherals;
use kennel_core::config::{PinMap, CAUSE_INDICATOR_COUNT};
use kennel_hal_nrf52::{configure_wake_pin, NrfInput, NrfOutput, NrfWatchdog};

/// Every peripheral the firmware drives, configured and owned
pub struct Board {
    pub liveness_button: NrfInput,
    pub reset_button: NrfInput,
    pub off_button: NrfInput,
    pub status_led: NrfOutput,
    pub reload_led: NrfOutput,
    pub timeout_led: NrfOutput,
    pub cause_leds: [NrfOutput; CAUSE_INDICATOR_COUNT],
    pub watchdog: NrfWatchdog,
}

impl Board {
    /// Configure buttons, the wake pin and LEDs (all off)
    pub fn new(p: Peripherals, pins: &PinMap) -> Self {
        configure_wake_pin(p.P0_16, &pins.wake_button);

        let c = &pins.cause_leds;
        Self {
            liveness_button: NrfInput::new(p.P0_13, &pins.liveness_button),
            reset_button: NrfInput::new(p.P0_14, &pins.reset_button),
            off_button: NrfInput::new(p.P0_15, &pins.off_button),
            status_led: NrfOutput::new(p.P0_17, &pins.status_led),
            reload_led: NrfOutput::new(p.P0_18, &pins.reload_led),
            timeout_led: NrfOutput::new(p.P0_19, &pins.timeout_led),
            cause_leds: [
                NrfOutput::new(p.P0_22, &c[0]),
                NrfOutput::new(p.P0_23, &c[1]),
                NrfOutput::new(p.P0_24, &c[2]),
                NrfOutput::new(p.P0_25, &c[3]),
                NrfOutput::new(p.P0_26, &c[4]),
                NrfOutput::new(p.P0_27, &c[5]),
                NrfOutput::new(p.P0_28, &c[6]),
            ],
            watchdog: NrfWatchdog::new(p.WDT),
        }
    }
}
