//! Foreground liveness loop
//!
//! Blinks the status LED at the fast rate and polls the System OFF and
//! reset buttons. It never reloads the watchdog itself; only liveness
//! button edges do, from interrupt context.

use embedded_hal::delay::DelayNs;
use kennel_hal::{IndicatorPort, InputPin, OutputPin};

use super::button::Button;
use crate::config::TimingConfig;
use crate::power::{PowerEvent, PowerState};
use crate::traits::InterruptMask;

/// How the current boot is to end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Restart {
    /// Enter System OFF; the wake pin resets the chip
    SystemOff,
    /// Soft reset
    SoftReset,
}

/// Result of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Continue,
    Restart(Restart),
}

/// The foreground loop and the pins it owns
pub struct LivenessLoop<L, B1, B2, P, M, D> {
    led: L,
    off_button: Button<B1>,
    reset_button: Button<B2>,
    indicators: P,
    interrupts: M,
    delay: D,
    toggle_us: u32,
    power: PowerState,
}

impl<L, B1, B2, P, M, D> LivenessLoop<L, B1, B2, P, M, D>
where
    L: OutputPin,
    B1: InputPin,
    B2: InputPin,
    P: IndicatorPort,
    M: InterruptMask,
    D: DelayNs,
{
    pub fn new(
        led: L,
        off_button: Button<B1>,
        reset_button: Button<B2>,
        indicators: P,
        interrupts: M,
        delay: D,
        timing: &TimingConfig,
    ) -> Self {
        Self {
            led,
            off_button,
            reset_button,
            indicators,
            interrupts,
            delay,
            toggle_us: timing.liveness_toggle_us,
            power: PowerState::Active,
        }
    }

    /// Run one iteration: blink, wait, then check the buttons
    ///
    /// The System OFF button takes precedence over the reset button.
    pub fn step(&mut self) -> Step {
        if !self.power.accepts_stimuli() {
            return Step::Restart(Restart::SystemOff);
        }

        self.led.toggle();
        self.delay.delay_us(self.toggle_us);

        if self.off_button.is_pressed() {
            // No handler may relight an indicator once they are off
            self.interrupts.mask_all();
            self.indicators.all_off();
            self.power = self.power.transition(PowerEvent::SystemOffRequested);
            return Step::Restart(Restart::SystemOff);
        }

        if self.reset_button.is_pressed() {
            return Step::Restart(Restart::SoftReset);
        }

        Step::Continue
    }

    /// Loop until a button ends the boot
    pub fn run(&mut self) -> Restart {
        loop {
            if let Step::Restart(restart) = self.step() {
                return restart;
            }
        }
    }

    pub fn power_state(&self) -> PowerState {
        self.power
    }
}
