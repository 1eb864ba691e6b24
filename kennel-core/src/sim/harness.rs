//! Boot-cycle driver
//!
//! Wires the simulated peripherals into the same boot sequence, handlers
//! and liveness loop the firmware runs, then drives the loop until the
//! boot ends.

use core::cell::RefCell;

use super::chip::{SimChip, SimIrq};
use super::peripherals::{
    SimDelay, SimEdgeEvent, SimIndicatorPort, SimInput, SimInterruptMask, SimOutput,
    SimResetReason, SimWatchdog,
};
use crate::app::{
    arm_and_report, startup_signal, Button, CauseIndicators, LivenessHandler, LivenessLoop,
    Restart, Step, TimeoutHandler,
};
use crate::config::BoardConfig;
use crate::error::InitError;
use crate::registers::gpiote::intenset_in;
use crate::reset::ResetCause;
use crate::traits::ArmMode;

/// How a boot ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootEnd {
    /// The chip reset with this cause (includes waking from System OFF)
    Reset(ResetCause),
    /// Entered System OFF and stayed off until the run deadline
    SystemOff,
    /// Still running at the run deadline
    Deadline,
}

/// Observations from one boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootRecord {
    /// Reset cause reported on the indicators
    pub reported: ResetCause,
    pub arm_mode: ArmMode,
    pub armed_at_ns: u64,
    pub ended_at_ns: u64,
    pub end: BootEnd,
}

/// Run one boot of `chip` until it ends or `until_ns` passes
///
/// Call on a fresh chip or after a cycle that ended in a reset; the
/// pending reset is applied first.
pub fn run_boot_cycle(chip: &SimChip, config: &BoardConfig, until_ns: u64) -> Result<BootRecord, InitError> {
    chip.begin_boot();
    let pins = &config.pins;

    // GPIO
    let liveness_button = Button::from_config(SimInput::new(chip, pins.liveness_button), &pins.liveness_button);
    let reset_button = Button::from_config(SimInput::new(chip, pins.reset_button), &pins.reset_button);
    let off_button = Button::from_config(SimInput::new(chip, pins.off_button), &pins.off_button);
    chip.write_pin_cnf(pins.wake_button.pin, pins.wake_button.wake_cnf());
    let mut status_led = SimOutput::new(chip, pins.status_led);
    let reload_led = SimOutput::new(chip, pins.reload_led);
    let timeout_led = SimOutput::new(chip, pins.timeout_led);
    let mut cause_leds = CauseIndicators::new(pins.cause_leds.map(|p| SimOutput::new(chip, p)));

    // GPIOTE
    let channel = pins.liveness_channel;
    chip.write_gpiote_config(channel, pins.liveness_event()?);
    chip.gpiote_intenset(intenset_in(channel)? as u8);

    let report = arm_and_report(
        config,
        SimWatchdog::new(chip),
        &mut SimResetReason::new(chip),
        &mut cause_leds,
    )?;
    let armed_at_ns = chip.now_ns();

    let liveness = RefCell::new(LivenessHandler::new(
        SimEdgeEvent::new(chip, channel),
        report.reload,
        reload_led,
        liveness_button,
        config.reload_indicator,
    ));
    let timeout = RefCell::new(TimeoutHandler::new(timeout_led));

    let mut irq = SimIrq::new();
    irq.register(&liveness)?;
    if config.watchdog.timeout_interrupt {
        irq.register(&timeout)?;
    }

    let mut delay = SimDelay::new(chip, &irq, until_ns);
    startup_signal(&mut status_led, &mut delay, &config.timing);

    let mut liveness_loop = LivenessLoop::new(
        status_led,
        off_button,
        reset_button,
        SimIndicatorPort::new(chip, pins),
        SimInterruptMask::new(chip),
        delay,
        &config.timing,
    );

    let end = loop {
        if let Some(cause) = chip.pending_reset() {
            break BootEnd::Reset(cause);
        }
        if chip.now_ns() >= until_ns {
            break BootEnd::Deadline;
        }

        let Step::Restart(restart) = liveness_loop.step() else {
            continue;
        };
        // A reset during the last delay wins over the buttons
        if let Some(cause) = chip.pending_reset() {
            break BootEnd::Reset(cause);
        }
        match restart {
            Restart::SoftReset => {
                chip.system_reset();
                break BootEnd::Reset(ResetCause::SOFTWARE);
            }
            Restart::SystemOff => {
                chip.system_off();
                chip.advance_to(until_ns, &irq);
                break match chip.pending_reset() {
                    Some(cause) => BootEnd::Reset(cause),
                    None => BootEnd::SystemOff,
                };
            }
        }
    };

    Ok(BootRecord {
        reported: report.cause,
        arm_mode: report.arm_mode,
        armed_at_ns,
        ended_at_ns: chip.now_ns(),
        end,
    })
}
