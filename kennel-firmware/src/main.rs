//! Kennel - Watchdog-Guarded Liveness Firmware
//!
//! nRF52-DK firmware exercising the watchdog timer, GPIOTE, System OFF and
//! the reset reason register.
//!
//! - Button 1 edges reload the watchdog; stop pressing and the chip resets
//! - Button 2 soft-resets, button 3 enters System OFF, button 4 wakes
//! - LED 1 blinks while alive, LED 2 follows reloads
//! - P0.22-P0.28 show why the chip last reset

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use kennel_core::app::{
    arm_and_report, startup_signal, Button, CauseIndicators, LivenessHandler, LivenessLoop,
    Restart, TimeoutHandler,
};
use kennel_core::config::BoardConfig;
use kennel_core::traits::{ArmMode, SystemControl};
use kennel_core::{InitError, ResetCause};
use kennel_hal_nrf52::{
    configure_event_channel, NrfEdgeEvent, NrfIndicatorPort, NrfInput, NrfInterruptMask,
    NrfOutput, NrfReload, NrfResetReason, NrfSystem,
};

mod board;
mod irq;

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));

use board::Board;

type Liveness = LivenessHandler<NrfEdgeEvent, NrfReload, NrfOutput, NrfInput>;

// Handlers live in their interrupt slots for the rest of the boot
static LIVENESS_HANDLER: StaticCell<Liveness> = StaticCell::new();
static TIMEOUT_HANDLER: StaticCell<TimeoutHandler<NrfOutput>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Kennel firmware starting...");

    let config = BOARD_CONFIG;
    let p = embassy_nrf::init(Default::default());
    let mut system = NrfSystem::new();

    match run(p, &config) {
        Ok(Restart::SystemOff) => {
            info!("Entering System OFF, press button 4 to wake");
            system.system_off()
        }
        Ok(Restart::SoftReset) => {
            info!("Soft reset requested");
            system.system_reset()
        }
        Err(e) => {
            // No startup blink; the armed watchdog resets the chip
            error!("Initialization failed: {}", e);
            loop {
                cortex_m::asm::wfe();
            }
        }
    }
}

/// Boot, then run the liveness loop until a button ends it
fn run(p: embassy_nrf::Peripherals, config: &BoardConfig) -> Result<Restart, InitError> {
    let pins = &config.pins;
    let board = Board::new(p, pins);

    let liveness_event = configure_event_channel(pins.liveness_channel, pins.liveness_event()?)?;

    info!(
        "Watchdog timeout: {} ms, reload registers {:#b}",
        config.watchdog.timeout.timeout_millis(),
        config.watchdog.reload_channels.bits()
    );

    let mut indicators = CauseIndicators::new(board.cause_leds);
    let mut reset_reason = NrfResetReason::new();
    let report = arm_and_report(config, board.watchdog, &mut reset_reason, &mut indicators)?;

    match report.arm_mode {
        ArmMode::Started => info!("Watchdog started"),
        ArmMode::Adopted => info!("Watchdog already running, adopted"),
    }
    log_reset_cause(report.cause);

    let liveness = LIVENESS_HANDLER.init(LivenessHandler::new(
        liveness_event,
        report.reload,
        board.reload_led,
        Button::from_config(board.liveness_button, &pins.liveness_button),
        config.reload_indicator,
    ));
    irq::register(liveness)?;

    if config.watchdog.timeout_interrupt {
        let timeout = TIMEOUT_HANDLER.init(TimeoutHandler::new(board.timeout_led));
        irq::register(timeout)?;
    }

    let mut status_led = board.status_led;
    startup_signal(&mut status_led, &mut Delay, &config.timing);
    info!("Initialization complete");

    let mut liveness_loop = LivenessLoop::new(
        status_led,
        Button::from_config(board.off_button, &pins.off_button),
        Button::from_config(board.reset_button, &pins.reset_button),
        NrfIndicatorPort::new(pins),
        NrfInterruptMask::new(),
        Delay,
        &config.timing,
    );
    let restart = liveness_loop.run();

    // Output pins reset their configuration on drop
    core::mem::forget(indicators);
    core::mem::forget(liveness_loop);
    Ok(restart)
}

fn log_reset_cause(cause: ResetCause) {
    if cause.is_power_on() {
        info!("Reset cause: power-on");
        return;
    }
    if cause.is_wake() {
        info!("Woke from System OFF");
    }
    for (name, _) in cause.iter_names() {
        info!("Reset cause: {}", name);
    }
}
