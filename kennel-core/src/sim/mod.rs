//! Virtual-time nRF52 chip simulator
//!
//! Models just enough of the chip to run the real boot sequence, liveness
//! loop and interrupt handlers on the host:
//!
//! - WDT countdown on the 32 768 Hz LFCLK, with the TIMEOUT interrupt
//! - `RESETREAS` latch and reset/restart semantics
//! - GPIO levels, `PIN_CNF` sense for System OFF wake
//! - GPIOTE event channels with their interrupt
//! - Scheduled input stimuli applied at exact times
//!
//! Time only moves inside [`SimDelay`], the blocking delay handed to the
//! foreground. Handlers run synchronously at the moment their event fires.

mod chip;
mod harness;
mod peripherals;

pub use chip::{ns_to_ticks, ticks_to_ns, SimChip, SimIrq, Stimulus, StimulusKind, MAX_STIMULI};
pub use harness::{run_boot_cycle, BootEnd, BootRecord};
pub use peripherals::{
    SimDelay, SimEdgeEvent, SimIndicatorPort, SimInput, SimInterruptMask, SimOutput, SimReload,
    SimResetReason, SimWatchdog,
};

/// Nanoseconds per second
pub const NS_PER_S: u64 = 1_000_000_000;

/// Nanoseconds per millisecond
pub const NS_PER_MS: u64 = 1_000_000;
