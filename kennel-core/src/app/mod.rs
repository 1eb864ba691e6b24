//! Application logic
//!
//! The watchdog-guarded liveness loop, split by execution context:
//!
//! - [`boot`]: arming, reset-cause report and startup signal, run once
//! - [`liveness`]: the blocking foreground loop
//! - [`handlers`]: interrupt handlers for the liveness button and the
//!   watchdog timeout
//!
//! Everything here is generic over the HAL traits and runs unchanged on
//! hardware and in the simulator.

pub mod boot;
pub mod button;
pub mod handlers;
pub mod indicators;
pub mod liveness;

pub use boot::{arm_and_report, report_reset_cause, startup_signal, BootReport};
pub use button::Button;
pub use handlers::{InterruptHandler, IrqSource, LivenessHandler, TimeoutHandler};
pub use indicators::CauseIndicators;
pub use liveness::{LivenessLoop, Restart, Step};
