//! Hardware abstraction traits for the watchdog and power peripherals
//!
//! Pin-level traits live in `kennel-hal`; these traits cover the
//! peripherals whose behaviour is specific to this firmware. They are
//! implemented by `kennel-hal-nrf52` and by the simulator.

pub mod irq;
pub mod power;
pub mod watchdog;

pub use irq::InterruptMask;
pub use power::{ResetReasonRegister, SystemControl};
pub use watchdog::{ArmMode, Armed, Watchdog, WatchdogReload};
