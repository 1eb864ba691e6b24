//! Board-agnostic core logic for the watchdog firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Typed encodings of the WDT, POWER, GPIO and GPIOTE registers
//! - Reset cause decoding
//! - Watchdog countdown model
//! - Power state machine (Active / System OFF)
//! - Board configuration and pin map
//! - Boot sequence, liveness loop and interrupt handlers
//! - A virtual-time chip simulator for host testing

#![no_std]
#![deny(unsafe_code)]

pub mod app;
pub mod config;
pub mod error;
pub mod power;
pub mod registers;
pub mod reset;
pub mod sim;
pub mod traits;
pub mod watchdog;

pub use error::{ConfigError, InitError, IrqError, WatchdogError};
pub use power::{PowerEvent, PowerState};
pub use reset::ResetCause;
pub use watchdog::{Countdown, WatchdogConfig};
