//! nRF52832-specific HAL for the watchdog firmware
//!
//! This crate provides nRF52832 implementations of the `kennel-hal` pin
//! traits and the `kennel-core` peripheral traits:
//!
//! - GPIO outputs and inputs on top of `embassy-nrf`
//! - Port-wide indicator switch-off and the System OFF wake pin
//! - GPIOTE event channels with their interrupt
//! - WDT arming, adoption after a soft reset, and reload
//! - `RESETREAS`, System OFF, soft reset and interrupt masking
//!
//! Register values come from `kennel_core::registers`, so the encodings
//! written here are the ones the host tests check.

#![no_std]

pub mod gpio;
pub mod gpiote;
pub mod power;
pub mod wdt;

pub use gpio::{configure_wake_pin, NrfIndicatorPort, NrfInput, NrfOutput};
pub use gpiote::{configure_event_channel, NrfEdgeEvent};
pub use power::{NrfInterruptMask, NrfResetReason, NrfSystem};
pub use wdt::{NrfReload, NrfWatchdog};
