//! Kennel Hardware Abstraction Layer
//!
//! This crate defines the pin-level traits that chip-specific HALs implement
//! and that the board-agnostic logic in `kennel-core` is written against.
//! The same boot sequence and liveness loop therefore run on the nRF52832
//! and on the host-side chip simulator.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (kennel-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kennel-core (boot, loop, handlers)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kennel-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ kennel-hal-   │       │ kennel-core   │
//! │    nrf52      │       │   ::sim       │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::IndicatorPort`] - Switch every status indicator off at once
//! - [`event::EdgeEvent`] - Latched pin-change event of an edge detector

#![no_std]
#![deny(unsafe_code)]

pub mod event;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use event::{EdgeEvent, EdgePolarity};
pub use gpio::{IndicatorPort, InputPin, OutputPin, Pull, Sense};
