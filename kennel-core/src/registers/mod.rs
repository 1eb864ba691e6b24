//! Typed register encodings
//!
//! Each peripheral register the firmware touches is modelled as a value type
//! with enumerated fields. The exact bit layout is an encoding detail kept
//! behind `bits()` / `from_bits()`, shared by the nRF52832 HAL (which writes
//! the values to hardware) and the simulator (which decodes them).
//!
//! The layouts are identical across the nRF51 and nRF52 families.

pub mod gpio;
pub mod gpiote;
pub mod power;
pub mod wdt;

pub use gpio::{Direction, Drive, InputBuffer, PinCnf};
pub use gpiote::{GpioteConfig, GpioteMode};
pub use wdt::{Crv, HaltBehavior, ReloadMask, SleepBehavior, WdtConfigReg};
