//! Watchdog peripheral traits

use crate::error::WatchdogError;
use crate::watchdog::WatchdogConfig;

/// How the watchdog came to be running after `arm`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArmMode {
    /// Configured and started by this boot
    Started,
    /// Already running with the same settings (survived a soft reset);
    /// reloaded instead of reconfigured
    Adopted,
}

/// A running watchdog
#[derive(Debug)]
pub struct Armed<R> {
    /// Handle used to reload the countdown
    pub reload: R,
    pub mode: ArmMode,
}

/// Watchdog peripheral before arming
///
/// Arming consumes the peripheral: once started the watchdog cannot be
/// stopped, reconfigured or armed again until the next full reset.
pub trait Watchdog {
    /// Reload handle returned by `arm`
    type Reload: WatchdogReload;

    /// Configure and start the countdown
    ///
    /// If the watchdog is already running, it is adopted when its
    /// registers match `config` and rejected otherwise.
    fn arm(self, config: &WatchdogConfig) -> Result<Armed<Self::Reload>, WatchdogError>;
}

/// Reload access to a running watchdog
///
/// A reload is a single register write, so it is safe to call from
/// interrupt context and never blocks.
pub trait WatchdogReload {
    /// Write the reload token to every enabled reload register
    fn reload(&mut self);
}
