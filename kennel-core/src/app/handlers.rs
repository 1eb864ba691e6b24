//! Interrupt handlers
//!
//! Handlers are built at initialization from non-blocking handles (pins,
//! latched events, the watchdog reload handle) and registered once per
//! event source. `on_interrupt` gets no delay provider; a handler has
//! nothing it could block on.

use kennel_hal::{EdgeEvent, InputPin, OutputPin};

use super::button::Button;
use crate::config::ReloadIndicator;
use crate::traits::WatchdogReload;

/// Interrupt sources with a registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqSource {
    /// GPIO tasks and events
    Gpiote,
    /// Watchdog TIMEOUT event
    WatchdogTimeout,
}

/// Handler invoked from an interrupt service routine
pub trait InterruptHandler {
    /// Source this handler is registered for
    fn source(&self) -> IrqSource;

    /// Service the interrupt; must not block
    fn on_interrupt(&mut self);
}

/// Reloads the watchdog on every liveness button edge
pub struct LivenessHandler<E, R, O, B> {
    event: E,
    reload: R,
    indicator: O,
    button: Button<B>,
    policy: ReloadIndicator,
}

impl<E, R, O, B> LivenessHandler<E, R, O, B>
where
    E: EdgeEvent,
    R: WatchdogReload,
    O: OutputPin,
    B: InputPin,
{
    pub fn new(event: E, reload: R, indicator: O, button: Button<B>, policy: ReloadIndicator) -> Self {
        Self {
            event,
            reload,
            indicator,
            button,
            policy,
        }
    }
}

impl<E, R, O, B> InterruptHandler for LivenessHandler<E, R, O, B>
where
    E: EdgeEvent,
    R: WatchdogReload,
    O: OutputPin,
    B: InputPin,
{
    fn source(&self) -> IrqSource {
        IrqSource::Gpiote
    }

    fn on_interrupt(&mut self) {
        // Shared vector; another channel may have fired
        if !self.event.is_pending() {
            return;
        }
        // Uncleared events re-trigger the interrupt immediately
        self.event.clear();
        self.reload.reload();

        match self.policy {
            ReloadIndicator::Toggle => self.indicator.toggle(),
            ReloadIndicator::MirrorButton => self.indicator.set_state(self.button.is_pressed()),
        }
    }
}

/// Toggles an indicator when the watchdog times out
///
/// The reset follows two LFCLK ticks later, so the toggle is rarely
/// visible.
pub struct TimeoutHandler<O> {
    indicator: O,
}

impl<O: OutputPin> TimeoutHandler<O> {
    pub fn new(indicator: O) -> Self {
        Self { indicator }
    }
}

impl<O: OutputPin> InterruptHandler for TimeoutHandler<O> {
    fn source(&self) -> IrqSource {
        IrqSource::WatchdogTimeout
    }

    fn on_interrupt(&mut self) {
        self.indicator.toggle();
    }
}
