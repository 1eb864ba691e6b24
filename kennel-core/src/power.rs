//! Power state machine
//!
//! The chip is either running (`Active`) or in System OFF (`Off`). System
//! OFF has no retention: leaving it is a full reset, after which the boot
//! sequence runs from the start.

/// Power states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// CPU running, all stimuli observed
    #[default]
    Active,
    /// System OFF; only the wake pin is observed
    Off,
}

/// Events that change the power state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerEvent {
    /// Foreground asked for System OFF
    SystemOffRequested,
    /// Wake pin asserted while off
    Wake,
}

impl PowerState {
    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged.
    pub fn transition(self, event: PowerEvent) -> Self {
        use PowerEvent::*;
        use PowerState::*;

        match (self, event) {
            (Active, SystemOffRequested) => Off,
            // Wake is a full reset; the caller re-runs the boot sequence
            (Off, Wake) => Active,
            (state, _) => state,
        }
    }

    /// Check whether liveness and reset stimuli are observed
    pub fn accepts_stimuli(&self) -> bool {
        matches!(self, PowerState::Active)
    }
}
