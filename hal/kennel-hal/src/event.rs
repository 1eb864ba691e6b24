//! Edge-detect event abstractions
//!
//! An edge detector watches one input pin and latches an event flag when
//! the configured transition happens. The flag stays set until software
//! clears it; an interrupt handler that does not clear it is re-entered
//! immediately.

/// Transition that latches an edge event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgePolarity {
    /// Low-to-high transition (rising edge)
    LoToHi,
    /// High-to-low transition (falling edge)
    HiToLo,
    /// Any transition
    Toggle,
}

impl EdgePolarity {
    /// Check whether a transition from `was_high` to `is_high` matches
    pub fn matches(self, was_high: bool, is_high: bool) -> bool {
        match self {
            EdgePolarity::LoToHi => !was_high && is_high,
            EdgePolarity::HiToLo => was_high && !is_high,
            EdgePolarity::Toggle => was_high != is_high,
        }
    }
}

/// Latched event of one edge-detect channel
pub trait EdgeEvent {
    /// Check whether the event is latched and its interrupt is enabled
    fn is_pending(&self) -> bool;

    /// Clear the latched event
    fn clear(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_matches() {
        assert!(EdgePolarity::LoToHi.matches(false, true));
        assert!(!EdgePolarity::LoToHi.matches(true, false));
        assert!(EdgePolarity::HiToLo.matches(true, false));
        assert!(!EdgePolarity::HiToLo.matches(false, true));
        assert!(EdgePolarity::Toggle.matches(true, false));
        assert!(EdgePolarity::Toggle.matches(false, true));
        assert!(!EdgePolarity::Toggle.matches(true, true));
    }
}
