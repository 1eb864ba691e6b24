//! Reset-cause indicators

use kennel_hal::OutputPin;

use crate::config::CAUSE_INDICATOR_COUNT;
use crate::reset::ResetCause;

/// One indicator per reset cause, in `ResetCause::REPORT_ORDER`
#[derive(Debug)]
pub struct CauseIndicators<O> {
    leds: [O; CAUSE_INDICATOR_COUNT],
}

impl<O: OutputPin> CauseIndicators<O> {
    pub fn new(leds: [O; CAUSE_INDICATOR_COUNT]) -> Self {
        Self { leds }
    }

    /// Light the indicator of every cause in `cause`, switch the rest off
    pub fn show(&mut self, cause: ResetCause) {
        for (led, flag) in self.leds.iter_mut().zip(ResetCause::REPORT_ORDER) {
            led.set_state(cause.contains(flag));
        }
    }

    pub fn leds(&self) -> &[O; CAUSE_INDICATOR_COUNT] {
        &self.leds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Led(bool);

    impl OutputPin for Led {
        fn set_high(&mut self) {
            self.0 = true;
        }

        fn set_low(&mut self) {
            self.0 = false;
        }

        fn toggle(&mut self) {
            self.0 = !self.0;
        }

        fn is_set_high(&self) -> bool {
            self.0
        }
    }

    fn lit(indicators: &CauseIndicators<Led>) -> [bool; CAUSE_INDICATOR_COUNT] {
        indicators.leds().each_ref().map(|l| l.0)
    }

    #[test]
    fn test_show_watchdog() {
        let mut indicators = CauseIndicators::new(Default::default());
        indicators.show(ResetCause::WATCHDOG);
        assert_eq!(
            lit(&indicators),
            [false, true, false, false, false, false, false]
        );
    }

    #[test]
    fn test_show_combined() {
        let mut indicators = CauseIndicators::new(Default::default());
        indicators.show(ResetCause::PIN | ResetCause::WAKE_GPIO);
        assert_eq!(
            lit(&indicators),
            [true, false, false, false, true, false, false]
        );
    }

    #[test]
    fn test_show_power_on_clears() {
        let mut indicators = CauseIndicators::new(Default::default());
        indicators.show(ResetCause::all());
        indicators.show(ResetCause::empty());
        assert_eq!(lit(&indicators), [false; CAUSE_INDICATOR_COUNT]);
    }
}
