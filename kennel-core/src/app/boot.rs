//! Boot sequence
//!
//! Runs once per boot, in this order:
//!
//! 1. Validate the board configuration
//! 2. Arm the watchdog (irreversible until the next full reset)
//! 3. Report the latched reset cause on the indicators, then clear it
//! 4. Register the interrupt handlers (done by the caller, which owns the
//!    handler slots)
//! 5. Blink the startup signal
//!
//! An error in steps 1-4 aborts the boot before the startup signal, so a
//! board that never blinks failed to initialize.

use embedded_hal::delay::DelayNs;
use kennel_hal::OutputPin;

use super::indicators::CauseIndicators;
use crate::config::{BoardConfig, TimingConfig};
use crate::error::InitError;
use crate::reset::ResetCause;
use crate::traits::{ArmMode, ResetReasonRegister, Watchdog};

/// Outcome of a successful boot
#[derive(Debug)]
pub struct BootReport<R> {
    /// Reset cause latched before this boot
    pub cause: ResetCause,
    /// Reload handle of the armed watchdog
    pub reload: R,
    pub arm_mode: ArmMode,
}

/// Validate the configuration, arm the watchdog and report the reset cause
pub fn arm_and_report<W, RR, O>(
    config: &BoardConfig,
    watchdog: W,
    reset_reason: &mut RR,
    indicators: &mut CauseIndicators<O>,
) -> Result<BootReport<W::Reload>, InitError>
where
    W: Watchdog,
    RR: ResetReasonRegister,
    O: OutputPin,
{
    config.validate()?;

    let armed = watchdog.arm(&config.watchdog)?;
    let cause = report_reset_cause(reset_reason, indicators);

    Ok(BootReport {
        cause,
        reload: armed.reload,
        arm_mode: armed.mode,
    })
}

/// Show the latched reset cause on the indicators and clear the latch
///
/// One-shot: a second call in the same boot reports an empty set.
pub fn report_reset_cause<RR, O>(reset_reason: &mut RR, indicators: &mut CauseIndicators<O>) -> ResetCause
where
    RR: ResetReasonRegister,
    O: OutputPin,
{
    let cause = reset_reason.take();
    indicators.show(cause);
    cause
}

/// Blink the status LED to signal that initialization finished
pub fn startup_signal<O: OutputPin, D: DelayNs>(led: &mut O, delay: &mut D, timing: &TimingConfig) {
    for _ in 0..timing.startup_toggles {
        led.toggle();
        delay.delay_us(timing.startup_toggle_us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, WatchdogError};
    use crate::traits::{Armed, WatchdogReload};
    use crate::watchdog::WatchdogConfig;

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

    struct Reload;

    impl WatchdogReload for Reload {
        fn reload(&mut self) {}
    }

    struct MockWatchdog {
        running: Option<WatchdogConfig>,
    }

    impl Watchdog for MockWatchdog {
        type Reload = Reload;

        fn arm(self, config: &WatchdogConfig) -> Result<Armed<Reload>, WatchdogError> {
            match self.running {
                None => Ok(Armed {
                    reload: Reload,
                    mode: ArmMode::Started,
                }),
                Some(running) if running == *config => Ok(Armed {
                    reload: Reload,
                    mode: ArmMode::Adopted,
                }),
                Some(_) => Err(WatchdogError::RunningWithDifferentConfig),
            }
        }
    }

    struct Latch(u32);

    impl ResetReasonRegister for Latch {
        fn read(&self) -> ResetCause {
            ResetCause::from_register(self.0)
        }

        fn clear_all(&mut self) {
            self.0 = 0;
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_us: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_us += u64::from(ns) / 1000;
        }
    }

    #[test]
    fn test_boot_reports_and_clears() {
        let config = BoardConfig::default();
        let mut latch = Latch(ResetCause::WATCHDOG.bits());
        let mut indicators = CauseIndicators::<Led>::new(Default::default());

        let report = arm_and_report(
            &config,
            MockWatchdog { running: None },
            &mut latch,
            &mut indicators,
        )
        .unwrap();

        assert_eq!(report.cause, ResetCause::WATCHDOG);
        assert_eq!(report.arm_mode, ArmMode::Started);
        assert!(indicators.leds()[1].0);
        assert_eq!(latch.0, 0);
    }

    #[test]
    fn test_second_report_is_empty() {
        let mut latch = Latch(ResetCause::SOFTWARE.bits());
        let mut indicators = CauseIndicators::<Led>::new(Default::default());

        assert_eq!(
            report_reset_cause(&mut latch, &mut indicators),
            ResetCause::SOFTWARE
        );
        assert_eq!(
            report_reset_cause(&mut latch, &mut indicators),
            ResetCause::empty()
        );
        assert!(indicators.leds().iter().all(|l| !l.0));
    }

    #[test]
    fn test_adopts_matching_watchdog() {
        let config = BoardConfig::default();
        let mut latch = Latch(ResetCause::SOFTWARE.bits());
        let mut indicators = CauseIndicators::<Led>::new(Default::default());

        let report = arm_and_report(
            &config,
            MockWatchdog {
                running: Some(config.watchdog),
            },
            &mut latch,
            &mut indicators,
        )
        .unwrap();
        assert_eq!(report.arm_mode, ArmMode::Adopted);
    }

    #[test]
    fn test_mismatched_watchdog_fails_before_report() {
        let config = BoardConfig::default();
        let mut latch = Latch(ResetCause::SOFTWARE.bits());
        let mut indicators = CauseIndicators::<Led>::new(Default::default());

        let result = arm_and_report(
            &config,
            MockWatchdog {
                running: Some(WatchdogConfig::from_millis(1000).unwrap()),
            },
            &mut latch,
            &mut indicators,
        );
        assert!(matches!(
            result,
            Err(InitError::Watchdog(WatchdogError::RunningWithDifferentConfig))
        ));
        // Latch untouched
        assert_eq!(latch.0, ResetCause::SOFTWARE.bits());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = BoardConfig::default();
        config.timing.startup_toggle_us = 0;
        let mut latch = Latch(0);
        let mut indicators = CauseIndicators::<Led>::new(Default::default());

        let result = arm_and_report(
            &config,
            MockWatchdog { running: None },
            &mut latch,
            &mut indicators,
        );
        assert!(matches!(
            result,
            Err(InitError::Config(ConfigError::ZeroDelay))
        ));
    }

    #[test]
    fn test_startup_signal() {
        let timing = TimingConfig::DEFAULT;
        let mut led = Led(false);
        let mut delay = CountingDelay::default();

        startup_signal(&mut led, &mut delay, &timing);

        // Odd number of toggles leaves the LED lit
        assert!(led.0);
        assert_eq!(delay.total_us, 7 * 200_000);
    }
}
