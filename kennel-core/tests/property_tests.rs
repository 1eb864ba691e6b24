//! Property-based tests for the watchdog countdown and reset reporting.
//!
//! The countdown model is checked directly over random reload schedules,
//! then the liveness path is checked end to end on the simulated chip.

use kennel_core::config::BoardConfig;
use kennel_core::registers::wdt::{Crv, ReloadMask, RELOAD_TOKEN};
use kennel_core::sim::{run_boot_cycle, BootEnd, SimChip, Stimulus, NS_PER_MS};
use kennel_core::watchdog::{Countdown, ReloadOutcome, WatchdogConfig};
use kennel_core::ResetCause;
use proptest::prelude::*;

fn config_with_ticks(ticks: u64) -> WatchdogConfig {
    WatchdogConfig::new(Crv::from_timeout_ticks(ticks).unwrap())
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    // -- Countdown: reloads in time ---------------------------------------------

    /// Reloads spaced strictly less than the countdown apart never expire.
    #[test]
    fn prop_reload_in_time_never_expires(
        timeout in 16u64..200_000,
        gaps in prop::collection::vec(0.0f64..1.0, 1..64),
    ) {
        let mut countdown = Countdown::new();
        countdown.start(config_with_ticks(timeout), 0).unwrap();

        let mut now = 0u64;
        for fraction in gaps {
            let gap = ((timeout - 1) as f64 * fraction) as u64;
            now += gap;
            prop_assert_eq!(countdown.poll(now), None, "expired at {} with timeout {}", now, timeout);
            prop_assert_eq!(countdown.write_reload(0, RELOAD_TOKEN, now), ReloadOutcome::Reloaded);
        }
        prop_assert_eq!(countdown.poll(now + timeout - 1), None);
    }

    /// A gap of at least the countdown expires exactly one countdown after
    /// the last reload.
    #[test]
    fn prop_late_reload_expires_at_deadline(
        timeout in 16u64..200_000,
        gaps in prop::collection::vec(0u64..1_000, 0..16),
        overshoot in 0u64..100_000,
    ) {
        let mut countdown = Countdown::new();
        countdown.start(config_with_ticks(timeout), 0).unwrap();

        let mut last = 0u64;
        for gap in gaps {
            let gap = gap.min(timeout - 1);
            last += gap;
            countdown.write_reload(0, RELOAD_TOKEN, last);
        }

        let late = last + timeout + overshoot;
        prop_assert_eq!(countdown.poll(late), Some(last + timeout));
        // Too late to reload
        prop_assert_eq!(countdown.write_reload(0, RELOAD_TOKEN, late), ReloadOutcome::Ignored);
        prop_assert_eq!(countdown.poll(late + 1), Some(last + timeout));
    }

    /// Only the reload token is accepted.
    #[test]
    fn prop_wrong_token_ignored(value: u32, at in 0u64..1_000) {
        prop_assume!(value != RELOAD_TOKEN);
        let mut countdown = Countdown::new();
        countdown.start(WatchdogConfig::default(), 0).unwrap();
        prop_assert_eq!(countdown.write_reload(0, value, at), ReloadOutcome::Ignored);
        prop_assert_eq!(countdown.deadline(), Some(3 * 32768));
    }

    /// With several reload registers enabled the countdown restarts only
    /// after the last outstanding one is written.
    #[test]
    fn prop_reload_needs_every_enabled_register(
        mask in 1u8..=255,
        order in Just((0..8).collect::<Vec<usize>>()).prop_shuffle(),
    ) {
        let mask = ReloadMask::from_bits(mask).unwrap();
        let mut countdown = Countdown::new();
        countdown
            .start(WatchdogConfig::default().with_reload_channels(mask), 0)
            .unwrap();

        let enabled: Vec<usize> = order.into_iter().filter(|&ch| mask.contains(ch)).collect();
        for (i, &ch) in enabled.iter().enumerate() {
            let outcome = countdown.write_reload(ch, RELOAD_TOKEN, 10 + i as u64);
            if i + 1 == enabled.len() {
                prop_assert_eq!(outcome, ReloadOutcome::Reloaded);
            } else {
                prop_assert_eq!(outcome, ReloadOutcome::Pending);
                prop_assert_eq!(countdown.deadline(), Some(3 * 32768));
            }
        }
    }

    // -- Reset cause ------------------------------------------------------------

    /// Decoding keeps exactly the defined bits.
    #[test]
    fn prop_reset_cause_drops_reserved_bits(bits: u32) {
        let cause = ResetCause::from_register(bits);
        prop_assert_eq!(cause.bits(), bits & 0x0007_000F);
        prop_assert_eq!(cause.is_power_on(), bits & 0x0007_000F == 0);
    }
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(32))]

    // -- End to end: liveness button on the simulated chip ----------------------

    /// Button edges less than the countdown apart keep the board alive.
    #[test]
    fn prop_button_edges_in_time_keep_board_alive(gaps_ms in prop::collection::vec(100u64..2_900, 1..24)) {
        let chip = SimChip::new();
        let pin = BoardConfig::default().pins.liveness_button.pin;

        let mut at = 0u64;
        let mut high = true;
        for gap in &gaps_ms {
            at += gap * NS_PER_MS;
            high = !high;
            chip.schedule(Stimulus::level(at, pin, high)).unwrap();
        }

        let record = run_boot_cycle(&chip, &BoardConfig::default(), at).unwrap();
        prop_assert_eq!(record.end, BootEnd::Deadline);
        prop_assert_eq!(chip.pending_reset(), None);
    }

    /// Once the edges stop the board resets one countdown after the last.
    #[test]
    fn prop_missed_reload_resets_after_countdown(gaps_ms in prop::collection::vec(100u64..2_900, 0..12)) {
        let chip = SimChip::new();
        let pin = BoardConfig::default().pins.liveness_button.pin;

        let mut at = 0u64;
        let mut high = true;
        for gap in &gaps_ms {
            at += gap * NS_PER_MS;
            high = !high;
            chip.schedule(Stimulus::level(at, pin, high)).unwrap();
        }

        let record = run_boot_cycle(&chip, &BoardConfig::default(), at + 10_000 * NS_PER_MS).unwrap();
        prop_assert_eq!(record.end, BootEnd::Reset(ResetCause::WATCHDOG));
        let reset_at = record.ended_at_ns;
        prop_assert!(reset_at > at, "reset at {} before last edge {}", reset_at, at);
        prop_assert!(reset_at <= at + 3_000 * NS_PER_MS, "reset at {} too late after {}", reset_at, at);
    }
}
