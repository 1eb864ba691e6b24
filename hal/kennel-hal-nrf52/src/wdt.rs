//! Watchdog timer
//!
//! Arming and reloading go through `embassy_nrf::wdt`. The driver always
//! enables `RR[0]..RR[N-1]`, so only masks starting at `RR[0]` without
//! gaps are accepted. The TIMEOUT interrupt enable is written directly
//! since the driver does not expose it.

use embassy_nrf::peripherals::WDT;
use embassy_nrf::wdt::{self, HaltConfig, SleepConfig, WatchdogHandle};
use embassy_nrf::Peri;
use heapless::Vec;
use kennel_core::error::WatchdogError;
use kennel_core::registers::wdt::{
    HaltBehavior, SleepBehavior, INTENSET_TIMEOUT, RELOAD_REGISTER_COUNT,
};
use kennel_core::traits::{ArmMode, Armed, Watchdog, WatchdogReload};
use kennel_core::watchdog::WatchdogConfig;
use nrf52832_pac as pac;

type Handles = Vec<WatchdogHandle, RELOAD_REGISTER_COUNT>;

fn wdt() -> &'static pac::wdt::RegisterBlock {
    unsafe { &*pac::WDT::ptr() }
}

/// WDT before arming
pub struct NrfWatchdog {
    wdt: Peri<'static, WDT>,
}

impl NrfWatchdog {
    pub fn new(wdt: Peri<'static, WDT>) -> Self {
        Self { wdt }
    }
}

fn driver_config(config: &WatchdogConfig) -> wdt::Config {
    let mut cfg = wdt::Config::default();
    cfg.timeout_ticks = config.timeout.bits();
    cfg.action_during_sleep = match config.sleep {
        SleepBehavior::Run => SleepConfig::RUN,
        SleepBehavior::Pause => SleepConfig::PAUSE,
    };
    cfg.action_during_debug_halt = match config.halt {
        HaltBehavior::Run => HaltConfig::RUN,
        HaltBehavior::Pause => HaltConfig::PAUSE,
    };
    cfg
}

/// Start the WDT with `N` reload registers, or adopt it if it already
/// runs with the same settings
fn start<const N: usize>(wdt: Peri<'static, WDT>, config: wdt::Config) -> Result<Handles, WatchdogError> {
    let (_wdt, handles): (_, [WatchdogHandle; N]) = match wdt::Watchdog::try_new(wdt, config) {
        Ok(started) => started,
        Err(_) => return Err(WatchdogError::RunningWithDifferentConfig),
    };
    Ok(handles.into_iter().collect())
}

impl Watchdog for NrfWatchdog {
    type Reload = NrfReload;

    fn arm(self, config: &WatchdogConfig) -> Result<Armed<NrfReload>, WatchdogError> {
        let mask = config.reload_channels;
        if !mask.is_contiguous() {
            return Err(WatchdogError::NonContiguousReloadMask);
        }

        // Only a running WDT has a configuration to read back
        let mode = if wdt::Config::try_new(&self.wdt).is_some() {
            ArmMode::Adopted
        } else {
            ArmMode::Started
        };

        let cfg = driver_config(config);
        let handles = match mask.count() {
            1 => start::<1>(self.wdt, cfg),
            2 => start::<2>(self.wdt, cfg),
            3 => start::<3>(self.wdt, cfg),
            4 => start::<4>(self.wdt, cfg),
            5 => start::<5>(self.wdt, cfg),
            6 => start::<6>(self.wdt, cfg),
            7 => start::<7>(self.wdt, cfg),
            _ => start::<8>(self.wdt, cfg),
        }?;

        // INTENCLR uses the same bit as INTENSET
        if config.timeout_interrupt {
            wdt().intenset.write(|w| unsafe { w.bits(INTENSET_TIMEOUT) });
        } else {
            wdt().intenclr.write(|w| unsafe { w.bits(INTENSET_TIMEOUT) });
        }

        let mut reload = NrfReload { handles };
        if mode == ArmMode::Adopted {
            reload.reload();
        }
        Ok(Armed { reload, mode })
    }
}

/// Reload handles of the running WDT, one per enabled register
pub struct NrfReload {
    handles: Handles,
}

impl WatchdogReload for NrfReload {
    fn reload(&mut self) {
        for handle in self.handles.iter_mut() {
            handle.pet();
        }
    }
}
