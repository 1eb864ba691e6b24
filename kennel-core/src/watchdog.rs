//! Watchdog configuration and countdown model
//!
//! [`WatchdogConfig`] is what gets written to the WDT registers when the
//! watchdog is armed. [`Countdown`] models what the hardware then does with
//! it: count down `CRV + 1` LFCLK ticks, restart the count once every
//! enabled reload register has received the token, and time out otherwise.
//! Time is measured in LFCLK ticks.

use crate::error::WatchdogError;
use crate::registers::wdt::{
    Crv, HaltBehavior, ReloadMask, SleepBehavior, WdtConfigReg, RELOAD_TOKEN,
};

/// LFCLK ticks between the TIMEOUT event and the reset when the timeout
/// interrupt is enabled
pub const TIMEOUT_TO_RESET_TICKS: u64 = 2;

/// Watchdog settings, fixed once armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchdogConfig {
    /// Countdown length
    pub timeout: Crv,
    /// Reload registers that must all be written to reload
    pub reload_channels: ReloadMask,
    /// Countdown behaviour while a debugger halts the CPU
    pub halt: HaltBehavior,
    /// Countdown behaviour while the CPU sleeps
    pub sleep: SleepBehavior,
    /// Raise the TIMEOUT interrupt before resetting
    pub timeout_interrupt: bool,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self::new(Crv::THREE_SECONDS)
    }
}

impl WatchdogConfig {
    /// Create a config with the given countdown and default settings
    pub const fn new(timeout: Crv) -> Self {
        Self {
            timeout,
            reload_channels: ReloadMask::RR0,
            halt: HaltBehavior::Pause,
            sleep: SleepBehavior::Run,
            timeout_interrupt: false,
        }
    }

    /// Create a config from a countdown in milliseconds
    pub const fn from_millis(ms: u32) -> Result<Self, WatchdogError> {
        match Crv::from_millis(ms) {
            Ok(crv) => Ok(Self::new(crv)),
            Err(e) => Err(e),
        }
    }

    pub const fn with_reload_channels(mut self, channels: ReloadMask) -> Self {
        self.reload_channels = channels;
        self
    }

    pub const fn with_halt(mut self, halt: HaltBehavior) -> Self {
        self.halt = halt;
        self
    }

    pub const fn with_sleep(mut self, sleep: SleepBehavior) -> Self {
        self.sleep = sleep;
        self
    }

    pub const fn with_timeout_interrupt(mut self, enabled: bool) -> Self {
        self.timeout_interrupt = enabled;
        self
    }

    /// Value of the `CONFIG` register
    pub const fn config_reg(&self) -> WdtConfigReg {
        WdtConfigReg {
            sleep: self.sleep,
            halt: self.halt,
        }
    }

    /// Countdown length in LFCLK ticks
    pub const fn timeout_ticks(&self) -> u64 {
        self.timeout.timeout_ticks()
    }

    /// Check whether a running watchdog's registers hold this configuration
    ///
    /// Used to decide whether a watchdog that survived a soft reset can be
    /// adopted as-is. The interrupt enable is not compared.
    pub fn matches_registers(&self, crv: u32, rren: u32, config: u32) -> bool {
        crv == self.timeout.bits()
            && rren == self.reload_channels.bits() as u32
            && WdtConfigReg::from_bits(config) == self.config_reg()
    }
}

/// Countdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CountdownState {
    /// Not started since the last full reset
    Stopped,
    /// Counting; times out at `deadline`
    Running { deadline: u64 },
    /// Timed out at tick `at`; the reset is imminent
    TimedOut { at: u64 },
}

/// Result of a write to a reload register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReloadOutcome {
    /// Every enabled register has been written; the countdown restarted
    Reloaded,
    /// Register accepted, other enabled registers are still outstanding
    Pending,
    /// Wrong value, disabled register, or the watchdog is not counting
    Ignored,
}

/// Model of the hardware countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Countdown {
    config: WatchdogConfig,
    state: CountdownState,
    /// Reload registers written since the last reload
    written: u8,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    /// Create a stopped countdown
    pub const fn new() -> Self {
        Self {
            config: WatchdogConfig::new(Crv::THREE_SECONDS),
            state: CountdownState::Stopped,
            written: 0,
        }
    }

    /// Start counting at tick `now`
    ///
    /// Fails if already started; only a full reset stops the watchdog.
    pub fn start(&mut self, config: WatchdogConfig, now: u64) -> Result<(), WatchdogError> {
        if self.state != CountdownState::Stopped {
            return Err(WatchdogError::AlreadyRunning);
        }
        self.config = config;
        self.state = CountdownState::Running {
            deadline: now + config.timeout_ticks(),
        };
        self.written = 0;
        Ok(())
    }

    /// Write `value` to reload register `channel` at tick `now`
    pub fn write_reload(&mut self, channel: usize, value: u32, now: u64) -> ReloadOutcome {
        self.poll(now);

        if !matches!(self.state, CountdownState::Running { .. }) {
            return ReloadOutcome::Ignored;
        }
        if value != RELOAD_TOKEN || !self.config.reload_channels.contains(channel) {
            return ReloadOutcome::Ignored;
        }

        self.written |= 1 << channel;
        if self.written != self.config.reload_channels.bits() {
            return ReloadOutcome::Pending;
        }

        self.written = 0;
        self.state = CountdownState::Running {
            deadline: now + self.config.timeout_ticks(),
        };
        ReloadOutcome::Reloaded
    }

    /// Advance the model to tick `now`
    ///
    /// Returns the tick at which the countdown expired, if it has.
    pub fn poll(&mut self, now: u64) -> Option<u64> {
        match self.state {
            CountdownState::Running { deadline } if now >= deadline => {
                self.state = CountdownState::TimedOut { at: deadline };
                Some(deadline)
            }
            CountdownState::TimedOut { at } => Some(at),
            _ => None,
        }
    }

    /// Tick at which the countdown expires unless reloaded
    pub fn deadline(&self) -> Option<u64> {
        match self.state {
            CountdownState::Running { deadline } => Some(deadline),
            CountdownState::TimedOut { at } => Some(at),
            CountdownState::Stopped => None,
        }
    }

    /// Tick at which the chip resets unless reloaded
    pub fn reset_at(&self) -> Option<u64> {
        let delay = if self.config.timeout_interrupt {
            TIMEOUT_TO_RESET_TICKS
        } else {
            0
        };
        self.deadline().map(|d| d + delay)
    }

    /// Stop counting; only a full chip reset does this
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, CountdownState::Stopped)
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }
}
