//! Chip state and the time engine

use core::cell::RefCell;

use heapless::Vec;
use kennel_hal::Sense;

use super::NS_PER_S;
use crate::app::{InterruptHandler, IrqSource};
use crate::config::PinConfig;
use crate::error::{IrqError, WatchdogError};
use crate::power::{PowerEvent, PowerState};
use crate::registers::gpio::{Direction, PinCnf, PIN_COUNT};
use crate::registers::gpiote::{GpioteConfig, GpioteMode, CHANNEL_COUNT};
use crate::registers::power::RESETREAS_CLEAR_ALL;
use crate::registers::wdt::LFCLK_HZ;
use crate::reset::ResetCause;
use crate::watchdog::{Countdown, ReloadOutcome, WatchdogConfig};

/// Capacity of the stimulus queue
pub const MAX_STIMULI: usize = 32;

/// LFCLK tick count at time `ns` (rounded down)
pub const fn ns_to_ticks(ns: u64) -> u64 {
    ns * LFCLK_HZ as u64 / NS_PER_S
}

/// First nanosecond at which `ticks` LFCLK ticks have elapsed (rounded up)
pub const fn ticks_to_ns(ticks: u64) -> u64 {
    (ticks * NS_PER_S).div_ceil(LFCLK_HZ as u64)
}

/// External input applied at a scheduled time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stimulus {
    pub at_ns: u64,
    pub kind: StimulusKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StimulusKind {
    /// Drive an input pin to an electrical level
    Level { pin: u8, high: bool },
    /// Assert the reset pin
    PinReset,
}

impl Stimulus {
    pub const fn level(at_ns: u64, pin: u8, high: bool) -> Self {
        Self {
            at_ns,
            kind: StimulusKind::Level { pin, high },
        }
    }

    pub const fn pin_reset(at_ns: u64) -> Self {
        Self {
            at_ns,
            kind: StimulusKind::PinReset,
        }
    }
}

/// Interrupt handlers registered for the current boot
///
/// One slot per source; handlers run with the chip state unlocked so they
/// can drive pins and reload the watchdog.
pub struct SimIrq<'a> {
    gpiote: Option<&'a RefCell<dyn InterruptHandler + 'a>>,
    timeout: Option<&'a RefCell<dyn InterruptHandler + 'a>>,
}

impl Default for SimIrq<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> SimIrq<'a> {
    pub const fn new() -> Self {
        Self {
            gpiote: None,
            timeout: None,
        }
    }

    /// Register `handler` for the source it reports
    pub fn register(&mut self, handler: &'a RefCell<dyn InterruptHandler + 'a>) -> Result<(), IrqError> {
        let source = handler.borrow().source();
        let slot = match source {
            IrqSource::Gpiote => &mut self.gpiote,
            IrqSource::WatchdogTimeout => &mut self.timeout,
        };
        if slot.is_some() {
            return Err(IrqError::AlreadyRegistered(source));
        }
        *slot = Some(handler);
        Ok(())
    }

    fn dispatch(&self, source: IrqSource) {
        let slot = match source {
            IrqSource::Gpiote => self.gpiote,
            IrqSource::WatchdogTimeout => self.timeout,
        };
        if let Some(handler) = slot {
            handler.borrow_mut().on_interrupt();
        }
    }
}

#[derive(Debug)]
struct ChipState {
    now_ns: u64,
    /// Electrical output levels (`OUT`)
    outputs: u32,
    /// Electrical levels applied to the pins from outside (`IN`)
    inputs: u32,
    pin_cnf: [PinCnf; PIN_COUNT as usize],
    countdown: Countdown,
    wdt_inten: bool,
    timeout_fired: bool,
    resetreas: u32,
    power: PowerState,
    /// Reset that has happened but not yet been applied by `begin_boot`
    pending_reset: Option<ResetCause>,
    gpiote: [GpioteConfig; CHANNEL_COUNT as usize],
    gpiote_events: u8,
    gpiote_inten: u8,
    /// NVIC lines disabled until the next reset
    irq_masked: bool,
    stimuli: Vec<Stimulus, MAX_STIMULI>,
    boots: u32,
}

impl ChipState {
    fn power_on() -> Self {
        Self {
            now_ns: 0,
            outputs: 0,
            // Buttons released, pulled up
            inputs: u32::MAX,
            pin_cnf: [PinCnf::RESET; PIN_COUNT as usize],
            countdown: Countdown::new(),
            wdt_inten: false,
            timeout_fired: false,
            resetreas: 0,
            power: PowerState::Active,
            pending_reset: None,
            gpiote: [GpioteConfig::DISABLED; CHANNEL_COUNT as usize],
            gpiote_events: 0,
            gpiote_inten: 0,
            irq_masked: false,
            stimuli: Vec::new(),
            boots: 0,
        }
    }

    fn halted(&self) -> bool {
        self.pending_reset.is_some() || self.power == PowerState::Off
    }

    fn now_ticks(&self) -> u64 {
        ns_to_ticks(self.now_ns)
    }

    fn request_reset(&mut self, cause: ResetCause) {
        if self.pending_reset.is_none() {
            self.pending_reset = Some(cause);
        }
    }

    /// Any sensed pin at its wake level
    fn wake_detected(&self) -> bool {
        (0..PIN_COUNT).any(|pin| {
            let sense = self.pin_cnf[pin as usize].sense;
            sense != Sense::Disabled && sense.is_triggered_by(self.inputs & (1 << pin) != 0)
        })
    }

    /// Apply a level change; returns true if a GPIOTE interrupt is due
    fn apply_level(&mut self, pin: u8, high: bool) -> bool {
        let bit = 1u32 << (pin & 0x1F);
        let was_high = self.inputs & bit != 0;
        if high {
            self.inputs |= bit;
        } else {
            self.inputs &= !bit;
        }

        if self.power == PowerState::Off {
            if self.wake_detected() {
                self.power = self.power.transition(PowerEvent::Wake);
                self.request_reset(ResetCause::WAKE_GPIO);
            }
            return false;
        }

        let mut interrupt = false;
        for (ch, cfg) in self.gpiote.iter().enumerate() {
            let Some(polarity) = cfg.polarity else {
                continue;
            };
            if cfg.mode == GpioteMode::Event && cfg.psel == pin && polarity.matches(was_high, high) {
                self.gpiote_events |= 1 << ch;
                interrupt |= self.gpiote_inten & (1 << ch) != 0;
            }
        }
        interrupt
    }
}

/// What the time engine does next
enum Next {
    Deadline,
    Stimulus,
    WatchdogTimeout,
    WatchdogReset,
}

/// Simulated nRF52832
///
/// Peripheral handles borrow the chip, so the boot sequence and the
/// handlers share it the way they share the hardware.
#[derive(Debug)]
pub struct SimChip {
    state: RefCell<ChipState>,
}

impl Default for SimChip {
    fn default() -> Self {
        Self::new()
    }
}

impl SimChip {
    /// Chip straight out of power-on reset
    pub fn new() -> Self {
        Self {
            state: RefCell::new(ChipState::power_on()),
        }
    }

    /// Queue an input stimulus
    ///
    /// Stimuli at the same time are applied in the order scheduled. Fails
    /// with the stimulus when the queue is full.
    pub fn schedule(&self, stimulus: Stimulus) -> Result<(), Stimulus> {
        let mut st = self.state.borrow_mut();
        let at = st
            .stimuli
            .iter()
            .position(|s| s.at_ns > stimulus.at_ns)
            .unwrap_or(st.stimuli.len());
        st.stimuli.insert(at, stimulus)
    }

    pub fn now_ns(&self) -> u64 {
        self.state.borrow().now_ns
    }

    pub fn power_state(&self) -> PowerState {
        self.state.borrow().power
    }

    /// Reset that ended the current boot, if any
    pub fn pending_reset(&self) -> Option<ResetCause> {
        self.state.borrow().pending_reset
    }

    /// Number of boots started so far
    pub fn boots(&self) -> u32 {
        self.state.borrow().boots
    }

    /// Check whether an output pin drives `level`
    pub fn output_level(&self, pin: u8) -> Option<bool> {
        let st = self.state.borrow();
        let cnf = st.pin_cnf.get(pin as usize)?;
        (cnf.dir == Direction::Output).then_some(st.outputs & (1 << pin) != 0)
    }

    /// Check whether an indicator is lit, honouring its polarity
    pub fn is_lit(&self, pin: &PinConfig) -> bool {
        self.output_level(pin.pin)
            .is_some_and(|high| high != pin.inverted)
    }

    pub fn input_level(&self, pin: u8) -> bool {
        self.state.borrow().inputs & (1 << (pin & 0x1F)) != 0
    }

    /// Watchdog reset time, if the watchdog is running
    pub fn watchdog_reset_at_ns(&self) -> Option<u64> {
        self.state.borrow().countdown.reset_at().map(ticks_to_ns)
    }

    /// Start a boot: apply the pending reset, if any
    ///
    /// A reset clears GPIO and GPIOTE configuration and accumulates its
    /// cause in `RESETREAS`. The watchdog keeps running across a soft
    /// reset and is stopped by every other reset.
    pub fn begin_boot(&self) {
        let mut st = self.state.borrow_mut();
        if let Some(cause) = st.pending_reset.take() {
            st.resetreas |= cause.bits();
            if cause != ResetCause::SOFTWARE {
                st.countdown.reset();
                st.wdt_inten = false;
            }
            st.timeout_fired = false;
            st.outputs = 0;
            st.pin_cnf = [PinCnf::RESET; PIN_COUNT as usize];
            st.gpiote = [GpioteConfig::DISABLED; CHANNEL_COUNT as usize];
            st.gpiote_events = 0;
            st.gpiote_inten = 0;
            st.irq_masked = false;
            st.power = PowerState::Active;
        }
        st.boots += 1;
    }

    /// Enter System OFF
    ///
    /// Wakes immediately if a sensed pin is already at its wake level.
    pub fn system_off(&self) {
        let mut st = self.state.borrow_mut();
        if st.halted() {
            return;
        }
        st.power = st.power.transition(PowerEvent::SystemOffRequested);
        if st.wake_detected() {
            st.power = st.power.transition(PowerEvent::Wake);
            st.request_reset(ResetCause::WAKE_GPIO);
        }
    }

    /// Request a soft reset
    pub fn system_reset(&self) {
        let mut st = self.state.borrow_mut();
        if !st.halted() {
            st.request_reset(ResetCause::SOFTWARE);
        }
    }

    /// Disable every interrupt line; events still latch
    pub(super) fn mask_interrupts(&self) {
        self.state.borrow_mut().irq_masked = true;
    }

    pub(super) fn write_pin_cnf(&self, pin: u8, cnf: PinCnf) {
        let mut st = self.state.borrow_mut();
        if st.halted() {
            return;
        }
        if let Some(slot) = st.pin_cnf.get_mut(pin as usize) {
            *slot = cnf;
        }
    }

    pub(super) fn write_output(&self, pin: u8, high: bool) {
        let mut st = self.state.borrow_mut();
        if st.halted() {
            return;
        }
        let bit = 1u32 << (pin & 0x1F);
        if high {
            st.outputs |= bit;
        } else {
            st.outputs &= !bit;
        }
    }

    /// `OUTSET` / `OUTCLR` pair
    pub(super) fn write_port(&self, set: u32, clear: u32) {
        let mut st = self.state.borrow_mut();
        if st.halted() {
            return;
        }
        st.outputs = (st.outputs | set) & !clear;
    }

    pub(super) fn read_output(&self, pin: u8) -> bool {
        self.state.borrow().outputs & (1 << (pin & 0x1F)) != 0
    }

    pub(super) fn write_gpiote_config(&self, channel: u8, config: GpioteConfig) {
        let mut st = self.state.borrow_mut();
        if st.halted() {
            return;
        }
        if let Some(slot) = st.gpiote.get_mut(channel as usize) {
            *slot = config;
        }
    }

    pub(super) fn gpiote_intenset(&self, mask: u8) {
        let mut st = self.state.borrow_mut();
        if !st.halted() {
            st.gpiote_inten |= mask;
        }
    }

    pub(super) fn gpiote_pending(&self, channel: u8) -> bool {
        let st = self.state.borrow();
        let bit = 1u8 << (channel & 0x7);
        st.gpiote_events & st.gpiote_inten & bit != 0
    }

    pub(super) fn gpiote_clear(&self, channel: u8) {
        let mut st = self.state.borrow_mut();
        st.gpiote_events &= !(1u8 << (channel & 0x7));
    }

    pub(super) fn read_resetreas(&self) -> u32 {
        self.state.borrow().resetreas
    }

    /// Write-one-to-clear
    pub(super) fn clear_resetreas(&self, mask: u32) {
        let mut st = self.state.borrow_mut();
        if !st.halted() {
            st.resetreas &= !(mask & RESETREAS_CLEAR_ALL);
        }
    }

    pub(super) fn running_watchdog(&self) -> Option<WatchdogConfig> {
        let st = self.state.borrow();
        st.countdown.is_running().then(|| *st.countdown.config())
    }

    pub(super) fn start_watchdog(&self, config: &WatchdogConfig) -> Result<(), WatchdogError> {
        let mut st = self.state.borrow_mut();
        let now = st.now_ticks();
        st.countdown.start(*config, now)?;
        st.wdt_inten = config.timeout_interrupt;
        Ok(())
    }

    pub(super) fn write_reload(&self, channel: usize, value: u32) -> ReloadOutcome {
        let mut st = self.state.borrow_mut();
        if st.halted() {
            return ReloadOutcome::Ignored;
        }
        let now = st.now_ticks();
        st.countdown.write_reload(channel, value, now)
    }

    /// Advance virtual time to `target_ns`
    ///
    /// Applies stimuli, fires watchdog events and runs interrupt handlers
    /// in time order. Returns early, with time frozen, when the chip
    /// resets.
    pub fn advance_to(&self, target_ns: u64, irq: &SimIrq<'_>) {
        loop {
            let (at, next) = {
                let st = self.state.borrow();
                if st.pending_reset.is_some() {
                    return;
                }

                let mut next = (target_ns.max(st.now_ns), Next::Deadline);
                if let Some(s) = st.stimuli.first() {
                    if s.at_ns <= next.0 {
                        next = (s.at_ns.max(st.now_ns), Next::Stimulus);
                    }
                }
                // Watchdog events win ties with stimuli
                if st.power == PowerState::Active {
                    if let Some(deadline) = st.countdown.deadline() {
                        let at = ticks_to_ns(deadline).max(st.now_ns);
                        if st.wdt_inten && !st.timeout_fired && at <= next.0 {
                            next = (at, Next::WatchdogTimeout);
                        }
                    }
                    if let Some(reset) = st.countdown.reset_at() {
                        let at = ticks_to_ns(reset).max(st.now_ns);
                        if at < next.0 || (at == next.0 && !matches!(next.1, Next::WatchdogTimeout)) {
                            next = (at, Next::WatchdogReset);
                        }
                    }
                }
                next
            };

            let dispatch = {
                let mut st = self.state.borrow_mut();
                st.now_ns = at;
                match next {
                    Next::Deadline => return,
                    Next::WatchdogTimeout => {
                        let now = st.now_ticks();
                        st.countdown.poll(now);
                        st.timeout_fired = true;
                        Some(IrqSource::WatchdogTimeout)
                    }
                    Next::WatchdogReset => {
                        let now = st.now_ticks();
                        st.countdown.poll(now);
                        st.request_reset(ResetCause::WATCHDOG);
                        None
                    }
                    Next::Stimulus => {
                        let stimulus = st.stimuli.remove(0);
                        match stimulus.kind {
                            StimulusKind::PinReset => {
                                st.request_reset(ResetCause::PIN);
                                None
                            }
                            StimulusKind::Level { pin, high } => {
                                st.apply_level(pin, high).then_some(IrqSource::Gpiote)
                            }
                        }
                    }
                }
            };

            if let Some(source) = dispatch {
                if !self.state.borrow().irq_masked {
                    irq.dispatch(source);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TimeoutHandler;
    use crate::registers::wdt::RELOAD_TOKEN;
    use core::cell::Cell;
    use kennel_hal::{EdgePolarity, OutputPin, Pull};

    /// Counts toggles
    struct Counter<'a>(&'a Cell<u32>);

    impl OutputPin for Counter<'_> {
        fn set_high(&mut self) {}

        fn set_low(&mut self) {}

        fn toggle(&mut self) {
            self.0.set(self.0.get() + 1);
        }

        fn is_set_high(&self) -> bool {
            self.0.get() % 2 == 1
        }
    }

    #[test]
    fn test_tick_conversion() {
        assert_eq!(ns_to_ticks(NS_PER_S), 32768);
        assert_eq!(ticks_to_ns(32768), NS_PER_S);
        // One tick is 30517.578125 ns
        assert_eq!(ticks_to_ns(1), 30518);
        assert_eq!(ns_to_ticks(30517), 0);
        assert_eq!(ns_to_ticks(30518), 1);
    }

    #[test]
    fn test_watchdog_reset_without_reload() {
        let chip = SimChip::new();
        chip.begin_boot();
        chip.start_watchdog(&WatchdogConfig::default()).unwrap();

        chip.advance_to(10 * NS_PER_S, &SimIrq::new());
        assert_eq!(chip.pending_reset(), Some(ResetCause::WATCHDOG));
        assert_eq!(chip.now_ns(), 3 * NS_PER_S);

        chip.begin_boot();
        assert_eq!(chip.read_resetreas(), ResetCause::WATCHDOG.bits());
        assert!(chip.running_watchdog().is_none());
    }

    #[test]
    fn test_reload_postpones_reset() {
        let chip = SimChip::new();
        chip.begin_boot();
        chip.start_watchdog(&WatchdogConfig::default()).unwrap();

        chip.advance_to(NS_PER_S, &SimIrq::new());
        assert_eq!(chip.write_reload(0, RELOAD_TOKEN), ReloadOutcome::Reloaded);
        chip.advance_to(10 * NS_PER_S, &SimIrq::new());
        assert_eq!(chip.now_ns(), 4 * NS_PER_S);
    }

    #[test]
    fn test_soft_reset_keeps_watchdog() {
        let chip = SimChip::new();
        chip.begin_boot();
        chip.start_watchdog(&WatchdogConfig::default()).unwrap();
        chip.system_reset();
        chip.begin_boot();
        assert!(chip.running_watchdog().is_some());
        assert_eq!(chip.read_resetreas(), ResetCause::SOFTWARE.bits());
    }

    #[test]
    fn test_resetreas_accumulates_until_cleared() {
        let chip = SimChip::new();
        chip.begin_boot();
        chip.system_reset();
        chip.begin_boot();
        chip.schedule(Stimulus::pin_reset(5)).unwrap();
        chip.advance_to(10, &SimIrq::new());
        chip.begin_boot();
        assert_eq!(
            chip.read_resetreas(),
            (ResetCause::SOFTWARE | ResetCause::PIN).bits()
        );
        chip.clear_resetreas(RESETREAS_CLEAR_ALL);
        assert_eq!(chip.read_resetreas(), 0);
    }

    #[test]
    fn test_gpiote_latches_edges() {
        let chip = SimChip::new();
        chip.begin_boot();
        chip.write_pin_cnf(13, PinCnf::input(Pull::Up));
        chip.write_gpiote_config(0, GpioteConfig::event(13, EdgePolarity::HiToLo).unwrap());
        chip.gpiote_intenset(1);

        chip.schedule(Stimulus::level(100, 13, false)).unwrap();
        chip.advance_to(200, &SimIrq::new());
        assert!(chip.gpiote_pending(0));
        chip.gpiote_clear(0);

        // Rising edge does not match
        chip.schedule(Stimulus::level(300, 13, true)).unwrap();
        chip.advance_to(400, &SimIrq::new());
        assert!(!chip.gpiote_pending(0));
    }

    #[test]
    fn test_system_off_and_wake() {
        let chip = SimChip::new();
        chip.begin_boot();
        chip.write_pin_cnf(16, PinCnf::sensed_input(Pull::Up, Sense::Low));
        chip.system_off();
        assert_eq!(chip.power_state(), PowerState::Off);

        // Other pins do nothing
        chip.schedule(Stimulus::level(100, 13, false)).unwrap();
        chip.advance_to(200, &SimIrq::new());
        assert_eq!(chip.pending_reset(), None);

        chip.schedule(Stimulus::level(300, 16, false)).unwrap();
        chip.advance_to(1000, &SimIrq::new());
        assert_eq!(chip.pending_reset(), Some(ResetCause::WAKE_GPIO));
        assert_eq!(chip.now_ns(), 300);
    }

    #[test]
    fn test_system_off_with_wake_pin_held() {
        let chip = SimChip::new();
        chip.begin_boot();
        chip.write_pin_cnf(16, PinCnf::sensed_input(Pull::Up, Sense::Low));
        chip.schedule(Stimulus::level(0, 16, false)).unwrap();
        chip.advance_to(10, &SimIrq::new());

        chip.system_off();
        assert_eq!(chip.pending_reset(), Some(ResetCause::WAKE_GPIO));
    }

    #[test]
    fn test_schedule_keeps_order() {
        let chip = SimChip::new();
        chip.schedule(Stimulus::level(20, 1, false)).unwrap();
        chip.schedule(Stimulus::level(10, 2, false)).unwrap();
        chip.schedule(Stimulus::level(20, 1, true)).unwrap();

        chip.advance_to(15, &SimIrq::new());
        assert!(!chip.input_level(2));
        assert!(chip.input_level(1));
        chip.advance_to(25, &SimIrq::new());
        assert!(chip.input_level(1));
    }

    #[test]
    fn test_second_handler_for_source_rejected() {
        let first_toggles = Cell::new(0);
        let second_toggles = Cell::new(0);
        let first = RefCell::new(TimeoutHandler::new(Counter(&first_toggles)));
        let second = RefCell::new(TimeoutHandler::new(Counter(&second_toggles)));

        let mut irq = SimIrq::new();
        assert_eq!(irq.register(&first), Ok(()));
        assert_eq!(
            irq.register(&second),
            Err(IrqError::AlreadyRegistered(IrqSource::WatchdogTimeout))
        );

        // The first handler keeps the slot
        irq.dispatch(IrqSource::WatchdogTimeout);
        assert_eq!(first_toggles.get(), 1);
        assert_eq!(second_toggles.get(), 0);
    }

    #[test]
    fn test_masked_interrupts_not_dispatched() {
        let toggles = Cell::new(0);
        let handler = RefCell::new(TimeoutHandler::new(Counter(&toggles)));
        let mut irq = SimIrq::new();
        irq.register(&handler).unwrap();

        let chip = SimChip::new();
        chip.begin_boot();
        chip.start_watchdog(&WatchdogConfig::default().with_timeout_interrupt(true))
            .unwrap();
        chip.mask_interrupts();

        chip.advance_to(10 * NS_PER_S, &irq);
        assert_eq!(toggles.get(), 0);
        // Masking does not stop the watchdog
        assert_eq!(chip.pending_reset(), Some(ResetCause::WATCHDOG));

        // Unmasked again after the reset
        chip.begin_boot();
        chip.start_watchdog(&WatchdogConfig::default().with_timeout_interrupt(true))
            .unwrap();
        chip.advance_to(20 * NS_PER_S, &irq);
        assert_eq!(toggles.get(), 1);
    }

    #[test]
    fn test_queue_full() {
        let chip = SimChip::new();
        for i in 0..MAX_STIMULI as u64 {
            chip.schedule(Stimulus::pin_reset(i)).unwrap();
        }
        assert!(chip.schedule(Stimulus::pin_reset(0)).is_err());
    }
}
