//! Peripheral handles on a simulated chip

use embedded_hal::delay::DelayNs;
use kennel_hal::{EdgeEvent, IndicatorPort, InputPin, OutputPin};

use super::chip::{SimChip, SimIrq};
use crate::config::{PinConfig, PinMap};
use crate::error::WatchdogError;
use crate::registers::gpio::PinCnf;
use crate::registers::power::RESETREAS_CLEAR_ALL;
use crate::registers::wdt::{ReloadMask, RELOAD_TOKEN};
use crate::reset::ResetCause;
use crate::traits::{
    ArmMode, Armed, InterruptMask, ResetReasonRegister, Watchdog, WatchdogReload,
};
use crate::watchdog::WatchdogConfig;

/// Output pin; levels are logical and mapped through `inverted`
#[derive(Debug)]
pub struct SimOutput<'a> {
    chip: &'a SimChip,
    pin: u8,
    inverted: bool,
}

impl<'a> SimOutput<'a> {
    /// Configure the pin as an output, initially off
    pub fn new(chip: &'a SimChip, config: PinConfig) -> Self {
        chip.write_pin_cnf(config.pin, PinCnf::output());
        let mut out = Self {
            chip,
            pin: config.pin,
            inverted: config.inverted,
        };
        out.set_low();
        out
    }
}

impl OutputPin for SimOutput<'_> {
    fn set_high(&mut self) {
        self.chip.write_output(self.pin, !self.inverted);
    }

    fn set_low(&mut self) {
        self.chip.write_output(self.pin, self.inverted);
    }

    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }

    fn is_set_high(&self) -> bool {
        self.chip.read_output(self.pin) != self.inverted
    }
}

/// Input pin reading electrical levels
#[derive(Debug)]
pub struct SimInput<'a> {
    chip: &'a SimChip,
    pin: u8,
}

impl<'a> SimInput<'a> {
    /// Configure the pin as an input with the configured pull
    pub fn new(chip: &'a SimChip, config: PinConfig) -> Self {
        chip.write_pin_cnf(config.pin, config.input_cnf());
        Self {
            chip,
            pin: config.pin,
        }
    }
}

impl InputPin for SimInput<'_> {
    fn is_high(&self) -> bool {
        self.chip.input_level(self.pin)
    }
}

/// Port-wide indicator switch-off
#[derive(Debug)]
pub struct SimIndicatorPort<'a> {
    chip: &'a SimChip,
    /// Drive high to switch off (active-low indicators)
    set: u32,
    /// Drive low to switch off (active-high indicators)
    clear: u32,
}

impl<'a> SimIndicatorPort<'a> {
    pub fn new(chip: &'a SimChip, pins: &PinMap) -> Self {
        Self {
            chip,
            set: pins.active_low_outputs(),
            clear: pins.active_high_outputs(),
        }
    }
}

impl IndicatorPort for SimIndicatorPort<'_> {
    fn all_off(&mut self) {
        self.chip.write_port(self.set, self.clear);
    }
}

/// NVIC enable bits of the registered interrupt sources
#[derive(Debug)]
pub struct SimInterruptMask<'a> {
    chip: &'a SimChip,
}

impl<'a> SimInterruptMask<'a> {
    pub fn new(chip: &'a SimChip) -> Self {
        Self { chip }
    }
}

impl InterruptMask for SimInterruptMask<'_> {
    fn mask_all(&mut self) {
        self.chip.mask_interrupts();
    }
}

/// GPIOTE `EVENTS_IN[channel]`
#[derive(Debug)]
pub struct SimEdgeEvent<'a> {
    chip: &'a SimChip,
    channel: u8,
}

impl<'a> SimEdgeEvent<'a> {
    pub fn new(chip: &'a SimChip, channel: u8) -> Self {
        Self { chip, channel }
    }
}

impl EdgeEvent for SimEdgeEvent<'_> {
    fn is_pending(&self) -> bool {
        self.chip.gpiote_pending(self.channel)
    }

    fn clear(&mut self) {
        self.chip.gpiote_clear(self.channel);
    }
}

/// WDT before arming
#[derive(Debug)]
pub struct SimWatchdog<'a> {
    chip: &'a SimChip,
}

impl<'a> SimWatchdog<'a> {
    pub fn new(chip: &'a SimChip) -> Self {
        Self { chip }
    }
}

impl<'a> Watchdog for SimWatchdog<'a> {
    type Reload = SimReload<'a>;

    fn arm(self, config: &WatchdogConfig) -> Result<Armed<SimReload<'a>>, WatchdogError> {
        let mut reload = SimReload {
            chip: self.chip,
            channels: config.reload_channels,
        };

        let mode = match self.chip.running_watchdog() {
            None => {
                self.chip.start_watchdog(config)?;
                ArmMode::Started
            }
            Some(running) => {
                let matches = config.matches_registers(
                    running.timeout.bits(),
                    running.reload_channels.bits() as u32,
                    running.config_reg().bits(),
                );
                if !matches {
                    return Err(WatchdogError::RunningWithDifferentConfig);
                }
                reload.reload();
                ArmMode::Adopted
            }
        };

        Ok(Armed { reload, mode })
    }
}

/// Reload handle of a running WDT
#[derive(Debug)]
pub struct SimReload<'a> {
    chip: &'a SimChip,
    channels: ReloadMask,
}

impl WatchdogReload for SimReload<'_> {
    fn reload(&mut self) {
        for channel in self.channels.channels() {
            self.chip.write_reload(channel, RELOAD_TOKEN);
        }
    }
}

/// POWER `RESETREAS`
#[derive(Debug)]
pub struct SimResetReason<'a> {
    chip: &'a SimChip,
}

impl<'a> SimResetReason<'a> {
    pub fn new(chip: &'a SimChip) -> Self {
        Self { chip }
    }
}

impl ResetReasonRegister for SimResetReason<'_> {
    fn read(&self) -> ResetCause {
        ResetCause::from_register(self.chip.read_resetreas())
    }

    fn clear_all(&mut self) {
        self.chip.clear_resetreas(RESETREAS_CLEAR_ALL);
    }
}

/// Blocking delay that advances virtual time
///
/// Never waits past `until_ns`, so a foreground that ignores the clock
/// still stops at the end of a run.
pub struct SimDelay<'a, 'h> {
    chip: &'a SimChip,
    irq: &'a SimIrq<'h>,
    until_ns: u64,
}

impl<'a, 'h> SimDelay<'a, 'h> {
    pub fn new(chip: &'a SimChip, irq: &'a SimIrq<'h>, until_ns: u64) -> Self {
        Self {
            chip,
            irq,
            until_ns,
        }
    }
}

impl DelayNs for SimDelay<'_, '_> {
    fn delay_ns(&mut self, ns: u32) {
        let target = self
            .chip
            .now_ns()
            .saturating_add(u64::from(ns))
            .min(self.until_ns);
        self.chip.advance_to(target, self.irq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::NS_PER_S;

    #[test]
    fn test_active_low_output() {
        let chip = SimChip::new();
        chip.begin_boot();
        let led = PinConfig::inverted(17);
        let mut out = SimOutput::new(&chip, led);

        // Off means electrically high
        assert_eq!(chip.output_level(17), Some(true));
        assert!(!chip.is_lit(&led));

        out.set_high();
        assert_eq!(chip.output_level(17), Some(false));
        assert!(chip.is_lit(&led));

        out.toggle();
        assert!(!chip.is_lit(&led));
    }

    #[test]
    fn test_indicator_port_switches_everything_off() {
        let chip = SimChip::new();
        chip.begin_boot();
        let pins = PinMap::NRF52_DK;
        let mut status = SimOutput::new(&chip, pins.status_led);
        let mut cause = SimOutput::new(&chip, pins.cause_leds[0]);
        status.set_high();
        cause.set_high();

        SimIndicatorPort::new(&chip, &pins).all_off();
        assert!(!chip.is_lit(&pins.status_led));
        assert!(!chip.is_lit(&pins.cause_leds[0]));
    }

    #[test]
    fn test_arm_starts_then_adopts() {
        let chip = SimChip::new();
        chip.begin_boot();
        let config = WatchdogConfig::default();

        let armed = SimWatchdog::new(&chip).arm(&config).unwrap();
        assert_eq!(armed.mode, ArmMode::Started);

        chip.system_reset();
        chip.begin_boot();
        let armed = SimWatchdog::new(&chip).arm(&config).unwrap();
        assert_eq!(armed.mode, ArmMode::Adopted);
    }

    #[test]
    fn test_arm_rejects_different_running_config() {
        let chip = SimChip::new();
        chip.begin_boot();
        SimWatchdog::new(&chip)
            .arm(&WatchdogConfig::default())
            .unwrap();

        chip.system_reset();
        chip.begin_boot();
        let other = WatchdogConfig::from_millis(1000).unwrap();
        assert_eq!(
            SimWatchdog::new(&chip).arm(&other).err(),
            Some(WatchdogError::RunningWithDifferentConfig)
        );
    }

    #[test]
    fn test_reload_writes_every_enabled_register() {
        let chip = SimChip::new();
        chip.begin_boot();
        let mask = ReloadMask::from_bits(0b11).unwrap();
        let config = WatchdogConfig::default().with_reload_channels(mask);
        let mut armed = SimWatchdog::new(&chip).arm(&config).unwrap();

        let irq = SimIrq::new();
        let mut delay = SimDelay::new(&chip, &irq, u64::MAX);
        delay.delay_ms(2000);
        armed.reload.reload();
        assert_eq!(chip.watchdog_reset_at_ns(), Some(5 * NS_PER_S));
    }

    #[test]
    fn test_delay_stops_at_limit() {
        let chip = SimChip::new();
        let irq = SimIrq::new();
        let mut delay = SimDelay::new(&chip, &irq, 1_000);
        delay.delay_us(10);
        assert_eq!(chip.now_ns(), 1_000);
    }

    #[test]
    fn test_reset_reason_take() {
        let chip = SimChip::new();
        chip.begin_boot();
        chip.system_reset();
        chip.begin_boot();

        let mut reg = SimResetReason::new(&chip);
        assert_eq!(reg.take(), ResetCause::SOFTWARE);
        assert_eq!(reg.read(), ResetCause::empty());
    }
}
