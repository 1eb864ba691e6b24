//! Build-time board configuration
//!
//! Parses `board.toml`, checks it with the same constructors the firmware
//! uses at compile time, and renders the `BoardConfig` constant that the
//! firmware includes. Runs on the host from the firmware's build script.

use kennel_core::config::TimingConfig;
use kennel_core::error::{ConfigError, WatchdogError};
use kennel_core::registers::wdt::{Crv, ReloadMask, RELOAD_REGISTER_COUNT};
use serde::Deserialize;

/// Width of the text column inside the build error boxes
const BOX_WIDTH: usize = 64;

/// Contents of `board.toml`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardFile {
    pub watchdog: WatchdogSection,
    pub timing: TimingSection,
    pub indicator: IndicatorSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchdogSection {
    pub timeout_ms: u32,
    pub reload_channels: Vec<u8>,
    #[serde(default = "default_true")]
    pub pause_on_debug_halt: bool,
    #[serde(default = "default_true")]
    pub run_during_sleep: bool,
    #[serde(default)]
    pub timeout_interrupt: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingSection {
    pub startup_toggle_ms: u32,
    pub startup_toggles: u8,
    pub liveness_toggle_ms: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndicatorSection {
    pub reload: String,
}

fn default_true() -> bool {
    true
}

/// Why `board.toml` was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Syntax error, missing section or wrong value type
    Parse(String),
    /// Well-formed but out of range; every problem found
    Invalid(Vec<String>),
}

/// Parse and validate `board.toml` contents
pub fn parse(content: &str) -> Result<BoardFile, LoadError> {
    let board: BoardFile = toml::from_str(content).map_err(|e| LoadError::Parse(e.to_string()))?;
    let errors = board.validate();
    if !errors.is_empty() {
        return Err(LoadError::Invalid(errors));
    }
    Ok(board)
}

impl BoardFile {
    /// Collect every problem instead of stopping at the first
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let wdt = &self.watchdog;
        match Crv::from_millis(wdt.timeout_ms) {
            Ok(_) => {}
            Err(WatchdogError::TimeoutTooShort) => errors.push(format!(
                "[watchdog] timeout_ms {} is too short (min 1)",
                wdt.timeout_ms
            )),
            Err(_) => errors.push(format!(
                "[watchdog] timeout_ms {} is out of range (max 131072000)",
                wdt.timeout_ms
            )),
        }

        for (i, &ch) in wdt.reload_channels.iter().enumerate() {
            if ch as usize >= RELOAD_REGISTER_COUNT {
                errors.push(format!("[watchdog] reload channel {} must be 0-7", ch));
            }
            if wdt.reload_channels[..i].contains(&ch) {
                errors.push(format!("[watchdog] reload channel {} listed twice", ch));
            }
        }
        match ReloadMask::from_bits(self.reload_mask()) {
            Ok(mask) if !mask.is_contiguous() => errors.push(
                "[watchdog] reload_channels must be 0..n without gaps".to_string(),
            ),
            Ok(_) => {}
            Err(_) => errors.push("[watchdog] reload_channels cannot be empty".to_string()),
        }

        match self.timing() {
            None => errors.push("[timing] toggle delays must fit in u32 microseconds".to_string()),
            Some(timing) => match timing.validate() {
                Ok(()) => {}
                Err(ConfigError::ZeroDelay) => {
                    errors.push("[timing] toggle delays must be non-zero".to_string())
                }
                Err(_) => errors.push("[timing] startup_toggles must be 1-32".to_string()),
            },
        }

        if !["toggle", "mirror"].contains(&self.indicator.reload.as_str()) {
            errors.push("[indicator] reload must be 'toggle' or 'mirror'".to_string());
        }

        errors
    }

    /// `RREN` value for the listed channels; out-of-range channels are
    /// left out
    pub fn reload_mask(&self) -> u8 {
        self.watchdog
            .reload_channels
            .iter()
            .filter(|&&ch| (ch as usize) < RELOAD_REGISTER_COUNT)
            .fold(0, |mask, &ch| mask | (1 << ch))
    }

    /// Timing in microseconds, or `None` if a delay overflows
    pub fn timing(&self) -> Option<TimingConfig> {
        Some(TimingConfig {
            startup_toggle_us: self.timing.startup_toggle_ms.checked_mul(1000)?,
            startup_toggles: self.timing.startup_toggles,
            liveness_toggle_us: self.timing.liveness_toggle_ms.checked_mul(1000)?,
        })
    }

    /// Source of `board_config.rs`
    ///
    /// Only meaningful for a file that passed `validate`.
    pub fn render(&self) -> String {
        let wdt = &self.watchdog;
        let timing = self.timing().unwrap_or(TimingConfig::DEFAULT);
        let halt = if wdt.pause_on_debug_halt { "Pause" } else { "Run" };
        let sleep = if wdt.run_during_sleep { "Run" } else { "Pause" };
        let indicator = match self.indicator.reload.as_str() {
            "mirror" => "MirrorButton",
            _ => "Toggle",
        };

        format!(
            "// Generated by build.rs from board.toml\n\
            \n\
            /// Board configuration compiled into the firmware\n\
            pub const BOARD_CONFIG: kennel_core::config::BoardConfig = kennel_core::config::BoardConfig::new(\n\
            \x20   kennel_core::watchdog::WatchdogConfig::new(\n\
            \x20       match kennel_core::registers::Crv::from_millis({timeout_ms}) {{\n\
            \x20           Ok(crv) => crv,\n\
            \x20           Err(_) => panic!(\"invalid watchdog timeout\"),\n\
            \x20       }},\n\
            \x20   )\n\
            \x20   .with_reload_channels(match kennel_core::registers::ReloadMask::from_bits({mask:#04x}) {{\n\
            \x20       Ok(mask) => mask,\n\
            \x20       Err(_) => panic!(\"empty reload mask\"),\n\
            \x20   }})\n\
            \x20   .with_halt(kennel_core::registers::HaltBehavior::{halt})\n\
            \x20   .with_sleep(kennel_core::registers::SleepBehavior::{sleep})\n\
            \x20   .with_timeout_interrupt({timeout_interrupt}),\n\
            \x20   kennel_core::config::TimingConfig {{\n\
            \x20       startup_toggle_us: {startup_us},\n\
            \x20       startup_toggles: {startup_toggles},\n\
            \x20       liveness_toggle_us: {liveness_us},\n\
            \x20   }},\n\
            \x20   kennel_core::config::ReloadIndicator::{indicator},\n\
            \x20   kennel_core::config::PinMap::NRF52_DK,\n\
            );\n",
            timeout_ms = wdt.timeout_ms,
            mask = self.reload_mask(),
            halt = halt,
            sleep = sleep,
            timeout_interrupt = wdt.timeout_interrupt,
            startup_us = timing.startup_toggle_us,
            startup_toggles = timing.startup_toggles,
            liveness_us = timing.liveness_toggle_us,
            indicator = indicator,
        )
    }
}

/// Format error message lines with box drawing
///
/// Lines longer than the box are cut on a character boundary.
pub fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > BOX_WIDTH {
                let head: String = line.chars().take(BOX_WIDTH - 3).collect();
                format!("{}...", head)
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
