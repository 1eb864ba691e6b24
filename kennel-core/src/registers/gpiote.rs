//! GPIO tasks and events (GPIOTE) channel configuration (`CONFIG[n]`)

use kennel_hal::EdgePolarity;

use super::gpio::PIN_COUNT;
use crate::error::IrqError;

/// Number of GPIOTE channels
pub const CHANNEL_COUNT: u8 = 8;

/// Channel mode (bits 0-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioteMode {
    /// Channel disabled, pin under GPIO control
    Disabled = 0,
    /// Pin is an input and latches `EVENTS_IN[n]` on the configured edge
    Event = 1,
    /// Pin is an output driven by the channel tasks
    Task = 3,
}

/// Decoded `CONFIG[n]` register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioteConfig {
    pub mode: GpioteMode,
    /// Pin number the channel is tied to
    pub psel: u8,
    /// Edge that latches the event; `None` in disabled mode
    pub polarity: Option<EdgePolarity>,
}

impl GpioteConfig {
    const MODE_POS: u32 = 0;
    const PSEL_POS: u32 = 8;
    const POLARITY_POS: u32 = 16;

    /// Disabled channel
    pub const DISABLED: Self = Self {
        mode: GpioteMode::Disabled,
        psel: 0,
        polarity: None,
    };

    /// Event-mode channel watching `pin`
    pub const fn event(pin: u8, polarity: EdgePolarity) -> Result<Self, IrqError> {
        if pin >= PIN_COUNT {
            return Err(IrqError::PinOutOfRange);
        }
        Ok(Self {
            mode: GpioteMode::Event,
            psel: pin,
            polarity: Some(polarity),
        })
    }

    /// Encode the register value
    pub const fn bits(self) -> u32 {
        let polarity = match self.polarity {
            None => 0,
            Some(EdgePolarity::LoToHi) => 1,
            Some(EdgePolarity::HiToLo) => 2,
            Some(EdgePolarity::Toggle) => 3,
        };
        ((self.mode as u32) << Self::MODE_POS)
            | (((self.psel & 0x1F) as u32) << Self::PSEL_POS)
            | (polarity << Self::POLARITY_POS)
    }

    /// Decode a register value
    pub const fn from_bits(bits: u32) -> Self {
        let mode = match (bits >> Self::MODE_POS) & 0x3 {
            1 => GpioteMode::Event,
            3 => GpioteMode::Task,
            _ => GpioteMode::Disabled,
        };
        let polarity = match (bits >> Self::POLARITY_POS) & 0x3 {
            1 => Some(EdgePolarity::LoToHi),
            2 => Some(EdgePolarity::HiToLo),
            3 => Some(EdgePolarity::Toggle),
            _ => None,
        };
        Self {
            mode,
            psel: ((bits >> Self::PSEL_POS) & 0x1F) as u8,
            polarity,
        }
    }
}

/// `INTENSET`/`INTENCLR` bit for `EVENTS_IN[channel]`
pub const fn intenset_in(channel: u8) -> Result<u32, IrqError> {
    if channel >= CHANNEL_COUNT {
        return Err(IrqError::ChannelOutOfRange);
    }
    Ok(1 << channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_event_on_pin_zero() {
        // MODE=Event, PSEL=0, POLARITY=Toggle
        let cfg = GpioteConfig::event(0, EdgePolarity::Toggle).unwrap();
        assert_eq!(cfg.bits(), 0x0003_0001);
        assert_eq!(GpioteConfig::from_bits(cfg.bits()), cfg);
    }

    #[test]
    fn test_psel_encoding() {
        let cfg = GpioteConfig::event(13, EdgePolarity::HiToLo).unwrap();
        assert_eq!(cfg.bits(), 0x0002_0D01);
        assert_eq!(GpioteConfig::from_bits(cfg.bits()).psel, 13);
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            GpioteConfig::event(32, EdgePolarity::Toggle),
            Err(IrqError::PinOutOfRange)
        );
        assert_eq!(intenset_in(8), Err(IrqError::ChannelOutOfRange));
        assert_eq!(intenset_in(0), Ok(1));
        assert_eq!(intenset_in(7), Ok(0x80));
    }

    #[test]
    fn test_disabled() {
        assert_eq!(GpioteConfig::DISABLED.bits(), 0);
        assert_eq!(GpioteConfig::from_bits(0), GpioteConfig::DISABLED);
    }
}
