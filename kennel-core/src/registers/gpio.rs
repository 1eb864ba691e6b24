//! GPIO pin configuration register (`PIN_CNF[n]`)

use kennel_hal::{Pull, Sense};

/// Number of pins on port 0
pub const PIN_COUNT: u8 = 32;

/// Pin direction (bit 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input = 0,
    Output = 1,
}

/// Input buffer connection (bit 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputBuffer {
    Connect = 0,
    Disconnect = 1,
}

/// Drive configuration (bits 8-10)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drive {
    /// Standard '0', standard '1'
    S0S1 = 0,
    /// High drive '0', standard '1'
    H0S1 = 1,
    /// Standard '0', high drive '1'
    S0H1 = 2,
    /// High drive '0', high drive '1'
    H0H1 = 3,
    /// Disconnect '0', standard '1'
    D0S1 = 4,
    /// Disconnect '0', high drive '1'
    D0H1 = 5,
    /// Standard '0', disconnect '1'
    S0D1 = 6,
    /// High drive '0', disconnect '1'
    H0D1 = 7,
}

impl Drive {
    const fn from_bits(bits: u32) -> Self {
        match bits & 0x7 {
            0 => Drive::S0S1,
            1 => Drive::H0S1,
            2 => Drive::S0H1,
            3 => Drive::H0H1,
            4 => Drive::D0S1,
            5 => Drive::D0H1,
            6 => Drive::S0D1,
            _ => Drive::H0D1,
        }
    }
}

/// Decoded `PIN_CNF` register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinCnf {
    pub dir: Direction,
    pub input: InputBuffer,
    pub pull: Pull,
    pub drive: Drive,
    pub sense: Sense,
}

impl PinCnf {
    const DIR_POS: u32 = 0;
    const INPUT_POS: u32 = 1;
    const PULL_POS: u32 = 2;
    const DRIVE_POS: u32 = 8;
    const SENSE_POS: u32 = 16;

    /// Reset value: disconnected input
    pub const RESET: Self = Self {
        dir: Direction::Input,
        input: InputBuffer::Disconnect,
        pull: Pull::None,
        drive: Drive::S0S1,
        sense: Sense::Disabled,
    };

    /// Connected input with the given pull
    pub const fn input(pull: Pull) -> Self {
        Self {
            dir: Direction::Input,
            input: InputBuffer::Connect,
            pull,
            drive: Drive::S0S1,
            sense: Sense::Disabled,
        }
    }

    /// Connected input that can wake the chip from System OFF
    pub const fn sensed_input(pull: Pull, sense: Sense) -> Self {
        Self {
            sense,
            ..Self::input(pull)
        }
    }

    /// Standard-drive output
    pub const fn output() -> Self {
        Self {
            dir: Direction::Output,
            input: InputBuffer::Disconnect,
            pull: Pull::None,
            drive: Drive::S0S1,
            sense: Sense::Disabled,
        }
    }

    /// Encode the register value
    pub const fn bits(self) -> u32 {
        let pull = match self.pull {
            Pull::None => 0,
            Pull::Down => 1,
            Pull::Up => 3,
        };
        let sense = match self.sense {
            Sense::Disabled => 0,
            Sense::High => 2,
            Sense::Low => 3,
        };
        ((self.dir as u32) << Self::DIR_POS)
            | ((self.input as u32) << Self::INPUT_POS)
            | (pull << Self::PULL_POS)
            | ((self.drive as u32) << Self::DRIVE_POS)
            | (sense << Self::SENSE_POS)
    }

    /// Decode a register value
    ///
    /// Reserved encodings (`PULL = 2`, `SENSE = 1`) decode as disabled.
    pub const fn from_bits(bits: u32) -> Self {
        let dir = if bits & (1 << Self::DIR_POS) != 0 {
            Direction::Output
        } else {
            Direction::Input
        };
        let input = if bits & (1 << Self::INPUT_POS) != 0 {
            InputBuffer::Disconnect
        } else {
            InputBuffer::Connect
        };
        let pull = match (bits >> Self::PULL_POS) & 0x3 {
            1 => Pull::Down,
            3 => Pull::Up,
            _ => Pull::None,
        };
        let sense = match (bits >> Self::SENSE_POS) & 0x3 {
            2 => Sense::High,
            3 => Sense::Low,
            _ => Sense::Disabled,
        };
        Self {
            dir,
            input,
            pull,
            drive: Drive::from_bits(bits >> Self::DRIVE_POS),
            sense,
        }
    }
}
