//! Serial line settings for the reader connection

use std::{fmt, str::FromStr};

/// Parity bit setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    /// No parity bit
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
    /// Parity bit always set
    Mark,
    /// Parity bit always cleared
    Space,
}

impl Parity {
    /// Single-letter code used in the `baud,parity,data,stop` notation
    pub const fn code(self) -> char {
        match self {
            Self::None => 'N',
            Self::Even => 'E',
            Self::Odd => 'O',
            Self::Mark => 'M',
            Self::Space => 'S',
        }
    }

    const fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'N' => Some(Self::None),
            'E' => Some(Self::Even),
            'O' => Some(Self::Odd),
            'M' => Some(Self::Mark),
            'S' => Some(Self::Space),
            _ => None,
        }
    }
}

/// Serial line profile applied before the port is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSettings {
    /// Baud rate
    pub baud_rate: u32,
    /// Parity
    pub parity: Parity,
    /// Data bits per character (5-8)
    pub data_bits: u8,
    /// Stop bits (1 or 2)
    pub stop_bits: u8,
}

impl LineSettings {
    /// Profile spoken by the Acura reader: `19200,N,8,1`
    pub const ACURA: Self = Self::new(19200, Parity::None, 8, 1);

    /// Create a new line profile
    pub const fn new(baud_rate: u32, parity: Parity, data_bits: u8, stop_bits: u8) -> Self {
        Self {
            baud_rate,
            parity,
            data_bits,
            stop_bits,
        }
    }

    /// Set the baud rate
    pub const fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the parity
    pub const fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }
}

impl Default for LineSettings {
    fn default() -> Self {
        Self::ACURA
    }
}

impl fmt::Display for LineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.baud_rate,
            self.parity.code(),
            self.data_bits,
            self.stop_bits
        )
    }
}

/// Errors produced when parsing line settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineSettingsError {
    /// Not four comma separated fields
    #[error("expected `baud,parity,data,stop`, got {0:?}")]
    Format(String),

    /// Baud rate is not a positive integer
    #[error("invalid baud rate {0:?}")]
    BaudRate(String),

    /// Unknown parity letter
    #[error("invalid parity {0:?}")]
    Parity(String),

    /// Data bits outside 5-8
    #[error("invalid data bits {0:?}")]
    DataBits(String),

    /// Stop bits other than 1 or 2
    #[error("invalid stop bits {0:?}")]
    StopBits(String),
}

impl FromStr for LineSettings {
    type Err = LineSettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        let &[baud, parity, data, stop] = fields.as_slice() else {
            return Err(LineSettingsError::Format(s.to_string()));
        };

        let baud_rate = baud
            .parse::<u32>()
            .ok()
            .filter(|rate| *rate > 0)
            .ok_or_else(|| LineSettingsError::BaudRate(baud.to_string()))?;

        let mut chars = parity.chars();
        let parity = match (chars.next(), chars.next()) {
            (Some(code), None) => Parity::from_code(code),
            _ => None,
        }
        .ok_or_else(|| LineSettingsError::Parity(parity.to_string()))?;

        let data_bits = data
            .parse::<u8>()
            .ok()
            .filter(|bits| (5..=8).contains(bits))
            .ok_or_else(|| LineSettingsError::DataBits(data.to_string()))?;

        let stop_bits = stop
            .parse::<u8>()
            .ok()
            .filter(|bits| matches!(*bits, 1 | 2))
            .ok_or_else(|| LineSettingsError::StopBits(stop.to_string()))?;

        Ok(Self::new(baud_rate, parity, data_bits, stop_bits))
    }
}
