//! Core Types für die Farbsteuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

use rgb::RGB8;

/// Standardfarbe (Orange) solange keine gespeicherte Farbe existiert
pub const DEFAULT_COLOR: RGB8 = RGB8 {
    r: 255,
    g: 150,
    b: 0,
};

/// Einer der drei Farbkanäle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Feldname im Formular bzw. JSON (`r`, `g`, `b`)
    pub fn key(self) -> &'static str {
        match self {
            Channel::Red => "r",
            Channel::Green => "g",
            Channel::Blue => "b",
        }
    }
}

/// Der einzige, autoritative Farbwert des Geräts
///
/// Wird beim Start mit `DEFAULT_COLOR` erzeugt und danach nur noch
/// über den `ColorService` komplett ersetzt (nie einzelne Kanäle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorState {
    color: RGB8,
}

impl ColorState {
    pub const fn new() -> Self {
        Self {
            color: DEFAULT_COLOR,
        }
    }

    /// Aktuelle Farbe
    pub fn current(&self) -> RGB8 {
        self.color
    }

    /// Ersetzt alle drei Kanäle auf einmal, gibt die alte Farbe zurück
    pub(crate) fn replace(&mut self, color: RGB8) -> RGB8 {
        core::mem::replace(&mut self.color, color)
    }
}

impl Default for ColorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Ungültiger Kanalwert aus einem Request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Wert ist keine Dezimalzahl
    NotANumber(Channel),
    /// Wert liegt außerhalb von 0-255
    OutOfRange { channel: Channel, value: i32 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotANumber(channel) => {
                write!(f, "Parameter {} is not a number", channel.key())
            }
            ValidationError::OutOfRange { channel, value } => write!(
                f,
                "Parameter {} out of range: {} (expected 0-255)",
                channel.key(),
                value
            ),
        }
    }
}

/// JSON-Darstellung einer Farbe: `{"r":255,"g":150,"b":0}`
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ColorJson {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[cfg(feature = "serde")]
impl From<RGB8> for ColorJson {
    fn from(color: RGB8) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for ColorState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ColorState {{ rgb: ({}, {}, {}) }}",
            self.color.r,
            self.color.g,
            self.color.b
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ValidationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ValidationError::NotANumber(channel) => {
                defmt::write!(fmt, "NotANumber {{ channel: {} }}", channel.key())
            }
            ValidationError::OutOfRange { channel, value } => {
                defmt::write!(
                    fmt,
                    "OutOfRange {{ channel: {}, value: {} }}",
                    channel.key(),
                    value
                )
            }
        }
    }
}
