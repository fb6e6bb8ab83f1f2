//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::types::{Channel, ValidationError};

/// Begrenzt die Helligkeit auf `ceiling` (0-255)
///
/// Jeder Kanal wird mit `ceiling / 255` skaliert, `255` lässt die Farbe
/// unverändert. Wird vom Output-Adapter angewendet, der Farb-Zustand
/// bleibt unskaliert.
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use esp_core::scale_brightness;
/// let color = RGB8 { r: 255, g: 150, b: 0 };
/// assert_eq!(scale_brightness(color, 255), color);
/// assert_eq!(scale_brightness(color, 0), RGB8 { r: 0, g: 0, b: 0 });
/// ```
pub fn scale_brightness(color: RGB8, ceiling: u8) -> RGB8 {
    if ceiling == u8::MAX {
        return color;
    }
    let scale = |c: u8| ((u16::from(c) * u16::from(ceiling)) / 255) as u8;
    RGB8 {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}

/// Prüft einen Kanalwert auf den Bereich 0-255
///
/// Werte außerhalb werden abgelehnt statt per Wraparound abgeschnitten
/// (300 wird nicht zu 44).
pub fn validate_channel(channel: Channel, value: i32) -> Result<u8, ValidationError> {
    u8::try_from(value).map_err(|_| ValidationError::OutOfRange { channel, value })
}
