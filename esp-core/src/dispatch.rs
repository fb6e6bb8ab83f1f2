//! Request Dispatcher
//!
//! Bildet die drei Request-Formen auf den `ColorService` ab und liefert
//! transport-unabhängige Antworten. Routing, HTTP-Parsing und das
//! Schreiben der Antwort übernimmt die Firmware (picoserve).

use core::fmt;

use rgb::RGB8;

use crate::service::{Applied, ColorService};
use crate::traits::{ByteStorage, SmartLedWriter};
use crate::types::{Channel, ValidationError};

/// Eingehender, bereits gerouteter Request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'a> {
    /// `GET /` - Webseite
    GetIndex,
    /// `GET /color` - aktuelle Farbe als JSON
    GetColor,
    /// `POST /color` - form-encoded Body mit `r`, `g`, `b`
    PostColor { form: &'a str },
}

/// Die Kanal-Felder eines form-encoded Bodys (`r=10&g=20&b=30`)
///
/// Die Werte bleiben kodiert (`%XX`, `+`), dekodiert wird erst beim
/// Parsen der Zahl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColorForm<'a> {
    pub r: Option<&'a str>,
    pub g: Option<&'a str>,
    pub b: Option<&'a str>,
}

impl<'a> ColorForm<'a> {
    /// Liest die Felder `r`, `g`, `b` aus einem form-encoded Body
    ///
    /// Schlüssel werden percent-dekodiert verglichen (`%72` ist `r`).
    /// Unbekannte Felder werden ignoriert, bei Duplikaten gilt das erste.
    /// Ein Feld ohne `=` zählt als vorhanden mit leerem Wert.
    pub fn parse(body: &'a str) -> Self {
        let mut form = Self::default();
        for pair in body.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let Some(channel) = Channel::ALL
                .into_iter()
                .find(|channel| FormDecoder::new(key).eq(channel.key().bytes()))
            else {
                continue;
            };
            let slot = form.slot_mut(channel);
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        form
    }

    pub fn get(&self, channel: Channel) -> Option<&'a str> {
        match channel {
            Channel::Red => self.r,
            Channel::Green => self.g,
            Channel::Blue => self.b,
        }
    }

    pub fn is_complete(&self) -> bool {
        Channel::ALL.into_iter().all(|channel| self.get(channel).is_some())
    }

    fn slot_mut(&mut self, channel: Channel) -> &mut Option<&'a str> {
        match channel {
            Channel::Red => &mut self.r,
            Channel::Green => &mut self.g,
            Channel::Blue => &mut self.b,
        }
    }
}

/// Dekodiert `application/x-www-form-urlencoded` Byte für Byte
///
/// `+` wird zu Leerzeichen, `%XX` zum Byte. Ungültige Escapes bleiben
/// unverändert stehen.
struct FormDecoder<'a> {
    bytes: &'a [u8],
}

impl<'a> FormDecoder<'a> {
    fn new(raw: &'a str) -> Self {
        Self {
            bytes: raw.as_bytes(),
        }
    }
}

impl Iterator for FormDecoder<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let (&first, rest) = self.bytes.split_first()?;
        self.bytes = rest;
        match first {
            b'+' => Some(b' '),
            b'%' => {
                if let [hi, lo, tail @ ..] = rest {
                    if let (Some(hi), Some(lo)) = (hex_digit(*hi), hex_digit(*lo)) {
                        self.bytes = tail;
                        return Some((hi << 4) | lo);
                    }
                }
                Some(b'%')
            }
            other => Some(other),
        }
    }
}

fn hex_digit(byte: u8) -> Option<u8> {
    char::from(byte).to_digit(16).map(|digit| digit as u8)
}

/// Text-Antworten des Dispatchers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Farbe übernommen (ggf. ohne Persistenz, siehe `Applied::persisted`)
    Applied(Applied),
    /// Mindestens einer von `r`, `g`, `b` fehlt
    MissingParameters,
    /// Kanalwert ungültig
    Invalid(ValidationError),
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Applied(applied) if applied.is_persisted() => f.write_str("OK"),
            Message::Applied(_) => f.write_str("OK (colour applied but not saved)"),
            Message::MissingParameters => f.write_str("Missing r, g, b parameters"),
            Message::Invalid(error) => fmt::Display::fmt(error, f),
        }
    }
}

/// Antwort des Dispatchers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Statische Webseite
    Index,
    /// Aktuelle Farbe, als JSON zu serialisieren
    Color(RGB8),
    /// Plain-Text Antwort mit Status-Code
    Text { status: u16, message: Message },
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Reply::Index | Reply::Color(_) => 200,
            Reply::Text { status, .. } => *status,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Reply::Index => "text/html; charset=utf-8",
            Reply::Color(_) => "application/json",
            Reply::Text { .. } => "text/plain",
        }
    }

    /// Wert für einen HTTP `Warning` Header, falls die Farbe nicht gespeichert wurde
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Reply::Text {
                message: Message::Applied(applied),
                ..
            } if !applied.is_persisted() => Some("199 - \"colour not persisted\""),
            _ => None,
        }
    }
}

/// Verarbeitet einen Request synchron gegen den Service
///
/// Kein Suspend-Punkt: der Aufrufer hält den Service-Lock für die gesamte
/// Dauer, Requests laufen dadurch nie verschränkt.
pub fn dispatch<S, L>(service: &mut ColorService<S, L>, request: Request<'_>) -> Reply
where
    S: ByteStorage,
    L: SmartLedWriter,
{
    match request {
        Request::GetIndex => Reply::Index,
        Request::GetColor => Reply::Color(service.current_color()),
        Request::PostColor { form } => {
            let message = match set_from_form(service, &ColorForm::parse(form)) {
                Ok(applied) => Message::Applied(applied),
                Err(message) => message,
            };
            let status = match message {
                Message::Applied(_) => 200,
                Message::MissingParameters | Message::Invalid(_) => 400,
            };
            Reply::Text { status, message }
        }
    }
}

fn set_from_form<S, L>(
    service: &mut ColorService<S, L>,
    form: &ColorForm<'_>,
) -> Result<Applied, Message>
where
    S: ByteStorage,
    L: SmartLedWriter,
{
    if !form.is_complete() {
        return Err(Message::MissingParameters);
    }

    let mut values = [0i32; 3];
    for (value, channel) in values.iter_mut().zip(Channel::ALL) {
        let raw = form.get(channel).unwrap_or_default();
        *value = parse_channel(channel, raw).map_err(Message::Invalid)?;
    }
    let [r, g, b] = values;

    service.set_color(r, g, b).map_err(Message::Invalid)
}

/// Dezimalzahl aus einem kodierten Formularwert
///
/// Leerzeichen (auch als `+` oder `%20`) um die Zahl sind erlaubt. Zahlen
/// jenseits von `i32` gelten als außerhalb des Wertebereichs, nicht als
/// ungültig.
fn parse_channel(channel: Channel, raw: &str) -> Result<i32, ValidationError> {
    let mut bytes = FormDecoder::new(raw)
        .skip_while(u8::is_ascii_whitespace)
        .peekable();
    let negative = bytes.next_if(|&byte| byte == b'-' || byte == b'+') == Some(b'-');

    let mut value = Some(0i32);
    let mut digits = 0usize;
    while let Some(byte) = bytes.next_if(u8::is_ascii_digit) {
        let digit = i32::from(byte - b'0');
        value = value.and_then(|v| v.checked_mul(10)).and_then(|v| {
            if negative {
                v.checked_sub(digit)
            } else {
                v.checked_add(digit)
            }
        });
        digits += 1;
    }

    if digits == 0 || !bytes.all(|byte| byte.is_ascii_whitespace()) {
        return Err(ValidationError::NotANumber(channel));
    }

    value.ok_or(ValidationError::OutOfRange {
        channel,
        value: if negative { i32::MIN } else { i32::MAX },
    })
}

/// Serialisiert eine Farbe als `{"r":..,"g":..,"b":..}` in `buf`
///
/// Gibt `None` zurück wenn der Buffer zu klein ist (32 Bytes reichen immer).
#[cfg(feature = "serde")]
pub fn render_color_json(color: RGB8, buf: &mut [u8]) -> Option<&str> {
    let payload = crate::types::ColorJson::from(color);
    let n = serde_json_core::to_slice(&payload, buf).ok()?;
    core::str::from_utf8(&buf[..n]).ok()
}

#[cfg(feature = "defmt")]
impl defmt::Format for Message {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Message::Applied(applied) => defmt::write!(fmt, "{}", applied),
            Message::MissingParameters => defmt::write!(fmt, "MissingParameters"),
            Message::Invalid(error) => defmt::write!(fmt, "Invalid({})", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_parse_all_fields() {
        let form = ColorForm::parse("r=10&g=20&b=30");
        assert_eq!(form.r, Some("10"));
        assert_eq!(form.g, Some("20"));
        assert_eq!(form.b, Some("30"));
        assert!(form.is_complete());
    }

    #[test]
    fn test_form_parse_missing_field() {
        let form = ColorForm::parse("r=10&g=20");
        assert_eq!(form.b, None);
        assert!(!form.is_complete());
    }

    #[test]
    fn test_form_parse_ignores_unknown_and_duplicates() {
        let form = ColorForm::parse("x=1&r=5&r=7&&g=0&b=1");
        assert_eq!(form.r, Some("5"));
        assert_eq!(form.get(Channel::Green), Some("0"));
        assert_eq!(form.get(Channel::Blue), Some("1"));
    }

    #[test]
    fn test_form_parse_key_without_value() {
        let form = ColorForm::parse("r&g=1&b=2");
        assert_eq!(form.r, Some(""));
    }

    #[test]
    fn test_parse_channel_tolerates_padding() {
        assert_eq!(parse_channel(Channel::Red, " 42+"), Ok(42));
        assert_eq!(
            parse_channel(Channel::Red, "abc"),
            Err(ValidationError::NotANumber(Channel::Red))
        );
        assert_eq!(
            parse_channel(Channel::Blue, ""),
            Err(ValidationError::NotANumber(Channel::Blue))
        );
    }

    #[test]
    fn test_form_parse_percent_encoded_key() {
        let form = ColorForm::parse("%72=10&%67=20&b=30");
        assert_eq!(form.r, Some("10"));
        assert_eq!(form.g, Some("20"));
        assert!(form.is_complete());
    }

    #[test]
    fn test_parse_channel_percent_encoded_value() {
        assert_eq!(parse_channel(Channel::Red, "%31%30"), Ok(10));
        assert_eq!(parse_channel(Channel::Red, "%2032%20"), Ok(32));
        assert_eq!(parse_channel(Channel::Red, "%2D5"), Ok(-5));
        assert_eq!(
            parse_channel(Channel::Red, "%zz"),
            Err(ValidationError::NotANumber(Channel::Red))
        );
        assert_eq!(
            parse_channel(Channel::Green, "1%"),
            Err(ValidationError::NotANumber(Channel::Green))
        );
    }

    #[test]
    fn test_parse_channel_rejects_trailing_garbage() {
        assert_eq!(
            parse_channel(Channel::Red, "12abc"),
            Err(ValidationError::NotANumber(Channel::Red))
        );
        assert_eq!(
            parse_channel(Channel::Red, "-"),
            Err(ValidationError::NotANumber(Channel::Red))
        );
        assert_eq!(
            parse_channel(Channel::Red, "1 2"),
            Err(ValidationError::NotANumber(Channel::Red))
        );
    }

    #[test]
    fn test_parse_channel_overflow_is_out_of_range() {
        assert_eq!(
            parse_channel(Channel::Red, "99999999999"),
            Err(ValidationError::OutOfRange {
                channel: Channel::Red,
                value: i32::MAX
            })
        );
        assert_eq!(
            parse_channel(Channel::Blue, "-99999999999"),
            Err(ValidationError::OutOfRange {
                channel: Channel::Blue,
                value: i32::MIN
            })
        );
        assert_eq!(parse_channel(Channel::Red, "2147483647"), Ok(i32::MAX));
    }
}
