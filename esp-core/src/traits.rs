//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use core::fmt;

use rgb::RGB8;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    WriteFailed,
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedError::WriteFailed => f.write_str("LED write failed"),
        }
    }
}

/// Fehler-Typ für den nichtflüchtigen Speicher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Lesezugriff auf das Medium fehlgeschlagen
    ReadFailed,
    /// Byte konnte nicht geschrieben werden
    WriteFailed,
    /// Commit (Flush auf das Medium) fehlgeschlagen
    CommitFailed,
    /// Adresse liegt außerhalb des verwalteten Bereichs
    OutOfRange,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StoreError::ReadFailed => "storage read failed",
            StoreError::WriteFailed => "storage write failed",
            StoreError::CommitFailed => "storage commit failed",
            StoreError::OutOfRange => "storage address out of range",
        };
        f.write_str(text)
    }
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf RGB LEDs (WS2812/Neopixel).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt eine RGB-Farbe auf die LED
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;
}

/// Trait für byte-adressierbaren, nichtflüchtigen Speicher (EEPROM-artig)
///
/// Schreibzugriffe dürfen gepuffert werden; erst `commit()` garantiert,
/// dass die Daten einen Neustart überleben.
///
/// # Implementierungen
/// - **Production:** FlashByteStorage (esp-storage, NVS-Partition)
/// - **Testing:** MemoryStorage (in-memory, mit Fehler-Injektion)
pub trait ByteStorage {
    fn read_byte(&mut self, addr: usize) -> Result<u8, StoreError>;

    fn write_byte(&mut self, addr: usize, byte: u8) -> Result<(), StoreError>;

    /// Schreibt gepufferte Änderungen dauerhaft auf das Medium
    fn commit(&mut self) -> Result<(), StoreError>;
}
