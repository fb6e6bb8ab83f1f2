//! Persistent Store Adapter
//!
//! Legt die Farbe als festen 4-Byte-Record auf einem `ByteStorage` ab:
//!
//! | Adresse | Inhalt |
//! |---|---|
//! | 0 | Marker `0xAA` (Farbe wurde gespeichert) |
//! | 1 | Rot |
//! | 2 | Grün |
//! | 3 | Blau |
//!
//! Ohne passenden Marker gilt der Record als nicht vorhanden.

use rgb::RGB8;

use crate::traits::{ByteStorage, StoreError};

/// Marker-Byte für einen gültigen Record
pub const RECORD_MARKER: u8 = 0xAA;

/// Länge des Records in Bytes (Marker + 3 Kanäle)
pub const RECORD_LEN: usize = 4;

const MARKER_ADDR: usize = 0;
const RED_ADDR: usize = 1;
const GREEN_ADDR: usize = 2;
const BLUE_ADDR: usize = 3;

/// Speichert und lädt die Farbe auf einem byte-adressierbaren Medium
///
/// Berührt ausschließlich die Adressen `0..RECORD_LEN`.
pub struct ColorStore<S> {
    storage: S,
}

impl<S: ByteStorage> ColorStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Lädt die gespeicherte Farbe
    ///
    /// Gibt `None` zurück wenn der Marker fehlt. Lesefehler werden wie ein
    /// fehlender Record behandelt (uninitialisiertes oder defektes Medium).
    pub fn load(&mut self) -> Option<RGB8> {
        if self.storage.read_byte(MARKER_ADDR).ok()? != RECORD_MARKER {
            return None;
        }
        Some(RGB8 {
            r: self.storage.read_byte(RED_ADDR).ok()?,
            g: self.storage.read_byte(GREEN_ADDR).ok()?,
            b: self.storage.read_byte(BLUE_ADDR).ok()?,
        })
    }

    /// Schreibt Marker und Farbe und committed
    ///
    /// Nach `Ok(())` liefert `load()` dieselbe Farbe, auch nach einem Neustart.
    pub fn save(&mut self, color: RGB8) -> Result<(), StoreError> {
        self.storage.write_byte(MARKER_ADDR, RECORD_MARKER)?;
        self.storage.write_byte(RED_ADDR, color.r)?;
        self.storage.write_byte(GREEN_ADDR, color.g)?;
        self.storage.write_byte(BLUE_ADDR, color.b)?;
        self.storage.commit()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Gibt das Medium zurück (z.B. um einen Neustart zu simulieren)
    pub fn into_inner(self) -> S {
        self.storage
    }
}
