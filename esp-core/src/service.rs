//! Colour Service
//!
//! Orchestriert Farb-Zustand, LED-Ausgabe und Persistenz. Der Service
//! besitzt alle drei exklusiv; wer ihn zwischen mehreren Tasks teilt,
//! muss ihn hinter genau einen Mutex legen (ein Schreiber zur Zeit).

use rgb::RGB8;

use crate::logic::validate_channel;
use crate::store::ColorStore;
use crate::traits::{ByteStorage, LedError, SmartLedWriter, StoreError};
use crate::types::{Channel, ColorState, ValidationError};

/// Ergebnis von `ColorService::initialize()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Startup {
    /// Farbe nach dem Start (gespeichert oder Default)
    pub color: RGB8,
    /// `true` wenn die Farbe aus dem Speicher kam
    pub restored: bool,
    /// Ergebnis der ersten LED-Ausgabe
    pub output: Result<(), LedError>,
}

/// Ergebnis einer erfolgreichen Farbänderung
///
/// Die Farbe ist in jedem Fall live (Zustand + LED). `persisted` meldet,
/// ob sie auch einen Neustart überlebt: Persistenz ist best-effort, ein
/// Speicherfehler rollt den Zustand NICHT zurück.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub color: RGB8,
    pub output: Result<(), LedError>,
    pub persisted: Result<(), StoreError>,
}

impl Applied {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }
}

/// Farb-Service: einzige Stelle, die den Farb-Zustand verändert
///
/// # Trait-basierte Abstraktion
/// - `S: ByteStorage` - Flash (Production) oder In-Memory (Tests)
/// - `L: SmartLedWriter` - RMT LED (Production) oder Mock (Tests)
pub struct ColorService<S, L> {
    state: ColorState,
    store: ColorStore<S>,
    led: L,
}

impl<S: ByteStorage, L: SmartLedWriter> ColorService<S, L> {
    pub fn new(storage: S, led: L) -> Self {
        Self {
            state: ColorState::new(),
            store: ColorStore::new(storage),
            led,
        }
    }

    /// Einmaliger Start: gespeicherte Farbe laden und auf die LED geben
    pub fn initialize(&mut self) -> Startup {
        let stored = self.store.load();
        if let Some(color) = stored {
            self.state.replace(color);
        }

        let color = self.state.current();
        Startup {
            color,
            restored: stored.is_some(),
            output: self.led.write(color),
        }
    }

    /// Aktuelle Farbe (reiner Lesezugriff)
    pub fn current_color(&self) -> RGB8 {
        self.state.current()
    }

    /// Setzt eine neue Farbe
    ///
    /// Alle drei Kanäle werden zuerst geprüft; bei einem ungültigen Wert
    /// bleibt alles unverändert. Danach: Zustand ersetzen, LED genau einmal
    /// schreiben, genau einmal speichern.
    pub fn set_color(&mut self, r: i32, g: i32, b: i32) -> Result<Applied, ValidationError> {
        let color = RGB8 {
            r: validate_channel(Channel::Red, r)?,
            g: validate_channel(Channel::Green, g)?,
            b: validate_channel(Channel::Blue, b)?,
        };

        self.state.replace(color);
        let output = self.led.write(color);
        let persisted = self.store.save(color);

        Ok(Applied {
            color,
            output,
            persisted,
        })
    }

    pub fn led(&self) -> &L {
        &self.led
    }

    pub fn led_mut(&mut self) -> &mut L {
        &mut self.led
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    pub fn storage_mut(&mut self) -> &mut S {
        self.store.storage_mut()
    }

    /// Zerlegt den Service wieder in Medium und LED-Writer
    pub fn into_parts(self) -> (S, L) {
        (self.store.into_inner(), self.led)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Startup {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Startup {{ rgb: ({}, {}, {}), restored: {}, output: {} }}",
            self.color.r,
            self.color.g,
            self.color.b,
            self.restored,
            self.output
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Applied {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Applied {{ rgb: ({}, {}, {}), output: {}, persisted: {} }}",
            self.color.r,
            self.color.g,
            self.color.b,
            self.output,
            self.persisted
        )
    }
}
