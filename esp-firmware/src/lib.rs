// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Heap (picoserve Request-Bodies, Text-Antworten)
extern crate alloc;

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

// Re-exports von esp-core
pub use esp_core::{
    ByteStorage, ColorService, LedError, SmartLedWriter, StoreError, dispatch,
};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::Mutex;

use crate::hal::{FlashByteStorage, RmtLedWriter};

// ============================================================================
// Type-Aliase für den geteilten Farb-Service
// ============================================================================
//
// Statt:  Mutex<NoopRawMutex, ColorService<FlashByteStorage<'static>, RmtLedWriter<'static>>>
// Nutze:  SharedColorService

/// Farb-Service mit echter Hardware (Flash + RMT LED)
pub type DeviceColorService = ColorService<FlashByteStorage<'static>, RmtLedWriter<'static>>;

/// Farb-Service hinter einem async Mutex
/// - NoopRawMutex: alle Tasks laufen auf demselben Executor (single-core)
/// - Genau ein Schreiber zur Zeit, Lesen und Schreiben laufen nie verschränkt
pub type SharedColorService = Mutex<NoopRawMutex, DeviceColorService>;
