// Flash Byte Storage - Medium für den Persistent Store Adapter
//
// Emuliert ein kleines EEPROM im Flash: die RECORD_LEN Bytes des
// Farb-Records liegen als RAM-Schattenkopie vor, write_byte() ändert nur
// die Kopie, commit() schreibt sie in einem Rutsch in den Flash.

use defmt::{Debug2Format, info, warn};
use embedded_storage::{ReadStorage, Storage};
use esp_bootloader_esp_idf::partitions::{
    self, DataPartitionSubType, PARTITION_TABLE_MAX_LEN, PartitionType,
};
use esp_core::{ByteStorage, RECORD_LEN, StoreError};
use esp_storage::FlashStorage;

use crate::config::COLOR_FLASH_FALLBACK_OFFSET;

/// Inhalt eines gelöschten Flash-Bytes
const ERASED_BYTE: u8 = 0xFF;

/// ByteStorage über dem ESP32 Flash (esp-storage)
pub struct FlashByteStorage<'d> {
    flash: FlashStorage<'d>,
    offset: u32,
    shadow: [u8; RECORD_LEN],
    dirty: bool,
}

impl<'d> FlashByteStorage<'d> {
    /// Öffnet den Record an `offset` und liest ihn einmalig in die Schattenkopie
    ///
    /// Ist der Flash nicht lesbar, startet die Kopie als "gelöscht"; der
    /// Store meldet dann keinen gespeicherten Record.
    pub fn new(mut flash: FlashStorage<'d>, offset: u32) -> Self {
        let mut shadow = [ERASED_BYTE; RECORD_LEN];
        if let Err(e) = flash.read(offset, &mut shadow) {
            warn!(
                "Store: Flash read at {=u32:#x} failed: {}",
                offset,
                Debug2Format(&e)
            );
            shadow = [ERASED_BYTE; RECORD_LEN];
        }

        Self {
            flash,
            offset,
            shadow,
            dirty: false,
        }
    }
}

impl ByteStorage for FlashByteStorage<'_> {
    fn read_byte(&mut self, addr: usize) -> Result<u8, StoreError> {
        self.shadow.get(addr).copied().ok_or(StoreError::OutOfRange)
    }

    fn write_byte(&mut self, addr: usize, byte: u8) -> Result<(), StoreError> {
        let slot = self.shadow.get_mut(addr).ok_or(StoreError::OutOfRange)?;
        if *slot != byte {
            *slot = byte;
            self.dirty = true;
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        // Unveränderte Records nicht erneut schreiben (Flash-Verschleiß)
        if !self.dirty {
            return Ok(());
        }

        self.flash
            .write(self.offset, &self.shadow)
            .map_err(|_| StoreError::CommitFailed)?;
        self.dirty = false;
        Ok(())
    }
}

/// Sucht die NVS-Datenpartition in der Partitionstabelle
///
/// Der Farb-Record liegt am Anfang dieser Partition. Ohne lesbare
/// Partitionstabelle wird `COLOR_FLASH_FALLBACK_OFFSET` genutzt.
pub fn color_record_offset(flash: &mut FlashStorage<'_>) -> u32 {
    let mut table_buffer = [0u8; PARTITION_TABLE_MAX_LEN];

    let nvs_offset = partitions::read_partition_table(flash, &mut table_buffer)
        .ok()
        .and_then(|table| {
            table
                .find_partition(PartitionType::Data(DataPartitionSubType::Nvs))
                .ok()
                .flatten()
                .map(|partition| partition.offset())
        });

    match nvs_offset {
        Some(offset) => {
            info!("Store: Using NVS partition at {=u32:#x}", offset);
            offset
        }
        None => {
            warn!(
                "Store: No NVS partition found, using fallback offset {=u32:#x}",
                COLOR_FLASH_FALLBACK_OFFSET
            );
            COLOR_FLASH_FALLBACK_OFFSET
        }
    }
}
