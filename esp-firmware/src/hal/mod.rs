// Hardware Abstraction Layer (HAL) Module
//
// Konkrete Implementierungen der esp-core Traits:
// - SmartLedWriter → RmtLedWriter (WS2812 am RMT Peripheral)
// - ByteStorage    → FlashByteStorage (NVS-Partition im Flash)

pub mod flash_storage;
pub mod led_writer;

pub use flash_storage::{FlashByteStorage, color_record_offset};
pub use led_writer::RmtLedWriter;
