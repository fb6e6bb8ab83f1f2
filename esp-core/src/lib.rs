//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert den Farb-Zustand, das Persistenz-Format, den Farb-Service
//! und den Request-Dispatcher. Alles hier läuft auch auf dem Host (Tests).

#![no_std]

pub mod dispatch;
pub mod logic;
pub mod service;
pub mod store;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use dispatch::{ColorForm, Message, Reply, Request, dispatch};
pub use logic::{scale_brightness, validate_channel};
pub use service::{Applied, ColorService, Startup};
pub use store::{ColorStore, RECORD_LEN, RECORD_MARKER};
pub use traits::{ByteStorage, LedError, SmartLedWriter, StoreError};
pub use types::{Channel, ColorState, DEFAULT_COLOR, ValidationError};

#[cfg(feature = "serde")]
pub use dispatch::render_color_json;
#[cfg(feature = "serde")]
pub use types::ColorJson;
