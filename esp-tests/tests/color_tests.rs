//! Integration Tests für Farb-Service und Dispatcher
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockLedWriter
//! sowie MemoryStorage statt echter Hardware.

use esp_core::{
    ByteStorage, ColorService, DEFAULT_COLOR, LedError, Message, RECORD_LEN, RECORD_MARKER,
    Reply, Request, SmartLedWriter, StoreError, ValidationError, dispatch, render_color_json,
    types::Channel,
};
use rgb::RGB8;

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_color: Option<RGB8>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_color = Some(color);
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Storage (EEPROM-artig: Schreiben in Puffer, commit() macht dauerhaft)
// ============================================================================

pub struct MemoryStorage {
    /// Inhalt des Mediums (überlebt power_cycle)
    pub committed: [u8; 16],
    /// Ungecommittete Schreibzugriffe
    pub pending: [u8; 16],
    pub commit_count: usize,
    pub fail_writes: bool,
    pub fail_commit: bool,
    pub fail_reads: bool,
}

impl MemoryStorage {
    /// Frisch gelöschtes Flash (alle Bytes 0xFF)
    pub fn erased() -> Self {
        Self {
            committed: [0xFF; 16],
            pending: [0xFF; 16],
            commit_count: 0,
            fail_writes: false,
            fail_commit: false,
            fail_reads: false,
        }
    }

    /// Simuliert einen Neustart: nur gecommittete Daten bleiben erhalten
    pub fn power_cycle(mut self) -> Self {
        self.pending = self.committed;
        self.fail_writes = false;
        self.fail_commit = false;
        self.fail_reads = false;
        self
    }
}

impl ByteStorage for MemoryStorage {
    fn read_byte(&mut self, addr: usize) -> Result<u8, StoreError> {
        if self.fail_reads {
            return Err(StoreError::ReadFailed);
        }
        self.pending.get(addr).copied().ok_or(StoreError::OutOfRange)
    }

    fn write_byte(&mut self, addr: usize, byte: u8) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::WriteFailed);
        }
        let slot = self.pending.get_mut(addr).ok_or(StoreError::OutOfRange)?;
        *slot = byte;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        if self.fail_commit {
            return Err(StoreError::CommitFailed);
        }
        self.committed = self.pending;
        self.commit_count += 1;
        Ok(())
    }
}

type TestService = ColorService<MemoryStorage, MockLedWriter>;

fn started_service(storage: MemoryStorage) -> TestService {
    let mut service = ColorService::new(storage, MockLedWriter::new());
    service.initialize();
    service
}

fn reboot(service: TestService) -> TestService {
    let (storage, _) = service.into_parts();
    started_service(storage.power_cycle())
}

fn post(service: &mut TestService, form: &str) -> Reply {
    dispatch(service, Request::PostColor { form })
}

// ============================================================================
// Tests: initialize()
// ============================================================================

#[test]
fn test_initialize_without_record_uses_default() {
    let mut service = ColorService::new(MemoryStorage::erased(), MockLedWriter::new());
    let startup = service.initialize();

    assert_eq!(startup.color, DEFAULT_COLOR);
    assert!(!startup.restored);
    assert_eq!(service.current_color(), RGB8::new(255, 150, 0));
}

#[test]
fn test_initialize_applies_color_once() {
    let service = started_service(MemoryStorage::erased());
    assert_eq!(service.led().write_count, 1);
    assert_eq!(service.led().last_color, Some(DEFAULT_COLOR));
}

#[test]
fn test_initialize_restores_stored_record() {
    let mut storage = MemoryStorage::erased();
    storage.committed[..RECORD_LEN].copy_from_slice(&[RECORD_MARKER, 7, 8, 9]);
    let mut service = ColorService::new(storage.power_cycle(), MockLedWriter::new());

    let startup = service.initialize();

    assert!(startup.restored);
    assert_eq!(startup.color, RGB8::new(7, 8, 9));
    assert_eq!(service.led().last_color, Some(RGB8::new(7, 8, 9)));
}

#[test]
fn test_initialize_with_unreadable_medium_uses_default() {
    let mut storage = MemoryStorage::erased();
    storage.fail_reads = true;
    let mut service = ColorService::new(storage, MockLedWriter::new());

    let startup = service.initialize();

    assert!(!startup.restored);
    assert_eq!(startup.color, DEFAULT_COLOR);
}

#[test]
fn test_initialize_reports_led_failure() {
    let mut led = MockLedWriter::new();
    led.fail_next_write = true;
    let mut service = ColorService::new(MemoryStorage::erased(), led);

    let startup = service.initialize();

    assert_eq!(startup.output, Err(LedError::WriteFailed));
    assert_eq!(service.current_color(), DEFAULT_COLOR);
}

// ============================================================================
// Tests: set_color()
// ============================================================================

#[test]
fn test_set_color_applies_and_persists() {
    let mut service = started_service(MemoryStorage::erased());

    let applied = service.set_color(10, 20, 30).unwrap();

    assert_eq!(applied.color, RGB8::new(10, 20, 30));
    assert!(applied.is_persisted());
    assert_eq!(service.current_color(), RGB8::new(10, 20, 30));
    // 1x Startup + 1x set_color
    assert_eq!(service.led().write_count, 2);
    assert_eq!(service.storage().commit_count, 1);
}

#[test]
fn test_set_color_is_idempotent() {
    let mut service = started_service(MemoryStorage::erased());

    service.set_color(1, 2, 3).unwrap();
    let record_after_first = service.storage().committed;
    service.set_color(1, 2, 3).unwrap();

    assert_eq!(service.storage().committed, record_after_first);
    assert_eq!(service.current_color(), RGB8::new(1, 2, 3));
}

#[test]
fn test_set_color_survives_reboot() {
    let samples = [(0, 0, 0), (255, 255, 255), (10, 20, 30), (255, 0, 128)];

    for (r, g, b) in samples {
        let mut service = started_service(MemoryStorage::erased());
        service.set_color(r, g, b).unwrap();

        let service = reboot(service);
        let expected = RGB8::new(r as u8, g as u8, b as u8);
        assert_eq!(service.current_color(), expected);
        assert_eq!(service.led().last_color, Some(expected));
    }
}

#[test]
fn test_set_color_survives_reboot_every_channel_value() {
    let mut service = started_service(MemoryStorage::erased());

    for value in 0..=255 {
        for (r, g, b) in [(value, 7, 200), (7, value, 200), (7, 200, value)] {
            service.set_color(r, g, b).unwrap();
            service = reboot(service);

            let expected = RGB8::new(r as u8, g as u8, b as u8);
            assert_eq!(service.current_color(), expected);
            assert_eq!(service.led().last_color, Some(expected));
        }
    }
}

#[test]
fn test_set_color_rejects_out_of_range() {
    let mut service = started_service(MemoryStorage::erased());

    let result = service.set_color(300, 0, 0);

    assert_eq!(
        result,
        Err(ValidationError::OutOfRange {
            channel: Channel::Red,
            value: 300
        })
    );
    assert_eq!(service.current_color(), DEFAULT_COLOR);
    assert_eq!(service.led().write_count, 1);
    assert_eq!(service.storage().commit_count, 0);
}

#[test]
fn test_set_color_rejects_negative_last_channel_without_partial_update() {
    let mut service = started_service(MemoryStorage::erased());

    let result = service.set_color(1, 2, -3);

    assert!(result.is_err());
    assert_eq!(service.current_color(), DEFAULT_COLOR);
}

#[test]
fn test_set_color_store_failure_keeps_live_color() {
    let mut service = started_service(MemoryStorage::erased());
    service.storage_mut().fail_commit = true;

    let applied = service.set_color(40, 50, 60).unwrap();

    assert_eq!(applied.persisted, Err(StoreError::CommitFailed));
    assert_eq!(service.current_color(), RGB8::new(40, 50, 60));
    assert_eq!(service.led().last_color, Some(RGB8::new(40, 50, 60)));

    // Nach Neustart gilt wieder der Default, da nie committed wurde
    let service = reboot(service);
    assert_eq!(service.current_color(), DEFAULT_COLOR);
}

#[test]
fn test_set_color_write_failure_aborts_before_commit() {
    let mut service = started_service(MemoryStorage::erased());
    service.storage_mut().fail_writes = true;

    let applied = service.set_color(1, 1, 1).unwrap();

    assert_eq!(applied.persisted, Err(StoreError::WriteFailed));
    assert_eq!(service.storage().commit_count, 0);
}

#[test]
fn test_set_color_led_failure_still_persists() {
    let mut service = started_service(MemoryStorage::erased());
    service.led_mut().fail_next_write = true;

    let applied = service.set_color(9, 9, 9).unwrap();

    assert_eq!(applied.output, Err(LedError::WriteFailed));
    assert!(applied.is_persisted());
    assert_eq!(service.current_color(), RGB8::new(9, 9, 9));
}

// ============================================================================
// Tests: dispatch()
// ============================================================================

#[test]
fn test_dispatch_get_index() {
    let mut service = started_service(MemoryStorage::erased());
    let reply = dispatch(&mut service, Request::GetIndex);

    assert_eq!(reply, Reply::Index);
    assert_eq!(reply.status(), 200);
    assert_eq!(reply.content_type(), "text/html; charset=utf-8");
}

#[test]
fn test_dispatch_get_color_returns_default_json() {
    let mut service = started_service(MemoryStorage::erased());
    let reply = dispatch(&mut service, Request::GetColor);

    assert_eq!(reply, Reply::Color(DEFAULT_COLOR));
    assert_eq!(reply.content_type(), "application/json");

    let mut buf = [0u8; 32];
    assert_eq!(
        render_color_json(DEFAULT_COLOR, &mut buf),
        Some(r#"{"r":255,"g":150,"b":0}"#)
    );
}

#[test]
fn test_dispatch_read_after_write() {
    let mut service = started_service(MemoryStorage::erased());

    let reply = post(&mut service, "r=10&g=20&b=30");
    assert_eq!(reply.status(), 200);
    assert_eq!(reply.content_type(), "text/plain");

    let Reply::Color(color) = dispatch(&mut service, Request::GetColor) else {
        panic!("Expected Color reply");
    };
    let mut buf = [0u8; 32];
    assert_eq!(
        render_color_json(color, &mut buf),
        Some(r#"{"r":10,"g":20,"b":30}"#)
    );
}

#[test]
fn test_dispatch_missing_parameter() {
    let mut service = started_service(MemoryStorage::erased());

    let reply = post(&mut service, "r=10&g=20");

    assert_eq!(
        reply,
        Reply::Text {
            status: 400,
            message: Message::MissingParameters
        }
    );
    assert_eq!(service.current_color(), DEFAULT_COLOR);
    assert_eq!(service.storage().commit_count, 0);
}

#[test]
fn test_dispatch_missing_parameter_text() {
    let mut service = started_service(MemoryStorage::erased());
    let Reply::Text { message, .. } = post(&mut service, "") else {
        panic!("Expected Text reply");
    };
    assert_eq!(message.to_string(), "Missing r, g, b parameters");
}

#[test]
fn test_dispatch_out_of_range_is_bad_request() {
    let mut service = started_service(MemoryStorage::erased());

    let reply = post(&mut service, "r=300&g=0&b=0");

    assert_eq!(reply.status(), 400);
    let Reply::Text { message, .. } = reply else {
        panic!("Expected Text reply");
    };
    assert_eq!(
        message.to_string(),
        "Parameter r out of range: 300 (expected 0-255)"
    );
    assert_eq!(service.current_color(), DEFAULT_COLOR);
}

#[test]
fn test_dispatch_not_a_number_is_bad_request() {
    let mut service = started_service(MemoryStorage::erased());

    let reply = post(&mut service, "r=1&g=green&b=0");

    assert_eq!(
        reply,
        Reply::Text {
            status: 400,
            message: Message::Invalid(ValidationError::NotANumber(Channel::Green))
        }
    );
}

#[test]
fn test_dispatch_accepts_percent_encoded_form() {
    let mut service = started_service(MemoryStorage::erased());

    let reply = post(&mut service, "r=%31%30&g=20&b=30");
    assert_eq!(reply.status(), 200);
    assert_eq!(service.current_color(), RGB8::new(10, 20, 30));

    let reply = post(&mut service, "%72=11&%67=+21+&b=%2031");
    assert_eq!(reply.status(), 200);
    assert_eq!(service.current_color(), RGB8::new(11, 21, 31));
}

#[test]
fn test_dispatch_overflowing_number_is_out_of_range() {
    let mut service = started_service(MemoryStorage::erased());

    let reply = post(&mut service, "r=99999999999&g=0&b=0");

    assert_eq!(
        reply,
        Reply::Text {
            status: 400,
            message: Message::Invalid(ValidationError::OutOfRange {
                channel: Channel::Red,
                value: i32::MAX
            })
        }
    );
    assert_eq!(service.current_color(), DEFAULT_COLOR);
}

#[test]
fn test_dispatch_store_failure_is_success_with_warning() {
    let mut service = started_service(MemoryStorage::erased());
    service.storage_mut().fail_commit = true;

    let reply = post(&mut service, "r=5&g=6&b=7");

    assert_eq!(reply.status(), 200);
    assert_eq!(reply.warning(), Some("199 - \"colour not persisted\""));
    let Reply::Text { message, .. } = reply else {
        panic!("Expected Text reply");
    };
    assert_eq!(message.to_string(), "OK (colour applied but not saved)");
    assert_eq!(
        dispatch(&mut service, Request::GetColor),
        Reply::Color(RGB8::new(5, 6, 7))
    );
}

#[test]
fn test_dispatch_success_has_no_warning() {
    let mut service = started_service(MemoryStorage::erased());

    let reply = post(&mut service, "b=3&g=2&r=1");

    assert_eq!(reply.warning(), None);
    let Reply::Text { message, .. } = reply else {
        panic!("Expected Text reply");
    };
    assert_eq!(message.to_string(), "OK");
    assert_eq!(service.current_color(), RGB8::new(1, 2, 3));
}

#[test]
fn test_dispatch_each_write_drives_led_once() {
    let mut service = started_service(MemoryStorage::erased());

    post(&mut service, "r=1&g=2&b=3");
    post(&mut service, "r=4&g=5&b=6");
    post(&mut service, "r=4&g=5");

    // 1x Startup + 2x erfolgreicher POST
    assert_eq!(service.led().write_count, 3);
    assert_eq!(service.storage().commit_count, 2);
    assert_eq!(service.led().last_color, Some(RGB8::new(4, 5, 6)));
}
