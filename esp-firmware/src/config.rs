// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// Alle Werte sind zur Build-Zeit fest, es gibt keine Laufzeit-Konfiguration.
// Standardfarbe und Record-Layout liegen in esp-core.

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die RGB LED (WS2812/Neopixel)
/// Nur zur Dokumentation - der Pin wird in main.rs als Peripheral übergeben
pub const LED_GPIO_PIN: u8 = 8;

/// Anzahl der LEDs im Strip (alle zeigen dieselbe Farbe)
pub const LED_COUNT: usize = 1;

/// Helligkeits-Obergrenze für die LED (0-255)
/// 255 = volle Helligkeit, die gewählte Farbe wird unverändert ausgegeben
pub const LED_BRIGHTNESS_CEILING: u8 = 255;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// RMT Buffer-Größe: 24 Pulse pro LED (3 Farben * 8 Bits) + 1 Reset
pub const LED_BUFFER_SIZE: usize = LED_COUNT * 24 + 1;

// ============================================================================
// Persistenz Konfiguration
// ============================================================================

/// Flash-Offset für den Farb-Record, falls keine NVS-Partition gefunden wird
/// 0x9000 = NVS-Partition der Standard-Partitionstabelle von espflash
pub const COLOR_FLASH_FALLBACK_OFFSET: u32 = 0x9000;

// ============================================================================
// Startup
// ============================================================================

/// Wartezeit zwischen LED-Init und WiFi-Start in Millisekunden
/// Der Radio-Start zieht kurzzeitig ~200 mA, die Versorgung soll sich vorher stabilisieren
pub const POWER_SETTLE_MS: u64 = 2000;

// ============================================================================
// WiFi Access-Point Konfiguration
// ============================================================================

/// Name (SSID) des offenen Access-Points
/// Kann zur Build-Zeit über die Environment Variable AP_SSID (.env) überschrieben werden
pub const AP_SSID: &str = match option_env!("AP_SSID") {
    Some(ssid) => ssid,
    None => "GudmunssonLED",
};

/// IPv4-Adresse des Geräts im eigenen Netz (Gateway für die Clients)
pub const AP_GATEWAY: [u8; 4] = [192, 168, 4, 1];

/// Präfix-Länge des AP-Netzes (/24 = 255.255.255.0)
pub const AP_PREFIX_LEN: u8 = 24;

/// Wartezeit nach Stop des Access-Points bevor er neu gestartet wird
pub const AP_RESTART_DELAY_SECS: u64 = 5;

/// Pause am Ende jeder Runde des Access-Point Tasks
pub const AP_POLL_INTERVAL_SECS: u64 = 2;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// DHCP-Server Konfiguration
// ============================================================================

/// Maximale Anzahl gleichzeitiger DHCP-Leases
pub const DHCP_MAX_LEASES: usize = 8;

/// Paket-Buffer für DHCP in Bytes (1500 = Standard MTU)
pub const DHCP_PACKET_BUFFER_SIZE: usize = 1500;

/// UDP TX/RX Buffer-Größen für den DHCP-Socket
pub const DHCP_UDP_BUFFER_SIZE: usize = 1024;

/// Wartezeit nach einem DHCP-Fehler bevor der Server neu startet
pub const DHCP_RESTART_DELAY_MS: u64 = 500;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// HTTP-Port (unverschlüsselt)
pub const HTTP_PORT: u16 = 80;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Body
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// JSON-Buffer für `GET /color`
/// `{"r":255,"g":255,"b":255}` hat 25 Bytes
pub const JSON_COLOR_BUFFER_SIZE: usize = 32;
