// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

use core::net::Ipv4Addr;

use defmt::{error, info};

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Ipv4Cidr, Stack, StackResources, StaticConfigV4};
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::rmt::PulseCode;
use esp_hal::timer::timg::TimerGroup;
use esp_hal_smartled::smart_led_buffer;
use esp_storage::FlashStorage;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_led_farbwahl::config::{
    AP_GATEWAY, AP_PREFIX_LEN, AP_SSID, EXTRA_HEAP_SIZE, LED_BUFFER_SIZE, LED_COUNT,
    POWER_SETTLE_MS, RMT_CLOCK_MHZ, WIFI_HEAP_SIZE,
};
use esp_led_farbwahl::hal::{FlashByteStorage, RmtLedWriter, color_record_offset};
use esp_led_farbwahl::tasks::{access_point_task, dhcp_server_task, http_server_task, net_task};
use esp_led_farbwahl::{ColorService, SharedColorService};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Reihenfolge:
/// 1. Gespeicherte Farbe aus dem Flash laden und auf die LED geben
/// 2. Versorgung stabilisieren lassen
/// 3. Access-Point, DHCP-Server und HTTP-Server starten
///
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("=== LED Farbwahl ===");

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Persistenz: Farb-Record am Anfang der NVS-Partition
    let mut flash = FlashStorage::new(peripherals.FLASH);
    let record_offset = color_record_offset(&mut flash);
    let storage = FlashByteStorage::new(flash, record_offset);

    // LED: Buffer muss 'static sein (RmtLedWriter lebt im Service)
    static RMT_BUFFER: static_cell::StaticCell<[PulseCode; LED_BUFFER_SIZE]> =
        static_cell::StaticCell::new();
    let rmt_buffer = RMT_BUFFER.init(smart_led_buffer!(LED_COUNT));
    let led = RmtLedWriter::new(peripherals.GPIO8, peripherals.RMT, RMT_CLOCK_MHZ, rmt_buffer);

    // Farb-Service starten: gespeicherte Farbe (oder Default) sofort anzeigen
    let mut color_service = ColorService::new(storage, led);
    let startup = color_service.initialize();
    if startup.restored {
        info!(
            "Store: Loaded colour R={} G={} B={}",
            startup.color.r, startup.color.g, startup.color.b
        );
    } else {
        info!(
            "Store: No saved colour, using default R={} G={} B={}",
            startup.color.r, startup.color.g, startup.color.b
        );
    }
    if let Err(e) = startup.output {
        error!("LED: Initial write failed: {}", e);
    }

    static COLOR_SERVICE: static_cell::StaticCell<SharedColorService> =
        static_cell::StaticCell::new();
    let color_service = &*COLOR_SERVICE.init(Mutex::new(color_service));

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Versorgung stabilisieren lassen bevor das Radio Strom zieht
    Timer::after(Duration::from_millis(POWER_SETTLE_MS)).await;

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Statische Adresse: das Gerät ist Gateway im eigenen AP-Netz
    let gateway = Ipv4Addr::from(AP_GATEWAY);
    let net_config = NetConfig::ipv4_static(StaticConfigV4 {
        address: Ipv4Cidr::new(gateway, AP_PREFIX_LEN),
        gateway: Some(gateway),
        dns_servers: Default::default(),
    });

    // Static resources für embassy-net
    // 6 Sockets: DHCP (1) + HTTP-Listener (4) + Reserve (1)
    static RESOURCES: static_cell::StaticCell<StackResources<6>> = static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt AP interface)
    let (stack, runner) = embassy_net::new(wifi_interface.ap, net_config, resources, seed);

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    // Spawn WiFi Tasks
    spawner.spawn(access_point_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_server_task(stack)).unwrap();

    // Spawn HTTP Server Tasks (4x für concurrent connections)
    for task_id in 0..4 {
        spawner
            .spawn(http_server_task(task_id, stack, color_service))
            .unwrap();
    }

    info!(
        "WiFi: Connect to '{}' and open http://{}.{}.{}.{}/",
        AP_SSID, AP_GATEWAY[0], AP_GATEWAY[1], AP_GATEWAY[2], AP_GATEWAY[3]
    );

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
