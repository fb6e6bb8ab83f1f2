// SmartLED Writer - Output Driver Adapter
//
// Implementiert den SmartLedWriter Trait aus esp-core für WS2812 LEDs
// am RMT Peripheral. Tests nutzen stattdessen den MockLedWriter (esp-tests).

use esp_core::{LedError, SmartLedWriter, scale_brightness};
use esp_hal::Blocking;
use esp_hal::rmt::Rmt;
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;

use crate::config::{LED_BRIGHTNESS_CEILING, LED_BUFFER_SIZE, LED_COUNT};

/// Real Hardware LED Writer
///
/// Nutzt ESP32 RMT Peripheral um WS2812 LEDs anzusteuern.
/// Schreibt dieselbe Farbe auf alle `LED_COUNT` LEDs, begrenzt auf
/// `LED_BRIGHTNESS_CEILING`.
///
/// Hinweis: Der Buffer muss 'static sein, daher wird er in main.rs per
/// StaticCell erstellt und als Parameter übergeben.
pub struct RmtLedWriter<'a> {
    led: SmartLedsAdapter<'a, LED_BUFFER_SIZE>,
}

impl<'a> RmtLedWriter<'a> {
    /// Erstellt einen neuen RmtLedWriter
    ///
    /// # Parameter
    /// - `gpio8`: GPIO8 Peripheral für LED-Datenleitung
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Buffer für LED-Daten (erstellt mit smart_led_buffer!(LED_COUNT) Macro)
    ///
    /// # Panics
    /// Wenn das RMT Peripheral nicht initialisiert werden kann (Bring-up Fehler)
    pub fn new(
        gpio8: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [esp_hal::rmt::PulseCode; LED_BUFFER_SIZE],
    ) -> Self {
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .expect("Failed to initialize RMT peripheral");

        let led = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);

        Self { led }
    }
}

impl SmartLedWriter for RmtLedWriter<'_> {
    fn write(&mut self, color: RGB8) -> Result<(), LedError> {
        let scaled = scale_brightness(color, LED_BRIGHTNESS_CEILING);
        self.led
            .write(core::iter::repeat_n(scaled, LED_COUNT))
            .map_err(|_| LedError::WriteFailed)
    }
}
