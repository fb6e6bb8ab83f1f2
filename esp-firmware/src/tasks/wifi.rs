// WiFi Task - Betreibt den offenen Access-Point
use defmt::{Debug2Format, error, info, warn};
use embassy_net::Runner;
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{
    AccessPointConfig, ModeConfig, WifiApState, WifiController, WifiDevice, WifiEvent,
};

use crate::config::{AP_POLL_INTERVAL_SECS, AP_RESTART_DELAY_SECS, AP_SSID};

/// Access-Point Task
///
/// Managed den Access-Point:
/// - Startet einen offenen AP mit SSID `AP_SSID` (ohne Passwort)
/// - Wartet bis der AP stoppt und startet ihn dann neu
#[embassy_executor::task]
pub async fn access_point_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting access point task");

    loop {
        if esp_radio::wifi::ap_state() == WifiApState::Started {
            controller.wait_for_event(WifiEvent::ApStop).await;
            warn!(
                "WiFi: Access point stopped, restarting in {}s...",
                AP_RESTART_DELAY_SECS
            );
            Timer::after(Duration::from_secs(AP_RESTART_DELAY_SECS)).await;
        }

        if !matches!(controller.is_started(), Ok(true)) {
            info!("WiFi: Configuring access point '{}'...", AP_SSID);

            let ap_config =
                ModeConfig::AccessPoint(AccessPointConfig::default().with_ssid(AP_SSID.into()));

            if let Err(e) = controller.set_config(&ap_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(AP_RESTART_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(AP_RESTART_DELAY_SECS)).await;
                continue;
            }

            info!("WiFi: Access point '{}' started", AP_SSID);
        }

        Timer::after(Duration::from_secs(AP_POLL_INTERVAL_SECS)).await;
    }
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}
