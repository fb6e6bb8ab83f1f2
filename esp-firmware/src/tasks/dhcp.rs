// DHCP Server Task - Vergibt IP-Adressen an Clients des Access-Points
//
// Ohne DHCP-Server bekämen verbundene Handys/Laptops keine Adresse im
// AP-Netz und könnten die Webseite nicht erreichen.
// - Library: edge-dhcp 0.6 (no_std)
// - Adapter: edge-nal-embassy 0.7 (embassy-net Integration)

use core::net::{Ipv4Addr, SocketAddr};

use defmt::{Debug2Format, error, info, warn};
use edge_dhcp::io::{self, DEFAULT_SERVER_PORT};
use edge_dhcp::server::{Server, ServerOptions};
use edge_nal::UdpBind;
use edge_nal_embassy::{Udp, UdpBuffers};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};

use crate::config::{
    AP_GATEWAY, DHCP_MAX_LEASES, DHCP_PACKET_BUFFER_SIZE, DHCP_RESTART_DELAY_MS,
    DHCP_UDP_BUFFER_SIZE,
};

/// DHCP Server Task
///
/// Bindet auf `0.0.0.0:67` und beantwortet DHCP-Anfragen mit Adressen aus
/// dem /24-Netz von `AP_GATEWAY`. Das Gerät selbst ist Gateway.
/// Nach einem Fehler startet der Server nach `DHCP_RESTART_DELAY_MS` neu.
#[embassy_executor::task]
pub async fn dhcp_server_task(stack: &'static Stack<'static>) {
    let gateway = Ipv4Addr::from(AP_GATEWAY);
    info!("DHCP: Server starting, gateway {}", Debug2Format(&gateway));

    static UDP_BUFFERS: static_cell::StaticCell<
        UdpBuffers<1, DHCP_UDP_BUFFER_SIZE, DHCP_UDP_BUFFER_SIZE>,
    > = static_cell::StaticCell::new();
    let udp_buffers = UDP_BUFFERS.init_with(UdpBuffers::new);
    let udp_stack = Udp::new(*stack, udp_buffers);

    let mut socket = match udp_stack
        .bind(SocketAddr::new(
            Ipv4Addr::UNSPECIFIED.into(),
            DEFAULT_SERVER_PORT,
        ))
        .await
    {
        Ok(socket) => socket,
        Err(e) => {
            error!("DHCP: Socket bind failed: {}", Debug2Format(&e));
            return;
        }
    };

    let mut packet_buffer = [0u8; DHCP_PACKET_BUFFER_SIZE];
    let mut gateways = [gateway];

    loop {
        let result = io::server::run(
            &mut Server::<_, DHCP_MAX_LEASES>::new_with_et(gateway),
            &ServerOptions::new(gateway, Some(&mut gateways)),
            &mut socket,
            &mut packet_buffer,
        )
        .await;

        if let Err(e) = result {
            warn!("DHCP: Server error: {}", Debug2Format(&e));
        }
        Timer::after(Duration::from_millis(DHCP_RESTART_DELAY_MS)).await;
    }
}
