// HTTP Server Task - Serviert Webseite und Farb-API
use alloc::string::{String, ToString};
use defmt::{error, info, warn};
use embassy_net::Stack;
use embassy_time::Duration;
use esp_core::{Message, Reply, Request, dispatch, render_color_json};
use picoserve::{
    io::embedded_io_async,
    response::{IntoResponse, Response, StatusCode},
    routing::get,
};

use crate::SharedColorService;
use crate::config::*;
use crate::web::INDEX_HTML;

/// Antwort-Wrapper: schreibt eine `Reply` aus esp-core als HTTP-Response
///
/// Jede Variante hat einen anderen Body-Typ (statisches HTML, JSON aus
/// einem Stack-Buffer, Text), daher das eigene IntoResponse.
struct HttpReply(Reply);

impl IntoResponse for HttpReply {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        let reply = self.0;
        let status = StatusCode::new(reply.status());
        let content_type = reply.content_type();

        match reply {
            Reply::Index => {
                Response::new(status, INDEX_HTML)
                    .with_header("Content-Type", content_type)
                    .write_to(connection, response_writer)
                    .await
            }
            Reply::Color(color) => {
                let mut json_buffer = [0u8; JSON_COLOR_BUFFER_SIZE];
                let json = render_color_json(color, &mut json_buffer).unwrap_or("{}");
                Response::new(status, json)
                    .with_header("Content-Type", content_type)
                    .write_to(connection, response_writer)
                    .await
            }
            Reply::Text { message, .. } => {
                let response = Response::new(status, message.to_string())
                    .with_header("Content-Type", content_type);
                match reply.warning() {
                    Some(warning) => {
                        response
                            .with_header("Warning", warning)
                            .write_to(connection, response_writer)
                            .await
                    }
                    None => response.write_to(connection, response_writer).await,
                }
            }
        }
    }
}

/// HTTP Server Task - läuft parallel zu anderen Tasks
///
/// Dieser Task stellt den HTTP-Server bereit:
/// - `GET /` liefert die Webseite
/// - `GET /color` liefert die aktuelle Farbe als JSON
/// - `POST /color` setzt eine neue Farbe (form-encoded `r`, `g`, `b`)
///
/// **Task Pool:** Diese Task wird 4x gespawnt für concurrent connections.
/// Alle Instanzen teilen sich den Farb-Service über einen Mutex, d.h.
/// es ändert immer nur ein Request zur Zeit die Farbe.
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz (0..3)
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `service`: geteilter Farb-Service
#[embassy_executor::task(pool_size = 4)]
pub async fn http_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    service: &'static SharedColorService,
) {
    info!(
        "HTTP: Server task {} starting on port {}...",
        task_id, HTTP_PORT
    );

    // Router-Konfiguration
    let app = picoserve::Router::new()
        .route(
            "/",
            get(move || async move { handle(service, Request::GetIndex).await }),
        )
        .route(
            "/color",
            get(move || async move { handle(service, Request::GetColor).await }).post(
                move |form: String| async move {
                    handle(service, Request::PostColor { form: &form }).await
                },
            ),
        );

    // Server-Konfiguration
    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    // HTTP-Buffer für Requests/Responses
    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];

    // TCP-Buffers für Socket
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    // task_id ermöglicht mehrere concurrent Server-Instanzen
    let _ = server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

/// Führt einen Request gegen den Farb-Service aus
///
/// Der Lock wird nur für `dispatch()` gehalten; dort gibt es keinen
/// await-Punkt, LED- und Flash-Zugriff laufen synchron.
async fn handle(service: &SharedColorService, request: Request<'_>) -> HttpReply {
    let reply = {
        let mut service = service.lock().await;
        dispatch(&mut *service, request)
    };
    log_reply(&reply);
    HttpReply(reply)
}

fn log_reply(reply: &Reply) {
    match reply {
        Reply::Text {
            message: Message::Applied(applied),
            ..
        } => {
            info!(
                "HTTP: Colour set: R={} G={} B={}",
                applied.color.r, applied.color.g, applied.color.b
            );
            if let Err(e) = applied.output {
                error!("LED: Write failed: {}", e);
            }
            if let Err(e) = applied.persisted {
                warn!("Store: Colour applied but not persisted: {}", e);
            }
        }
        Reply::Text { status, message } => {
            warn!("HTTP: Rejected POST /color ({}): {}", status, message);
        }
        Reply::Index | Reply::Color(_) => {}
    }
}
