// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Der Farb-Service wird von den HTTP-Tasks über einen Mutex geteilt.

pub mod dhcp;
pub mod http;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use dhcp::dhcp_server_task;
pub use http::http_server_task;
pub use wifi::{access_point_task, net_task};
