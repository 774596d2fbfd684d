// wiremap-api: Async client for the wiremap inventory service HTTP API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::InventoryClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
