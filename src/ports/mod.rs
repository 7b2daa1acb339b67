//! Port traits the adapters implement.

pub mod config_port;
pub mod panel_port;
pub mod price_port;
