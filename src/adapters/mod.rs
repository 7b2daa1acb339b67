//! Concrete adapter implementations for ports.

#[cfg(feature = "postgres")]
pub mod crsp_adapter;
#[cfg(feature = "http")]
pub mod http_price_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
