pub mod catalog_loader;
pub mod csv_sink;
pub mod hek_event_source;
pub mod http_client;
pub mod jsoc_client;
