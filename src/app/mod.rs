pub mod ports;
pub mod catalog_use_case;
