//! Dashboard persistence on top of the packet ingest

pub mod codec;
pub mod service;
