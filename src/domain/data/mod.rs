//! Data points: tier selection, retrieval and ingest

pub mod dto;
pub mod model;
pub mod service;
pub mod tier;
