pub mod common;
pub mod dashboard;
pub mod data;
pub mod feed;
pub mod freshness;
