//! Freshness of cached data trees

pub mod resolver;
pub mod tree;
