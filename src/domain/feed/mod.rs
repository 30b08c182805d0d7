//! Feeds and sources

pub mod dto;
pub mod service;
