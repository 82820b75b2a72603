//! HTTP surface of the folio backend.

pub mod api;
pub mod config;
