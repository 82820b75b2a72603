//! Domain types for the folio backend: contact submissions, the dispatch
//! seams they flow through, and the overlay subscriber record.

pub mod domain;
