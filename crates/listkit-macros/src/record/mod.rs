//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates `listkit::Record` (and `listkit::Keyed` when a field is marked
//! `key`) plus field name constants from `#[record(...)]` annotations.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
