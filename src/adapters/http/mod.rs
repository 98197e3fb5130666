//! HTTP adapters - REST API surface.

pub mod booking;
