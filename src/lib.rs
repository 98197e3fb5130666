//! MentorLink Core - booking and payment reconciliation.
//!
//! Turns a buyer's selection of {mentor, product, date, time} into a
//! confirmed, paid, uniquely-scheduled booking. Everything else in the
//! marketplace (profiles, content, auth) is an external collaborator
//! reached through ports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
