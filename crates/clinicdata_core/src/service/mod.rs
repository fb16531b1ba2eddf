//! Consumer-facing services.
//!
//! # Responsibility
//! - Give the site and admin tooling one backend-agnostic entry point.
//! - Keep consumers decoupled from storage and transport details.

pub mod data_facade;
