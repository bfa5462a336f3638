//! Clementine Core - Shared types library.
//!
//! This crate provides common types used across all Clementine components:
//! - `storefront` - Customer-facing purchase service
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses,
//!   plus money rounding and the inventory accounting variants

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
