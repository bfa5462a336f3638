//! Core types for Clementine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod inventory;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use inventory::Inventory;
pub use money::{line_total, round3, shipping_rate};
pub use status::{CampaignStatus, ProductStatus, StatusParseError};
