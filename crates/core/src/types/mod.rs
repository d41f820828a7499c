//! Core types for the pharmacy storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod drug;
pub mod id;
pub mod price;
pub mod username;

pub use drug::{Drug, DrugForm};
pub use id::*;
pub use price::{Price, PriceError};
pub use username::{Username, UsernameError};
