//! Pharmacy Core - Shared domain library.
//!
//! This crate provides the types and pure logic used across the pharmacy
//! storefront components:
//! - `storefront` - API client, session and cart persistence, page loaders
//! - `cli` - Command-line storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! storage access, no HTTP clients. Cart arithmetic and catalog filtering
//! live here so they can be tested without any collaborator.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, usernames and drugs
//! - [`cart`] - Cart lines with merge-by-id quantity accumulation
//! - [`catalog`] - Form/symptom/name filter composition and filter options

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{Cart, CartLine};
pub use catalog::{CatalogFilter, FilterOptions, Selector};
pub use types::*;
