//! Pharmacy Storefront library.
//!
//! The client side of the online pharmacy: everything the storefront UI
//! needs apart from rendering.
//!
//! # Architecture
//!
//! - [`api`] - REST client for the pharmacy backend (`reqwest`)
//! - [`storage`] - Local key-value store (in-memory or JSON file)
//! - [`session`] - Auth token and display username, login/signup/logout
//! - [`cart`] - Cart persisted under the `cart` key
//! - [`pages`] - Data loaders for the products, product detail and profile
//!   views, with login gating and quiet fallbacks
//! - [`state`] - The explicitly constructed application context
//!
//! Pure cart math and catalog filtering live in `pharmacy_core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod pages;
pub mod session;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
