//! Dancemode Core - Shared types library.
//!
//! This crate provides the types used across all Dancemode client components:
//! - `client` - Storage, observable stores, services and the REST API client
//! - `cli` - Command-line front end driving the client
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no storage access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and statuses
//! - [`models`] - Wire models exchanged with the ticketing REST service
//! - [`auth`] - Authentication state and its transitions
//! - [`cart`] - Cart state and its reconciliation rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod models;
pub mod types;

pub use auth::{AuthState, AuthStateError, sanitize_token};
pub use cart::{CartItem, CartItemKind, CartState};
pub use types::*;
