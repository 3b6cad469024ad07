//! Dancemode client library.
//!
//! Client-side state and API access for the Dancemode ticketing service:
//! durable storage, observable stores, the session and cart services, and
//! the REST API client. Front ends build one [`DancemodeClient`] at startup
//! and drive everything through it.
//!
//! # Modules
//!
//! - [`storage`] - Durable key-value storage backends
//! - [`store`] - Memory, persisted and derived observable stores
//! - [`state`] - Every store the client owns
//! - [`services`] - Auth, cart, catalog and notification services
//! - [`api`] - REST API client
//! - [`config`] - Configuration from environment variables

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
mod client;
pub mod config;
pub mod services;
pub mod state;
pub mod storage;
pub mod store;

pub use client::DancemodeClient;
