//! Services that apply domain transitions to the client stores.
//!
//! - [`auth`] - Login, logout, profile updates and forced expiry
//! - [`cart`] - Cart edits and checkout
//! - [`catalog`] - Loading events, venues and packages
//! - [`notifications`] - Transient error and success messages

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod notifications;

pub use auth::{AuthError, AuthService, LogoutPolicy};
pub use cart::{CartError, CartService};
pub use catalog::CatalogService;
pub use notifications::Notifications;
