//! Wire models exchanged with the ticketing REST service.
//!
//! Field names follow the backend's `snake_case` JSON. Request types carry
//! no validation: the service is the single source of truth for what it
//! accepts.

pub mod catalog;
pub mod data;
pub mod envelope;
pub mod registration;
pub mod user;

pub use catalog::*;
pub use data::*;
pub use envelope::ApiEnvelope;
pub use registration::*;
pub use user::*;
