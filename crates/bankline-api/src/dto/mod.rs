//! Data Transfer Objects
//!
//! Request and response structures for the API. Field names are camelCase on
//! the wire.

pub mod account;
pub mod auth;
pub mod transfer;

pub use account::*;
pub use auth::*;
pub use transfer::*;
