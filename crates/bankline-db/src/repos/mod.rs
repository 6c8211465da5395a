//! Repository implementations

mod account;

pub use account::AccountRepo;
