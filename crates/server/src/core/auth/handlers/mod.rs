//! Auth Handlers

pub mod auth;

pub use auth::{signin, signup};
