//! Request and response payloads exchanged over HTTP.

pub mod brandbook;
pub mod health;
pub mod validation;
