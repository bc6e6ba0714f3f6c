//! External collaborators consumed by the derivation engine.

pub mod asset_store;
pub mod error;
pub mod icon_search;
pub mod image_fetch;
pub mod slogan_writer;
