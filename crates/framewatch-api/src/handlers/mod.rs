//! Request handlers.

pub mod analysis;
pub mod health;
pub mod media;
pub mod videos;
