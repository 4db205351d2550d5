pub mod api;
pub mod client;
pub mod models;

pub use client::{ApiCall, ArticClient};
pub use models::{Artwork, ArtworkId};
