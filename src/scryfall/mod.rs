//! Client and response types for the Scryfall card search API.
//!
//! - [`client`] - Single-request search over HTTP
//! - [`models`] - Deserialized search pages and cards

mod client;
mod models;

pub use client::{FetchError, SearchClient};
pub use models::{CardFace, CardRecord, ImageUris, Layout, SearchPage};
