//! HTTP client for the game-organizer REST API.
//!
//! Provides an async [`Client`] covering catalog search and the library
//! endpoints, and implements [`gameshelf_library::LibraryStore`] on top of it.

pub mod client;
pub mod types;

pub use client::{Client, DEFAULT_TIMEOUT, Error};
pub use types::CatalogHit;
