//! Turn a Scryfall card search into an RSS feed.
//!
//! The search is run once, newest releases first, and the first page of
//! results is written out as an RSS 2.0 document with one item per card.

pub mod clock;
pub mod config;
pub mod feed;
pub mod generator;
pub mod query;
pub mod scryfall;
