//! RSS feed generation from search results.
//!
//! - [`render`] - Maps cards to feed items (titles, links, image HTML, timestamps)
//! - [`rss`] - Assembles and serializes the RSS 2.0 document
//!
//! # Example
//!
//! ```no_run
//! use scryfall_rss::clock::SystemClock;
//! use scryfall_rss::feed::{render_cards, Feed, FeedError, FeedMeta};
//! use scryfall_rss::scryfall::SearchPage;
//! use std::path::Path;
//!
//! fn write_page(query: &str, page: &SearchPage) -> Result<(), FeedError> {
//!     let meta = FeedMeta::for_query(query, None, None, "https://scryfall.com")?;
//!     let mut feed = Feed::new(meta);
//!     for item in render_cards(page, &SystemClock) {
//!         feed.push(item);
//!     }
//!     feed.write_to_file(Path::new("scryfall_feed.xml"))
//! }
//!
//! write_page("t:angel c=w", &SearchPage::default()).unwrap();
//! ```

mod render;
mod rss;

pub use render::{render_card, render_cards, FeedItem};
pub use rss::{Feed, FeedError, FeedMeta};
