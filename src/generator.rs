//! One fetch → render → write cycle.
//!
//! Every run regenerates the output file from scratch. Only the first page of
//! results is used; whether more exist is reported back in [`RunOutcome`].
use crate::clock::Clock;
use crate::config::Config;
use crate::feed::{render_cards, Feed, FeedError, FeedMeta};
use crate::query::{resolve_query, QueryError};
use crate::scryfall::{FetchError, SearchClient};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Error making API request: {0}")]
    Fetch(#[from] FetchError),

    #[error("Error creating RSS feed: {0}")]
    Feed(#[from] FeedError),
}

/// What the caller asked for.
#[derive(Debug, Clone, Default)]
pub struct FeedRequest {
    pub query: Option<String>,
    pub url: Option<String>,
    pub output: PathBuf,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Feed written to `path`.
    Written {
        path: PathBuf,
        items: usize,
        has_more: bool,
        total_cards: Option<u64>,
    },
    /// The search matched nothing; no file was written.
    NoResults { query: String },
}

pub struct Generator<C> {
    client: SearchClient,
    site_base_url: String,
    clock: C,
}

impl<C: Clock> Generator<C> {
    pub fn new(config: &Config, clock: C) -> Self {
        Self::with_client(SearchClient::new(config), config, clock)
    }

    pub fn with_client(client: SearchClient, config: &Config, clock: C) -> Self {
        Self {
            client,
            site_base_url: config.site_base_url.clone(),
            clock,
        }
    }

    /// Resolves the query, fetches the first results page and writes the feed.
    ///
    /// An empty result set is not an error: it yields
    /// [`RunOutcome::NoResults`] and leaves the output path untouched.
    pub async fn run(&self, request: &FeedRequest) -> Result<RunOutcome, GenerateError> {
        let query = resolve_query(request.query.as_deref(), request.url.as_deref())?;
        tracing::info!(query = %query, output = %request.output.display(), "Generating feed");

        let page = match self.client.search(&query).await {
            Ok(page) => page,
            Err(FetchError::NoResults) => {
                tracing::info!(query = %query, "Search returned no cards");
                return Ok(RunOutcome::NoResults { query });
            }
            Err(e) => return Err(e.into()),
        };

        let meta = FeedMeta::for_query(
            &query,
            request.title.as_deref(),
            request.description.as_deref(),
            &self.site_base_url,
        )?;
        let mut feed = Feed::new(meta);
        for item in render_cards(&page, &self.clock) {
            feed.push(item);
        }
        feed.write_to_file(&request.output)?;

        Ok(RunOutcome::Written {
            path: request.output.clone(),
            items: feed.items.len(),
            has_more: page.has_more,
            total_cards: page.total_cards,
        })
    }
}
