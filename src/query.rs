use thiserror::Error;
use url::Url;

/// Errors that can occur while working out which search to run.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Neither a query nor a search URL was given.
    #[error("No search query specified")]
    NoQuerySpecified,
    /// The search URL could not be parsed.
    #[error("Invalid search URL: {0}")]
    UrlParse(#[from] url::ParseError),
    /// The search URL has no `q` parameter to take the query from.
    #[error("Could not extract query parameter from URL")]
    MissingQueryParameter,
}

/// Resolves the search query from either a raw query or a search-page URL.
///
/// A non-empty direct query always wins. Otherwise the first non-empty `q`
/// parameter of `url` is used, percent-decoded.
///
/// # Examples
///
/// ```
/// use scryfall_rss::query::resolve_query;
///
/// let q = resolve_query(None, Some("https://scryfall.com/search?q=t%3Aangel+c%3Dw")).unwrap();
/// assert_eq!(q, "t:angel c=w");
/// ```
pub fn resolve_query(query: Option<&str>, url: Option<&str>) -> Result<String, QueryError> {
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        return Ok(query.to_owned());
    }

    let Some(url) = url else {
        return Err(QueryError::NoQuerySpecified);
    };

    let parsed = Url::parse(url)?;
    parsed
        .query_pairs()
        .find(|(key, value)| key == "q" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .ok_or(QueryError::MissingQueryParameter)
}

/// Builds the human-facing search page URL for `query`, used as the feed link.
pub fn search_page_url(site_base: &str, query: &str) -> Result<Url, url::ParseError> {
    let mut url = endpoint(site_base, &["search"])?;
    url.query_pairs_mut().append_pair("q", query);
    Ok(url)
}

/// Builds the API search URL for `query`, ordered newest release first.
pub fn search_api_url(api_base: &str, query: &str) -> Result<Url, url::ParseError> {
    let mut url = endpoint(api_base, &["cards", "search"])?;
    url.query_pairs_mut()
        .append_pair("q", query)
        .append_pair("order", "released");
    Ok(url)
}

/// Appends `segments` to the path of `base`, keeping any path it already has
/// whether or not it ends in `/`.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_query_used_as_is() {
        let q = resolve_query(Some("t:goblin"), None).unwrap();
        assert_eq!(q, "t:goblin");
    }

    #[test]
    fn test_direct_query_wins_over_url() {
        let q = resolve_query(
            Some("t:goblin"),
            Some("https://scryfall.com/search?q=t%3Aangel"),
        )
        .unwrap();
        assert_eq!(q, "t:goblin");
    }

    #[test]
    fn test_query_extracted_from_url() {
        let q = resolve_query(None, Some("https://scryfall.com/search?q=t%3Aangel+c%3Dw")).unwrap();
        assert_eq!(q, "t:angel c=w");
    }

    #[test]
    fn test_empty_query_falls_back_to_url() {
        let q = resolve_query(Some(""), Some("https://scryfall.com/search?q=set%3Admu")).unwrap();
        assert_eq!(q, "set:dmu");
    }

    #[test]
    fn test_first_q_value_wins() {
        let q = resolve_query(None, Some("https://scryfall.com/search?as=grid&q=a&q=b")).unwrap();
        assert_eq!(q, "a");
    }

    #[test]
    fn test_nothing_given() {
        assert!(matches!(
            resolve_query(None, None),
            Err(QueryError::NoQuerySpecified)
        ));
        assert!(matches!(
            resolve_query(Some(""), None),
            Err(QueryError::NoQuerySpecified)
        ));
    }

    #[test]
    fn test_url_without_q() {
        let result = resolve_query(None, Some("https://scryfall.com/search?order=name"));
        assert!(matches!(result, Err(QueryError::MissingQueryParameter)));
    }

    #[test]
    fn test_url_with_blank_q() {
        let result = resolve_query(None, Some("https://scryfall.com/search?q="));
        assert!(matches!(result, Err(QueryError::MissingQueryParameter)));
    }

    #[test]
    fn test_malformed_url() {
        let result = resolve_query(None, Some("not a url"));
        assert!(matches!(result, Err(QueryError::UrlParse(_))));
    }

    #[test]
    fn test_search_page_url_encodes_query() {
        let url = search_page_url("https://scryfall.com", "t:angel c=w").unwrap();
        assert_eq!(url.as_str(), "https://scryfall.com/search?q=t%3Aangel+c%3Dw");
    }

    #[test]
    fn test_base_path_kept_with_or_without_trailing_slash() {
        for base in ["https://mirror.example.com/api", "https://mirror.example.com/api/"] {
            let url = search_api_url(base, "t:angel").unwrap();
            assert_eq!(
                url.as_str(),
                "https://mirror.example.com/api/cards/search?q=t%3Aangel&order=released",
                "base {base}"
            );

            let url = search_page_url(base, "t:angel").unwrap();
            assert_eq!(url.as_str(), "https://mirror.example.com/api/search?q=t%3Aangel");
        }
    }

    #[test]
    fn test_base_that_cannot_hold_a_path_is_rejected() {
        assert!(search_api_url("mailto:cards@example.com", "t:angel").is_err());
        assert!(search_api_url("not a url", "t:angel").is_err());
    }

    #[test]
    fn test_search_api_url_orders_by_release() {
        let url = search_api_url("https://api.scryfall.com", "t:angel").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.scryfall.com/cards/search?q=t%3Aangel&order=released"
        );
    }
}
