use crate::clock::Clock;
use crate::scryfall::{CardRecord, SearchPage};
use chrono::{DateTime, Duration, NaiveDate, Utc};

const UNKNOWN_CARD_TITLE: &str = "Unknown Card";
const CARD_PAGE_BASE: &str = "https://scryfall.com/card/";

/// A single `<item>` of the generated feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// HTML fragment with one `<img>` per displayed image.
    pub description: String,
    pub guid: String,
    pub pub_date: DateTime<Utc>,
}

/// Renders every card of a search page, in response order.
pub fn render_cards(page: &SearchPage, clock: &dyn Clock) -> Vec<FeedItem> {
    page.data
        .iter()
        .enumerate()
        .map(|(index, card)| render_card(card, index, clock))
        .collect()
}

/// Maps one card at position `index` of the response to a feed item.
///
/// Never fails: missing fields fall back to placeholders, and a missing or
/// malformed release date falls back to `clock.now()`.
///
/// The timestamp is pushed back by `index` seconds so cards released on the
/// same day keep the response's newest-first order once a reader sorts by
/// publication date.
pub fn render_card(card: &CardRecord, index: usize, clock: &dyn Clock) -> FeedItem {
    let guid = card.id.clone().unwrap_or_default();

    let released = card
        .released_at
        .as_deref()
        .and_then(parse_release_date)
        .unwrap_or_else(|| {
            tracing::debug!(
                card = %guid,
                released_at = ?card.released_at,
                "Release date missing or malformed, using current time"
            );
            clock.now()
        });
    let pub_date = released - Duration::seconds(index as i64);

    let title = card
        .name
        .clone()
        .unwrap_or_else(|| UNKNOWN_CARD_TITLE.to_string());

    let link = card
        .scryfall_uri
        .clone()
        .unwrap_or_else(|| format!("{CARD_PAGE_BASE}{guid}"));

    FeedItem {
        title,
        link,
        description: describe(card),
        guid,
        pub_date,
    }
}

fn parse_release_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn describe(card: &CardRecord) -> String {
    if !card.card_faces.is_empty() && card.layout.uses_face_images() {
        return card
            .card_faces
            .iter()
            .enumerate()
            .filter_map(|(i, face)| {
                let url = face.image_url()?;
                let alt = face
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Face {}", i + 1));
                Some(image_fragment(url, &alt))
            })
            .collect();
    }

    match card.image_url() {
        Some(url) => image_fragment(url, card.name.as_deref().unwrap_or_default()),
        None => String::new(),
    }
}

fn image_fragment(url: &str, alt: &str) -> String {
    format!("<p><img src='{url}' alt='{alt}'></p>")
}
