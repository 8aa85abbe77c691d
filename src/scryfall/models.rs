use serde::{Deserialize, Deserializer};

/// One page of `/cards/search` results.
///
/// Less important fields are omitted; unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchPage {
    #[serde(deserialize_with = "null_as_empty")]
    pub data: Vec<CardRecord>,
    /// More pages exist server-side. Informational only.
    pub has_more: bool,
    pub total_cards: Option<u64>,
}

/// A card as returned by the search endpoint.
///
/// Every field is optional: missing values degrade to placeholders when the
/// card is rendered rather than failing the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CardRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub layout: Layout,
    /// Release date as `YYYY-MM-DD`. Kept as a string so a malformed date
    /// only affects this card's timestamp.
    pub released_at: Option<String>,
    pub scryfall_uri: Option<String>,
    pub image_uris: Option<ImageUris>,
    #[serde(deserialize_with = "null_as_empty")]
    pub card_faces: Vec<CardFace>,
}

/// Treats an explicit JSON `null` list the same as an absent one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl CardRecord {
    pub fn image_url(&self) -> Option<&str> {
        self.image_uris.as_ref().and_then(ImageUris::normal)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CardFace {
    pub name: Option<String>,
    pub image_uris: Option<ImageUris>,
}

impl CardFace {
    pub fn image_url(&self) -> Option<&str> {
        self.image_uris.as_ref().and_then(ImageUris::normal)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageUris {
    pub normal: Option<String>,
}

impl ImageUris {
    fn normal(&self) -> Option<&str> {
        self.normal.as_deref().filter(|url| !url.is_empty())
    }
}

/// Physical structure of a card printing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Normal,
    Split,
    Flip,
    Transform,
    ModalDfc,
    Meld,
    Leveler,
    Class,
    Case,
    Saga,
    Adventure,
    Mutate,
    Prototype,
    Battle,
    Planar,
    Scheme,
    Vanguard,
    Token,
    DoubleFacedToken,
    Emblem,
    Augment,
    Host,
    ArtSeries,
    ReversibleCard,
    /// Missing or not yet known layout tag.
    #[default]
    #[serde(other)]
    Other,
}

impl Layout {
    /// Whether each face carries its own image.
    ///
    /// Adventure, split, flip and meld cards list faces but share one printed
    /// image on the card itself.
    pub fn uses_face_images(self) -> bool {
        !matches!(
            self,
            Layout::Adventure | Layout::Split | Layout::Flip | Layout::Meld
        )
    }
}

/// Error object returned by the API alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiError {
    pub details: Option<String>,
}
