use crate::feed::render::FeedItem;
use crate::query::search_page_url;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FEED_LANGUAGE: &str = "en";

/// Errors that can occur while serializing or writing the feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The XML document could not be produced.
    #[error("Failed to serialize feed: {0}")]
    Xml(String),

    /// The feed link could not be built from the query.
    #[error("Invalid site URL: {0}")]
    Link(#[from] url::ParseError),

    /// The output file could not be written.
    #[error("Failed to write feed to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Channel-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMeta {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
}

impl FeedMeta {
    /// Metadata for a search feed, with title and description derived from
    /// `query` unless given explicitly.
    pub fn for_query(
        query: &str,
        title: Option<&str>,
        description: Option<&str>,
        site_base: &str,
    ) -> Result<Self, FeedError> {
        let title = title
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Scryfall Search: {query}"));
        let description = description
            .filter(|d| !d.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("RSS feed for Scryfall search: {query}"));

        Ok(Self {
            title,
            link: search_page_url(site_base, query)?.to_string(),
            description,
            language: FEED_LANGUAGE.to_string(),
        })
    }
}

/// An RSS 2.0 document held in memory until written.
#[derive(Debug, Clone)]
pub struct Feed {
    pub meta: FeedMeta,
    pub items: Vec<FeedItem>,
}

impl Feed {
    pub fn new(meta: FeedMeta) -> Self {
        Self {
            meta,
            items: Vec::new(),
        }
    }

    /// Appends an item after any already present.
    pub fn push(&mut self, item: FeedItem) {
        self.items.push(item);
    }

    /// Serializes the feed as an RSS 2.0 document.
    ///
    /// Items are written in insertion order. `lastBuildDate` is the newest
    /// item timestamp and is left out for an empty feed.
    pub fn to_xml(&self) -> Result<String, FeedError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        write(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        write(&mut writer, Event::Start(rss))?;
        write(&mut writer, Event::Start(BytesStart::new("channel")))?;

        write_text_element(&mut writer, "title", &self.meta.title)?;
        write_text_element(&mut writer, "link", &self.meta.link)?;
        write_text_element(&mut writer, "description", &self.meta.description)?;
        write_text_element(&mut writer, "language", &self.meta.language)?;
        if let Some(latest) = self.items.iter().map(|i| i.pub_date).max() {
            write_text_element(&mut writer, "lastBuildDate", &latest.to_rfc2822())?;
        }

        for item in &self.items {
            write(&mut writer, Event::Start(BytesStart::new("item")))?;
            write_text_element(&mut writer, "title", &item.title)?;
            write_text_element(&mut writer, "link", &item.link)?;
            write_text_element(&mut writer, "description", &item.description)?;
            write_text_element(&mut writer, "pubDate", &item.pub_date.to_rfc2822())?;
            if !item.guid.is_empty() {
                let mut guid = BytesStart::new("guid");
                guid.push_attribute(("isPermaLink", "false"));
                write(&mut writer, Event::Start(guid))?;
                write(&mut writer, Event::Text(BytesText::new(&item.guid)))?;
                write(&mut writer, Event::End(BytesEnd::new("guid")))?;
            }
            write(&mut writer, Event::End(BytesEnd::new("item")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("channel")))?;
        write(&mut writer, Event::End(BytesEnd::new("rss")))?;

        let result = writer.into_inner().into_inner();
        String::from_utf8(result).map_err(|e| FeedError::Xml(e.to_string()))
    }

    /// Writes the feed to `path`, replacing any existing file.
    ///
    /// Content goes to a temporary file in the same directory, is synced to
    /// disk, then renamed over the destination so readers never observe a
    /// partial feed.
    pub fn write_to_file(&self, path: &Path) -> Result<(), FeedError> {
        use std::io::Write;
        use std::time::{SystemTime, UNIX_EPOCH};

        let content = self.to_xml()?;
        let write_err = |source| FeedError::Write {
            path: path.to_path_buf(),
            source,
        };

        let random_suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let temp_path = path.with_extension(format!("tmp.{:016x}", random_suffix));

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .map_err(write_err)?;

        if let Err(e) = file.write_all(content.as_bytes()).and_then(|_| file.sync_all()) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(write_err(e));
        }

        drop(file);

        // On Windows, rename fails if destination exists
        #[cfg(windows)]
        if path.exists() {
            if let Err(e) = std::fs::remove_file(path) {
                let _ = std::fs::remove_file(&temp_path);
                return Err(write_err(e));
            }
        }

        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(write_err(e));
        }

        tracing::info!(path = %path.display(), items = self.items.len(), "Wrote feed");
        Ok(())
    }
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), FeedError> {
    writer
        .write_event(event)
        .map_err(|e| FeedError::Xml(e.to_string()))
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> Result<(), FeedError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}
