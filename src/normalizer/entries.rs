//! Feed document → [`RawCandidate`]s.
//!
//! `feed-rs` hands us one `Entry` value per entry element, and every field of
//! a candidate is read from that single value. Nothing is carried over from
//! one entry to the next, so a title can never be paired with a neighbouring
//! entry's identifier.

use chrono::SecondsFormat;
use feed_rs::model::{Entry, Link};
use feed_rs::parser;
use html_escape::decode_html_entities;
use url::Url;

use crate::app::{EstuaryError, Result};
use crate::domain::{is_video_id, RawCandidate};

const ENTRY_ID_PREFIX: &str = "yt:video:";

/// Parse a feed document and return one candidate per entry that carries an
/// identifier, in document order.
pub fn parse_entries(body: &[u8]) -> Result<Vec<RawCandidate>> {
    // Entries without an id must stay without one; the default generator
    // would hash the link and title into a synthetic id.
    let parser = parser::Builder::new()
        .id_generator(|_links, _title, _uri| String::new())
        .build();

    let feed = parser
        .parse(body)
        .map_err(|e| EstuaryError::FeedParse(e.to_string()))?;

    let candidates = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let candidate = entry_candidate(entry);
            if candidate.id.is_empty() {
                tracing::debug!(
                    title = %candidate.title,
                    "dropping feed entry without a video id"
                );
                return None;
            }
            Some(candidate)
        })
        .collect();

    Ok(candidates)
}

fn entry_candidate(entry: Entry) -> RawCandidate {
    let id = primary_link(&entry.links)
        .and_then(|link| video_id_from_link(&link.href))
        .or_else(|| video_id_from_entry_id(&entry.id))
        .unwrap_or_default();

    RawCandidate {
        id,
        title: entry
            .title
            .map(|t| decode_html_entities(&t.content).to_string())
            .unwrap_or_default(),
        channel: entry
            .authors
            .first()
            .map(|a| decode_html_entities(&a.name).to_string())
            .unwrap_or_default(),
        published: entry
            .published
            .or(entry.updated)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
    }
}

fn primary_link(links: &[Link]) -> Option<&Link> {
    links
        .iter()
        .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
        .or_else(|| links.first())
}

/// Extract the `v` query parameter from a watch link. A decoded value that
/// is not a plain token is rejected.
pub fn video_id_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| is_video_id(value))
}

/// Fall back to the entry's own id element, e.g. `yt:video:dQw4w9WgXcQ`.
pub fn video_id_from_entry_id(entry_id: &str) -> Option<String> {
    let entry_id = entry_id.trim();
    let candidate = entry_id.strip_prefix(ENTRY_ID_PREFIX).unwrap_or(entry_id);
    is_video_id(candidate).then(|| candidate.to_string())
}
