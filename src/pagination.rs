//!
//! Pagination information from `Link` response headers.
//!
//! Paginated list calls return a header such as
//! `<https://api.newrelic.com/v2/deployments.json?page=2>; rel="next"`. The
//! client merges it into the response object under a `pages` key, keyed by
//! relation:
//! ```json
//! {"pages": {"next": {"url": "https://...?page=2", "rel": "next"}}}
//! ```
use serde::{Deserialize, Serialize};

/// A single entry of a `Link` header
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Link {
    /// Target of the link
    pub url: String,
    /// Relation, e.g. `next` or `last`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
}

impl Link {
    /// Key of the link in `pages`, the relation or the URL if there is none
    #[must_use]
    pub fn key(&self) -> &str {
        self.rel.as_deref().unwrap_or(&self.url)
    }
}

/// Parse a `Link` header value. Entries not of the form `<url>; params` are skipped.
#[must_use]
pub fn parse_link_header(header: &str) -> Vec<Link> {
    // URLs may contain commas, so only split where a new `<...>` entry starts
    let mut entries: Vec<String> = Vec::new();
    for part in header.split(',') {
        match entries.last_mut() {
            Some(last) if !part.trim_start().starts_with('<') => {
                last.push(',');
                last.push_str(part);
            }
            _ => entries.push(part.to_string()),
        }
    }

    entries
        .iter()
        .map(String::as_str)
        .filter_map(parse_entry)
        .collect()
}

fn parse_entry(entry: &str) -> Option<Link> {
    let entry = entry.trim().strip_prefix('<')?;
    let (url, params) = entry.split_once('>')?;

    let rel = params.split(';').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("rel") {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    });

    Some(Link {
        url: url.trim().to_string(),
        rel,
    })
}

/// Merge the links of `header` into `value` as a `pages` object.
/// Links are keyed by relation, or by URL when they have none. Only JSON
/// objects are touched, and nothing is added if no link parses.
pub(crate) fn merge_pages(value: &mut serde_json::Value, header: &str) {
    let links = parse_link_header(header);
    if links.is_empty() {
        return;
    }

    if let Some(obj) = value.as_object_mut() {
        let pages = links
            .into_iter()
            .map(|link| {
                let key = link.key().to_string();
                let page = match link.rel {
                    Some(rel) => serde_json::json!({ "url": link.url, "rel": rel }),
                    None => serde_json::json!({ "url": link.url }),
                };
                (key, page)
            })
            .collect::<serde_json::Map<_, _>>();
        obj.insert("pages".to_string(), serde_json::Value::Object(pages));
    }
}
