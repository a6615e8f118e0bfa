//! Caption parsing
//!
//! Descriptions carry the place as `[Place Name]` or a `#hashtag`, and the
//! contributor as `#name`/`@name`:
//!
//! - `"Cherry blossoms! #tokyo"` → caption unchanged, location `tokyo`
//! - `"Fun times [San Francisco, CA]"` → caption `Fun times`, location `San Francisco, CA`
//! - `"Our trip! [Paris] #pranav"` → caption `Our trip!`, location `Paris`, type pranav
//!
//! Only the bracket segment and bare contributor tags are cut from the
//! caption. Everything else the user typed, line breaks and spacing
//! included, is kept.

use journey_common::models::LocationType;
use once_cell::sync::Lazy;
use regex::Regex;

static BRACKET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid regex"));
static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([A-Za-z0-9_]+)").expect("valid regex"));
/// Group 1 marks a possessive (`#pranav's`), which is prose and stays
static CONTRIBUTOR_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[#@](?:pranav|pooja)\b(['’])?").expect("valid regex"));

/// Result of parsing one description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCaption {
    pub caption: String,
    pub location: Option<String>,
    /// `None` only for an empty description
    pub kind: Option<LocationType>,
}

/// Parse a media item description
///
/// The first bracketed segment wins over any hashtag and is cut out of the
/// caption. A hashtag location stays in the caption text, even when it is
/// also a contributor tag.
pub fn parse_caption(description: Option<&str>) -> ParsedCaption {
    let description = match description {
        Some(d) if !d.is_empty() => d,
        _ => return ParsedCaption::default(),
    };

    let (mut caption, location, hashtag_start) = match BRACKET_RE.captures(description) {
        Some(m) => {
            let whole = m.get(0).map_or(0..0, |g| g.range());
            (cut(description, whole), Some(m[1].to_string()), None)
        }
        None => match HASHTAG_RE.captures(description) {
            Some(m) => (
                description.to_string(),
                Some(m[1].to_string()),
                m.get(0).map(|g| g.start()),
            ),
            None => (description.to_string(), None, None),
        },
    };

    let tags: Vec<_> = CONTRIBUTOR_TAG_RE
        .captures_iter(&caption)
        .filter(|c| c.get(1).is_none())
        .filter_map(|c| c.get(0).map(|g| g.range()))
        .filter(|range| Some(range.start) != hashtag_start)
        .collect();
    // Right to left so earlier ranges stay valid
    for range in tags.into_iter().rev() {
        caption = cut(&caption, range);
    }

    ParsedCaption {
        caption: caption.trim().to_string(),
        location,
        kind: Some(classify(description)),
    }
}

/// Remove `range` and the spaces or tabs touching it, leaving one space
/// between the words on either side
fn cut(text: &str, range: std::ops::Range<usize>) -> String {
    const BLANK: &[char] = &[' ', '\t'];
    let before = text[..range.start].trim_end_matches(BLANK);
    let after = text[range.end..].trim_start_matches(BLANK);

    let at_edge = before.is_empty()
        || after.is_empty()
        || before.ends_with('\n')
        || after.starts_with(|c: char| c == '\n' || c == '\r');
    let joiner = if at_edge { "" } else { " " };

    format!("{}{}{}", before, joiner, after)
}

/// Contributor tag; "pranav" is checked first so it wins when both appear
fn classify(description: &str) -> LocationType {
    let lower = description.to_lowercase();
    if lower.contains("#pranav") || lower.contains("@pranav") {
        LocationType::Pranav
    } else if lower.contains("#pooja") || lower.contains("@pooja") {
        LocationType::Pooja
    } else {
        LocationType::Together
    }
}
