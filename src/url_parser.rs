//! Extract Drive item IDs from the URLs users copy out of a browser.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{DriveError, Result};

/// URL shapes that carry an item ID in their first capture group.
static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^https?://drive\.google\.com/drive/(?:u/\d+/)?folders/([A-Za-z0-9_-]+)",
        r"^https?://drive\.google\.com/file/d/([A-Za-z0-9_-]+)",
        r"^https?://drive\.google\.com/open\?id=([A-Za-z0-9_-]+)",
        r"^https?://docs\.google\.com/(?:document|spreadsheets|presentation|forms|drawings)/d/([A-Za-z0-9_-]+)",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("static URL pattern"))
    .collect()
});

static RAW_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static ID pattern"));

/// Whether `id` has the shape of a Drive item ID.
pub fn is_valid_id(id: &str) -> bool {
    RAW_ID.is_match(id)
}

/// Return the item ID in `url_or_id`, which may be a Drive or Docs URL or a
/// bare ID. Surrounding whitespace is ignored.
///
/// ```
/// use gdrive_provider::url_parser::extract_id;
///
/// let id = extract_id("https://drive.google.com/drive/u/0/folders/1abc123").unwrap();
/// assert_eq!(id, "1abc123");
/// assert_eq!(extract_id(" 1abc123 ").unwrap(), "1abc123");
/// ```
pub fn extract_id(url_or_id: &str) -> Result<String> {
    let input = url_or_id.trim();

    let from_url = URL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(input)?.get(1));
    if let Some(id) = from_url {
        return Ok(id.as_str().to_string());
    }

    if is_valid_id(input) {
        return Ok(input.to_string());
    }

    Err(DriveError::InvalidUrlOrId(url_or_id.to_string()))
}
