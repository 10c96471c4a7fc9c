//! Multi-artist resolution.
//!
//! Singer records are keyed on the distinct strings produced here, so the
//! delimiter priority is fixed: NUL, then `;`, then `/`, then `,`. Only the
//! first delimiter type present in the string is used to split.

/// Sentinel used when a tag names no artist at all.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Delimiters in priority order.
pub const ARTIST_DELIMITERS: [char; 4] = ['\0', ';', '/', ','];

/// Split a raw artist string into trimmed, non-empty names.
///
/// May return an empty list (blank input); see [`resolve_artists`] for the
/// sentinel fallback.
pub fn split_artists(raw: &str) -> Vec<String> {
    match ARTIST_DELIMITERS.iter().find(|d| raw.contains(**d)) {
        Some(delimiter) => raw
            .split(*delimiter)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
    }
}

/// Resolve the artist list for a tag.
///
/// A container that exposes several discrete values is taken as-is (trimmed,
/// blanks dropped); a single value goes through [`split_artists`]. The result
/// is never empty.
pub fn resolve_artists<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let values: Vec<&str> = values.into_iter().collect();

    let artists = match values.as_slice() {
        [] => Vec::new(),
        [single] => split_artists(single),
        many => many
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    };

    if artists.is_empty() {
        vec![UNKNOWN_ARTIST.to_string()]
    } else {
        artists
    }
}
