//! ID3v2 frame access.

use id3::frame::{Content, Picture};
use id3::{Tag, TagLike};

/// Descriptions that mark a free-form frame as carrying lyrics.
///
/// Compared against the whole description, lowercased with spaces,
/// underscores and dashes removed, so `LYRICIST` does not count.
pub const LYRIC_KEYWORDS: &[&str] = &["lyrics", "lyric", "uslt", "unsynced", "unsyncedlyrics"];

/// Where lyrics may live in an ID3 tag, consulted top to bottom.
#[derive(Debug, Clone, Copy)]
enum LyricSource {
    /// USLT frames
    Unsynchronized,
    /// TXXX/COMM frames whose description is one of the keywords
    Described(&'static [&'static str]),
}

const LYRIC_SOURCES: &[LyricSource] = &[
    LyricSource::Unsynchronized,
    LyricSource::Described(LYRIC_KEYWORDS),
];

/// Raw text of a text-information frame, separators intact.
pub fn text_frame(tag: &Tag, id: &str) -> Option<String> {
    match tag.get(id)?.content() {
        Content::Text(s) => Some(s.clone()),
        _ => None,
    }
}

/// First text frame present among `ids`
pub fn first_text_frame(tag: &Tag, ids: &[&str]) -> Option<String> {
    ids.iter().find_map(|id| text_frame(tag, id))
}

/// First non-empty lyric text, following [`LYRIC_SOURCES`].
pub fn lyrics(tag: &Tag) -> Option<String> {
    LYRIC_SOURCES.iter().find_map(|source| lyrics_from(tag, *source))
}

fn lyrics_from(tag: &Tag, source: LyricSource) -> Option<String> {
    tag.frames().find_map(|frame| {
        let text = match (source, frame.content()) {
            (LyricSource::Unsynchronized, Content::Lyrics(l)) => &l.text,
            (LyricSource::Described(keywords), Content::ExtendedText(et))
                if describes_lyrics(&et.description, keywords) =>
            {
                &et.value
            }
            (LyricSource::Described(keywords), Content::Comment(c))
                if describes_lyrics(&c.description, keywords) =>
            {
                &c.text
            }
            _ => return None,
        };
        (!text.trim().is_empty()).then(|| text.clone())
    })
}

fn describes_lyrics(description: &str, keywords: &[&str]) -> bool {
    let normalized: String = description
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .to_lowercase();
    keywords.contains(&normalized.as_str())
}

/// First attached picture in frame order.
pub fn first_picture(tag: &Tag) -> Option<&Picture> {
    tag.frames().find_map(|frame| match frame.content() {
        Content::Picture(p) => Some(p),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use id3::frame::{Comment, ExtendedText, Lyrics};
    use id3::Frame;

    fn txxx(description: &str, value: &str) -> Frame {
        Frame::with_content(
            "TXXX",
            Content::ExtendedText(ExtendedText {
                description: description.to_string(),
                value: value.to_string(),
            }),
        )
    }

    fn uslt(text: &str) -> Frame {
        Frame::with_content(
            "USLT",
            Content::Lyrics(Lyrics {
                lang: "eng".to_string(),
                description: String::new(),
                text: text.to_string(),
            }),
        )
    }

    #[test]
    fn test_uslt_wins_over_txxx() {
        let mut tag = Tag::new();
        tag.add_frame(txxx("LYRICS", "from txxx"));
        tag.add_frame(uslt("from uslt"));
        assert_eq!(lyrics(&tag).as_deref(), Some("from uslt"));
    }

    #[test]
    fn test_txxx_keyword_case_insensitive() {
        let mut tag = Tag::new();
        tag.add_frame(txxx("MusicBrainz Album Id", "abc"));
        tag.add_frame(txxx("UNSYNCEDLYRICS", "la la la"));
        assert_eq!(lyrics(&tag).as_deref(), Some("la la la"));
    }

    #[test]
    fn test_lyricist_credit_is_not_lyrics() {
        let mut tag = Tag::new();
        tag.add_frame(txxx("LYRICIST", "Bernie Taupin"));
        assert_eq!(lyrics(&tag), None);
    }

    #[test]
    fn test_spaced_unsynced_lyrics_description() {
        let mut tag = Tag::new();
        tag.add_frame(txxx("Unsynced Lyrics", "chorus"));
        assert_eq!(lyrics(&tag).as_deref(), Some("chorus"));
    }

    #[test]
    fn test_comment_with_lyric_description() {
        let mut tag = Tag::new();
        tag.add_frame(Frame::with_content(
            "COMM",
            Content::Comment(Comment {
                lang: "eng".to_string(),
                description: "Lyric".to_string(),
                text: "verse one".to_string(),
            }),
        ));
        assert_eq!(lyrics(&tag).as_deref(), Some("verse one"));
    }

    #[test]
    fn test_blank_uslt_falls_through() {
        let mut tag = Tag::new();
        tag.add_frame(uslt("   "));
        tag.add_frame(txxx("lyrics", "fallback"));
        assert_eq!(lyrics(&tag).as_deref(), Some("fallback"));
    }

    #[test]
    fn test_no_lyrics() {
        let mut tag = Tag::new();
        tag.set_title("Instrumental");
        assert_eq!(lyrics(&tag), None);
    }

    #[test]
    fn test_first_text_frame_order() {
        let mut tag = Tag::new();
        tag.set_text("TYER", "1999");
        assert_eq!(first_text_frame(&tag, &["TDRC", "TYER"]).as_deref(), Some("1999"));
        tag.set_text("TDRC", "2001-04-01");
        assert_eq!(
            first_text_frame(&tag, &["TDRC", "TYER"]).as_deref(),
            Some("2001-04-01")
        );
    }
}
