//! Video provider recognition and text segmentation.
//!
//! Post bodies are free text that may contain links to video providers. This
//! module recognizes those links and converts them into embeddable player
//! URLs, and segments a whole body into alternating text and video spans so
//! the rendering layer can interleave player frames with prose.
//!
//! # Provider Matching
//!
//! | Provider | Accepted forms | Embed URL |
//! |----------|----------------|-----------|
//! | YouTube  | `youtube.com/watch?v=`, `youtu.be/`, `youtube.com/embed/` | `https://www.youtube.com/embed/{id}` |
//! | Bilibili | `bilibili.com/video/`, `b23.tv/`, player URLs with `bvid=` | `//player.bilibili.com/player.html?bvid={bvid}&page=1` |
//! | Vimeo    | `vimeo.com/{digits}` | `https://player.vimeo.com/video/{id}` |
//!
//! Rules are tried in that order and the first match wins. A Bilibili id
//! captured without the `BV` prefix (short links carry bare ids) has the
//! prefix prepended before use.
//!
//! # Example
//!
//! ```
//! use magiccode_client::video::{recognize, segment, TextSpan, VideoProvider};
//!
//! let reference = recognize("https://youtu.be/dQw4w9WgXcQ").unwrap();
//! assert_eq!(reference.provider, VideoProvider::Youtube);
//! assert_eq!(reference.embed_url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
//!
//! let spans = segment("intro https://vimeo.com/12345 outro");
//! assert_eq!(spans.len(), 3);
//! assert!(matches!(spans[1], TextSpan::Video { .. }));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// YouTube watch, short-link, and embed forms with an 11-character video id.
static YOUTUBE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{11})")
        .expect("hard-coded YouTube pattern is valid")
});

/// Bilibili video pages, b23.tv short links, and already-embedded player URLs.
static BILIBILI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:bilibili\.com/video/|b23\.tv/|player\.bilibili\.com/player\.html\?.*?bvid=)([A-Za-z0-9]+)")
        .expect("hard-coded Bilibili pattern is valid")
});

/// Vimeo video pages identified by a numeric id.
static VIMEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"vimeo\.com/(\d+)").expect("hard-coded Vimeo pattern is valid")
});

/// Generic http(s) link: any run of non-whitespace after the scheme. This may
/// over-match trailing punctuation (a sentence-ending period sticks to the
/// URL); callers have always seen that behavior and downstream link rendering
/// tolerates it.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("hard-coded URL pattern is valid"));

/// A video provider recognized by [`recognize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    /// YouTube (youtube.com, youtu.be).
    Youtube,
    /// Bilibili (bilibili.com, b23.tv).
    Bilibili,
    /// Vimeo (vimeo.com).
    Vimeo,
}

/// A recognized video link, ready for embedding.
///
/// Constructed fresh per recognized URL and never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoReference {
    /// The provider the link was matched against.
    pub provider: VideoProvider,

    /// The original URL as passed in (whitespace-trimmed).
    pub source_url: String,

    /// A URL suitable for direct use in a player frame.
    pub embed_url: String,
}

/// A contiguous fragment of a segmented post body.
///
/// Concatenating each span's original text in order reproduces the input
/// exactly: `value` for text spans, `original_text` for video spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TextSpan {
    /// Plain text, emitted verbatim. Unrecognized URLs also land here so the
    /// rendering layer's link formatting can still pick them up.
    Text {
        /// The literal text of the fragment.
        value: String,
    },

    /// A recognized video link.
    Video {
        /// The recognized reference, carrying the embed URL.
        reference: VideoReference,
        /// The matched substring, kept so the input can be reconstructed.
        original_text: String,
    },
}

impl TextSpan {
    /// Returns the fragment of the original input this span covers.
    #[must_use]
    pub fn original_text(&self) -> &str {
        match self {
            Self::Text { value } => value,
            Self::Video { original_text, .. } => original_text,
        }
    }
}

/// Recognizes a video provider URL and derives its embed URL.
///
/// Leading and trailing whitespace is trimmed before matching. Providers are
/// tried in order (YouTube, Bilibili, Vimeo); the first match wins. Returns
/// `None` when no provider matches, in which case the caller should treat
/// the URL as a plain link.
///
/// # Example
///
/// ```
/// use magiccode_client::video::recognize;
///
/// let r = recognize("https://www.bilibili.com/video/BV1xx411c7mD").unwrap();
/// assert!(r.embed_url.contains("bvid=BV1xx411c7mD"));
///
/// assert!(recognize("https://example.com/not-a-video").is_none());
/// ```
#[must_use]
pub fn recognize(url: &str) -> Option<VideoReference> {
    let trimmed = url.trim();

    if let Some(caps) = YOUTUBE_RE.captures(trimmed) {
        let video_id = &caps[1];
        return Some(VideoReference {
            provider: VideoProvider::Youtube,
            source_url: trimmed.to_string(),
            embed_url: format!("https://www.youtube.com/embed/{video_id}"),
        });
    }

    if let Some(caps) = BILIBILI_RE.captures(trimmed) {
        // Short links carry bare ids; the player needs the BV prefix.
        let captured = &caps[1];
        let bvid = if captured.starts_with("BV") {
            captured.to_string()
        } else {
            format!("BV{captured}")
        };
        return Some(VideoReference {
            provider: VideoProvider::Bilibili,
            source_url: trimmed.to_string(),
            embed_url: format!("//player.bilibili.com/player.html?bvid={bvid}&page=1"),
        });
    }

    if let Some(caps) = VIMEO_RE.captures(trimmed) {
        let video_id = &caps[1];
        return Some(VideoReference {
            provider: VideoProvider::Vimeo,
            source_url: trimmed.to_string(),
            embed_url: format!("https://player.vimeo.com/video/{video_id}"),
        });
    }

    None
}

/// Splits a post body into alternating text and video spans.
///
/// Scans left to right for `http(s)://` links. Each recognized video link
/// becomes a [`TextSpan::Video`]; unrecognized links and everything between
/// links become [`TextSpan::Text`]. The result is never empty: input without
/// links (including the empty string) yields a single text span equal to the
/// whole input.
///
/// This function is pure and never fails; every input is a valid body.
#[must_use]
pub fn segment(text: &str) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut last_end = 0;

    for m in URL_RE.find_iter(text) {
        if m.start() > last_end {
            spans.push(TextSpan::Text {
                value: text[last_end..m.start()].to_string(),
            });
        }

        let url = m.as_str();
        match recognize(url) {
            Some(reference) => spans.push(TextSpan::Video {
                reference,
                original_text: url.to_string(),
            }),
            // Plain links are left for the rendering layer's link formatting.
            None => spans.push(TextSpan::Text {
                value: url.to_string(),
            }),
        }

        last_end = m.end();
    }

    if last_end < text.len() {
        spans.push(TextSpan::Text {
            value: text[last_end..].to_string(),
        });
    }

    // No links at all: the whole input is one text span, so the sequence is
    // never empty even for empty input.
    if spans.is_empty() {
        spans.push(TextSpan::Text {
            value: text.to_string(),
        });
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    // recognize: YouTube

    #[test]
    fn recognize_youtube_watch_url() {
        let r = recognize("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(r.provider, VideoProvider::Youtube);
        assert_eq!(r.embed_url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
        assert_eq!(r.source_url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn recognize_youtube_short_link_matches_watch_url() {
        let short = recognize("https://youtu.be/dQw4w9WgXcQ").unwrap();
        let long = recognize("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
        assert_eq!(short.embed_url, long.embed_url);
    }

    #[test]
    fn recognize_youtube_embed_url() {
        let r = recognize("https://www.youtube.com/embed/dQw4w9WgXcQ").unwrap();
        assert_eq!(r.embed_url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
    }

    #[test]
    fn recognize_youtube_rejects_short_id() {
        // Ids are exactly 11 characters; a 10-character id must not match.
        assert!(recognize("https://youtu.be/dQw4w9WgXc").is_none());
    }

    #[test]
    fn recognize_trims_whitespace() {
        let r = recognize("  https://youtu.be/dQw4w9WgXcQ\n").unwrap();
        assert_eq!(r.source_url, "https://youtu.be/dQw4w9WgXcQ");
    }

    // recognize: Bilibili

    #[test]
    fn recognize_bilibili_video_page() {
        let r = recognize("https://www.bilibili.com/video/BV1xx411c7mD").unwrap();
        assert_eq!(r.provider, VideoProvider::Bilibili);
        assert_eq!(
            r.embed_url,
            "//player.bilibili.com/player.html?bvid=BV1xx411c7mD&page=1"
        );
    }

    #[test]
    fn recognize_bilibili_short_link_gains_bv_prefix() {
        let r = recognize("https://b23.tv/ABC123").unwrap();
        assert!(r.embed_url.contains("bvid=BVABC123"));
    }

    #[test]
    fn recognize_bilibili_existing_prefix_not_doubled() {
        let r = recognize("https://b23.tv/BV1xx411c7mD").unwrap();
        assert!(r.embed_url.contains("bvid=BV1xx411c7mD"));
        assert!(!r.embed_url.contains("BVBV"));
    }

    #[test]
    fn recognize_bilibili_player_url() {
        let r = recognize("//player.bilibili.com/player.html?aid=170001&bvid=BV1xx411c7mD").unwrap();
        assert_eq!(r.provider, VideoProvider::Bilibili);
        assert!(r.embed_url.contains("bvid=BV1xx411c7mD"));
    }

    // recognize: Vimeo

    #[test]
    fn recognize_vimeo_numeric_id() {
        let r = recognize("https://vimeo.com/12345").unwrap();
        assert_eq!(r.provider, VideoProvider::Vimeo);
        assert_eq!(r.embed_url, "https://player.vimeo.com/video/12345");
    }

    #[test]
    fn recognize_vimeo_requires_digits() {
        assert!(recognize("https://vimeo.com/about").is_none());
    }

    // recognize: no match

    #[test]
    fn recognize_unknown_host_returns_none() {
        assert!(recognize("https://example.com/not-a-video").is_none());
    }

    #[test]
    fn recognize_empty_string_returns_none() {
        assert!(recognize("").is_none());
    }

    #[test]
    fn recognize_non_url_returns_none() {
        assert!(recognize("just some words").is_none());
    }

    // segment

    #[test]
    fn segment_plain_text_is_single_span() {
        let spans = segment("no links here");
        assert_eq!(
            spans,
            vec![TextSpan::Text {
                value: "no links here".to_string()
            }]
        );
    }

    #[test]
    fn segment_empty_input_yields_one_empty_span() {
        let spans = segment("");
        assert_eq!(
            spans,
            vec![TextSpan::Text {
                value: String::new()
            }]
        );
    }

    #[test]
    fn segment_video_link_between_text() {
        let spans = segment("watch this https://youtu.be/dQw4w9WgXcQ it's great");
        assert_eq!(spans.len(), 3);
        assert_eq!(
            spans[0],
            TextSpan::Text {
                value: "watch this ".to_string()
            }
        );
        match &spans[1] {
            TextSpan::Video {
                reference,
                original_text,
            } => {
                assert_eq!(reference.provider, VideoProvider::Youtube);
                assert_eq!(original_text, "https://youtu.be/dQw4w9WgXcQ");
            }
            other => panic!("expected video span, got {other:?}"),
        }
        assert_eq!(
            spans[2],
            TextSpan::Text {
                value: " it's great".to_string()
            }
        );
    }

    #[test]
    fn segment_unrecognized_link_stays_text() {
        let spans = segment("see https://example.com/page for details");
        assert_eq!(spans.len(), 3);
        assert_eq!(
            spans[1],
            TextSpan::Text {
                value: "https://example.com/page".to_string()
            }
        );
    }

    #[test]
    fn segment_link_at_end_has_no_trailing_span() {
        let spans = segment("ending with https://vimeo.com/12345");
        assert_eq!(spans.len(), 2);
        assert!(matches!(spans[1], TextSpan::Video { .. }));
    }

    #[test]
    fn segment_link_at_start_has_no_leading_span() {
        let spans = segment("https://vimeo.com/12345 then text");
        assert_eq!(spans.len(), 2);
        assert!(matches!(spans[0], TextSpan::Video { .. }));
    }

    #[test]
    fn segment_multiple_links_alternate() {
        let spans = segment("a https://vimeo.com/1 b https://example.com/x c");
        assert_eq!(spans.len(), 5);
        assert!(matches!(spans[1], TextSpan::Video { .. }));
        assert!(matches!(spans[3], TextSpan::Text { .. }));
    }

    #[test]
    fn segment_adjacent_links_no_empty_text_span() {
        let spans = segment("https://vimeo.com/1 https://vimeo.com/2");
        // video, single-space text, video
        assert_eq!(spans.len(), 3);
        assert_eq!(
            spans[1],
            TextSpan::Text {
                value: " ".to_string()
            }
        );
    }

    #[test]
    fn segment_reconstructs_input_exactly() {
        let inputs = [
            "",
            "plain text only",
            "https://youtu.be/dQw4w9WgXcQ",
            "pre https://b23.tv/ABC123 mid https://example.com/x post",
            "trailing period sticks https://vimeo.com/12345.",
            "unicode 日本語 https://youtu.be/dQw4w9WgXcQ 中文",
        ];
        for input in inputs {
            let rebuilt: String = segment(input)
                .iter()
                .map(TextSpan::original_text)
                .collect();
            assert_eq!(rebuilt, input, "reconstruction failed for {input:?}");
        }
    }

    #[test]
    fn segment_trailing_punctuation_sticks_to_url() {
        // Known over-match: the generic URL pattern swallows the period.
        let spans = segment("see https://example.com/page.");
        assert_eq!(
            spans[1],
            TextSpan::Text {
                value: "https://example.com/page.".to_string()
            }
        );
    }
}
