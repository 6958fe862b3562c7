use std::sync::LazyLock;

use {botflow_channels::MediaKind, regex::Regex};

/// Markdown media marker: `![caption](url)`. Bare `[caption](url)` links
/// are plain prose and stay untouched.
#[allow(clippy::expect_used)]
static MEDIA_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").expect("media marker regex is valid")
});

/// One ordered piece of a segmented reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Media {
        kind: MediaKind,
        url: String,
        caption: String,
    },
}

/// Classify a URL as sendable media by its path extension.
pub fn classify_media_url(raw: &str) -> Option<MediaKind> {
    let parsed = url::Url::parse(raw).ok()?;
    let extension = parsed.path().rsplit_once('.')?.1.to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "webp" => Some(MediaKind::Image),
        "mp3" | "ogg" | "opus" | "wav" | "m4a" | "aac" => Some(MediaKind::Audio),
        "mp4" | "mov" | "webm" | "mkv" => Some(MediaKind::Video),
        "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "zip" | "csv" | "txt" => {
            Some(MediaKind::Document)
        },
        _ => None,
    }
}

/// Split a reply into ordered text and media segments.
///
/// Media markers whose URL classifies as sendable media become `Media`
/// segments; markers with an unclassifiable URL stay in the prose verbatim.
/// Concatenating the text segments in order reconstructs the non-media
/// prose (modulo boundary whitespace, which is trimmed per segment).
pub fn segment(reply: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut prose = String::new();
    let mut cursor = 0;

    for capture in MEDIA_MARKER.captures_iter(reply) {
        let marker = capture.get(0).map(|m| (m.start(), m.end()));
        let Some((start, end)) = marker else { continue };
        let caption = capture.get(1).map(|m| m.as_str()).unwrap_or_default();
        let url = capture.get(2).map(|m| m.as_str()).unwrap_or_default();

        match classify_media_url(url) {
            Some(kind) => {
                prose.push_str(&reply[cursor..start]);
                flush_prose(&mut segments, &mut prose);
                segments.push(Segment::Media {
                    kind,
                    url: url.to_string(),
                    caption: caption.to_string(),
                });
            },
            // Not sendable media; the marker is just a link in prose.
            None => prose.push_str(&reply[cursor..end]),
        }
        cursor = end;
    }

    prose.push_str(&reply[cursor..]);
    flush_prose(&mut segments, &mut prose);
    segments
}

fn flush_prose(segments: &mut Vec<Segment>, prose: &mut String) {
    let trimmed = prose.trim();
    if !trimmed.is_empty() {
        segments.push(Segment::Text(trimmed.to_string()));
    }
    prose.clear();
}
