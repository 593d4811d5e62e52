//! Video ID extraction from free text.

use regex::Regex;
use std::sync::OnceLock;

fn video_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Only URL forms: a bare 11-character word is too easy to confuse with prose.
        Regex::new(
            r"(?x)
            (?:https?://)?
            (?:www\.|m\.)?
            (?:
                youtube\.com/(?:watch\?(?:[^\s]*?&)?v=|embed/|v/|shorts/|live/)
                |
                youtu\.be/
            )
            ([a-zA-Z0-9_-]{11})
            ",
        )
        .expect("Invalid regex")
    })
}

/// Extract every distinct YouTube video ID referenced by URL in `text`, in order.
pub fn extract_video_ids(text: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for caps in video_url_regex().captures_iter(text) {
        if let Some(id) = caps.get(1) {
            let id = id.as_str().to_string();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}
