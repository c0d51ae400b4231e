//! Utility functions and helpers.

pub mod clock;
pub mod http;
pub mod url;

use unicode_segmentation::UnicodeSegmentation;

/// Shorten text to at most `max` grapheme clusters, appending `…` when cut.
pub fn truncate_graphemes(text: &str, max: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
