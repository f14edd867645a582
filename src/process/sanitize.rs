//! Terminal control sequence stripping.
//!
//! Agent CLIs emit colored, cursor-moving output meant for a terminal. We keep
//! only the text: CSI sequences (`ESC [ ... final`), OSC sequences
//! (`ESC ] ... BEL`), two-byte escapes, and backspace overprints (`x\b`).

use regex::Regex;
use std::sync::LazyLock;

static ANSI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07]*\x07|\x1b[@-Z\\\]^_]")
        .expect("Invalid ANSI escape regex")
});

static OVERPRINT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".\x08").expect("Invalid overprint regex"));

/// Strip ANSI escapes and backspace overprints from `text`.
pub fn clean_output(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_ansi = ANSI_REGEX.replace_all(text, "");
    OVERPRINT_REGEX.replace_all(&without_ansi, "").into_owned()
}
