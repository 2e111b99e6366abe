use lazy_regex::{Lazy, Regex, lazy_regex};

static SEPARATOR_RUN: Lazy<Regex> = lazy_regex!(r"[^a-z0-9]+");

/// Derive a URL slug from a title.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a
/// single `-` and trims dashes from both ends.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let dashed = SEPARATOR_RUN.replace_all(&lower, "-");
    dashed.trim_matches('-').to_string()
}
