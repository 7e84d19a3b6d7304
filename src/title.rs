//! Title normalization.
//!
//! Reduces a release title to the base title shared by all of its versions:
//! `"Euphoria (Radio Edit)"`, `"Euphoria - Extended Mix"` and
//! `"Euphoria [2021 Remaster]"` all become `"euphoria"`.

use std::sync::LazyLock;

use regex::Regex;

/// Innermost `(...)` or `[...]` group, applied until nothing is left.
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:\([^()]*\)|\[[^\[\]]*\])").expect("bracket pattern is valid")
});

/// A dash followed by a version word cuts off the rest: "- Extended Mix", "– Radio Edit".
static VERSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s+[-–—]\s*(?:extended|radio|club|original|vocal|instrumental|acoustic|remix|mix|edit|version|dub)\b.*$",
    )
    .expect("version suffix pattern is valid")
});

/// A dash followed by a remixer credit: "- Armin van Buuren Remix".
static CREDITED_MIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+[-–—]\s+[^-–—]*?\b(?:remix|mix|edit|dub|rework|bootleg)\s*$")
        .expect("credited mix pattern is valid")
});

/// Version markers removed wherever they stand, along with a trailing
/// "mix", "edit" or "version" ("Extended Mix", "Acoustic Version").
static VERSION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:remix|extended|radio\s+edit|club\s+mix|original\s+mix|vocal\s+mix|instrumental|acoustic)(?:\s+(?:mix|edit|version))?\b",
    )
    .expect("version marker pattern is valid")
});

/// Connectors left dangling at either end once markers are gone.
const DANGLING: &[char] = &[
    '-', '–', '—', ':', '/', '|', '~', ',', ';', '+', '&', '(', ')', '[', ']',
];

/// Connectors only separated by whitespace, as in "Love & & Peace".
static CONNECTOR_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([-–—:/|~,;+&])(?:\s+[-–—:/|~,;+&])+").expect("connector run pattern is valid")
});

/// Content of the first bracket group of a title made only of brackets.
static LEADING_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\(([^()]*)\)|\[([^\[\]]*)\])").expect("leading group pattern is valid")
});

/// Returns the lowercase base title of a raw title.
///
/// When the version markers are all there is ("Instrumental - Extended Mix"),
/// the title before marker removal is used instead. A title made only of
/// bracket groups ("(Intro) [Remastered]") is reduced to its first group.
pub fn normalize_title(title: &str) -> String {
    let stripped = strip_brackets(title);
    let source = if stripped.trim().is_empty() {
        LEADING_GROUP
            .captures(title)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|inner| strip_brackets(inner.as_str()))
            .unwrap_or(stripped)
    } else {
        stripped
    };

    let unversioned = VERSION_SUFFIX.replace(&source, "");
    let unversioned = CREDITED_MIX.replace(&unversioned, "");
    let base = clean_up(&VERSION_MARKER.replace_all(&unversioned, " "));
    if !base.is_empty() {
        return base;
    }

    let base = clean_up(&unversioned);
    if !base.is_empty() {
        return base;
    }
    collapse_whitespace(&title.to_lowercase())
}

/// Removes `(...)` and `[...]` groups, innermost first.
fn strip_brackets(title: &str) -> String {
    let mut base = title.to_string();
    loop {
        let stripped = BRACKETED.replace_all(&base, "");
        if stripped == base {
            return base;
        }
        base = stripped.into_owned();
    }
}

/// Lowercases, merges connector runs and trims dangling connectors.
fn clean_up(s: &str) -> String {
    let s = s.to_lowercase();
    let s = CONNECTOR_RUN.replace_all(&s, "$1");
    let s = s.trim_matches(|c: char| c.is_whitespace() || DANGLING.contains(&c));
    collapse_whitespace(s)
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
