//! Cyrillic to ASCII transliteration for URL slugs.
//!
//! Input is lowercased first, then rewritten through [`TRANSLITERATION_TABLE`]
//! entry by entry, so `"Привет мир"` becomes `privet-mir`. Anything left
//! outside `[a-zA-Z0-9-]` is turned into a hyphen, hyphen runs collapse and
//! the result is trimmed.

/// Ordered substitution table. Digraphs must stay ahead of the single letters
/// they start with, otherwise `и` would consume the first half of `ий`.
/// Only lowercase keys are listed and there is no `q` to `Q` rule, so output
/// stays lowercase where the older PHP table would have turned `quiz` into `Quiz`.
pub const TRANSLITERATION_TABLE: &[(&str, &str)] = &[
    // digraphs
    ("ий", "iy"),
    ("ый", "yi"),
    ("ье", "ye"),
    ("ьё", "yo"),
    // letters
    ("а", "a"),
    ("б", "b"),
    ("в", "v"),
    ("г", "g"),
    ("д", "d"),
    ("е", "e"),
    ("ё", "e"),
    ("ж", "zh"),
    ("з", "z"),
    ("и", "i"),
    ("й", "y"),
    ("к", "k"),
    ("л", "l"),
    ("м", "m"),
    ("н", "n"),
    ("о", "o"),
    ("п", "p"),
    ("р", "r"),
    ("с", "s"),
    ("т", "t"),
    ("у", "u"),
    ("ф", "f"),
    ("х", "h"),
    ("ц", "c"),
    ("ч", "ch"),
    ("ш", "sh"),
    ("щ", "sch"),
    ("ь", ""),
    ("ы", "y"),
    ("ъ", ""),
    ("э", "e"),
    ("ю", "yu"),
    ("я", "ya"),
    (" ", "-"),
];

/// Convert human-readable text into a slug candidate.
///
/// Total over all inputs: text with nothing transliterable yields an empty
/// string rather than an error.
pub fn transliterate(text: &str) -> String {
    let mut output = text.to_lowercase();

    for &(from, to) in TRANSLITERATION_TABLE {
        if output.contains(from) {
            output = output.replace(from, to);
        }
    }

    sanitize(&output)
}

/// Returns `true` when `value` has the exact shape [`transliterate`] emits.
pub fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

fn sanitize(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        let ch = if ch.is_ascii_alphanumeric() { ch } else { '-' };
        if ch == '-' && (output.is_empty() || output.ends_with('-')) {
            continue;
        }
        output.push(ch);
    }

    if output.ends_with('-') {
        output.pop();
    }

    output
}
