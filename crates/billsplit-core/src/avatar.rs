//! # Avatar Assignment
//!
//! Picks an illustration style for a participant from their first name.
//! Purely cosmetic: nothing monetary depends on it.
//!
//! ## Heuristic
//! ```text
//! first word → lowercase → strip diacritics
//!      │
//!      ├── in FEMININE_NAMES ──────────────────────────────► Feminine
//!      │
//!      ├── ends with "a" | "ah" | "elly"
//!      │        └── not in MASCULINE_NAMES ────────────────► Feminine
//!      │
//!      └── otherwise ──────────────────────────────────────► Masculine
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::text::strip_diacritics;

/// Names that do not follow the suffix rule but are feminine.
const FEMININE_NAMES: &[&str] = &[
    "alice", "beatriz", "ines", "liz", "kelly", "raquel", "ruth", "simone", "ester", "miriam",
    "carmen", "rachel", "isis", "thais", "lourdes", "dolores", "nicole", "carol", "caroline",
    "michele", "maite", "sophie", "gabi", "gabriele", "laryssa", "ingrid",
];

/// Names that match a feminine suffix but are masculine.
const MASCULINE_NAMES: &[&str] = &[
    "luca", "lucas", "jonas", "nicolas", "mattia", "elias", "tobias", "zacarias", "joshua", "jean",
    "ryan", "yan", "caua", "kaique", "felipe", "andre", "davi", "levi", "yuri", "ari", "alex",
    "max", "tom", "noah", "arthur", "pedro", "theo",
];

const FEMININE_SUFFIXES: &[&str] = &["a", "ah", "elly"];

/// Characters `encodeURIComponent` leaves untouched besides alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const DICEBEAR_BASE: &str = "https://api.dicebear.com/7.x";

/// Illustration family for a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum AvatarStyle {
    Feminine,
    Masculine,
}

impl AvatarStyle {
    fn collection(&self) -> &'static str {
        match self {
            AvatarStyle::Feminine => "lorelei",
            AvatarStyle::Masculine => "adventurer",
        }
    }

    fn background(&self) -> &'static str {
        match self {
            AvatarStyle::Feminine => "b6e3f4,c0aede,ffdfbf",
            AvatarStyle::Masculine => "b6e3f4,d1d4f9,c0aede",
        }
    }
}

/// Classifies a display name.
///
/// ## Example
/// ```rust
/// use billsplit_core::avatar::{classify_name, AvatarStyle};
///
/// assert_eq!(classify_name("Ana Clara"), AvatarStyle::Feminine);
/// assert_eq!(classify_name("Lucas"), AvatarStyle::Masculine);
/// ```
pub fn classify_name(name: &str) -> AvatarStyle {
    let lowered = name.trim().to_lowercase();
    let first = lowered.split(' ').next().unwrap_or("");
    let clean = strip_diacritics(first);

    if FEMININE_NAMES.contains(&clean.as_str()) {
        return AvatarStyle::Feminine;
    }

    let feminine_ending = FEMININE_SUFFIXES.iter().any(|s| clean.ends_with(s));
    if feminine_ending && !MASCULINE_NAMES.contains(&clean.as_str()) {
        AvatarStyle::Feminine
    } else {
        AvatarStyle::Masculine
    }
}

/// Avatar image reference for a display name.
///
/// The full name (not just the first word) seeds the drawing, so two
/// participants sharing a first name still look different.
pub fn avatar_ref(name: &str) -> String {
    let style = classify_name(name);
    let seed = utf8_percent_encode(name, URI_COMPONENT);
    format!(
        "{}/{}/svg?seed={}&backgroundColor={}&flip=false",
        DICEBEAR_BASE,
        style.collection(),
        seed,
        style.background()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_rule() {
        assert_eq!(classify_name("Maria"), AvatarStyle::Feminine);
        assert_eq!(classify_name("Sarah"), AvatarStyle::Feminine);
        assert_eq!(classify_name("Shelly"), AvatarStyle::Feminine);
        assert_eq!(classify_name("Bruno"), AvatarStyle::Masculine);
    }

    #[test]
    fn test_exception_lists() {
        assert_eq!(classify_name("Beatriz"), AvatarStyle::Feminine);
        assert_eq!(classify_name("Inês"), AvatarStyle::Feminine);
        assert_eq!(classify_name("Luca"), AvatarStyle::Masculine);
        assert_eq!(classify_name("Cauã Reymond"), AvatarStyle::Masculine);
        assert_eq!(classify_name("Joshua"), AvatarStyle::Masculine);
    }

    #[test]
    fn test_uses_first_word_only() {
        assert_eq!(classify_name("  joão   da silva"), AvatarStyle::Masculine);
        assert_eq!(classify_name("Eu"), AvatarStyle::Masculine);
        assert_eq!(classify_name(""), AvatarStyle::Masculine);
    }

    #[test]
    fn test_avatar_ref_encodes_seed() {
        assert_eq!(
            avatar_ref("Ana Clara"),
            "https://api.dicebear.com/7.x/lorelei/svg?seed=Ana%20Clara\
             &backgroundColor=b6e3f4,c0aede,ffdfbf&flip=false"
        );
        let url = avatar_ref("João");
        assert!(url.contains("adventurer/svg?seed=Jo%C3%A3o&"));
    }
}
