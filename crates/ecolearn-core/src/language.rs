// SPDX-License-Identifier: Apache-2.0

use ecolearn_model::Language;

pub const DEFAULT_LANGUAGE: Language = Language::En;

/// Shared language policy for every language-sensitive response.
///
/// A non-blank explicit code wins outright and is matched by its primary
/// subtag, so `hi-IN` means Hindi. An unsupported code yields the default
/// without consulting the header. Otherwise the first tag of the
/// `accept-language` header is matched the same way, ignoring `;q=`
/// parameters.
#[must_use]
pub fn resolve_language(explicit: Option<&str>, accept_language: Option<&str>) -> Language {
    if let Some(code) = explicit.map(str::trim).filter(|code| !code.is_empty()) {
        return Language::from_tag(code).unwrap_or(DEFAULT_LANGUAGE);
    }
    accept_language
        .and_then(|header| header.split(',').next())
        .and_then(|tag| tag.split(';').next())
        .and_then(Language::from_tag)
        .unwrap_or(DEFAULT_LANGUAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_code_wins_over_header() {
        assert_eq!(resolve_language(Some("hi"), Some("en-US")), Language::Hi);
        assert_eq!(resolve_language(Some("en"), Some("hi-IN")), Language::En);
    }

    #[test]
    fn explicit_region_tag_uses_primary_subtag() {
        assert_eq!(resolve_language(Some("hi-IN"), Some("en")), Language::Hi);
        assert_eq!(resolve_language(Some("EN-gb"), Some("hi")), Language::En);
    }

    #[test]
    fn unsupported_explicit_code_ignores_header() {
        assert_eq!(resolve_language(Some("fr"), Some("hi-IN")), Language::En);
        assert_eq!(resolve_language(Some("fr-FR"), Some("hi")), Language::En);
    }

    #[test]
    fn header_first_tag_is_used() {
        assert_eq!(resolve_language(None, Some("hi-IN,en;q=0.9")), Language::Hi);
        assert_eq!(resolve_language(None, Some("hi;q=0.8,en")), Language::Hi);
        assert_eq!(resolve_language(None, Some("fr-FR,hi;q=0.9")), Language::En);
        assert_eq!(resolve_language(Some("  "), Some("hi")), Language::Hi);
    }

    #[test]
    fn nothing_given_defaults_to_english() {
        assert_eq!(resolve_language(None, None), Language::En);
        assert_eq!(resolve_language(None, Some("")), Language::En);
    }
}
