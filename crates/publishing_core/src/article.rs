use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static NUMERIC_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static UUID_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid regex")
});
static LANGUAGE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid article id {0:?}: expected a numeric id or a UUID")]
    InvalidArticleId(String),
    #[error("article title is required")]
    EmptyTitle,
    #[error("article content is required")]
    EmptyContent,
    #[error("at least one target language is required")]
    NoTargetLanguages,
    #[error("invalid language code {0:?}")]
    InvalidLanguageCode(String),
    #[error("unknown wizard step {0:?}")]
    UnknownStep(String),
    #[error("not a publishing route: {0}")]
    InvalidRoute(String),
}

/// Identifier of an article in the backend: either a decimal integer or a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArticleId(String);

impl ArticleId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if NUMERIC_ID.is_match(trimmed) || UUID_ID.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidArticleId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ArticleId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ArticleId> for String {
    fn from(id: ArticleId) -> Self {
        id.0
    }
}

/// A target language such as `es` or `pt-BR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if LANGUAGE_CODE.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidLanguageCode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// English display name for the languages the site publishes in.
    pub fn display_name(&self) -> &str {
        match self.0.as_str() {
            "en" => "English",
            "es" => "Spanish",
            "fr" => "French",
            "de" => "German",
            "it" => "Italian",
            "pt" | "pt-BR" | "pt-PT" => "Portuguese",
            "nl" => "Dutch",
            "ar" => "Arabic",
            "tr" => "Turkish",
            other => other,
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

/// Parses and de-duplicates target languages, keeping first occurrences in order.
pub fn parse_target_languages<S: AsRef<str>>(
    raw: &[S],
) -> Result<Vec<LanguageCode>, ValidationError> {
    let mut languages: Vec<LanguageCode> = Vec::with_capacity(raw.len());
    for item in raw {
        let code = LanguageCode::parse(item.as_ref())?;
        if !languages.contains(&code) {
            languages.push(code);
        }
    }
    if languages.is_empty() {
        return Err(ValidationError::NoTargetLanguages);
    }
    Ok(languages)
}

/// Title and body of the article being translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Rejects blank fields and returns a copy with a sanitized title.
    pub fn validated(&self) -> Result<ArticleDraft, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        Ok(ArticleDraft {
            title: sanitize_title(&self.title),
            content: self.content.clone(),
        })
    }
}

/// Replaces typographic dashes and quotes with their ASCII forms.
///
/// The output contains none of the replaced characters, so applying it twice
/// gives the same string.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
            | '\u{2212}' => '-',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => '"',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_uuid_ids_are_accepted() {
        assert!(ArticleId::parse("42").is_ok());
        assert!(ArticleId::parse("3f2b8c1e-9a4d-4e21-b7c3-0d5e6f7a8b9c").is_ok());
        assert!(ArticleId::parse("3F2B8C1E-9A4D-4E21-B7C3-0D5E6F7A8B9C").is_ok());
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for raw in ["", "abc", "42a", "-1", "4 2", "3f2b8c1e-9a4d-4e21-b7c3", "undefined"] {
            assert_eq!(
                ArticleId::parse(raw),
                Err(ValidationError::InvalidArticleId(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn sanitize_replaces_dashes_and_quotes() {
        assert_eq!(sanitize_title("Player – Club"), "Player - Club");
        assert_eq!(sanitize_title("Deal — done"), "Deal - done");
        assert_eq!(sanitize_title("“Here we go” says Fabrizio’s source"), "\"Here we go\" says Fabrizio's source");
        assert_eq!(sanitize_title("Fee \u{2212}10%"), "Fee -10%");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let samples = ["Player – Club", "“Quoted” — ‘single’", "plain title", ""];
        for sample in samples {
            let once = sanitize_title(sample);
            assert_eq!(sanitize_title(&once), once);
        }
    }

    #[test]
    fn languages_are_deduplicated_in_order() {
        let langs = parse_target_languages(&["es", "fr", "es", "de"]).unwrap();
        let codes: Vec<_> = langs.iter().map(LanguageCode::as_str).collect();
        assert_eq!(codes, vec!["es", "fr", "de"]);
    }

    #[test]
    fn empty_language_list_is_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(
            parse_target_languages(&empty),
            Err(ValidationError::NoTargetLanguages)
        );
        assert!(matches!(
            parse_target_languages(&["spanish"]),
            Err(ValidationError::InvalidLanguageCode(_))
        ));
    }
}
