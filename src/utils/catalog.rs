use crate::error::{Result, UubuError};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Display;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const LANGUAGE_OVERRIDE_VAR: &str = "UUBU_LANG";

const LOCALE_VARS: &[&str] = &["LANG", "LANGUAGE", "LC_ALL", "LC_MESSAGES"];

/// Catalogs compiled into the binary, keyed by language code.
const EMBEDDED_LOCALES: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("fr", include_str!("../../locales/fr.json")),
];

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct Messages(HashMap<String, String>);

/// Immutable set of display strings for one language.
#[derive(Debug, Clone)]
pub struct Catalog {
    language: String,
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Load the catalog for `language`, falling back to English when it is
    /// missing or cannot be parsed. Only a broken English catalog is an error.
    pub fn load(language: &str) -> Result<Self> {
        Self::load_from(EMBEDDED_LOCALES, language)
    }

    fn load_from(locales: &[(&str, &str)], language: &str) -> Result<Self> {
        match Self::parse(locales, language) {
            Ok(catalog) => Ok(catalog),
            Err(err) if language != DEFAULT_LANGUAGE => {
                tracing::warn!("falling back to '{DEFAULT_LANGUAGE}' catalog: {err}");
                Self::parse(locales, DEFAULT_LANGUAGE)
            }
            Err(err) => Err(err),
        }
    }

    fn parse(locales: &[(&str, &str)], language: &str) -> Result<Self> {
        let source = locales
            .iter()
            .find(|(code, _)| *code == language)
            .map(|(_, source)| *source)
            .ok_or_else(|| UubuError::Catalog(format!("no catalog for language '{language}'")))?;

        let Messages(messages) = serde_json::from_str(source).map_err(|e| {
            UubuError::Catalog(format!("invalid catalog for language '{language}': {e}"))
        })?;

        Ok(Self {
            language: language.to_string(),
            messages,
        })
    }

    #[cfg(test)]
    pub fn from_pairs(language: &str, pairs: &[(&str, &str)]) -> Self {
        Self {
            language: language.to_string(),
            messages: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Look up a message; unknown keys render as a visible placeholder.
    pub fn message(&self, key: &str) -> String {
        match self.messages.get(key) {
            Some(template) => template.clone(),
            None => format!("[MISSING: {key}]"),
        }
    }

    /// Look up a message and substitute each `{}` with the next argument.
    pub fn format(&self, key: &str, args: &[&dyn Display]) -> String {
        let template = self.message(key);
        let mut rendered = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut rest = template.as_str();

        while let Some(pos) = rest.find("{}") {
            rendered.push_str(&rest[..pos]);
            match args.next() {
                Some(arg) => rendered.push_str(&arg.to_string()),
                None => rendered.push_str("{}"),
            }
            rest = &rest[pos + 2..];
        }
        rendered.push_str(rest);
        rendered
    }

    /// Normalised affirmative answers accepted at prompts.
    pub fn yes_answers(&self) -> Vec<String> {
        self.message("yes_answers")
            .split(',')
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .collect()
    }
}

/// Pick the display language from the environment.
///
/// `UUBU_LANG` wins unconditionally; otherwise the first locale variable whose
/// two-letter prefix matches an embedded catalog is used.
pub fn detect_language() -> String {
    detect_language_with(|name| std::env::var(name).ok())
}

fn detect_language_with<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(lang) = lookup(LANGUAGE_OVERRIDE_VAR).filter(|v| !v.is_empty()) {
        return lang;
    }

    for var in LOCALE_VARS {
        let Some(value) = lookup(var) else {
            continue;
        };
        let Some(prefix) = value.get(..2) else {
            continue;
        };
        let code = prefix.to_lowercase();
        if EMBEDDED_LOCALES.iter().any(|(known, _)| *known == code) {
            tracing::debug!("language '{code}' selected from {var}");
            return code;
        }
    }

    DEFAULT_LANGUAGE.to_string()
}
