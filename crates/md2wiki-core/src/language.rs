//! Highlighting language resolution for code macros.
//!
//! Maps file extensions to the language names understood by the Confluence
//! `{code}` macro. The built-in table is fixed; callers can layer additional
//! mappings on top through [`LanguageResolver::with_language`].

use std::collections::HashMap;
use std::path::Path;

/// Language used when neither the extension nor the fence names one.
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "bash";

/// Look up the built-in language for a normalized extension.
///
/// The extension must already be lower-cased and have no leading dot.
#[must_use]
pub fn builtin_language(extension: &str) -> Option<&'static str> {
    match extension {
        "sh" => Some("bash"),
        "yaml" | "yml" => Some("yaml"),
        "json" => Some("json"),
        "ini" | "conf" => Some("ini"),
        "py" => Some("python"),
        "js" => Some("javascript"),
        "ts" => Some("typescript"),
        "go" => Some("go"),
        "sql" => Some("sql"),
        "html" => Some("html"),
        "css" => Some("css"),
        "md" => Some("markdown"),
        _ => None,
    }
}

/// Normalize an extension key: strip one leading dot and lower-case it.
#[must_use]
pub fn normalize_extension(extension: &str) -> String {
    extension
        .strip_prefix('.')
        .unwrap_or(extension)
        .to_lowercase()
}

/// Extract the lower-cased extension of a file name.
///
/// Dot files such as `.bashrc` have no extension.
#[must_use]
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// Resolve a language from the built-in table only.
///
/// # Examples
///
/// ```
/// use md2wiki_core::detect_language;
///
/// assert_eq!(detect_language("report.sql", "bash"), "sql");
/// assert_eq!(detect_language("report.xyz", "bash"), "bash");
/// ```
#[must_use]
pub fn detect_language<'a>(filename: &str, fallback: &'a str) -> &'a str {
    file_extension(filename)
        .and_then(|ext| builtin_language(&ext))
        .unwrap_or(fallback)
}

/// Resolves code macro languages with a single, uniform precedence rule.
///
/// By default the extension-derived language wins, then the fence's declared
/// language, then the global fallback. With
/// [`prefer_declared`](Self::prefer_declared) the declared language is
/// consulted before the extension.
#[derive(Debug, Clone)]
pub struct LanguageResolver {
    /// Extra mappings keyed by normalized extension, checked before the built-ins.
    overrides: HashMap<String, String>,
    fallback: String,
    prefer_declared: bool,
}

impl Default for LanguageResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_LANGUAGE)
    }
}

impl LanguageResolver {
    /// Create a resolver with the given fallback language.
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            overrides: HashMap::new(),
            fallback: fallback.into(),
            prefer_declared: false,
        }
    }

    /// Add or replace the mapping for one extension.
    #[must_use]
    pub fn with_language(mut self, extension: &str, language: impl Into<String>) -> Self {
        self.overrides
            .insert(normalize_extension(extension), language.into());
        self
    }

    /// Let a non-empty fence language take precedence over the extension.
    #[must_use]
    pub fn prefer_declared(mut self, prefer: bool) -> Self {
        self.prefer_declared = prefer;
        self
    }

    /// Fallback language used when nothing else matches.
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Language mapped to the extension of `filename`, if any.
    #[must_use]
    pub fn for_filename(&self, filename: &str) -> Option<&str> {
        let ext = file_extension(filename)?;
        self.overrides
            .get(&ext)
            .map(String::as_str)
            .or_else(|| builtin_language(&ext))
    }

    /// Resolve the language for a code block.
    ///
    /// `declared` is the language token from the opening fence; an empty
    /// token counts as absent.
    #[must_use]
    pub fn resolve<'a>(&'a self, filename: &str, declared: Option<&'a str>) -> &'a str {
        let declared = declared.filter(|lang| !lang.is_empty());
        let from_extension = self.for_filename(filename);

        let resolved = if self.prefer_declared {
            declared.or(from_extension)
        } else {
            from_extension.or(declared)
        };
        resolved.unwrap_or(&self.fallback)
    }
}
