//! Confluence wiki markup builders for code macros.

/// Titled, line-numbered code macro preceded by an `h3.` heading.
///
/// Used for path-labeled blocks; `name` is the file's base name.
#[must_use]
pub fn labeled_code_macro(name: &str, language: &str, body: &str) -> String {
    format!(
        "h3. {name}\n\
         {{code:title={name}|language={language}|linenumbers=true|collapse=false}}\n\
         {body}\n\
         {{code}}"
    )
}

/// Plain code macro carrying only the language.
#[must_use]
pub fn code_macro(language: &str, body: &str) -> String {
    format!("{{code:language={language}}}\n{body}\n{{code}}")
}
