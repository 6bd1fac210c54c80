//! Markdown to Confluence wiki markup transformer.
//!
//! Converts Markdown text to Confluence wiki markup by pattern substitution:
//! headings, emphasis, inline code, links, images, blockquotes, lists and
//! fenced code blocks.
//!
//! A fenced block directly preceded by a file path line gets a titled,
//! line-numbered code macro:
//!
//! ````text
//! /src/app.py:
//! ```python
//! print("hi")
//! ```
//! ````
//!
//! becomes
//!
//! ```text
//! h3. app.py
//! {code:title=app.py|language=python|linenumbers=true|collapse=false}
//! print("hi")
//! {code}
//! ```
//!
//! # Example
//!
//! ```
//! use md2wiki_core::convert;
//!
//! assert_eq!(convert("[Docs](https://example.com)"), "[Docs|https://example.com]");
//! ```

mod converter;
mod language;
mod rules;
mod segment;
mod wiki;

pub use converter::{
    Conversion, Converter, ConverterOptions, DEFAULT_SEGMENT_SEPARATOR,
    DEFAULT_UNLABELED_LANGUAGE, convert,
};
pub use language::{
    DEFAULT_FALLBACK_LANGUAGE, LanguageResolver, builtin_language, detect_language,
    file_extension, normalize_extension,
};
pub use rules::{apply_rules, apply_rules_mid_line};
pub use segment::{CodeSegment, Segment, split_fenced_blocks, split_labeled_blocks};
pub use wiki::{code_macro, labeled_code_macro};
