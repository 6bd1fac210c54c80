//! Markdown to Confluence wiki markup pipeline.
//!
//! The pipeline runs in three stages:
//!
//! 1. The document is split around path-labeled code blocks. Each one
//!    becomes an `h3.` heading plus a titled code macro.
//! 2. Each remaining text segment is split around plain fenced blocks,
//!    which become untitled code macros in place.
//! 3. The ordered rule chain rewrites what is left.
//!
//! Code bodies never pass through the rule chain.
//!
//! # Example
//!
//! ```
//! use md2wiki_core::Converter;
//!
//! let result = Converter::default().convert("# Title\n\nSome **bold** text.");
//! assert_eq!(result.output, "h1. Title\n\nSome *bold* text.");
//! ```

use std::collections::HashMap;

use crate::language::{DEFAULT_FALLBACK_LANGUAGE, LanguageResolver};
use crate::rules::{apply_rules, apply_rules_mid_line};
use crate::segment::{CodeSegment, Segment, split_fenced_blocks, split_labeled_blocks};
use crate::wiki::{code_macro, labeled_code_macro};

/// Language tag for plain fences without one.
pub const DEFAULT_UNLABELED_LANGUAGE: &str = "none";

/// Separator placed between top-level segments.
pub const DEFAULT_SEGMENT_SEPARATOR: &str = "\n\n";

/// Converter settings.
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    /// Language used when a labeled block's language cannot be determined.
    pub fallback_language: String,
    /// Language written for plain fences without a language token.
    pub unlabeled_language: String,
    /// Whether a fence's declared language beats the file extension.
    pub prefer_declared_language: bool,
    /// Text placed between labeled blocks and surrounding text.
    pub segment_separator: String,
    /// Extra extension to language mappings.
    pub languages: HashMap<String, String>,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            fallback_language: DEFAULT_FALLBACK_LANGUAGE.to_owned(),
            unlabeled_language: DEFAULT_UNLABELED_LANGUAGE.to_owned(),
            prefer_declared_language: false,
            segment_separator: DEFAULT_SEGMENT_SEPARATOR.to_owned(),
            languages: HashMap::new(),
        }
    }
}

/// Result of converting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Confluence wiki markup.
    pub output: String,
    /// Number of path-labeled code blocks converted.
    pub labeled_blocks: usize,
    /// Number of plain fenced code blocks converted.
    pub fenced_blocks: usize,
    /// Number of top-level text segments passed through the rule chain.
    pub text_segments: usize,
}

/// Converts Markdown documents to Confluence wiki markup.
#[derive(Debug, Clone)]
pub struct Converter {
    resolver: LanguageResolver,
    unlabeled_language: String,
    segment_separator: String,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterOptions::default())
    }
}

impl Converter {
    /// Create a converter from options.
    #[must_use]
    pub fn new(options: ConverterOptions) -> Self {
        let resolver = options.languages.iter().fold(
            LanguageResolver::new(options.fallback_language)
                .prefer_declared(options.prefer_declared_language),
            |resolver, (ext, lang)| resolver.with_language(ext, lang.clone()),
        );

        Self {
            resolver,
            unlabeled_language: options.unlabeled_language,
            segment_separator: options.segment_separator,
        }
    }

    /// Language resolver used for labeled blocks.
    #[must_use]
    pub fn resolver(&self) -> &LanguageResolver {
        &self.resolver
    }

    /// Convert a Markdown document.
    #[must_use]
    pub fn convert(&self, markdown: &str) -> Conversion {
        let mut labeled_blocks = 0;
        let mut fenced_blocks = 0;
        let mut text_segments = 0;
        let mut after_code = false;

        let parts: Vec<String> = split_labeled_blocks(markdown)
            .into_iter()
            .map(|segment| match segment {
                Segment::Code(block) => {
                    labeled_blocks += 1;
                    after_code = true;
                    self.render_labeled(&block)
                }
                Segment::Text(text) => {
                    text_segments += 1;
                    let (converted, fenced) = self.convert_text(text, after_code);
                    fenced_blocks += fenced;
                    after_code = false;
                    converted
                }
            })
            .collect();

        tracing::debug!(
            labeled_blocks,
            fenced_blocks,
            text_segments,
            "Converted markdown document"
        );

        Conversion {
            output: parts.join(&self.segment_separator),
            labeled_blocks,
            fenced_blocks,
            text_segments,
        }
    }

    /// Replace plain fenced blocks in `text` with code macros, leaving all
    /// other text untouched.
    ///
    /// Returns the input unchanged when it contains no fenced block.
    #[must_use]
    pub fn convert_fenced_blocks(&self, text: &str) -> String {
        split_fenced_blocks(text)
            .into_iter()
            .map(|segment| match segment {
                Segment::Code(block) => self.render_fenced(&block),
                Segment::Text(text) => text.to_owned(),
            })
            .collect()
    }

    /// Convert fenced blocks in place and run the rule chain on the text
    /// around them. Returns the output and the number of fenced blocks.
    ///
    /// `mid_line` is set when `text` starts right after a closing fence.
    fn convert_text(&self, text: &str, mut mid_line: bool) -> (String, usize) {
        let mut fenced = 0;
        let output = split_fenced_blocks(text)
            .into_iter()
            .map(|segment| match segment {
                Segment::Code(block) => {
                    fenced += 1;
                    mid_line = true;
                    self.render_fenced(&block)
                }
                Segment::Text(text) if mid_line => {
                    mid_line = false;
                    apply_rules_mid_line(text)
                }
                Segment::Text(text) => apply_rules(text),
            })
            .collect();
        (output, fenced)
    }

    fn render_labeled(&self, block: &CodeSegment<'_>) -> String {
        let name = block.file_name().unwrap_or_default();
        let language = self.resolver.resolve(name, block.language);
        tracing::debug!(file = name, language, "Converted labeled code block");
        labeled_code_macro(name, language, block.trimmed_body())
    }

    fn render_fenced(&self, block: &CodeSegment<'_>) -> String {
        let language = block.language.unwrap_or(&self.unlabeled_language);
        tracing::debug!(language, "Converted fenced code block");
        code_macro(language, block.trimmed_body())
    }
}

/// Convert a Markdown document with default options.
#[must_use]
pub fn convert(markdown: &str) -> String {
    Converter::default().convert(markdown).output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_formatting() {
        let output = convert("# Title\n\nSome **bold** and *italic* text with `code`.");
        assert!(output.lines().any(|line| line == "h1. Title"));
        assert!(output.contains("Some *bold* and _italic_ text with {{code}}."));
    }

    #[test]
    fn test_labeled_code_block() {
        let output = convert("/src/app.py:\n```python\nprint(\"hi\")\n```\n");
        assert_eq!(
            output,
            "h3. app.py\n\
             {code:title=app.py|language=python|linenumbers=true|collapse=false}\n\
             print(\"hi\")\n\
             {code}\n\n\n"
        );
    }

    #[test]
    fn test_labeled_block_language_from_extension() {
        let output = convert("/db/report.sql:\n```\nSELECT 1;\n```");
        assert!(output.contains("language=sql"));

        let output = convert("/db/report.xyz:\n```\nSELECT 1;\n```");
        assert!(output.contains("language=bash"));
    }

    #[test]
    fn test_labeled_block_separated_from_text() {
        let input = "# Setup\n/etc/app.conf:\n```\nkey = value\n```\nDone.";
        assert_eq!(
            convert(input),
            "h1. Setup\n\n\n\
             h3. app.conf\n\
             {code:title=app.conf|language=ini|linenumbers=true|collapse=false}\n\
             key = value\n\
             {code}\n\n\n\
             Done."
        );
    }

    #[test]
    fn test_plain_fence_converted_in_place() {
        let input = "Run:\n```\nls -la\n```\nthen:\n```sh\n- not a list\n```";
        assert_eq!(
            convert(input),
            "Run:\n{code:language=none}\nls -la\n{code}\nthen:\n\
             {code:language=sh}\n- not a list\n{code}"
        );
    }

    #[test]
    fn test_empty_fence_stays_separate_from_next_fence() {
        assert_eq!(
            convert("```\n```\ntext **b**\n```js\nx\n```\n"),
            "{code:language=none}\n\n{code}\ntext *b*\n{code:language=js}\nx\n{code}\n"
        );
    }

    #[test]
    fn test_empty_labeled_block_keeps_following_text_outside() {
        let output = convert("/a/x.py:\n```\n```\nmore **b**");
        assert_eq!(
            output,
            "h3. x.py\n\
             {code:title=x.py|language=python|linenumbers=true|collapse=false}\n\n\
             {code}\n\n\n\
             more *b*"
        );
    }

    #[test]
    fn test_text_after_closing_fence_is_not_line_start() {
        let output = convert("/a/b.sh:\n```\nx\n``` - tail\n- item\n");
        assert!(output.ends_with("{code}\n\n - tail\n* item\n"));

        assert_eq!(
            convert("see ```\nx\n``` * not a list"),
            "see {code:language=none}\nx\n{code} * not a list"
        );
    }

    #[test]
    fn test_code_bodies_skip_rules() {
        let input = "/src/list.md:\n```\n# not a heading\n**raw**\n```";
        let output = convert(input);
        assert!(output.contains("\n# not a heading\n**raw**\n"));
        assert!(output.contains("language=markdown"));
    }

    #[test]
    fn test_no_code_blocks_only_rules_apply() {
        let input = "plain text\n- item one\n2. item two";
        assert_eq!(convert(input), "plain text\n* item one\n# item two");
    }

    #[test]
    fn test_convert_fenced_blocks_identity_without_fences() {
        let converter = Converter::default();
        let text = "# Heading\n\n**bold** `inline`";
        assert_eq!(converter.convert_fenced_blocks(text), text);
    }

    #[test]
    fn test_convert_fenced_blocks_trims_body() {
        let converter = Converter::default();
        assert_eq!(
            converter.convert_fenced_blocks("```js\n\n  let x = 1;\n\n```"),
            "{code:language=js}\nlet x = 1;\n{code}"
        );
    }

    #[test]
    fn test_deterministic() {
        let input = "## Notes\n> quoted\n[link](http://a)\n![img](http://b.png)";
        assert_eq!(convert(input), convert(input));
    }

    #[test]
    fn test_conversion_counts() {
        let input = "intro\n/a/b.sh:\n```\necho\n```\nmid\n```\nx\n```\n";
        let result = Converter::default().convert(input);
        assert_eq!(result.labeled_blocks, 1);
        assert_eq!(result.fenced_blocks, 1);
        assert_eq!(result.text_segments, 2);
    }

    #[test]
    fn test_empty_document() {
        let result = Converter::default().convert("");
        assert_eq!(result.output, "");
        assert_eq!(result.text_segments, 0);
    }

    #[test]
    fn test_custom_options() {
        let options = ConverterOptions {
            fallback_language: "text".to_owned(),
            unlabeled_language: "plain".to_owned(),
            prefer_declared_language: true,
            segment_separator: "\n".to_owned(),
            languages: HashMap::from([("rs".to_owned(), "rust".to_owned())]),
        };
        let converter = Converter::new(options);

        let output = converter.convert("/src/main.rs:\n```\nfn main() {}\n```").output;
        assert!(output.contains("language=rust"));

        let output = converter.convert("/src/app.py:\n```text\nx\n```").output;
        assert!(output.contains("language=text"));

        let output = converter.convert("/bin/tool:\n```\nx\n```").output;
        assert!(output.contains("language=text"));

        let output = converter.convert("```\nx\n```").output;
        assert_eq!(output, "{code:language=plain}\nx\n{code}");

        let output = converter.convert("a\n/x/y.go:\n```\nz\n```").output;
        assert!(output.starts_with("a\n\nh3. y.go"));
    }
}
