//! Document segmentation into text and code regions.
//!
//! Two scanners split a document into [`Segment`]s:
//! - [`split_labeled_blocks`] finds fenced blocks introduced by a file path
//!   line such as `/src/app.py:`.
//! - [`split_fenced_blocks`] finds any remaining triple-backtick fence.
//!
//! Both are left-to-right and non-overlapping. Text between matches is
//! returned untouched so later stages decide what to do with it.

use std::sync::LazyLock;

use regex::Regex;

/// A path line at the start of a line, then a fence with an optional
/// language token, then the body up to the first closing fence.
static LABELED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<path>/[^\n]+):\n```(?P<lang>[A-Za-z0-9_+-]*)\n(?P<code>(?s:.*?))```")
        .unwrap()
});

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?P<lang>[A-Za-z0-9_+-]*)\n(?P<code>(?s:.*?))```").unwrap()
});

/// A fenced code block found in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSegment<'a> {
    /// File path from the label line, without the trailing colon.
    pub path: Option<&'a str>,
    /// Language token from the opening fence, if non-empty.
    pub language: Option<&'a str>,
    /// Raw code body, untrimmed.
    pub body: &'a str,
}

impl<'a> CodeSegment<'a> {
    /// Final segment of the label path, if the block is labeled.
    #[must_use]
    pub fn file_name(&self) -> Option<&'a str> {
        self.path
            .map(|path| path.rsplit('/').next().unwrap_or(path))
    }

    /// Code body with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_body(&self) -> &'a str {
        self.body.trim()
    }
}

/// A region of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Ordinary Markdown text.
    Text(&'a str),
    /// A fenced code block.
    Code(CodeSegment<'a>),
}

/// Split a document around path-labeled code blocks.
///
/// Empty text regions (for example when the document starts with a labeled
/// block) are omitted. A document without labeled blocks yields a single
/// [`Segment::Text`] holding the whole input.
#[must_use]
pub fn split_labeled_blocks(text: &str) -> Vec<Segment<'_>> {
    split(text, &LABELED_BLOCK)
}

/// Split a document around plain fenced code blocks.
///
/// Same contract as [`split_labeled_blocks`]; returned code segments carry
/// no path.
#[must_use]
pub fn split_fenced_blocks(text: &str) -> Vec<Segment<'_>> {
    split(text, &FENCED_BLOCK)
}

fn split<'a>(text: &'a str, pattern: &Regex) -> Vec<Segment<'a>> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut segments, &text[last_end..whole.start()]);

        segments.push(Segment::Code(CodeSegment {
            path: caps.name("path").map(|m| m.as_str()),
            language: caps
                .name("lang")
                .map(|m| m.as_str())
                .filter(|lang| !lang.is_empty()),
            body: caps.name("code").map_or("", |m| m.as_str()),
        }));
        last_end = whole.end();
    }

    push_text(&mut segments, &text[last_end..]);
    segments
}

fn push_text<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
}
