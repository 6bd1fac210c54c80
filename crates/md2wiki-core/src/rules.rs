//! Ordered line-level substitution rules.
//!
//! Each [`Rule`] is applied once to the whole text, in the order of
//! [`RULES`]. The order is significant:
//!
//! - Headings run first and match the longest `#` run first, so `###### x`
//!   is never read as an `h1.` with leftover hashes. Running before the list
//!   rules also keeps a heading line from being taken for a numbered item.
//! - Emphasis runs as a single scan with the strongest marker first, so the
//!   `*bold*` produced for `**bold**` is not turned into italics afterwards.
//! - Links run before images but skip `![...](...)`, leaving images for the
//!   image rule.
//! - Blockquote and list rules run last; they only rewrite line prefixes.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// How a rule produces its replacement.
enum Replacement {
    /// `regex` replacement template (`$1`, `$2`, ...).
    Template(&'static str),
    /// Computed replacement for rules that need to inspect the match.
    With(fn(&Captures<'_>) -> String),
}

/// A named substitution rule.
pub(crate) struct Rule {
    name: &'static str,
    pattern: Regex,
    replacement: Replacement,
}

impl Rule {
    fn template(name: &'static str, pattern: &str, template: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement: Replacement::Template(template),
        }
    }

    fn with(name: &'static str, pattern: &str, replace: fn(&Captures<'_>) -> String) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement: Replacement::With(replace),
        }
    }

    /// Rule name, used in trace output.
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the rule to every non-overlapping match in `text`.
    pub(crate) fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self.replacement {
            Replacement::Template(template) => self.pattern.replace_all(text, template),
            Replacement::With(replace) => self
                .pattern
                .replace_all(text, |caps: &Captures<'_>| replace(caps)),
        }
    }
}

/// The rule chain, in application order.
pub(crate) static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::template("h6", r"(?m)^###### (.+)", "h6. $1"),
        Rule::template("h5", r"(?m)^##### (.+)", "h5. $1"),
        Rule::template("h4", r"(?m)^#### (.+)", "h4. $1"),
        Rule::template("h3", r"(?m)^### (.+)", "h3. $1"),
        Rule::template("h2", r"(?m)^## (.+)", "h2. $1"),
        Rule::template("h1", r"(?m)^# (.+)", "h1. $1"),
        // Content must not start with whitespace, so `* item` stays a list marker.
        Rule::with(
            "emphasis",
            r"\*\*\*([^\s*].*?)\*\*\*|\*\*([^\s*].*?)\*\*|\*([^\s*].*?)\*",
            emphasis,
        ),
        Rule::template("inline_code", r"`([^`]+)`", "{{$1}}"),
        Rule::with("link", r"(!?)\[([^\]]+)\]\(([^)]+)\)", link),
        Rule::template("image", r"!\[([^\]]*)\]\(([^)]+)\)", "!$2!"),
        Rule::template("blockquote", r"(?m)^> (.+)", "bq. $1"),
        Rule::template("unordered_list", r"(?m)^[ \t]*[-*] ", "* "),
        Rule::template("ordered_list", r"(?m)^[ \t]*\d+[.)] ", "# "),
    ]
});

/// Triple emphasis, bold and italic, tried in that order at each position.
fn emphasis(caps: &Captures<'_>) -> String {
    if let Some(both) = caps.get(1) {
        format!("_*{}*_", both.as_str())
    } else if let Some(bold) = caps.get(2) {
        format!("*{}*", bold.as_str())
    } else {
        format!("_{}_", caps.get(3).map_or("", |m| m.as_str()))
    }
}

fn link(caps: &Captures<'_>) -> String {
    if caps.get(1).is_some_and(|bang| !bang.is_empty()) {
        return caps[0].to_owned();
    }
    format!("[{}|{}]", &caps[2], &caps[3])
}

/// Placed before text that continues a line, so line-start rules skip it.
const LINE_CONTINUATION: char = '\u{0}';

/// Run the full rule chain over `text`.
#[must_use]
pub fn apply_rules(text: &str) -> String {
    run_rules(text.to_owned())
}

/// Run the rule chain over `text` that continues a line already started,
/// such as the rest of a line after a closing fence.
///
/// Line-start rules (headings, blockquotes, list markers) do not apply
/// before the first newline; every later line is converted as usual.
#[must_use]
pub fn apply_rules_mid_line(text: &str) -> String {
    let mut output = run_rules(format!("{LINE_CONTINUATION}{text}"));
    if output.starts_with(LINE_CONTINUATION) {
        output.remove(0);
    }
    output
}

fn run_rules(mut output: String) -> String {
    for rule in RULES.iter() {
        let replaced = rule.apply(&output);
        if matches!(replaced, Cow::Borrowed(_)) {
            continue;
        }
        tracing::trace!(rule = rule.name(), "Rule matched");
        output = replaced.into_owned();
    }
    output
}
