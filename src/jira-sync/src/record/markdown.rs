//! Jira wiki markup to markdown conversion.
//!
//! Covers the markup people actually write in issue descriptions. Anything
//! not recognized is passed through untouched as plain text.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static CODE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{(code|noformat)(?::([^}]*))?\}(.*?)\{(?:code|noformat)\}")
        .expect("code block pattern is valid")
});
static QUOTE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{quote\}(.*?)\{quote\}").expect("quote block pattern is valid")
});
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^h([1-6])\.\s+(.*)$").expect("heading pattern is valid"));
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^bq\.\s+(.*)$").expect("blockquote pattern is valid"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([*#-]+)\s+(.*)$").expect("list pattern is valid"));
static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{4,}\s*$").expect("rule pattern is valid"));
static TABLE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|\|(.*)\|\|\s*$").expect("table pattern is valid"));
static MONOSPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("monospace pattern is valid"));
static NAMED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^|\]\n]+)\|([^\]\n]+)\]").expect("named link pattern is valid")
});
static BARE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[((?:https?|mailto):[^\]\s]+)\]").expect("bare link pattern is valid")
});
static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!([^!\s|]+\.[A-Za-z0-9]+)(?:\|[^!\n]*)?!").expect("image pattern is valid")
});
static BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[\s(\[{>])\*([^\s*](?:[^*\n]*[^\s*])?)\*").expect("bold pattern is valid")
});
static ITALIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[\s(\[{>])_([^\s_](?:[^_\n]*[^\s_])?)_").expect("italic pattern is valid")
});
static STRIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|\s)-([^\s-](?:[^-\n]*[^\s-])?)-(\s|$)").expect("strike pattern is valid")
});

/// Converts Jira wiki markup to markdown.
#[must_use]
pub fn jira_to_markdown(markup: &str) -> String {
    let markup = markup.replace("\r\n", "\n");
    let mut out = String::with_capacity(markup.len());
    let mut last = 0;

    for caps in CODE_BLOCK.captures_iter(&markup) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        out.push_str(&convert_text(&markup[last..whole.start]));
        out.push_str(&fenced_block(&caps));
        last = whole.end;
    }
    out.push_str(&convert_text(&markup[last..]));

    out
}

fn fenced_block(caps: &Captures<'_>) -> String {
    let language = if &caps[1] == "code" {
        caps.get(2).map(|m| code_language(m.as_str())).unwrap_or("")
    } else {
        ""
    };
    let body = caps[3].trim_matches('\n');
    format!("```{language}\n{body}\n```")
}

/// Extracts the language from `{code:java}` or `{code:language=java|title=x}`.
fn code_language(params: &str) -> &str {
    for param in params.split('|') {
        match param.split_once('=') {
            Some(("language", value)) => return value.trim(),
            Some(_) => {}
            None => return param.trim(),
        }
    }
    ""
}

fn convert_text(text: &str) -> String {
    let quoted = QUOTE_BLOCK.replace_all(text, |caps: &Captures<'_>| {
        caps[1]
            .trim_matches('\n')
            .lines()
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    });

    let mut lines: Vec<String> = Vec::new();
    for line in quoted.split('\n') {
        lines.push(convert_line(line));
    }
    lines.join("\n")
}

fn convert_line(line: &str) -> String {
    if let Some(caps) = HEADING.captures(line) {
        let level: usize = caps[1].parse().unwrap_or(1);
        return format!("{} {}", "#".repeat(level), convert_inline(&caps[2]));
    }
    if let Some(caps) = BLOCKQUOTE.captures(line) {
        return format!("> {}", convert_inline(&caps[1]));
    }
    if RULE.is_match(line) {
        return "---".to_string();
    }
    if let Some(caps) = LIST_ITEM.captures(line) {
        let markers = &caps[1];
        let indent = "  ".repeat(markers.len() - 1);
        let bullet = if markers.ends_with('#') { "1." } else { "-" };
        return format!("{indent}{bullet} {}", convert_inline(&caps[2]));
    }
    if let Some(caps) = TABLE_HEADER.captures(line) {
        let cells: Vec<String> = caps[1]
            .split("||")
            .map(|cell| convert_inline(cell.trim()))
            .collect();
        let separator = vec!["---"; cells.len()].join("|");
        return format!("|{}|\n|{separator}|", cells.join("|"));
    }
    convert_inline(line)
}

fn convert_inline(text: &str) -> String {
    let text = MONOSPACE.replace_all(text, "`$1`");
    let text = NAMED_LINK.replace_all(&text, "[$1]($2)");
    let text = BARE_LINK.replace_all(&text, "<$1>");
    let text = IMAGE.replace_all(&text, "![]($1)");
    let text = BOLD.replace_all(&text, "$1**$2**");
    let text = ITALIC.replace_all(&text, "$1*$2*");
    let text = STRIKE.replace_all(&text, "$1~~$2~~$3");
    text.into_owned()
}
