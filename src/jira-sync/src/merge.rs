//! Marker-delimited document merging.
//!
//! A region is a block of text between two marker lines written as markdown
//! reference definitions (`[/]: / "TOKEN"`), which render as nothing. Merging
//! replaces the interior of an existing region or appends a new one.

/// Token opening the linked-issues region in pull request bodies.
pub const START_TOKEN: &str = "JIRA-ISSUE-TEXT-START";

/// Token closing the linked-issues region in pull request bodies.
pub const END_TOKEN: &str = "JIRA-ISSUE-TEXT-END";

/// Formats a marker line for `token`.
#[must_use]
pub fn marker(token: &str) -> String {
    format!("[/]: / \"{token}\"")
}

/// Splices `insert_text` into the region delimited by the two tokens.
///
/// The region ends at the first end marker line that follows a start marker
/// and starts at the last start marker line before it, so a stray start
/// marker earlier in the document is left alone. Lines may end in `\n` or
/// `\r\n`. Text outside the region, the marker lines and their line endings
/// are preserved byte for byte.
#[must_use]
pub fn merge_region(
    start_token: &str,
    end_token: &str,
    full_text: &str,
    insert_text: &str,
) -> String {
    if let Some(region) = find_region(start_token, end_token, full_text) {
        let mut merged = String::with_capacity(full_text.len() + insert_text.len() + 2);
        merged.push_str(&full_text[..region.interior_start]);
        merged.push_str(insert_text);
        merged.push_str(region.line_break);
        merged.push_str(&full_text[region.interior_end..]);
        return merged;
    }

    format!(
        "{}\n\n{}\n{}\n{}",
        full_text.trim(),
        marker(start_token),
        insert_text,
        marker(end_token)
    )
}

/// Location of a region interior inside a document.
struct Region<'a> {
    interior_start: usize,
    interior_end: usize,
    /// Line break to write after the insert when the end marker directly
    /// follows the start marker line; empty otherwise.
    line_break: &'a str,
}

/// Byte offsets of one line: `start..end` is the content, `end..next` the line break.
#[derive(Clone, Copy)]
struct Line {
    start: usize,
    end: usize,
    next: usize,
}

fn lines(text: &str) -> impl Iterator<Item = Line> + '_ {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let content = raw
            .strip_suffix('\n')
            .map_or(raw, |line| line.strip_suffix('\r').unwrap_or(line));
        let line = Line {
            start: offset,
            end: offset + content.len(),
            next: offset + raw.len(),
        };
        offset = line.next;
        line
    })
}

fn find_region<'a>(start_token: &str, end_token: &str, text: &'a str) -> Option<Region<'a>> {
    let start_marker = marker(start_token);
    let end_marker = marker(end_token);

    let mut open: Option<Line> = None;
    let mut previous: Option<Line> = None;

    for line in lines(text) {
        let content = &text[line.start..line.end];
        if content.contains(&end_marker) {
            if let Some(start) = open {
                return Some(if line.start == start.next {
                    Region {
                        interior_start: start.next,
                        interior_end: start.next,
                        line_break: &text[start.end..start.next],
                    }
                } else {
                    Region {
                        interior_start: start.next,
                        interior_end: previous.map_or(start.next, |prev| prev.end),
                        line_break: "",
                    }
                });
            }
        } else if content.contains(&start_marker) {
            open = Some(line);
        }
        previous = Some(line);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: &str = "START";
    const E: &str = "END";

    #[test]
    fn appends_region_when_missing() {
        let merged = merge_region(S, E, "Hello\n", "Body A");
        assert_eq!(merged, "Hello\n\n[/]: / \"START\"\nBody A\n[/]: / \"END\"");
    }

    #[test]
    fn replaces_existing_region_interior() {
        let first = merge_region(S, E, "Hello\n", "Body A");
        let second = merge_region(S, E, &first, "Body B");
        assert_eq!(second, "Hello\n\n[/]: / \"START\"\nBody B\n[/]: / \"END\"");
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let texts = [
            "",
            "Hello\n",
            "  intro  \n\n",
            "a\n[/]: / \"START\"\nold\n[/]: / \"END\"\ntail\n",
        ];
        for text in texts {
            let once = merge_region(S, E, text, "X\nY");
            let twice = merge_region(S, E, &once, "X\nY");
            assert_eq!(once, twice, "not idempotent for {text:?}");
        }
    }

    #[test]
    fn preserves_text_around_region() {
        let body = "Intro\n\n[/]: / \"START\"\nold list\n[/]: / \"END\"\n\nFooter text\n";
        let merged = merge_region(S, E, body, "new list");
        assert_eq!(
            merged,
            "Intro\n\n[/]: / \"START\"\nnew list\n[/]: / \"END\"\n\nFooter text\n"
        );
    }

    #[test]
    fn handles_empty_interior() {
        let once = merge_region(S, E, "Hello", "");
        assert_eq!(once, "Hello\n\n[/]: / \"START\"\n\n[/]: / \"END\"");

        let twice = merge_region(S, E, &once, "");
        assert_eq!(once, twice);

        let filled = merge_region(S, E, &once, "items");
        assert_eq!(filled, "Hello\n\n[/]: / \"START\"\nitems\n[/]: / \"END\"");
    }

    #[test]
    fn fills_region_without_interior_line() {
        let body = "[/]: / \"START\"\n[/]: / \"END\"";
        let merged = merge_region(S, E, body, "list");
        assert_eq!(merged, "[/]: / \"START\"\nlist\n[/]: / \"END\"");
        assert_eq!(merge_region(S, E, &merged, "list"), merged);
    }

    #[test]
    fn leaves_text_after_stray_start_marker() {
        let body = "Intro\n[/]: / \"START\"\nuser notes kept here\n";
        let once = merge_region(S, E, body, "X");
        assert_eq!(
            once,
            "Intro\n[/]: / \"START\"\nuser notes kept here\n\n[/]: / \"START\"\nX\n[/]: / \"END\""
        );

        let twice = merge_region(S, E, &once, "X");
        assert_eq!(once, twice);
        assert!(twice.contains("user notes kept here"));
    }

    #[test]
    fn finds_region_in_crlf_body() {
        let crlf = merge_region(S, E, "Hello\n", "X").replace('\n', "\r\n");

        let merged = merge_region(S, E, &crlf, "X");
        assert_eq!(merged, crlf);
        assert_eq!(merged.matches("\"START\"").count(), 1);

        let replaced = merge_region(S, E, &crlf, "Y");
        assert_eq!(
            replaced,
            "Hello\r\n\r\n[/]: / \"START\"\r\nY\r\n[/]: / \"END\""
        );
    }

    #[test]
    fn keeps_crlf_break_when_filling_empty_region() {
        let body = "[/]: / \"START\"\r\n[/]: / \"END\"\r\n";
        assert_eq!(
            merge_region(S, E, body, "list"),
            "[/]: / \"START\"\r\nlist\r\n[/]: / \"END\"\r\n"
        );
    }

    #[test]
    fn ignores_other_token_pairs() {
        let body = "[/]: / \"OTHER\"\nkeep\n[/]: / \"OTHER-END\"";
        let merged = merge_region(S, E, body, "new");
        assert!(merged.starts_with(body));
        assert!(merged.ends_with("[/]: / \"START\"\nnew\n[/]: / \"END\""));
    }
}
