use super::types::{FileSegment, Window};

/// Share of the budget shown from the start of a file, in tenths.
const HEAD_TENTHS: usize = 6;
/// Share of the budget shown from the end of a file, in tenths.
const TAIL_TENTHS: usize = 4;

/// Choose the head/tail window for a block with `content_len` content lines.
///
/// Returns `None` when the block fits: a zero budget means no limit, and
/// truncation only starts strictly above the budget.
pub fn window_for(content_len: usize, budget: usize) -> Option<Window> {
    if budget == 0 || content_len <= budget {
        return None;
    }
    // floor(N * 0.6) and floor(N * 0.4), exact in integers
    let head = budget * HEAD_TENTHS / 10;
    let tail = budget * TAIL_TENTHS / 10;
    Some(Window {
        head,
        tail,
        hidden: content_len - head - tail,
    })
}

/// Write one file block to `out`, truncating its content lines to `budget`.
///
/// Returns the window that was applied, or `None` if the block was written
/// unchanged. Truncated blocks list every header line, then every hunk
/// header, then the head window, the marker, and the tail window.
pub fn render_segment(segment: &FileSegment<'_>, budget: usize, out: &mut String) -> Option<Window> {
    let content_len = segment.content_len();
    let Some(window) = window_for(content_len, budget) else {
        segment.lines().for_each(|line| out.push_str(line));
        return None;
    };

    segment.header_lines().for_each(|line| push_line(out, line));
    segment.hunk_header_lines().for_each(|line| push_line(out, line));
    segment
        .content_lines()
        .take(window.head)
        .for_each(|line| push_line(out, line));

    out.push('\n');
    out.push_str(&format!(
        "[*** FILE TRUNCATED: {} lines hidden from {} ***]\n",
        window.hidden, segment.file_name
    ));
    out.push_str(&format!(
        "[*** File had {} total lines, showing first {} and last {} ***]\n",
        content_len, window.head, window.tail
    ));
    out.push_str("[*** Use maxLinesPerFile=0 to see the complete diff ***]\n");
    out.push('\n');

    segment
        .content_lines()
        .skip(content_len - window.tail)
        .for_each(|line| out.push_str(line));

    Some(window)
}

/// Push a line that may lack its terminator (last line of the input).
fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    if !line.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::segment::segment;
    use crate::diff::types::DiffBlock;

    fn file_text(name: &str, content: usize) -> String {
        let mut text = format!("diff --git a/{0} b/{0}\n--- a/{0}\n+++ b/{0}\n@@ -1 +1 @@\n", name);
        for i in 0..content {
            text.push_str(&format!("+line {}\n", i));
        }
        text
    }

    fn only_file<'a>(text: &'a str) -> FileSegment<'a> {
        match segment(text).into_iter().next() {
            Some(DiffBlock::File(file)) => file,
            other => panic!("expected a file block, got {:?}", other),
        }
    }

    #[test]
    fn test_window_zero_budget_is_unlimited() {
        assert_eq!(window_for(1_000, 0), None);
    }

    #[test]
    fn test_window_at_budget_is_untouched() {
        assert_eq!(window_for(10, 10), None);
        assert!(window_for(11, 10).is_some());
    }

    #[test]
    fn test_window_floor_split() {
        assert_eq!(
            window_for(100, 10),
            Some(Window { head: 6, tail: 4, hidden: 90 })
        );
        assert_eq!(
            window_for(200, 50),
            Some(Window { head: 30, tail: 20, hidden: 150 })
        );
        // 7 * 0.6 = 4.2, 7 * 0.4 = 2.8
        assert_eq!(
            window_for(8, 7),
            Some(Window { head: 4, tail: 2, hidden: 2 })
        );
        // Budget 1 shows nothing but the marker.
        assert_eq!(
            window_for(2, 1),
            Some(Window { head: 0, tail: 0, hidden: 2 })
        );
    }

    #[test]
    fn test_visible_body_never_exceeds_budget() {
        for budget in 1..200 {
            let window = window_for(budget + 1, budget).unwrap();
            assert!(window.head + window.tail <= budget);
            assert_eq!(window.head + window.tail + window.hidden, budget + 1);
            assert!(window.hidden >= 1);
        }
    }

    #[test]
    fn test_render_truncated_segment() {
        let text = file_text("src/app.ts", 100);
        let segment = only_file(&text);
        let mut out = String::new();
        let window = render_segment(&segment, 10, &mut out).unwrap();
        assert_eq!(window.hidden, 90);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "diff --git a/src/app.ts b/src/app.ts");
        assert_eq!(lines[3], "@@ -1 +1 @@");
        assert_eq!(&lines[4..10], &["+line 0", "+line 1", "+line 2", "+line 3", "+line 4", "+line 5"]);
        assert_eq!(lines[10], "");
        assert_eq!(lines[11], "[*** FILE TRUNCATED: 90 lines hidden from src/app.ts ***]");
        assert_eq!(
            lines[12],
            "[*** File had 100 total lines, showing first 6 and last 4 ***]"
        );
        assert!(lines[13].contains("maxLinesPerFile=0"));
        assert_eq!(lines[14], "");
        assert_eq!(&lines[15..], &["+line 96", "+line 97", "+line 98", "+line 99"]);
    }

    #[test]
    fn test_render_moves_in_body_file_headers_up() {
        let text = file_text("schema.sql", 20).replacen(
            "+line 9\n",
            "+line 9\n--- drop legacy column\n",
            1,
        );
        let segment = only_file(&text);
        let mut out = String::new();
        let window = render_segment(&segment, 10, &mut out).unwrap();
        assert_eq!(window.hidden, 10);

        let lines: Vec<&str> = out.lines().collect();
        let moved = lines.iter().position(|l| *l == "--- drop legacy column").unwrap();
        let hunk = lines.iter().position(|l| *l == "@@ -1 +1 @@").unwrap();
        assert_eq!(moved, 3);
        assert!(moved < hunk);
        assert_eq!(lines.iter().filter(|l| **l == "--- drop legacy column").count(), 1);
        assert!(out.contains("[*** File had 20 total lines, showing first 6 and last 4 ***]"));
    }

    #[test]
    fn test_render_without_final_newline() {
        let full = file_text("a.rs", 20);
        let text = full.strip_suffix('\n').unwrap();
        let segment = only_file(text);
        let mut out = String::new();
        let window = render_segment(&segment, 5, &mut out).unwrap();
        assert_eq!(window, Window { head: 3, tail: 2, hidden: 15 });

        assert!(out.contains("@@ -1 +1 @@\n+line 0\n+line 1\n+line 2\n\n[*** FILE TRUNCATED"));
        assert!(out.ends_with("***]\n\n+line 18\n+line 19"));
    }

    #[test]
    fn test_render_unterminated_header_gets_newline() {
        let text = file_text("a.rs", 20) + "--- end";
        let segment = only_file(&text);
        let mut out = String::new();
        render_segment(&segment, 5, &mut out).unwrap();

        assert!(out.contains("+++ b/a.rs\n--- end\n@@ -1 +1 @@\n"));
        assert!(out.ends_with("+line 18\n+line 19\n"));
    }

    #[test]
    fn test_render_small_segment_verbatim() {
        let text = file_text("a.rs", 5);
        let segment = only_file(&text);
        let mut out = String::new();
        assert!(render_segment(&segment, 10, &mut out).is_none());
        let original: String = segment.lines().collect();
        assert_eq!(out, original);
    }

    #[test]
    fn test_render_empty_segment_never_truncated() {
        let text = file_text("renamed.txt", 0);
        let segment = only_file(&text);
        let mut out = String::new();
        assert!(render_segment(&segment, 1, &mut out).is_none());
        assert!(!out.contains("FILE TRUNCATED"));
    }
}
