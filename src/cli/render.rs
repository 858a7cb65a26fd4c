//! Plain-text rendering of catalog views.

use crate::core::{RecordDetail, RecordSummary};

/// Column width reserved for titles in one-line listings
const TITLE_WIDTH: usize = 40;

/// `Title                                    alias1, alias2`
pub fn summary_line(summary: &RecordSummary) -> String {
    let line = format!(
        "{:<width$} {}",
        summary.title,
        summary.aliases.join(", "),
        width = TITLE_WIDTH
    );
    line.trim_end().to_string()
}

/// Multi-line block with aliases, indexed comments and items
pub fn detail_block(detail: &RecordDetail) -> String {
    let mut out = String::new();

    out.push_str(&detail.title);
    if !detail.aliases.is_empty() {
        out.push_str(&format!("  ({})", detail.aliases.join(", ")));
    }
    out.push('\n');

    if detail.comments.is_empty() {
        out.push_str("  Comments: (none)\n");
    } else {
        out.push_str("  Comments:\n");
        for comment in &detail.comments {
            out.push_str(&format!("    [{}] {}\n", comment.index, comment.text));
        }
    }

    if detail.total_items == 0 {
        out.push_str("  Items: (none)\n");
    } else {
        if detail.is_truncated() {
            out.push_str(&format!(
                "  Items (latest {} of {}):\n",
                detail.items.len(),
                detail.total_items
            ));
        } else {
            out.push_str(&format!("  Items ({}):\n", detail.total_items));
        }
        out.push_str(&format!("    {}\n", detail.items.join(", ")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IndexedComment;

    #[test]
    fn test_summary_line_pads_title() {
        let line = summary_line(&RecordSummary {
            title: "Mathematics".to_string(),
            aliases: vec!["calc".to_string(), "math".to_string()],
        });
        assert!(line.starts_with("Mathematics "));
        assert!(line.ends_with("calc, math"));
        assert_eq!(line.find("calc"), Some(TITLE_WIDTH + 1));
    }

    #[test]
    fn test_summary_line_without_aliases_has_no_trailing_space() {
        let line = summary_line(&RecordSummary {
            title: "Physics".to_string(),
            aliases: vec![],
        });
        assert_eq!(line, "Physics");
    }

    #[test]
    fn test_detail_block() {
        let detail = RecordDetail {
            title: "Mathematics".to_string(),
            aliases: vec!["math".to_string()],
            comments: vec![IndexedComment {
                index: 0,
                text: "Left 1135 at page 72".to_string(),
            }],
            items: vec!["1135".to_string(), "1136".to_string()],
            total_items: 3,
        };

        let block = detail_block(&detail);
        assert_eq!(
            block,
            "Mathematics  (math)\n  Comments:\n    [0] Left 1135 at page 72\n  Items (latest 2 of 3):\n    1135, 1136\n"
        );
    }
}
