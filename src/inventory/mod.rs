//! Grouped line insertion for the backup inventory (`router.db`).
//!
//! The inventory is a flat text file. A line such as `##LOJAS-SUL` opens a
//! group; every following line belongs to it until the next header.

use std::path::Path;

use crate::error::GenError;

/// Prefix that marks a group header line.
pub const GROUP_MARKER: &str = "##";

fn header_name(line: &str) -> Option<&str> {
    line.trim().strip_prefix(GROUP_MARKER).map(str::trim)
}

/// Insert `new_line` as the last member of `group`, creating the group at the
/// end of the document when it does not exist yet.
///
/// The input is never modified; a new document is returned. Trailing blank
/// lines are dropped and the result always ends with exactly one newline. Inserting the same line twice yields two copies.
pub fn insert_into_group(document: &str, new_line: &str, group: &str) -> Result<String, GenError> {
    let new_line = new_line.trim();
    if new_line.is_empty() {
        return Err(GenError::EmptyLine);
    }
    let group = group.trim();

    let lines: Vec<&str> = document.lines().collect();

    let mut current: Option<&str> = None;
    let mut last_in_group: Option<usize> = None;
    for (idx, line) in lines.iter().enumerate() {
        if let Some(name) = header_name(line) {
            current = Some(name);
        }
        if current == Some(group) {
            last_in_group = Some(idx);
        }
    }

    let header = format!("{}{}", GROUP_MARKER, group);
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 2);
    match last_in_group {
        Some(idx) => {
            out.extend_from_slice(&lines[..=idx]);
            out.push(new_line);
            out.extend_from_slice(&lines[idx + 1..]);
        }
        None => {
            tracing::debug!("Group {} not found, appending a new header", group);
            out.extend_from_slice(&lines);
            out.push(&header);
            out.push(new_line);
        }
    }

    // only trailing line breaks go; spaces on the last line are content
    let mut text = out
        .join("\n")
        .trim_end_matches(|c: char| c == '\n' || c == '\r')
        .to_string();
    text.push('\n');
    Ok(text)
}

/// Group names in document order, each listed once.
pub fn groups(document: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for name in document.lines().filter_map(header_name) {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Group a template belongs to: its file stem up to the first `_`.
///
/// `"TESTE-SOUSA_Mkt.txt"` -> `"TESTE-SOUSA"`.
pub fn group_from_template_name(template: &str) -> String {
    let stem = Path::new(template.trim())
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    stem.split('_').next().unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_into_existing_group() {
        let out = insert_into_group("##G1\nfoo\n", "bar", "G1").unwrap();
        assert_eq!(out, "##G1\nfoo\nbar\n");
    }

    #[test]
    fn test_insert_creates_missing_group() {
        let out = insert_into_group("##G1\nfoo\n", "bar", "G2").unwrap();
        assert_eq!(out, "##G1\nfoo\n##G2\nbar\n");
    }

    #[test]
    fn test_insert_goes_after_last_member_only() {
        let doc = "host-a:10.0.0.1:routeros\n\
                   ##SUL\n\
                   sul-1:10.1.0.1:routeros\n\
                   sul-2:10.1.0.2:routeros\n\
                   ##NORTE\n\
                   norte-1:10.2.0.1:ios\n";
        let out = insert_into_group(doc, "sul-3:10.1.0.3:routeros", "SUL").unwrap();
        assert_eq!(
            out,
            "host-a:10.0.0.1:routeros\n\
             ##SUL\n\
             sul-1:10.1.0.1:routeros\n\
             sul-2:10.1.0.2:routeros\n\
             sul-3:10.1.0.3:routeros\n\
             ##NORTE\n\
             norte-1:10.2.0.1:ios\n"
        );
    }

    #[test]
    fn test_insert_into_repeated_group_uses_last_block() {
        let doc = "##A\na1\n##B\nb1\n##A\na2\n##C\nc1";
        let out = insert_into_group(doc, "a3", "A").unwrap();
        assert_eq!(out, "##A\na1\n##B\nb1\n##A\na2\na3\n##C\nc1\n");
    }

    #[test]
    fn test_insert_header_with_spaces() {
        let out = insert_into_group("  ## G1 \nfoo", "bar", "G1").unwrap();
        assert_eq!(out, "  ## G1 \nfoo\nbar\n");
    }

    #[test]
    fn test_insert_into_empty_group_header() {
        let out = insert_into_group("##G1\n##G2\nx\n", "new", "G1").unwrap();
        assert_eq!(out, "##G1\nnew\n##G2\nx\n");
    }

    #[test]
    fn test_insert_into_empty_document() {
        assert_eq!(insert_into_group("", "bar", "G1").unwrap(), "##G1\nbar\n");
    }

    #[test]
    fn test_insert_normalizes_trailing_whitespace() {
        let out = insert_into_group("##G1\nfoo\n\n\n", "bar", "G2").unwrap();
        assert_eq!(out, "##G1\nfoo\n\n\n##G2\nbar\n");

        let out = insert_into_group("##G1\nfoo", "bar", "G1").unwrap();
        assert!(out.ends_with("bar\n"));
        assert!(!out.ends_with("\n\n"));
    }

    #[test]
    fn test_insert_keeps_trailing_spaces_of_other_lines() {
        let out = insert_into_group("##G1\nfoo\n##G2\nbaz  ", "bar", "G1").unwrap();
        assert_eq!(out, "##G1\nfoo\nbar\n##G2\nbaz  \n");

        let out = insert_into_group("##G1\nfoo\n##G2\nbaz  \n\n\n", "bar", "G1").unwrap();
        assert_eq!(out, "##G1\nfoo\nbar\n##G2\nbaz  \n");
    }

    #[test]
    fn test_insert_handles_crlf() {
        let out = insert_into_group("##G1\r\nfoo\r\n", "bar", "G1").unwrap();
        assert_eq!(out, "##G1\nfoo\nbar\n");
    }

    #[test]
    fn test_insert_rejects_blank_line() {
        let doc = "##G1\nfoo\n";
        assert_eq!(insert_into_group(doc, "", "G1"), Err(GenError::EmptyLine));
        assert_eq!(insert_into_group(doc, "   \t", "G1"), Err(GenError::EmptyLine));
        assert_eq!(doc, "##G1\nfoo\n");
    }

    #[test]
    fn test_insert_is_not_idempotent() {
        let once = insert_into_group("##G1\nfoo\n", "bar", "G1").unwrap();
        let twice = insert_into_group(&once, "bar", "G1").unwrap();
        assert_eq!(twice, "##G1\nfoo\nbar\nbar\n");
    }

    #[test]
    fn test_insert_trims_new_line() {
        let out = insert_into_group("##G1\n", "  bar  ", "G1").unwrap();
        assert_eq!(out, "##G1\nbar\n");
    }

    #[test]
    fn test_groups() {
        let doc = "x\n##A\n1\n##B\n##A\n";
        assert_eq!(groups(doc), vec!["A", "B"]);
        assert!(groups("no headers here").is_empty());
    }

    #[test]
    fn test_group_from_template_name() {
        assert_eq!(group_from_template_name("TESTE-SOUSA_Mkt.txt"), "TESTE-SOUSA");
        assert_eq!(group_from_template_name("LOJAS.txt"), "LOJAS");
        assert_eq!(group_from_template_name("data/oxidized/SUL_Cisco_v2.txt"), "SUL");
        assert_eq!(group_from_template_name(""), "");
    }
}
