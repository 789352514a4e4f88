//! Comment re-injection
//!
//! `serde_yml` cannot emit comments, so saving is two passes: serialize the
//! document, then walk the emitted text and splice comment blocks above the
//! keys that have one. The walk understands exactly the layout the serializer
//! produces for records:
//!
//! - a key line at indent 0 has path `key` and opens category `key`;
//! - a key line at indent 2 has path `<category>.key`;
//! - comment lines, list items (`- ...`), lines without a `:`, and lines at
//!   any other indent are never targets;
//! - once a key line carries an inline value (a scalar, `|` or `>` block
//!   header, or a wrapped plain scalar), the blank and deeper-indented lines
//!   that follow belong to that value and are skipped;
//! - quoted keys are matched without their quotes.
//!
//! A matching key gets one blank line followed by its comment, one `# ` line
//! per comment line, at the key's indent.

use crate::schema::{ConfigRecord, Schema};
use std::collections::{BTreeMap, HashMap};

/// Comment text keyed by option path (`key` or `category.key`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentTable {
    entries: HashMap<String, String>,
}

impl CommentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, comment: impl Into<String>) {
        self.entries.insert(path.into(), comment.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category comments first, then per-option comments on top.
    pub(crate) fn for_record<R: ConfigRecord>(
        schema: &Schema<R>,
        category_comments: &BTreeMap<String, String>,
    ) -> Self {
        let mut table = Self::new();
        for (category, comment) in schema.category_comments().iter().chain(category_comments) {
            table.insert(category.clone(), comment.clone());
        }
        for field in schema.fields() {
            if let Some(comment) = field.comment() {
                table.insert(field.path().to_string(), comment);
            }
        }
        table
    }
}

impl FromIterator<(String, String)> for CommentTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Splice comments from `comments` into serialized YAML `text`.
pub fn annotate(text: &str, comments: &CommentTable) -> String {
    let mut out = String::with_capacity(text.len() + comments.len() * 32);
    let mut category = String::new();
    // Indent of the key whose inline value may continue on following lines
    let mut value_owner: Option<usize> = None;

    for line in text.lines() {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        if let Some(owner) = value_owner {
            if trimmed.is_empty() || indent > owner {
                push_line(&mut out, line);
                continue;
            }
            value_owner = None;
        }

        if let Some((key, rest)) = split_key(trimmed) {
            let path = match indent {
                0 => {
                    category = key.to_string();
                    Some(key.to_string())
                }
                2 => Some(format!("{category}.{key}")),
                _ => None,
            };

            if let Some(comment) = path.as_deref().and_then(|p| comments.get(p)) {
                push_comment(&mut out, &line[..indent], comment);
            }

            let inline = rest.trim();
            if !inline.is_empty() && !inline.starts_with('#') {
                value_owner = Some(indent);
            }
        }

        push_line(&mut out, line);
    }

    out
}

/// Split a key line into its (unquoted) key and whatever follows the colon.
fn split_key(trimmed: &str) -> Option<(&str, &str)> {
    if trimmed.starts_with('#') || trimmed.starts_with('-') {
        return None;
    }

    for quote in ['\'', '"'] {
        if let Some(inner) = trimmed.strip_prefix(quote) {
            let end = inner.find(quote)?;
            let rest = inner[end + 1..].strip_prefix(':')?;
            return Some((&inner[..end], rest));
        }
    }

    let (key, rest) = trimmed.split_once(':')?;
    Some((key.trim_end(), rest))
}

fn push_comment(out: &mut String, indent: &str, comment: &str) {
    out.push('\n');
    for comment_line in comment.lines() {
        out.push_str(indent);
        if comment_line.is_empty() {
            out.push('#');
        } else {
            out.push_str("# ");
            out.push_str(comment_line);
        }
        out.push('\n');
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> CommentTable {
        entries
            .iter()
            .map(|(path, text)| (path.to_string(), text.to_string()))
            .collect()
    }

    #[test]
    fn test_category_option_comment() {
        let text = "limits:\n  min: 1\n  max: 10\n";
        let comments = table(&[("limits.max", "Upper bound")]);

        assert_eq!(
            annotate(text, &comments),
            "limits:\n  min: 1\n\n  # Upper bound\n  max: 10\n"
        );
    }

    #[test]
    fn test_category_header_and_top_level() {
        let text = "debug: false\nlimits:\n  max: 10\n";
        let comments = table(&[
            ("debug", "Verbose logging"),
            ("limits", "Hard limits\nApplied per player"),
        ]);

        assert_eq!(
            annotate(text, &comments),
            "\n# Verbose logging\ndebug: false\n\n# Hard limits\n# Applied per player\nlimits:\n  max: 10\n"
        );
    }

    #[test]
    fn test_list_items_never_targets() {
        let text = "names:\n- max\n- 'limits: x'\nlimits:\n  max: 1\n";
        let comments = table(&[("names.max", "wrong"), ("limits.max", "right")]);

        let annotated = annotate(text, &comments);
        assert!(!annotated.contains("wrong"));
        assert!(annotated.contains("\n  # right\n  max: 1\n"));
    }

    #[test]
    fn test_block_scalar_lines_skipped() {
        let text = "motd: |-\n  first line\n  max: not a key\n\n  after blank\nlimits:\n  max: 3\n";
        let comments = table(&[("motd.max", "wrong"), ("limits.max", "Upper bound")]);

        let annotated = annotate(text, &comments);
        assert!(!annotated.contains("wrong"));
        assert!(annotated.ends_with("limits:\n\n  # Upper bound\n  max: 3\n"));
    }

    #[test]
    fn test_deeper_indent_not_a_target() {
        let text = "kit:\n  item:\n    max: 64\n  max: 2\n";
        let comments = table(&[("kit.max", "Kits per day")]);

        assert_eq!(
            annotate(text, &comments),
            "kit:\n  item:\n    max: 64\n\n  # Kits per day\n  max: 2\n"
        );
    }

    #[test]
    fn test_quoted_keys_unquoted() {
        let text = "'on': true\nlimits:\n  \"a:b\": 1\n";
        let comments = table(&[("on", "Enabled"), ("limits.a:b", "Odd key")]);

        assert_eq!(
            annotate(text, &comments),
            "\n# Enabled\n'on': true\nlimits:\n\n  # Odd key\n  \"a:b\": 1\n"
        );
    }

    #[test]
    fn test_empty_comment_line_has_no_trailing_space() {
        let text = "a: 1\n";
        let comments = table(&[("a", "first\n\nthird")]);

        assert_eq!(annotate(text, &comments), "\n# first\n#\n# third\na: 1\n");
    }

    #[test]
    fn test_no_comments_is_identity() {
        let text = "a: 1\nb:\n  c: [1, 2]\n";
        assert_eq!(annotate(text, &CommentTable::new()), text);
    }
}
