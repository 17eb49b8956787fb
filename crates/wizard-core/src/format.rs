//! Line-level formatting primitives
//!
//! Printed output is assembled as a tree of [`Lines`]: plain lines, blank
//! separators and nested blocks. Each level of nesting indents by four
//! spaces. [`space_between`] joins groups with single blank lines and drops
//! empty groups, so missing sections never leave stray gaps.

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lines {
    Line(String),
    Whitespace,
    Nested(Vec<Lines>),
}

impl From<&str> for Lines {
    fn from(s: &str) -> Self {
        Lines::Line(s.to_string())
    }
}

impl From<String> for Lines {
    fn from(s: String) -> Self {
        Lines::Line(s)
    }
}

/// Convert a list of plain strings into lines
pub fn lines<I, S>(items: I) -> Vec<Lines>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(|s| Lines::Line(s.into())).collect()
}

/// Render a line tree to text, terminated by a newline
pub fn format_lines(lines: &[Lines]) -> String {
    let mut out = Vec::new();
    indent_each(0, lines, &mut out);
    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn indent_each(indent: usize, lines: &[Lines], out: &mut Vec<String>) {
    for line in lines {
        match line {
            Lines::Whitespace => out.push(String::new()),
            Lines::Nested(inner) => indent_each(indent + 1, inner, out),
            Lines::Line(text) => out.push(format!("{}{}", INDENT.repeat(indent), text)),
        }
    }
}

/// Join non-empty groups with one blank line between each
pub fn space_between(groups: Vec<Vec<Lines>>) -> Vec<Lines> {
    let mut out = Vec::new();
    for group in groups.into_iter().filter(|g| !g.is_empty()) {
        if !out.is_empty() {
            out.push(Lines::Whitespace);
        }
        out.extend(group);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_lines_indent() {
        let tree = vec![
            Lines::from("func f():"),
            Lines::Nested(vec![Lines::from("a()"), Lines::Nested(vec![Lines::from("b")])]),
            Lines::from("end"),
        ];
        assert_eq!(format_lines(&tree), "func f():\n    a()\n        b\nend\n");
    }

    #[test]
    fn test_space_between_skips_empty_groups() {
        let joined = space_between(vec![
            lines(["a"]),
            vec![],
            lines(["b", "c"]),
            vec![],
        ]);
        assert_eq!(format_lines(&joined), "a\n\nb\nc\n");
    }

    #[test]
    fn test_space_between_all_empty() {
        assert!(space_between(vec![vec![], vec![]]).is_empty());
    }

    #[test]
    fn test_whitespace_inside_nested_is_blank() {
        let tree = vec![Lines::Nested(vec![
            Lines::from("x"),
            Lines::Whitespace,
            Lines::from("y"),
        ])];
        assert_eq!(format_lines(&tree), "    x\n\n    y\n");
    }
}
