//! Documentation text formatting
//!
//! Turns comment text into wrapped plain text the way a documentation viewer
//! prints it: paragraphs are re-flowed to the line width, indented runs are
//! preformatted blocks kept verbatim under a fixed indent, and short
//! capitalized lines standing alone between paragraphs are headings.

/// Line width used for documentation text
pub const LINE_WIDTH: usize = 80;

/// Indent placed before every line of a preformatted block
pub const PRE_INDENT: &str = "    ";

#[derive(Debug, PartialEq, Eq)]
enum Block {
    Para(Vec<String>),
    Heading(String),
    Pre(Vec<String>),
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn indent_len(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Heading text if `line` qualifies as a section heading
fn heading(line: &str) -> Option<String> {
    let line = line.trim();
    let first = line.chars().next()?;
    if !first.is_uppercase() {
        return None;
    }
    let last = line.chars().last()?;
    if !last.is_alphanumeric() {
        return None;
    }
    if line.contains([
        ';', ':', '!', '?', '+', '*', '/', '=', '(', ')', '[', ']', '{', '}', '_', '^', '°', '&',
        '§', '~', '%', '#', '@', '<', '"', '>', '\\',
    ]) {
        return None;
    }
    // An apostrophe is only allowed as in "it's" and a period only inside
    // a number such as "1.2".
    let chars: Vec<char> = line.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        match c {
            '\'' => {
                let possessive = chars.get(i + 1) == Some(&'s')
                    && chars.get(i + 2).is_none_or(|next| *next == ' ');
                if !possessive {
                    return None;
                }
            }
            '.' => {
                if !chars.get(i + 1).is_some_and(|next| next.is_ascii_digit()) {
                    return None;
                }
            }
            _ => {}
        }
    }
    Some(line.to_string())
}

/// Remove the longest indentation shared by every non-blank line
fn unindent(lines: &[&str]) -> Vec<String> {
    let prefix = lines
        .iter()
        .filter(|line| !is_blank(line))
        .map(|line| &line[..indent_len(line)])
        .reduce(|common, indent| {
            let shared = common
                .bytes()
                .zip(indent.bytes())
                .take_while(|(a, b)| a == b)
                .count();
            &common[..shared]
        })
        .unwrap_or("");
    lines
        .iter()
        .map(|line| {
            if is_blank(line) {
                String::new()
            } else {
                line[prefix.len()..].to_string()
            }
        })
        .collect()
}

fn blocks(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut out = Vec::new();
    let mut para: Vec<String> = Vec::new();
    let mut last_was_blank = false;
    let mut last_was_heading = false;

    let close = |para: &mut Vec<String>, out: &mut Vec<Block>| {
        if !para.is_empty() {
            out.push(Block::Para(std::mem::take(para)));
        }
    };

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if is_blank(line) {
            close(&mut para, &mut out);
            last_was_blank = true;
            i += 1;
            continue;
        }

        if indent_len(line) > 0 {
            close(&mut para, &mut out);
            let start = i;
            i += 1;
            while i < lines.len() && (is_blank(lines[i]) || indent_len(lines[i]) > 0) {
                i += 1;
            }
            let mut end = i;
            while end > start && is_blank(lines[end - 1]) {
                end -= 1;
            }
            out.push(Block::Pre(unindent(&lines[start..end])));
            last_was_blank = end < i;
            last_was_heading = false;
            continue;
        }

        if last_was_blank
            && !last_was_heading
            && i + 2 < lines.len()
            && is_blank(lines[i + 1])
            && !is_blank(lines[i + 2])
            && indent_len(lines[i + 2]) == 0
            && let Some(text) = heading(line)
        {
            close(&mut para, &mut out);
            out.push(Block::Heading(text));
            i += 2;
            last_was_blank = true;
            last_was_heading = true;
            continue;
        }

        para.push(line.to_string());
        last_was_blank = false;
        last_was_heading = false;
        i += 1;
    }
    close(&mut para, &mut out);
    out
}

/// Replace typographic double backquotes and single quotes
fn convert_quotes(line: &str) -> String {
    line.replace("``", "\u{201c}").replace("''", "\u{201d}")
}

struct LineWrapper<'a> {
    out: String,
    width: usize,
    indent: &'a str,
    column: usize,
    pending_space: usize,
    printed: bool,
}

impl LineWrapper<'_> {
    fn write(&mut self, text: &str) {
        if self.column == 0 && self.printed {
            // blank line between paragraphs
            self.out.push('\n');
        }
        self.printed = true;

        for word in text.split_whitespace() {
            let len = word.chars().count();
            if self.column > 0 && self.column + self.pending_space + len > self.width {
                self.out.push('\n');
                self.column = 0;
                self.pending_space = 0;
            }
            if self.column == 0 {
                self.out.push_str(self.indent);
            }
            for _ in 0..self.pending_space {
                self.out.push(' ');
            }
            self.out.push_str(word);
            self.column += self.pending_space + len;
            self.pending_space = 1;
        }
    }

    fn flush(&mut self) {
        if self.column == 0 {
            return;
        }
        self.out.push('\n');
        self.column = 0;
        self.pending_space = 0;
    }
}

/// Format comment text as wrapped plain text
///
/// Paragraph lines start with `indent` and wrap at `width` columns;
/// preformatted lines start with `pre_indent` and are never wrapped. The
/// result ends with a newline unless `text` is empty.
pub fn to_text(text: &str, indent: &str, pre_indent: &str, width: usize) -> String {
    let mut wrapper = LineWrapper {
        out: String::new(),
        width,
        indent,
        column: 0,
        pending_space: 0,
        printed: false,
    };

    for block in blocks(text) {
        match block {
            Block::Para(lines) => {
                for line in lines {
                    wrapper.write(&convert_quotes(&line));
                }
                wrapper.flush();
            }
            Block::Heading(line) => {
                wrapper.out.push('\n');
                wrapper.write(&convert_quotes(&line));
                wrapper.flush();
            }
            Block::Pre(lines) => {
                wrapper.out.push('\n');
                for line in lines {
                    if !line.is_empty() {
                        wrapper.out.push_str(pre_indent);
                        wrapper.out.push_str(&line);
                    }
                    wrapper.out.push('\n');
                }
            }
        }
    }
    wrapper.out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        to_text(text, "", PRE_INDENT, LINE_WIDTH)
    }

    #[test]
    fn test_paragraph_lines_are_reflowed() {
        assert_eq!(
            render("Max retry count.\nConstant Value: 5"),
            "Max retry count. Constant Value: 5\n"
        );
    }

    #[test]
    fn test_long_paragraph_wraps_at_width() {
        let text = "word ".repeat(30);
        let out = to_text(text.trim_end(), "", PRE_INDENT, 20);
        assert!(out.lines().all(|line| line.len() <= 20));
        assert_eq!(out.lines().count(), 8);
        assert!(out.ends_with("word\n"));
    }

    #[test]
    fn test_paragraphs_are_separated_by_blank_line() {
        assert_eq!(render("First.\n\nSecond."), "First.\n\nSecond.\n");
    }

    #[test]
    fn test_preformatted_block_keeps_layout() {
        let out = render("Example:\n\n\tx := F()\n\t\ty := G()\n\nDone.");
        assert_eq!(out, "Example:\n\n    x := F()\n    \ty := G()\n\nDone.\n");
    }

    #[test]
    fn test_heading_gets_its_own_block() {
        let out = render("Intro text.\n\nSecurity Considerations\n\nBe careful.");
        assert_eq!(
            out,
            "Intro text.\n\n\nSecurity Considerations\n\nBe careful.\n"
        );
        assert_eq!(heading("Not a heading."), None);
        assert_eq!(heading("lowercase start"), None);
        assert_eq!(heading("Version 1.2 Notes"), Some("Version 1.2 Notes".to_string()));
        assert_eq!(heading("Go's Rules"), Some("Go's Rules".to_string()));
    }

    #[test]
    fn test_quotes_are_converted() {
        assert_eq!(render("Say ``hi''."), "Say \u{201c}hi\u{201d}.\n");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(render(""), "");
    }
}
