//! Best-effort JavaScript reformatting
//!
//! This is a layout pass, not a parser: it only knows about string, template
//! and comment spans (copied verbatim), braces, semicolons and commas.
//! Anything it does not recognize passes through unchanged, so malformed
//! input still produces output.

const INDENT: &str = "    ";

/// Keywords that may follow a closing brace on the same line
const CONTINUATION_KEYWORDS: [&str; 3] = ["else", "catch", "finally"];

/// Continuation of a `do { ... }` body
const DO_CONTINUATION: [&str; 1] = ["while"];

/// Keywords that get a space before their opening parenthesis
const CONTROL_KEYWORDS: [&str; 5] = ["if", "for", "while", "switch", "catch"];

/// Reformat raw source text into an indented, one-statement-per-line layout
///
/// Deterministic and infallible.
///
/// ```
/// use sleuth_pipeline::normalize;
///
/// assert_eq!(normalize("if(a){b();}"), "if (a) {\n    b();\n}\n");
/// ```
pub fn normalize(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = LineWriter::default();
    let mut paren_depth = 0usize;
    // Parenthesis depth of each enclosing block, so a callback body inside
    // `f(function() { ... })` still gets one statement per line, and whether
    // the block is a `do` body
    let mut block_stack: Vec<(usize, bool)> = Vec::new();
    let mut closed_do = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            out.pending_space = true;
            i += 1;
            continue;
        }

        if out.close_pending {
            out.close_pending = false;
            let continuations: &[&'static str] = if closed_do {
                &DO_CONTINUATION
            } else {
                &CONTINUATION_KEYWORDS
            };
            if let Some(keyword) = keyword_at(&chars, i, continuations) {
                // "} else {" stays on one line
                out.pending_space = true;
                out.push_str(keyword);
                i += keyword.len();
                continue;
            }
            if !matches!(c, ';' | ',' | ')' | '.') {
                out.flush();
            }
        }

        match c {
            '"' | '\'' | '`' => {
                let end = scan_string(&chars, i);
                out.push_chars(&chars[i..end]);
                i = end;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                let end = chars[i..]
                    .iter()
                    .position(|&ch| ch == '\n')
                    .map_or(chars.len(), |offset| i + offset);
                out.push_chars(&chars[i..end]);
                out.flush();
                i = end;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                let end = scan_block_comment(&chars, i);
                out.push_chars(&chars[i..end]);
                out.pending_space = true;
                i = end;
            }
            '{' => {
                let opens_do = ends_with_keyword(&out.current, &["do"]);
                out.pending_space = true;
                out.push_str("{");
                out.flush();
                out.indent += 1;
                block_stack.push((paren_depth, opens_do));
                paren_depth = 0;
                i += 1;
            }
            '}' => {
                out.flush();
                out.indent = out.indent.saturating_sub(1);
                (paren_depth, closed_do) = block_stack.pop().unwrap_or((0, false));
                out.push_str("}");
                out.close_pending = true;
                i += 1;
            }
            ';' => {
                out.pending_space = false;
                out.push_str(";");
                if paren_depth == 0 {
                    out.flush();
                } else {
                    out.pending_space = true;
                }
                i += 1;
            }
            ',' => {
                out.pending_space = false;
                out.push_str(",");
                out.pending_space = true;
                i += 1;
            }
            '(' => {
                if ends_with_keyword(&out.current, &CONTROL_KEYWORDS) {
                    out.pending_space = true;
                }
                paren_depth += 1;
                out.push_str("(");
                out.pending_space = false;
                i += 1;
            }
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                out.pending_space = false;
                out.push_str(")");
                i += 1;
            }
            _ => {
                let mut buf = [0u8; 4];
                out.push_str(c.encode_utf8(&mut buf));
                i += 1;
            }
        }
    }

    out.finish()
}

/// Accumulates output lines with their indentation
#[derive(Default)]
struct LineWriter {
    lines: Vec<String>,
    current: String,
    line_indent: usize,
    indent: usize,
    pending_space: bool,
    close_pending: bool,
}

impl LineWriter {
    fn push_str(&mut self, s: &str) {
        if self.current.is_empty() {
            self.line_indent = self.indent;
        } else if self.pending_space && !self.current.ends_with(' ') {
            self.current.push(' ');
        }
        self.pending_space = false;
        self.current.push_str(s);
    }

    fn push_chars(&mut self, chars: &[char]) {
        let s: String = chars.iter().collect();
        self.push_str(&s);
    }

    fn flush(&mut self) {
        let line = self.current.trim();
        if !line.is_empty() {
            self.lines
                .push(format!("{}{}", INDENT.repeat(self.line_indent), line));
        }
        self.current.clear();
        self.pending_space = false;
    }

    fn finish(mut self) -> String {
        self.flush();
        if self.lines.is_empty() {
            return String::new();
        }
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// End index (exclusive) of the string literal starting at `start`
///
/// Single and double quoted strings also end at a raw newline, which keeps
/// an unterminated quote from swallowing the rest of the file.
fn scan_string(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut j = start + 1;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 2,
            ch if ch == quote => return j + 1,
            '\n' if quote != '`' => return j,
            _ => j += 1,
        }
    }
    chars.len()
}

/// End index (exclusive) of the block comment starting at `start`
fn scan_block_comment(chars: &[char], start: usize) -> usize {
    let mut j = start + 2;
    while j + 1 < chars.len() {
        if chars[j] == '*' && chars[j + 1] == '/' {
            return j + 2;
        }
        j += 1;
    }
    chars.len()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// The keyword from `keywords` that starts at `at` as a whole word, if any
fn keyword_at(chars: &[char], at: usize, keywords: &[&'static str]) -> Option<&'static str> {
    keywords.iter().copied().find(|keyword| {
        let len = keyword.chars().count();
        at + len <= chars.len()
            && chars[at..at + len].iter().copied().eq(keyword.chars())
            && chars.get(at + len).map_or(true, |&c| !is_word_char(c))
    })
}

/// Whether `line` ends with one of `keywords` as a whole word
fn ends_with_keyword(line: &str, keywords: &[&str]) -> bool {
    let trimmed = line.trim_end();
    keywords.iter().any(|keyword| {
        trimmed.strip_suffix(keyword).is_some_and(|head| {
            head.chars().next_back().map_or(true, |c| !is_word_char(c))
        })
    })
}
