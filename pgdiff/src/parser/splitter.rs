use std::io::BufRead;
use crate::error::PgDiffError;
use crate::Result;

/// Where the splitter is while walking over the dump text.
#[derive(Debug, Eq, PartialEq, Clone)]
enum ScanState {
    Normal,
    /// Inside `'...'`. `escapes` is set for `E'...'` strings, where a backslash escapes the next
    /// character.
    SingleQuote { escapes: bool },
    DoubleQuote,
    /// Inside a dollar quoted body, holding the full tag such as `$body$`.
    Dollar(String),
    /// Inside `/* ... */`, with the nesting depth.
    BlockComment(usize),
}

/// Cuts a dump into single statements.
///
/// Comments are removed unless they are quoted. A statement ends at a `;` outside of any quote,
/// text after it on the same line starts the next statement.
pub struct StatementSplitter<R> {
    reader: R,
    pending: Option<String>,
}

impl<R: BufRead> StatementSplitter<R> {
    pub fn new(reader: R) -> Self {
        StatementSplitter {
            reader,
            pending: None,
        }
    }

    /// Returns the next statement including its `;`, or `None` once only whitespace is left.
    pub fn next_statement(&mut self) -> Result<Option<String>> {
        let mut buffer = String::new();
        let mut state = ScanState::Normal;
        let mut line = String::new();

        loop {
            let current = match self.pending.take() {
                Some(pending) => pending,
                None => {
                    line.clear();
                    if self.reader.read_line(&mut line)? == 0 {
                        let rest = buffer.trim();
                        return if rest.is_empty() {
                            Ok(None)
                        } else {
                            Err(PgDiffError::UnterminatedStatement {
                                statement: rest.to_string(),
                            })
                        };
                    }
                    line.trim_end_matches(|c| c == '\n' || c == '\r').to_string()
                }
            };

            if let Some(end) = scan_line(&current, &mut state, &mut buffer) {
                let rest = &current[end..];
                if !rest.trim().is_empty() {
                    self.pending = Some(rest.to_string());
                }
                return Ok(Some(buffer.trim().to_string()));
            }

            buffer.push('\n');
        }
    }
}

impl<R: BufRead> Iterator for StatementSplitter<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_statement().transpose()
    }
}

/// Reads a dollar quote tag such as `$$` or `$body$` at the start of `text`.
///
/// Tags holding whitespace or `"` are not tags, and neither are positional parameters like `$1`.
fn dollar_tag(text: &str) -> Option<&str> {
    let end = text[1..].find('$')? + 1;
    let body = &text[1..end];

    let valid = !body.starts_with(|c: char| c.is_ascii_digit())
        && !body.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ';');

    if valid {
        Some(&text[..=end])
    } else {
        None
    }
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Copies `line` into `buffer` without its comments, updating `state` on the way. Returns the
/// offset right after the `;` that ends the statement, if the line holds one.
fn scan_line(line: &str, state: &mut ScanState, buffer: &mut String) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut idx = 0;
    // start of the part of the line that still has to be copied
    let mut copied = 0;

    while idx < bytes.len() {
        let next = bytes.get(idx + 1).copied();

        match state {
            ScanState::Normal => match bytes[idx] {
                b'-' if next == Some(b'-') => {
                    buffer.push_str(&line[copied..idx]);
                    return None;
                }
                b'/' if next == Some(b'*') => {
                    buffer.push_str(&line[copied..idx]);
                    *state = ScanState::BlockComment(1);
                    idx += 2;
                    copied = idx;
                    continue;
                }
                b'\'' => {
                    let escapes = idx > 0
                        && matches!(bytes[idx - 1], b'E' | b'e')
                        && (idx < 2 || !is_identifier_byte(bytes[idx - 2]));
                    *state = ScanState::SingleQuote { escapes };
                }
                b'"' => *state = ScanState::DoubleQuote,
                b'$' if idx == 0 || !is_identifier_byte(bytes[idx - 1]) => {
                    if let Some(tag) = dollar_tag(&line[idx..]) {
                        idx += tag.len();
                        *state = ScanState::Dollar(tag.to_string());
                        continue;
                    }
                }
                b';' => {
                    buffer.push_str(&line[copied..=idx]);
                    return Some(idx + 1);
                }
                _ => {}
            },
            ScanState::SingleQuote { escapes } => match bytes[idx] {
                b'\\' if *escapes => idx += 1,
                b'\'' if next == Some(b'\'') => idx += 1,
                b'\'' => *state = ScanState::Normal,
                _ => {}
            },
            ScanState::DoubleQuote => {
                if bytes[idx] == b'"' {
                    *state = ScanState::Normal;
                }
            }
            ScanState::Dollar(tag) => {
                if bytes[idx..].starts_with(tag.as_bytes()) {
                    idx += tag.len();
                    *state = ScanState::Normal;
                    continue;
                }
            }
            ScanState::BlockComment(depth) => {
                if bytes[idx] == b'/' && next == Some(b'*') {
                    *depth += 1;
                    idx += 2;
                    continue;
                }

                if bytes[idx] == b'*' && next == Some(b'/') {
                    idx += 2;
                    if *depth == 1 {
                        *state = ScanState::Normal;
                        copied = idx;
                    } else {
                        *depth -= 1;
                    }
                    continue;
                }
            }
        }

        idx += 1;
    }

    if !matches!(state, ScanState::BlockComment(_)) {
        buffer.push_str(&line[copied.min(line.len())..]);
    }

    None
}
