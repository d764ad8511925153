use crate::error::PgDiffError;
use crate::Result;

/// A saved scanner position, see [Scanner::save] and [Scanner::restore].
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub(crate) struct Cursor(usize);

/// Walks over the text of a single statement.
///
/// Every `expect_optional*` method leaves the position untouched when it does not match.
pub(crate) struct Scanner<'a> {
    statement: &'a str,
    position: usize,
}

const CONTEXT_LENGTH: usize = 20;

fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | ';' | ',')
}

fn starts_with_word(text: &str, word: &str) -> bool {
    text.get(..word.len())
        .is_some_and(|candidate| candidate.eq_ignore_ascii_case(word))
        && text[word.len()..].chars().next().map_or(true, is_word_boundary)
}

impl<'a> Scanner<'a> {
    pub fn new(statement: &'a str) -> Self {
        let mut scanner = Scanner {
            statement,
            position: 0,
        };
        scanner.skip_whitespace();
        scanner
    }

    pub fn save(&self) -> Cursor {
        Cursor(self.position)
    }

    pub fn restore(&mut self, cursor: Cursor) {
        self.position = cursor.0;
    }

    fn remaining(&self) -> &'a str {
        &self.statement[self.position..]
    }

    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn skip_whitespace(&mut self) {
        let remaining = self.remaining();
        self.position += remaining.len() - remaining.trim_start().len();
    }

    /// Whether `word` follows, without consuming it.
    pub fn peek_word(&self, word: &str) -> bool {
        starts_with_word(self.remaining(), word)
    }

    /// True when nothing but an optional final `;` is left.
    pub fn is_consumed(&self) -> bool {
        let remaining = self.remaining().trim();
        remaining.is_empty() || remaining == ";"
    }

    fn context(&self) -> String {
        self.remaining().chars().take(CONTEXT_LENGTH).collect()
    }

    /// A syntax error at the current position.
    pub fn error(&self, expected: &str) -> PgDiffError {
        PgDiffError::Syntax {
            statement: self.statement.to_string(),
            expected: expected.to_string(),
            position: self.position + 1,
            context: self.context(),
        }
    }

    /// An error for syntax that is recognized but not supported, with a hint for the user.
    pub fn unsupported(&self, hint: &str) -> PgDiffError {
        PgDiffError::Unsupported {
            statement: self.statement.to_string(),
            position: self.position + 1,
            context: self.context(),
            hint: hint.to_string(),
        }
    }

    /// Matches `word` case insensitively. The word has to end at whitespace, a bracket, `;` or
    /// `,` unless it is a single symbol such as `(` or `=`.
    pub fn expect_optional(&mut self, word: &str) -> bool {
        let remaining = self.remaining();
        let is_symbol = word.len() == 1 && !word.chars().all(|c| c.is_alphanumeric() || c == '_');

        let matches = if is_symbol {
            remaining.starts_with(word)
        } else {
            starts_with_word(remaining, word)
        };

        if matches {
            self.position += word.len();
            self.skip_whitespace();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, word: &str) -> Result {
        if self.expect_optional(word) {
            Ok(())
        } else {
            Err(self.error(word))
        }
    }

    /// Matches all of `words` or none of them.
    pub fn expect_optional_sequence(&mut self, words: &[&str]) -> bool {
        let saved = self.save();

        for word in words {
            if !self.expect_optional(word) {
                self.restore(saved);
                return false;
            }
        }

        true
    }

    pub fn expect_sequence(&mut self, words: &[&str]) -> Result {
        for word in words {
            self.expect(word)?;
        }

        Ok(())
    }

    /// Returns the first of `words` found at the current position.
    pub fn expect_optional_one_of<'w>(&mut self, words: &[&'w str]) -> Option<&'w str> {
        words.iter().copied().find(|word| self.expect_optional(word))
    }

    fn parse_identifier_part(&mut self) -> Result<String> {
        let remaining = self.remaining();

        if remaining.starts_with('"') {
            let mut end = None;
            let mut chars = remaining.char_indices().skip(1).peekable();

            while let Some((idx, c)) = chars.next() {
                if c == '"' {
                    if chars.peek().is_some_and(|(_, next)| *next == '"') {
                        chars.next();
                    } else {
                        end = Some(idx);
                        break;
                    }
                }
            }

            let end = end.ok_or_else(|| self.error("closing quote of identifier"))?;
            self.position += end + 1;
            Ok(remaining[..=end].to_string())
        } else {
            let length = remaining
                .find(|c: char| c.is_whitespace() || matches!(c, ',' | ')' | '(' | ';' | '.'))
                .unwrap_or(remaining.len());

            if length == 0 {
                return Err(self.error("identifier"));
            }

            self.position += length;
            Ok(remaining[..length].to_lowercase())
        }
    }

    /// Parses a possibly qualified identifier. Quoted parts keep their quotes, bare parts are
    /// folded to lower case.
    pub fn parse_identifier(&mut self) -> Result<String> {
        let mut identifier = self.parse_identifier_part()?;

        while self.peek_char() == Some('.') {
            self.position += 1;
            identifier.push('.');
            identifier.push_str(&self.parse_identifier_part()?);
        }

        self.skip_whitespace();
        Ok(identifier)
    }

    /// Parses a string that is either quoted, returned with its quotes, or a bare word.
    pub fn parse_string(&mut self) -> Result<String> {
        let remaining = self.remaining();

        let length = if remaining.starts_with('\'') {
            let bytes = remaining.as_bytes();
            let mut escape = false;
            let mut end = None;
            let mut idx = 1;

            while idx < bytes.len() {
                match bytes[idx] {
                    b'\\' => escape = !escape,
                    b'\'' if escape => escape = false,
                    b'\'' if bytes.get(idx + 1) == Some(&b'\'') => idx += 1,
                    b'\'' => {
                        end = Some(idx);
                        break;
                    }
                    _ => escape = false,
                }
                idx += 1;
            }

            end.ok_or_else(|| self.error("closing quote of string"))? + 1
        } else {
            let length = remaining
                .find(|c: char| c.is_whitespace() || matches!(c, ',' | ')' | ';'))
                .unwrap_or(remaining.len());

            if length == 0 {
                return Err(self.error("string"));
            }

            length
        };

        self.position += length;
        let result = remaining[..length].to_string();
        self.skip_whitespace();
        Ok(result)
    }

    pub fn parse_integer(&mut self) -> Result<i64> {
        let remaining = self.remaining();
        let length = remaining
            .find(|c: char| !(c.is_ascii_digit() || c == '-' || c == '+'))
            .unwrap_or(remaining.len());

        let value = remaining[..length]
            .parse::<i64>()
            .map_err(|_| self.error("integer"))?;

        self.position += length;
        self.skip_whitespace();
        Ok(value)
    }

    /// Finds where the expression starting at the current position ends: at a `,` or `;` or a
    /// closing bracket that is not nested and not inside a string, or before one of
    /// `stop_words` on the same level.
    fn expression_end(&self, stop_words: &[&str]) -> usize {
        let bytes = self.statement.as_bytes();
        let mut depth = 0usize;
        let mut in_string = false;
        let mut idx = self.position;

        while idx < bytes.len() {
            match bytes[idx] {
                b'\'' => {
                    in_string = !in_string;
                    // a backslash escaped quote does not end the string
                    if idx > 0 && bytes[idx - 1] == b'\\' {
                        in_string = !in_string;
                    }
                }
                _ if in_string => {}
                b'(' | b'[' => depth += 1,
                b')' | b']' if depth == 0 => break,
                b')' | b']' => depth -= 1,
                b',' | b';' if depth == 0 => break,
                _ if depth == 0 && idx > self.position && bytes[idx - 1].is_ascii_whitespace() => {
                    let rest = &self.statement[idx..];
                    if stop_words.iter().any(|word| starts_with_word(rest, word)) {
                        break;
                    }
                }
                _ => {}
            }
            idx += 1;
        }

        idx
    }

    /// Parses an expression up to the next `,` or `;` or closing bracket on the same nesting
    /// level.
    pub fn parse_expression(&mut self) -> Result<String> {
        self.parse_expression_until(&[])
    }

    /// Like [Scanner::parse_expression], also ending before any of `stop_words`. Used where
    /// clauses follow an expression without a separator, as in `DEFAULT 0 NOT NULL`.
    pub fn parse_expression_until(&mut self, stop_words: &[&str]) -> Result<String> {
        let end = self.expression_end(stop_words);

        if end == self.position {
            return Err(self.error("expression"));
        }

        let expression = self.statement[self.position..end].trim().to_string();
        self.position = end;
        Ok(expression)
    }

    /// Parses a data type such as `integer`, `character varying(20)[]` or
    /// `timestamp(3) with time zone`.
    pub fn parse_data_type(&mut self) -> Result<String> {
        let mut data_type = if self.peek_char() == Some('"') {
            self.parse_identifier()?
        } else {
            let remaining = self.remaining();
            let length = remaining
                .find(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | ',' | ';' | '['))
                .unwrap_or(remaining.len());

            if length == 0 {
                return Err(self.error("data type definition"));
            }

            self.position += length;
            self.skip_whitespace();
            remaining[..length].to_string()
        };

        if data_type.eq_ignore_ascii_case("character") && self.expect_optional("varying") {
            data_type = "character varying".to_string();
        } else if data_type.eq_ignore_ascii_case("double") && self.expect_optional("precision") {
            data_type = "double precision".to_string();
        }

        let is_time = data_type.eq_ignore_ascii_case("timestamp") || data_type.eq_ignore_ascii_case("time");

        if self.peek_char() == Some('(') {
            let start = self.position;
            self.expect("(")?;
            loop {
                self.parse_expression()?;
                if self.expect_optional(")") {
                    break;
                }
                self.expect(",")?;
            }
            data_type.push_str(self.statement[start..self.position].trim_end());
        }

        if is_time {
            if self.expect_optional_sequence(&["with", "time", "zone"]) {
                data_type.push_str(" with time zone");
            } else if self.expect_optional_sequence(&["without", "time", "zone"]) {
                data_type.push_str(" without time zone");
            }
        }

        while self.expect_optional("[") {
            self.expect("]")?;
            data_type.push_str("[]");
        }

        Ok(data_type)
    }

    /// Everything after the current position without the final `;`, or `None` if nothing is
    /// left.
    pub fn rest(&mut self) -> Option<String> {
        let remaining = self.remaining();
        self.position = self.statement.len();

        let rest = remaining.strip_suffix(';').unwrap_or(remaining).trim();

        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    }
}
