use crate::errors::ParseError;

/// Character scanner shared by the path grammars.
pub struct Parser<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == '_' || c == '-' || c.is_alphanumeric() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
        if self.i == start {
            return Err(ParseError::InvalidSyntax("identifier expected".into()));
        }
        Ok(self.s[start..self.i].to_string())
    }

    pub fn parse_int(&mut self) -> Result<i64, ParseError> {
        let start = self.i;
        if self.peek_char() == Some('-') {
            self.i += 1;
        }
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.i += 1;
            } else {
                break;
            }
        }
        if self.i == start || (self.i == start + 1 && &self.s[start..self.i] == "-") {
            return Err(ParseError::InvalidSyntax("expected integer".into()));
        }
        self.s[start..self.i]
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidSyntax("bad integer".into()))
    }

    pub fn parse_quoted_string(&mut self) -> Result<String, ParseError> {
        let quote = self
            .peek_char()
            .ok_or_else(|| ParseError::InvalidSyntax("string".into()))?;
        if quote != '\'' && quote != '"' {
            return Err(ParseError::InvalidSyntax("expected quoted string".into()));
        }
        self.i += 1;
        let mut out = String::new();
        while let Some(c) = self.peek_char() {
            self.i += c.len_utf8();
            if c == quote {
                return Ok(out);
            }
            if c == '\\' {
                if let Some(nc) = self.peek_char() {
                    self.i += nc.len_utf8();
                    match nc {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '\\' => out.push('\\'),
                        '"' => out.push('"'),
                        '\'' => out.push('\''),
                        _ => {
                            out.push('\\');
                            out.push(nc);
                        }
                    }
                } else {
                    break;
                }
            } else {
                out.push(c);
            }
        }
        Err(ParseError::InvalidSyntax("unterminated string".into()))
    }

    /// Consume up to (not including) `end`, or to the end of input.
    pub fn take_until(&mut self, end: char) -> &'a str {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c == end {
                break;
            }
            self.i += c.len_utf8();
        }
        &self.s[start..self.i]
    }

    pub fn capture_until(&mut self, end: char) -> Result<&'a str, ParseError> {
        let captured = self.take_until(end);
        if self.peek_char() != Some(end) {
            return Err(ParseError::InvalidSyntax(format!("expected '{end}'")));
        }
        Ok(captured)
    }

    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.consume_char(c) {
            Ok(())
        } else {
            Err(ParseError::InvalidSyntax(format!("expected '{}'", c)))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn peek_str(&self, lit: &str) -> bool {
        self.s[self.i..].starts_with(lit)
    }

    pub fn skip_ws(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.i += c.len_utf8();
            } else {
                break;
            }
        }
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}
