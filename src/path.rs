use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::errors::{ErrorData, LookupError, ParseError};
use crate::parser::Parser;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Property(String), // /foo or .foo or ['foo']
    Index(i64),       // /2 or [2]
}

impl Segment {
    /// The property name this segment addresses on an object. Index
    /// segments look up the property spelled the same way.
    pub fn as_key(&self) -> String {
        match self {
            Segment::Property(name) => name.clone(),
            Segment::Index(i) => i.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathForm {
    /// `/foo/bar/2`
    Pointer,
    /// `$.foo.bar[2]`
    Dotted,
    /// `3/currentIteration/item`: steps back through the execution trail.
    Relative { steps_back: usize },
}

/// A parsed, immutable path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    raw: String,
    form: PathForm,
    segments: Vec<Segment>,
}

impl PathExpression {
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        parse_path(input).map_err(|ParseError::InvalidSyntax(reason)| {
            LookupError::InvalidPath(ErrorData::default().with_path(input).with_reason(reason))
        })
    }

    /// The empty pointer, addressing the root itself.
    pub fn root() -> Self {
        Self { raw: String::new(), form: PathForm::Pointer, segments: Vec::new() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn form(&self) -> PathForm {
        self.form
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_relative(&self) -> bool {
        matches!(self.form, PathForm::Relative { .. })
    }

    /// Canonical RFC 6901 rendering of the segments, ignoring any relative step.
    pub fn to_pointer(&self) -> String {
        pointer_of(&self.segments)
    }
}

/// Render segments as a JSON pointer.
pub fn pointer_of(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| format!("/{}", s.as_key().replace('~', "~0").replace('/', "~1")))
        .join("")
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for PathExpression {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PathExpression::parse(s)
    }
}

fn parse_path(input: &str) -> Result<PathExpression, ParseError> {
    let trimmed = input.trim();
    let (form, segments) = if trimmed.is_empty() || trimmed.starts_with('/') {
        (PathForm::Pointer, parse_pointer(trimmed)?)
    } else if trimmed.starts_with('$') {
        (PathForm::Dotted, parse_dotted(trimmed)?)
    } else {
        parse_relative(trimmed)?
    };
    Ok(PathExpression { raw: trimmed.to_string(), form, segments })
}

fn parse_pointer(input: &str) -> Result<Vec<Segment>, ParseError> {
    let mut p = Parser::new(input);
    let mut segments = Vec::new();
    while !p.eof() {
        p.expect('/')?;
        let token = unescape_token(p.take_until('/'))?;
        segments.push(classify_token(token));
    }
    Ok(segments)
}

fn unescape_token(token: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return Err(ParseError::InvalidSyntax(format!("bad escape in `{token}`"))),
        }
    }
    Ok(out)
}

/// Numeric tokens without a leading zero are indices, anything else a name.
fn classify_token(token: String) -> Segment {
    let digits = token.strip_prefix('-').unwrap_or(&token);
    let canonical = !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'));
    match canonical.then(|| token.parse::<i64>().ok()).flatten() {
        Some(i) => Segment::Index(i),
        None => Segment::Property(token),
    }
}

fn parse_relative(input: &str) -> Result<(PathForm, Vec<Segment>), ParseError> {
    let mut p = Parser::new(input);
    let step = p.take_until('/');
    if step.is_empty() || !step.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::InvalidSyntax(format!(
            "path must start with `/`, `$` or an action step number, found `{step}`"
        )));
    }
    let steps_back = step
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidSyntax("bad action step".into()))?;
    let rest = &input[step.len()..];
    Ok((PathForm::Relative { steps_back }, parse_pointer(rest)?))
}

fn parse_dotted(input: &str) -> Result<Vec<Segment>, ParseError> {
    let mut p = Parser::new(input);
    let mut segments = Vec::new();
    p.expect('$')?;

    while !p.eof() {
        p.skip_ws();
        if p.peek_str("..") {
            return Err(unsupported("recursive descent"));
        }
        if p.consume_char('.') {
            if p.peek_char() == Some('*') {
                return Err(unsupported("wildcards"));
            }
            segments.push(Segment::Property(p.parse_identifier()?));
            continue;
        }
        if p.consume_char('[') {
            p.skip_ws();
            match p.peek_char() {
                Some('*') => return Err(unsupported("wildcards")),
                Some('?') => return Err(unsupported("filters")),
                Some('\'') | Some('"') => {
                    let key = p.parse_quoted_string()?;
                    p.skip_ws();
                    p.expect(']')?;
                    segments.push(Segment::Property(key));
                }
                _ => {
                    let content = p.capture_until(']')?;
                    p.expect(']')?;
                    if content.contains(':') {
                        return Err(unsupported("slices"));
                    }
                    let mut tmp = Parser::new(content.trim());
                    let idx = tmp.parse_int()?;
                    if !tmp.eof() {
                        return Err(ParseError::InvalidSyntax(format!("bad index `{content}`")));
                    }
                    segments.push(Segment::Index(idx));
                }
            }
            continue;
        }
        return Err(ParseError::InvalidSyntax(format!(
            "unexpected character {:?}",
            p.peek_char().unwrap_or_default()
        )));
    }
    Ok(segments)
}

fn unsupported(feature: &str) -> ParseError {
    ParseError::InvalidSyntax(format!("{feature} are not supported in a single-value path"))
}
