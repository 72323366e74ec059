use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One step into a value tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Address of a leaf or sub-tree within a [`MappingNode`](crate::node::MappingNode).
///
/// Rendered as `itemConfig.endpoints[0]`. Field names that are not plain
/// identifiers use bracket form: `annotations["app.kubernetes.io/name"]`.
/// The root path has no segments and renders as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Field(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    /// Drop a leading field segment if it equals `prefix`.
    ///
    /// Link mappings address resource fields as `spec.handler`; the overlay
    /// writes into the spec tree itself, so the `spec` segment goes.
    pub fn strip_field_prefix(mut self, prefix: &str) -> Self {
        if matches!(self.segments.first(), Some(PathSegment::Field(f)) if f == prefix) {
            self.segments.remove(0);
        }
        self
    }

    /// Render a segment slice without building a `FieldPath`.
    pub fn render(segments: &[PathSegment]) -> String {
        let mut out = String::new();
        for (i, segment) in segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) if is_plain_name(name) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Field(name) => {
                    out.push_str("[\"");
                    for c in name.chars() {
                        if c == '"' || c == '\\' {
                            out.push('\\');
                        }
                        out.push(c);
                    }
                    out.push_str("\"]");
                }
                PathSegment::Index(index) => {
                    out.push('[');
                    out.push_str(&index.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidPath {
            path: input.to_string(),
            reason: reason.to_string(),
        };

        let chars: Vec<char> = input.chars().collect();
        let mut segments = Vec::new();
        let mut pos = 0;
        let mut expect_name = true;

        while pos < chars.len() {
            match chars[pos] {
                '[' => {
                    pos += 1;
                    if chars.get(pos) == Some(&'"') {
                        pos += 1;
                        let mut name = String::new();
                        loop {
                            match chars.get(pos) {
                                None => return Err(invalid("unterminated quoted field name")),
                                Some('\\') => {
                                    let escaped = chars
                                        .get(pos + 1)
                                        .ok_or_else(|| invalid("dangling escape"))?;
                                    name.push(*escaped);
                                    pos += 2;
                                }
                                Some('"') => {
                                    pos += 1;
                                    break;
                                }
                                Some(c) => {
                                    name.push(*c);
                                    pos += 1;
                                }
                            }
                        }
                        segments.push(PathSegment::Field(name));
                    } else {
                        let start = pos;
                        while chars.get(pos).is_some_and(char::is_ascii_digit) {
                            pos += 1;
                        }
                        if start == pos {
                            return Err(invalid("expected list index or quoted field name"));
                        }
                        let digits: String = chars[start..pos].iter().collect();
                        let index = digits
                            .parse::<usize>()
                            .map_err(|_| invalid("list index out of range"))?;
                        segments.push(PathSegment::Index(index));
                    }
                    if chars.get(pos) != Some(&']') {
                        return Err(invalid("expected closing bracket"));
                    }
                    pos += 1;
                    expect_name = false;
                }
                '.' => {
                    if expect_name {
                        return Err(invalid("empty field name"));
                    }
                    pos += 1;
                    expect_name = true;
                    if pos == chars.len() {
                        return Err(invalid("trailing separator"));
                    }
                }
                _ => {
                    if !expect_name {
                        return Err(invalid("missing separator"));
                    }
                    let start = pos;
                    while pos < chars.len() && !matches!(chars[pos], '.' | '[') {
                        if matches!(chars[pos], ']' | '"') || chars[pos].is_whitespace() {
                            return Err(invalid("unexpected character in field name"));
                        }
                        pos += 1;
                    }
                    segments.push(PathSegment::Field(chars[start..pos].iter().collect()));
                    expect_name = false;
                }
            }
        }

        Ok(Self { segments })
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| matches!(c, '.' | '[' | ']' | '"' | '\\') || c.is_whitespace())
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::render(&self.segments))
    }
}

impl FromStr for FieldPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
