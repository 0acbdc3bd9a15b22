//! Type reference definitions.
//!
//! A [`TypeReference`] names a (possibly parameterized) type by its simple
//! name, the namespace that owns it, and an ordered list of type arguments.
//! It is the only way types are described anywhere in the IR, both for the
//! declarations handed to the composer and for the members of the artifacts
//! it produces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error raised when parsing the textual type reference syntax.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeParseError {
    #[error("empty type name at offset {0}")]
    EmptyName(usize),

    #[error("invalid character '{ch}' at offset {offset}")]
    InvalidCharacter { ch: char, offset: usize },

    #[error("unclosed type argument list opened at offset {0}")]
    Unclosed(usize),

    #[error("unexpected trailing input at offset {0}")]
    TrailingInput(usize),
}

/// A reference to a simple or parameterized type.
///
/// Immutable once constructed: every accessor borrows, and the only way to
/// obtain a variant is to build a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeReference {
    /// Raw simple name, e.g. `List`.
    name: String,

    /// Owning namespace, e.g. `java.util`. Empty for types in the root namespace.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    namespace: String,

    /// Type arguments in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    arguments: Vec<TypeReference>,
}

impl TypeReference {
    /// Create a reference to a non-generic type.
    pub fn simple(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            arguments: Vec::new(),
        }
    }

    /// Create a reference to a parameterized type.
    pub fn generic(
        namespace: impl Into<String>,
        name: impl Into<String>,
        arguments: Vec<TypeReference>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            arguments,
        }
    }

    /// The raw simple name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The type arguments, empty for non-generic types.
    pub fn arguments(&self) -> &[TypeReference] {
        &self.arguments
    }

    /// Whether this reference carries type arguments.
    pub fn is_parameterized(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// The raw (erased) type, i.e. this reference without its arguments.
    pub fn raw(&self) -> Self {
        Self::simple(self.namespace.clone(), self.name.clone())
    }

    /// Fully-qualified raw name, e.g. `java.util.List`.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Visit this reference and, depth-first, every nested type argument.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TypeReference)) {
        visit(self);
        for argument in &self.arguments {
            argument.walk(visit);
        }
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", argument)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl FromStr for TypeReference {
    type Err = TypeParseError;

    /// Parse `a.b.Name<x.Arg, y.Other<z.Inner>>`.
    ///
    /// The last dotted segment is the simple name, everything before it the
    /// namespace. Whitespace between tokens is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeSyntaxParser {
            chars: s.char_indices().collect(),
            pos: 0,
            len: s.len(),
        };
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if let Some(offset) = parser.offset() {
            return Err(TypeParseError::TrailingInput(offset));
        }
        Ok(parsed)
    }
}

/// Recursive-descent parser over the textual type reference syntax.
struct TypeSyntaxParser {
    chars: Vec<(usize, char)>,
    pos: usize,
    len: usize,
}

impl TypeSyntaxParser {
    fn parse_type(&mut self) -> Result<TypeReference, TypeParseError> {
        self.skip_whitespace();
        let start = self.offset().unwrap_or(self.len);
        let path = self.parse_path(start)?;

        let (namespace, name) = match path.rfind('.') {
            Some(idx) => (path[..idx].to_string(), path[idx + 1..].to_string()),
            None => (String::new(), path),
        };

        self.skip_whitespace();
        let mut arguments = Vec::new();
        if self.peek() == Some('<') {
            let open = self.offset().unwrap_or(self.len);
            self.pos += 1;
            loop {
                arguments.push(self.parse_type()?);
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.pos += 1,
                    Some('>') => {
                        self.pos += 1;
                        break;
                    }
                    Some(ch) => {
                        return Err(TypeParseError::InvalidCharacter {
                            ch,
                            offset: self.offset().unwrap_or(self.len),
                        })
                    }
                    None => return Err(TypeParseError::Unclosed(open)),
                }
            }
        }

        Ok(TypeReference::generic(namespace, name, arguments))
    }

    /// Read a dotted identifier path; every segment must be non-empty.
    fn parse_path(&mut self, start: usize) -> Result<String, TypeParseError> {
        let mut path = String::new();
        let mut segment_start = start;
        let mut segment_len = 0usize;

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                path.push(ch);
                segment_len += 1;
                self.pos += 1;
            } else if ch == '.' {
                if segment_len == 0 {
                    return Err(TypeParseError::EmptyName(segment_start));
                }
                path.push(ch);
                self.pos += 1;
                segment_start = self.offset().unwrap_or(self.len);
                segment_len = 0;
            } else {
                break;
            }
        }

        if segment_len == 0 {
            return match self.peek() {
                Some(ch) if !matches!(ch, '<' | '>' | ',') && !ch.is_whitespace() => {
                    Err(TypeParseError::InvalidCharacter {
                        ch,
                        offset: self.offset().unwrap_or(self.len),
                    })
                }
                _ => Err(TypeParseError::EmptyName(segment_start)),
            };
        }

        Ok(path)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|(_, ch)| *ch)
    }

    fn offset(&self) -> Option<usize> {
        self.chars.get(self.pos).map(|(offset, _)| *offset)
    }
}
