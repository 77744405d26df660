use std::fmt::{Display, Formatter};

use indexmap::IndexMap;

use crate::matcher::{AttrsMatch, Matcher};

/// Attribute mapping of an open tag, in source order.
pub type Attributes = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open { tag: String, attrs: Attributes },
    Close { tag: String },
    Text(String),
    Comment(String),
    CommentEnd,
    End,
}

impl Token {
    pub fn open(tag: impl Into<String>, attrs: Attributes) -> Self {
        Token::Open { tag: tag.into(), attrs }
    }

    pub fn close(tag: impl Into<String>) -> Self {
        Token::Close { tag: tag.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Token::Text(text.into())
    }

    pub fn comment(text: impl Into<String>) -> Self {
        Token::Comment(text.into())
    }

    pub fn comment_end() -> Self {
        Token::CommentEnd
    }

    pub fn end() -> Self {
        Token::End
    }

    /// Tag name of an open or close token
    pub fn tag(&self) -> Option<&str> {
        match self {
            Token::Open { tag, .. } | Token::Close { tag } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attrs(&self) -> Option<&Attributes> {
        match self {
            Token::Open { attrs, .. } => Some(attrs),
            _ => None,
        }
    }

    /// Body of a text or comment token
    pub fn body(&self) -> Option<&str> {
        match self {
            Token::Text(text) | Token::Comment(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Tag names are always compared exactly. An attribute match, when given,
    /// must hold for every key it lists.
    pub fn is_open(&self, tag: Option<&str>, attrs: Option<&AttrsMatch<'_>>) -> bool {
        match self {
            Token::Open { tag: name, .. } => {
                tag.map_or(true, |expected| expected == name.as_str())
                    && attrs.map_or(true, |attrs| self.has_attrs(attrs))
            }
            _ => false,
        }
    }

    pub fn is_close(&self, tag: Option<&str>) -> bool {
        match self {
            Token::Close { tag: name } => tag.map_or(true, |expected| expected == name.as_str()),
            _ => false,
        }
    }

    pub fn is_text(&self, matcher: &Matcher<'_>) -> bool {
        match self {
            Token::Text(text) => matcher.matches(text),
            _ => false,
        }
    }

    pub fn is_comment(&self, matcher: &Matcher<'_>) -> bool {
        match self {
            Token::Comment(text) => matcher.matches(text),
            _ => false,
        }
    }

    pub fn is_comment_end(&self) -> bool {
        matches!(self, Token::CommentEnd)
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Token::End)
    }

    /// False for anything but an open token. A key missing from the token fails the match.
    pub fn has_attrs(&self, expected: &AttrsMatch<'_>) -> bool {
        let attrs = match self.attrs() {
            Some(attrs) => attrs,
            None => return false,
        };
        expected.iter().all(|(key, matcher)| {
            attrs
                .get(key)
                .map_or(false, |value| matcher.matches(value))
        })
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Open { tag, attrs } => {
                write!(f, "<{}", tag)?;
                for (key, value) in attrs {
                    write!(f, " {}={:?}", key, value)?;
                }
                write!(f, ">")
            }
            Token::Close { tag } => write!(f, "</{}>", tag),
            Token::Text(text) => write!(f, "text {:?}", text),
            Token::Comment(text) => write!(f, "comment {:?}", text),
            Token::CommentEnd => write!(f, "comment end"),
            Token::End => write!(f, "end of input"),
        }
    }
}
