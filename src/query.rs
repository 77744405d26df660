use std::borrow::Cow;
use std::fmt::{Display, Formatter};

use crate::matcher::AttrsMatch;
use crate::token::{Attributes, Token};

/// Optional tag and optional attribute match for the open-tag operations.
#[derive(Debug, Default)]
pub struct OpenQuery<'a> {
    pub tag: Option<Cow<'a, str>>,
    pub attrs: Option<AttrsMatch<'a>>,
}

impl<'a> OpenQuery<'a> {
    pub fn any() -> Self {
        OpenQuery { tag: None, attrs: None }
    }

    pub fn tag(tag: impl Into<Cow<'a, str>>) -> Self {
        OpenQuery { tag: Some(tag.into()), attrs: None }
    }

    pub fn with_attrs(mut self, attrs: AttrsMatch<'a>) -> Self {
        self.attrs = Some(attrs);
        self
    }

    pub fn matches(&self, token: &Token) -> bool {
        token.is_open(self.tag.as_deref(), self.attrs.as_ref())
    }

    /// Shape of the value handed back for a matched token: the attributes when a
    /// tag was asked for, the whole token otherwise.
    pub(crate) fn opened(&self, token: &Token) -> Opened {
        match (&self.tag, token) {
            (Some(_), Token::Open { attrs, .. }) => Opened::Attrs(attrs.clone()),
            _ => Opened::Token(token.clone()),
        }
    }
}

impl<'a> From<&'a str> for OpenQuery<'a> {
    fn from(tag: &'a str) -> Self {
        OpenQuery::tag(tag)
    }
}

impl<'a> From<String> for OpenQuery<'a> {
    fn from(tag: String) -> Self {
        OpenQuery::tag(tag)
    }
}

impl<'a> From<Option<&'a str>> for OpenQuery<'a> {
    fn from(tag: Option<&'a str>) -> Self {
        OpenQuery { tag: tag.map(Cow::Borrowed), attrs: None }
    }
}

impl<'a> From<(&'a str, AttrsMatch<'a>)> for OpenQuery<'a> {
    fn from((tag, attrs): (&'a str, AttrsMatch<'a>)) -> Self {
        OpenQuery::tag(tag).with_attrs(attrs)
    }
}

impl<'a> From<AttrsMatch<'a>> for OpenQuery<'a> {
    fn from(attrs: AttrsMatch<'a>) -> Self {
        OpenQuery::any().with_attrs(attrs)
    }
}

impl Display for OpenQuery<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "<{}>", tag)?,
            None => write!(f, "open tag")?,
        }
        if let Some(attrs) = &self.attrs {
            write!(f, " with {}", attrs)?;
        }
        Ok(())
    }
}

/// Result of a matched open-tag operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opened {
    /// The query named no tag
    Token(Token),
    /// The query named a tag
    Attrs(Attributes),
}

impl Opened {
    pub fn attrs(&self) -> Option<&Attributes> {
        match self {
            Opened::Token(token) => token.attrs(),
            Opened::Attrs(attrs) => Some(attrs),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs()?.get(key).map(String::as_str)
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            Opened::Token(token) => Some(token),
            Opened::Attrs(_) => None,
        }
    }

    pub fn into_attrs(self) -> Attributes {
        match self {
            Opened::Token(Token::Open { attrs, .. }) => attrs,
            Opened::Token(_) => Attributes::new(),
            Opened::Attrs(attrs) => attrs,
        }
    }
}
