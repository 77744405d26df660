use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::iter::FromIterator;

use regex::Regex;

/// A test applied to a text body, a comment body or an attribute value.
pub enum Matcher<'a> {
    /// Matches anything
    Any,
    /// Exact string equality
    Equals(Cow<'a, str>),
    /// Caller supplied predicate
    Predicate(Box<dyn Fn(&str) -> bool + 'a>),
    /// Regular expression search, unanchored unless the pattern anchors itself
    Pattern(Regex),
}

impl<'a> Matcher<'a> {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + 'a,
    {
        Matcher::Predicate(Box::new(f))
    }

    pub fn pattern(regex: Regex) -> Self {
        Matcher::Pattern(regex)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Matcher::Any)
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Equals(expected) => &**expected == candidate,
            Matcher::Predicate(f) => f(candidate),
            Matcher::Pattern(regex) => regex.is_match(candidate),
        }
    }
}

impl Default for Matcher<'_> {
    fn default() -> Self {
        Matcher::Any
    }
}

impl<'a> From<&'a str> for Matcher<'a> {
    fn from(expected: &'a str) -> Self {
        Matcher::Equals(Cow::Borrowed(expected))
    }
}

impl<'a> From<String> for Matcher<'a> {
    fn from(expected: String) -> Self {
        Matcher::Equals(Cow::Owned(expected))
    }
}

impl<'a> From<Option<&'a str>> for Matcher<'a> {
    fn from(expected: Option<&'a str>) -> Self {
        expected.map_or(Matcher::Any, Matcher::from)
    }
}

impl<'a> From<Regex> for Matcher<'a> {
    fn from(regex: Regex) -> Self {
        Matcher::Pattern(regex)
    }
}

impl Display for Matcher<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Matcher::Any => write!(f, "anything"),
            Matcher::Equals(expected) => write!(f, "{:?}", expected),
            Matcher::Predicate(_) => write!(f, "<predicate>"),
            Matcher::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

impl Debug for Matcher<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Subset match over an attribute mapping: every listed key must be present
/// and its value must satisfy the paired matcher. Unlisted keys are ignored.
#[derive(Debug, Default)]
pub struct AttrsMatch<'a> {
    entries: Vec<(Cow<'a, str>, Matcher<'a>)>,
}

impl<'a> AttrsMatch<'a> {
    pub fn new() -> Self {
        AttrsMatch { entries: vec![] }
    }

    pub fn attr<K, M>(mut self, key: K, matcher: M) -> Self
    where
        K: Into<Cow<'a, str>>,
        M: Into<Matcher<'a>>,
    {
        self.entries.push((key.into(), matcher.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Matcher<'a>)> {
        self.entries.iter().map(|(key, matcher)| (&**key, matcher))
    }
}

impl<'a, K, M> FromIterator<(K, M)> for AttrsMatch<'a>
where
    K: Into<Cow<'a, str>>,
    M: Into<Matcher<'a>>,
{
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        iter.into_iter().fold(AttrsMatch::new(), |attrs, (key, matcher)| attrs.attr(key, matcher))
    }
}

impl Display for AttrsMatch<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, matcher)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if matcher.is_any() {
                write!(f, "{}", key)?;
            } else {
                write!(f, "{}: {}", key, matcher)?;
            }
        }
        write!(f, "}}")
    }
}
