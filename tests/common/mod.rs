#![allow(dead_code)]

use markup_cursor::{Attributes, Cursor, Token};

pub fn attrs(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub fn open(tag: &str, pairs: &[(&str, &str)]) -> Token {
    Token::open(tag, attrs(pairs))
}

/// `<a href="index.html">Link</a>`, then the end token.
pub fn link_cursor() -> Cursor {
    Cursor::from(vec![
        open("a", &[("href", "index.html")]),
        Token::text("Link"),
        Token::close("a"),
    ])
}
