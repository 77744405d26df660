use tracing::{debug, trace};

use crate::config::Config;
use crate::error::{CursorError, Result};
use crate::matcher::Matcher;
use crate::query::{OpenQuery, Opened};
use crate::token::Token;
use crate::tokenize::{Event, MarkupTokenizer};
use crate::xmlchar::is_whitespace_only;

/// Assertion-style reader over a fully buffered token sequence.
///
/// The sequence always ends with a single [`Token::End`]. The read position only
/// moves forward. Every operation has a `_with` form taking a continuation that
/// receives the cursor again, so nested content can be read before the operation
/// returns.
#[derive(Debug, Clone)]
pub struct Cursor {
    pos: usize,
    tokens: Vec<Token>,
}

impl From<Vec<Token>> for Cursor {
    /// Wraps an already built token sequence and appends the end token.
    fn from(mut tokens: Vec<Token>) -> Self {
        tokens.push(Token::End);
        Cursor { pos: 0, tokens }
    }
}

/// Collects markup chunks and tokenizes them once the input is complete.
#[derive(Debug, Default)]
pub struct CursorBuilder {
    config: Config,
    markup: String,
}

impl CursorBuilder {
    pub fn new(config: Config) -> Self {
        CursorBuilder { config, markup: String::new() }
    }

    pub fn write(mut self, markup: &str) -> Self {
        self.markup.push_str(markup);
        self
    }

    pub fn end(self) -> Result<Cursor> {
        Cursor::parse_with(&self.markup, self.config)
    }
}

impl Cursor {
    pub fn builder() -> CursorBuilder {
        CursorBuilder::default()
    }

    pub fn parse(markup: &str) -> Result<Self> {
        Self::parse_with(markup, Config::default())
    }

    pub fn parse_with(markup: &str, config: Config) -> Result<Self> {
        Self::from_events(config, MarkupTokenizer::new(markup, config))
    }

    /// Build the token sequence from adapter events. Reading stops at the first
    /// [`Event::EndOfInput`] or when the events run out; one end token is appended either way.
    pub fn from_events<I>(config: Config, events: I) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Event>>,
    {
        let mut tokens = vec![];
        let mut skipped = 0;
        for event in events {
            match event? {
                Event::EndOfInput => break,
                Event::Text(text) if config.skip_whitespace_only_text && is_whitespace_only(&text) => {
                    skipped += 1;
                }
                event => tokens.push(event.into_token()),
            }
        }
        tokens.push(Token::End);
        debug!(tokens = tokens.len(), skipped, "token sequence finalized");
        Ok(Cursor { pos: 0, tokens })
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.tokens.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens not read yet, starting with the current one
    pub fn remaining(&self) -> &[Token] {
        self.tokens.get(self.pos..).unwrap_or_default()
    }

    pub fn peek(&self) -> Result<&Token> {
        self.tokens
            .get(self.pos)
            .ok_or(CursorError::EndOfStream { position: self.pos })
    }

    pub fn peek_with<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        let token = self.peek()?.clone();
        f(self, token)
    }

    pub fn next(&mut self) -> Result<&Token> {
        let position = self.pos;
        let token = self
            .tokens
            .get(position)
            .ok_or(CursorError::EndOfStream { position })?;
        self.pos += 1;
        trace!(position, %token, "consumed");
        Ok(token)
    }

    pub fn next_with<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        let token = self.next()?.clone();
        f(self, token)
    }

    pub(crate) fn advance(&mut self) {
        trace!(position = self.pos, "consumed");
        self.pos += 1;
    }

    /// Test the current token. On success extract a value and advance when `consume`
    /// is set; on failure the cursor stays on the offending token.
    pub(crate) fn expect_by<T>(
        &mut self,
        operation: &'static str,
        consume: bool,
        expected: impl FnOnce() -> String,
        test: impl FnOnce(&Token) -> bool,
        extract: impl FnOnce(&Token) -> T,
    ) -> Result<T> {
        let position = self.pos;
        let token = self.peek()?;
        if !test(token) {
            return Err(CursorError::UnexpectedToken {
                operation,
                expected: expected(),
                found: token.to_string(),
                position,
            });
        }
        let value = extract(token);
        if consume {
            self.advance();
        }
        Ok(value)
    }

    /// Like [`Cursor::expect_by`] but a failed test yields `None` instead of an error.
    pub(crate) fn probe_by<T>(
        &mut self,
        test: impl FnOnce(&Token) -> bool,
        extract: impl FnOnce(&Token) -> T,
    ) -> Result<Option<T>> {
        let token = self.peek()?;
        if !test(token) {
            return Ok(None);
        }
        let value = extract(token);
        self.advance();
        Ok(Some(value))
    }

    // open

    pub fn expect_open<'q>(&mut self, query: impl Into<OpenQuery<'q>>) -> Result<Opened> {
        let query = query.into();
        self.expect_by("expect_open", true, || query.to_string(), |t| query.matches(t), |t| query.opened(t))
    }

    pub fn expect_open_with<'q, R, F>(&mut self, query: impl Into<OpenQuery<'q>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Opened) -> Result<R>,
    {
        let opened = self.expect_open(query)?;
        f(self, opened)
    }

    pub fn peek_expect_open<'q>(&mut self, query: impl Into<OpenQuery<'q>>) -> Result<Opened> {
        let query = query.into();
        self.expect_by("peek_expect_open", false, || query.to_string(), |t| query.matches(t), |t| query.opened(t))
    }

    pub fn peek_expect_open_with<'q, R, F>(&mut self, query: impl Into<OpenQuery<'q>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Opened) -> Result<R>,
    {
        let opened = self.peek_expect_open(query)?;
        f(self, opened)
    }

    pub fn if_open<'q>(&mut self, query: impl Into<OpenQuery<'q>>) -> Result<Option<Opened>> {
        let query = query.into();
        self.probe_by(|t| query.matches(t), |t| query.opened(t))
    }

    pub fn if_open_with<'q, R, F>(&mut self, query: impl Into<OpenQuery<'q>>, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut Self, Opened) -> Result<R>,
    {
        match self.if_open(query)? {
            Some(opened) => f(self, opened).map(Some),
            None => Ok(None),
        }
    }

    // close

    pub fn expect_close<'q>(&mut self, tag: impl Into<Option<&'q str>>) -> Result<Token> {
        let tag = tag.into();
        self.expect_by("expect_close", true, || describe_close(tag), |t| t.is_close(tag), Token::clone)
    }

    pub fn expect_close_with<'q, R, F>(&mut self, tag: impl Into<Option<&'q str>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        let token = self.expect_close(tag)?;
        f(self, token)
    }

    pub fn peek_expect_close<'q>(&mut self, tag: impl Into<Option<&'q str>>) -> Result<Token> {
        let tag = tag.into();
        self.expect_by("peek_expect_close", false, || describe_close(tag), |t| t.is_close(tag), Token::clone)
    }

    pub fn peek_expect_close_with<'q, R, F>(&mut self, tag: impl Into<Option<&'q str>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        let token = self.peek_expect_close(tag)?;
        f(self, token)
    }

    pub fn if_close<'q>(&mut self, tag: impl Into<Option<&'q str>>) -> Result<Option<Token>> {
        let tag = tag.into();
        self.probe_by(|t| t.is_close(tag), Token::clone)
    }

    pub fn if_close_with<'q, R, F>(&mut self, tag: impl Into<Option<&'q str>>, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        match self.if_close(tag)? {
            Some(token) => f(self, token).map(Some),
            None => Ok(None),
        }
    }

    // text

    pub fn expect_text<'q>(&mut self, matcher: impl Into<Matcher<'q>>) -> Result<String> {
        let matcher = matcher.into();
        self.expect_by(
            "expect_text",
            true,
            || format!("text matching {}", matcher),
            |t| t.is_text(&matcher),
            body_of,
        )
    }

    pub fn expect_text_with<'q, R, F>(&mut self, matcher: impl Into<Matcher<'q>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, String) -> Result<R>,
    {
        let text = self.expect_text(matcher)?;
        f(self, text)
    }

    pub fn peek_expect_text<'q>(&mut self, matcher: impl Into<Matcher<'q>>) -> Result<String> {
        let matcher = matcher.into();
        self.expect_by(
            "peek_expect_text",
            false,
            || format!("text matching {}", matcher),
            |t| t.is_text(&matcher),
            body_of,
        )
    }

    pub fn peek_expect_text_with<'q, R, F>(&mut self, matcher: impl Into<Matcher<'q>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, String) -> Result<R>,
    {
        let text = self.peek_expect_text(matcher)?;
        f(self, text)
    }

    pub fn if_text<'q>(&mut self, matcher: impl Into<Matcher<'q>>) -> Result<Option<String>> {
        let matcher = matcher.into();
        self.probe_by(|t| t.is_text(&matcher), body_of)
    }

    pub fn if_text_with<'q, R, F>(&mut self, matcher: impl Into<Matcher<'q>>, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut Self, String) -> Result<R>,
    {
        match self.if_text(matcher)? {
            Some(text) => f(self, text).map(Some),
            None => Ok(None),
        }
    }

    // comment

    pub fn expect_comment<'q>(&mut self, matcher: impl Into<Matcher<'q>>) -> Result<String> {
        let matcher = matcher.into();
        self.expect_by(
            "expect_comment",
            true,
            || format!("comment matching {}", matcher),
            |t| t.is_comment(&matcher),
            body_of,
        )
    }

    pub fn expect_comment_with<'q, R, F>(&mut self, matcher: impl Into<Matcher<'q>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, String) -> Result<R>,
    {
        let text = self.expect_comment(matcher)?;
        f(self, text)
    }

    pub fn peek_expect_comment<'q>(&mut self, matcher: impl Into<Matcher<'q>>) -> Result<String> {
        let matcher = matcher.into();
        self.expect_by(
            "peek_expect_comment",
            false,
            || format!("comment matching {}", matcher),
            |t| t.is_comment(&matcher),
            body_of,
        )
    }

    pub fn peek_expect_comment_with<'q, R, F>(&mut self, matcher: impl Into<Matcher<'q>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, String) -> Result<R>,
    {
        let text = self.peek_expect_comment(matcher)?;
        f(self, text)
    }

    pub fn if_comment<'q>(&mut self, matcher: impl Into<Matcher<'q>>) -> Result<Option<String>> {
        let matcher = matcher.into();
        self.probe_by(|t| t.is_comment(&matcher), body_of)
    }

    pub fn if_comment_with<'q, R, F>(&mut self, matcher: impl Into<Matcher<'q>>, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut Self, String) -> Result<R>,
    {
        match self.if_comment(matcher)? {
            Some(text) => f(self, text).map(Some),
            None => Ok(None),
        }
    }

    // comment end

    pub fn expect_comment_end(&mut self) -> Result<Token> {
        self.expect_by("expect_comment_end", true, || "comment end".to_string(), Token::is_comment_end, Token::clone)
    }

    pub fn expect_comment_end_with<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        let token = self.expect_comment_end()?;
        f(self, token)
    }

    pub fn peek_expect_comment_end(&mut self) -> Result<Token> {
        self.expect_by("peek_expect_comment_end", false, || "comment end".to_string(), Token::is_comment_end, Token::clone)
    }

    pub fn peek_expect_comment_end_with<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        let token = self.peek_expect_comment_end()?;
        f(self, token)
    }

    pub fn if_comment_end(&mut self) -> Result<Option<Token>> {
        self.probe_by(Token::is_comment_end, Token::clone)
    }

    pub fn if_comment_end_with<R, F>(&mut self, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        match self.if_comment_end()? {
            Some(token) => f(self, token).map(Some),
            None => Ok(None),
        }
    }

    // end

    pub fn expect_end(&mut self) -> Result<Token> {
        self.expect_by("expect_end", true, || "end of input".to_string(), Token::is_end, Token::clone)
    }

    pub fn expect_end_with<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        let token = self.expect_end()?;
        f(self, token)
    }

    pub fn peek_expect_end(&mut self) -> Result<Token> {
        self.expect_by("peek_expect_end", false, || "end of input".to_string(), Token::is_end, Token::clone)
    }

    pub fn peek_expect_end_with<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        let token = self.peek_expect_end()?;
        f(self, token)
    }

    pub fn if_end(&mut self) -> Result<Option<Token>> {
        self.probe_by(Token::is_end, Token::clone)
    }

    pub fn if_end_with<R, F>(&mut self, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        match self.if_end()? {
            Some(token) => f(self, token).map(Some),
            None => Ok(None),
        }
    }
}

pub(crate) fn describe_close(tag: Option<&str>) -> String {
    match tag {
        Some(tag) => format!("</{}>", tag),
        None => "close tag".to_string(),
    }
}

fn body_of(token: &Token) -> String {
    token.body().unwrap_or_default().to_string()
}
