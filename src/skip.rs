//! Compound operations: open/close pairs, skipping ahead and guarded iteration.

use tracing::trace;

use crate::cursor::{describe_close, Cursor};
use crate::error::{CursorError, Result};
use crate::query::{OpenQuery, Opened};
use crate::token::Token;

impl Cursor {
    /// Expect an open tag and the close tag of the same element right after it.
    pub fn expect_open_close<'q>(&mut self, query: impl Into<OpenQuery<'q>>) -> Result<Opened> {
        self.expect_open_close_with(query, |_, opened| Ok(opened))
    }

    /// Like [`Cursor::expect_open_close`], running `f` between the open and the close
    /// tag so it can consume the element's content. The close tag must carry the tag
    /// of the open token that matched, even when the query named no tag.
    pub fn expect_open_close_with<'q, R, F>(&mut self, query: impl Into<OpenQuery<'q>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Opened) -> Result<R>,
    {
        let query = query.into();
        let (tag, opened) = self.expect_by(
            "expect_open_close",
            true,
            || query.to_string(),
            |t| query.matches(t),
            |t| (open_tag_of(t), query.opened(t)),
        )?;
        let value = f(self, opened)?;
        self.expect_pair_close("expect_open_close", &tag)?;
        Ok(value)
    }

    /// Probe for an open tag. Once it matched, the close tag is mandatory and a
    /// mismatch is an error rather than `None`.
    pub fn if_open_close<'q>(&mut self, query: impl Into<OpenQuery<'q>>) -> Result<Option<Opened>> {
        self.if_open_close_with(query, |_, opened| Ok(opened))
    }

    pub fn if_open_close_with<'q, R, F>(&mut self, query: impl Into<OpenQuery<'q>>, f: F) -> Result<Option<R>>
    where
        F: FnOnce(&mut Self, Opened) -> Result<R>,
    {
        let query = query.into();
        let (tag, opened) = match self.probe_by(|t| query.matches(t), |t| (open_tag_of(t), query.opened(t)))? {
            Some(matched) => matched,
            None => return Ok(None),
        };
        let value = f(self, opened)?;
        self.expect_pair_close("if_open_close", &tag)?;
        Ok(Some(value))
    }

    fn expect_pair_close(&mut self, operation: &'static str, tag: &str) -> Result<Token> {
        self.expect_by(
            operation,
            true,
            || describe_close(Some(tag)),
            |t| t.is_close(Some(tag)),
            Token::clone,
        )
    }

    /// Discard tokens up to and including the first open tag matching `query`.
    /// Skipped tokens stay consumed when the input runs out first.
    pub fn skip_to_open<'q>(&mut self, query: impl Into<OpenQuery<'q>>) -> Result<Opened> {
        let query = query.into();
        let start = self.position();
        loop {
            let token = self.next()?;
            if query.matches(token) {
                let opened = query.opened(token);
                trace!(skipped = self.position() - start - 1, "skipped to {}", query);
                return Ok(opened);
            }
        }
    }

    pub fn skip_to_open_with<'q, R, F>(&mut self, query: impl Into<OpenQuery<'q>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Opened) -> Result<R>,
    {
        let opened = self.skip_to_open(query)?;
        f(self, opened)
    }

    pub fn skip_to_close<'q>(&mut self, tag: impl Into<Option<&'q str>>) -> Result<Token> {
        let tag = tag.into();
        let start = self.position();
        loop {
            let token = self.next()?;
            if token.is_close(tag) {
                let token = token.clone();
                trace!(skipped = self.position() - start - 1, "skipped to {}", describe_close(tag));
                return Ok(token);
            }
        }
    }

    pub fn skip_to_close_with<'q, R, F>(&mut self, tag: impl Into<Option<&'q str>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        let token = self.skip_to_close(tag)?;
        f(self, token)
    }

    /// Discard tokens before the first open tag matching `query`, leaving the cursor on it.
    pub fn peek_skip_to_open<'q>(&mut self, query: impl Into<OpenQuery<'q>>) -> Result<Opened> {
        let query = query.into();
        loop {
            let token = self.peek()?;
            if query.matches(token) {
                return Ok(query.opened(token));
            }
            self.advance();
        }
    }

    pub fn peek_skip_to_open_with<'q, R, F>(&mut self, query: impl Into<OpenQuery<'q>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Opened) -> Result<R>,
    {
        let opened = self.peek_skip_to_open(query)?;
        f(self, opened)
    }

    pub fn peek_skip_to_close<'q>(&mut self, tag: impl Into<Option<&'q str>>) -> Result<Token> {
        let tag = tag.into();
        loop {
            let token = self.peek()?;
            if token.is_close(tag) {
                return Ok(token.clone());
            }
            self.advance();
        }
    }

    pub fn peek_skip_to_close_with<'q, R, F>(&mut self, tag: impl Into<Option<&'q str>>, f: F) -> Result<R>
    where
        F: FnOnce(&mut Self, Token) -> Result<R>,
    {
        let token = self.peek_skip_to_close(tag)?;
        f(self, token)
    }

    /// Call `step` with the current token until it returns `false`.
    ///
    /// Each call that does not stop the loop has to consume at least one token,
    /// otherwise the loop fails with [`CursorError::IterationStalled`].
    pub fn peek_iter<F>(&mut self, mut step: F) -> Result<()>
    where
        F: FnMut(&mut Self, Token) -> Result<bool>,
    {
        loop {
            let position = self.position();
            let token = self.peek()?.clone();
            if !step(self, token)? {
                return Ok(());
            }
            if self.position() == position {
                return Err(CursorError::IterationStalled { position });
            }
        }
    }
}

fn open_tag_of(token: &Token) -> String {
    token.tag().unwrap_or_default().to_string()
}
