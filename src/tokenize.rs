use std::collections::VecDeque;

use tracing::debug;
use xmlparser::{ElementEnd, StrSpan, Tokenizer};

use crate::config::Config;
use crate::error::Result;
use crate::token::{Attributes, Token};
use crate::util::decode_references;

/// Elements that never have content or a close tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// One lexical event handed from a tokenizer to the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open { tag: String, attrs: Attributes },
    Close { tag: String },
    Text(String),
    Comment(String),
    CommentEnd,
    EndOfInput,
}

impl Event {
    pub fn into_token(self) -> Token {
        match self {
            Event::Open { tag, attrs } => Token::Open { tag, attrs },
            Event::Close { tag } => Token::Close { tag },
            Event::Text(text) => Token::Text(text),
            Event::Comment(text) => Token::Comment(text),
            Event::CommentEnd => Token::CommentEnd,
            Event::EndOfInput => Token::End,
        }
    }
}

/// Turns loosely written markup into [`Event`]s.
///
/// Lexing is done by `xmlparser` in fragment mode, so text and several elements
/// may sit at the top level. On top of that the tokenizer keeps a stack of open
/// elements to recover HTML habits:
/// - void elements (`<br>`, `<img ...>`) and `<x/>` are closed right away
/// - a close tag for an element deeper in the stack closes everything above it
/// - a close tag that matches nothing open is dropped
/// - elements still open at the end of input are closed, innermost first
///
/// Comments produce a `Comment` event followed by `CommentEnd`. CDATA sections
/// become text. Declarations (`<!DOCTYPE ...>`, `<?xml ...?>`), processing
/// instructions and DTDs are dropped wherever they appear.
///
/// Everything else has to be well-formed as far as `xmlparser` is concerned.
/// Boolean attributes (`<input disabled>`), unquoted attribute values, a bare `<`
/// in text and `<script>` bodies containing `<` fail with
/// [`CursorError::Tokenize`](crate::CursorError::Tokenize).
pub struct MarkupTokenizer<'a> {
    markup: &'a str,
    inner: Tokenizer<'a>,
    resume_at: usize,
    config: Config,
    open_elements: Vec<String>,
    start_tag: Option<(String, Attributes)>,
    pending: VecDeque<Event>,
    finished: bool,
}

impl<'a> MarkupTokenizer<'a> {
    pub fn new(markup: &'a str, config: Config) -> Self {
        MarkupTokenizer {
            markup,
            inner: Tokenizer::from_fragment(markup, 0..markup.len()),
            resume_at: 0,
            config,
            open_elements: vec![],
            start_tag: None,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn name(&self, prefix: StrSpan<'_>, local: StrSpan<'_>) -> String {
        let name = if prefix.as_str().is_empty() {
            local.as_str().to_string()
        } else {
            format!("{}:{}", prefix.as_str(), local.as_str())
        };
        if self.config.lowercase_names {
            name.to_lowercase()
        } else {
            name
        }
    }

    fn value(&self, raw: StrSpan<'_>) -> String {
        if self.config.decode_references {
            decode_references(raw.as_str()).into_owned()
        } else {
            raw.as_str().to_string()
        }
    }

    fn is_void(&self, tag: &str) -> bool {
        self.config.close_void_elements && VOID_ELEMENTS.contains(&tag)
    }

    fn handle(&mut self, token: xmlparser::Token<'a>) {
        match token {
            xmlparser::Token::ElementStart { prefix, local, .. } => {
                self.start_tag = Some((self.name(prefix, local), Attributes::new()));
            }
            xmlparser::Token::Attribute { prefix, local, value, .. } => {
                let name = self.name(prefix, local);
                let value = self.value(value);
                if let Some((_, attrs)) = self.start_tag.as_mut() {
                    // first occurrence wins
                    attrs.entry(name).or_insert(value);
                }
            }
            xmlparser::Token::ElementEnd { end, span } => {
                self.resume_at = span.end();
                match end {
                    ElementEnd::Open => self.open_element(false),
                    ElementEnd::Empty => self.open_element(true),
                    ElementEnd::Close(prefix, local) => {
                        let tag = self.name(prefix, local);
                        self.close_element(tag);
                    }
                }
            }
            xmlparser::Token::Text { text } => {
                self.resume_at = text.end();
                let text = self.value(text);
                self.pending.push_back(Event::Text(text));
            }
            xmlparser::Token::Cdata { text, span } => {
                self.resume_at = span.end();
                self.pending.push_back(Event::Text(text.as_str().to_string()));
            }
            xmlparser::Token::Comment { text, span } => {
                self.resume_at = span.end();
                self.pending.push_back(Event::Comment(text.as_str().to_string()));
                self.pending.push_back(Event::CommentEnd);
            }
            xmlparser::Token::ProcessingInstruction { span, .. } => {
                self.resume_at = span.end();
            }
            _ => {}
        }
    }

    /// `xmlparser` refuses declarations inside a fragment. When the failing token
    /// is one, lex again from the first byte after it.
    fn skip_declaration(&mut self) -> bool {
        let markup = self.markup;
        let rest = &markup[self.resume_at..];
        let len = match declaration_len(rest) {
            Some(len) => len,
            None => return false,
        };
        debug!(declaration = &rest[..len], "dropped declaration");
        self.resume_at += len;
        self.inner = Tokenizer::from_fragment(markup, self.resume_at..markup.len());
        true
    }

    fn open_element(&mut self, self_closing: bool) {
        let (tag, attrs) = match self.start_tag.take() {
            Some(start_tag) => start_tag,
            None => return,
        };
        self.pending.push_back(Event::Open { tag: tag.clone(), attrs });
        if self_closing || self.is_void(&tag) {
            self.pending.push_back(Event::Close { tag });
        } else {
            self.open_elements.push(tag);
        }
    }

    fn close_element(&mut self, tag: String) {
        if self.is_void(&tag) {
            debug!(%tag, "dropped close tag of void element");
            return;
        }
        let index = match self.open_elements.iter().rposition(|open| *open == tag) {
            Some(index) => index,
            None => {
                debug!(%tag, "dropped close tag without open element");
                return;
            }
        };
        for open in self.open_elements.drain(index..).rev() {
            if open != tag {
                debug!(tag = %open, "closed implicitly");
            }
            self.pending.push_back(Event::Close { tag: open });
        }
    }

    fn finish(&mut self) {
        while let Some(tag) = self.open_elements.pop() {
            debug!(%tag, "closed at end of input");
            self.pending.push_back(Event::Close { tag });
        }
        self.pending.push_back(Event::EndOfInput);
        self.finished = true;
    }
}

impl<'a> Iterator for MarkupTokenizer<'a> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if self.finished {
                return None;
            }
            match self.inner.next() {
                Some(Ok(token)) => self.handle(token),
                Some(Err(error)) => {
                    if self.start_tag.is_none() && self.skip_declaration() {
                        continue;
                    }
                    self.finished = true;
                    return Some(Err(error.into()));
                }
                None => self.finish(),
            }
        }
    }
}

/// Byte length of the `<!...>` or `<?...?>` declaration `rest` starts with.
/// Comments and CDATA sections are not declarations.
fn declaration_len(rest: &str) -> Option<usize> {
    if rest.starts_with("<?") {
        return rest.find("?>").map(|end| end + 2);
    }
    if !rest.starts_with("<!") || rest.starts_with("<!--") || rest.starts_with("<![CDATA[") {
        return None;
    }
    let close = rest.find('>')?;
    if rest[..close].contains('[') {
        // internal DTD subset
        return rest.find("]>").map(|end| end + 2);
    }
    Some(close + 1)
}
