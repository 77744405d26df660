mod common;

use markup_cursor::{AttrsMatch, Cursor, Matcher, OpenQuery, Opened, Token};
use pretty_assertions::assert_eq;
use regex::Regex;

use common::{attrs, link_cursor, open};

fn parse(markup: &str) -> Cursor {
    Cursor::parse(markup).unwrap()
}

#[test]
pub fn test_expect_open_close() {
    let mut p = parse("<br/>");
    let opened = p.expect_open_close(OpenQuery::any()).unwrap();
    assert!(opened.token().unwrap().is_open(Some("br"), None));
    p.expect_end().unwrap();
}

#[test]
pub fn test_expect_open_close_not_paired() {
    let mut p = parse("<p><br/></p>");
    let err = p.expect_open_close(OpenQuery::any()).unwrap_err();
    assert!(err.is_unexpected_token());
    // the open half was consumed, the offending token was not
    assert_eq!(p.position(), 1);
    assert!(p.peek().unwrap().is_open(Some("br"), None));
}

#[test]
pub fn test_expect_open_close_not_open() {
    let mut p = parse("<br/>");
    p.next().unwrap();
    assert!(p.expect_open_close(OpenQuery::any()).unwrap_err().is_unexpected_token());
    p.next().unwrap();
    p.next().unwrap();
    assert!(p.expect_open_close(OpenQuery::any()).unwrap_err().is_end_of_stream());
}

#[test]
pub fn test_expect_open_close_tag() {
    let mut p = parse("<img src='pic.jpg'>");
    let opened = p.expect_open_close("img").unwrap();
    assert_eq!(opened.attr("src"), Some("pic.jpg"));

    let mut p = parse("<a href='index.html'>Link</a>");
    assert!(p.expect_open_close("a").unwrap_err().is_unexpected_token());

    let mut p = parse("<img src='pic.jpg'>");
    assert!(p.expect_open_close("a").unwrap_err().is_unexpected_token());
}

#[test]
pub fn test_expect_open_close_tag_and_attrs() {
    let mut p = parse("<img src='pic.jpg'>");
    let opened = p
        .expect_open_close(("img", AttrsMatch::new().attr("src", "pic.jpg")))
        .unwrap();
    assert_eq!(opened, Opened::Attrs(attrs(&[("src", "pic.jpg")])));

    let mut p = parse("<img src='pic.jpg'>");
    assert!(p
        .expect_open_close(("img", AttrsMatch::new().attr("src", "image.jpg")))
        .unwrap_err()
        .is_unexpected_token());
}

#[test]
pub fn test_expect_open_close_with() {
    let mut p = parse("<a href='index.html'>Link</a><br/>");
    let is_link = p
        .expect_open_close_with(OpenQuery::any(), |c, opened| {
            c.expect_text(Matcher::Any)?;
            Ok(opened.token().map_or(false, |t| t.is_open(Some("a"), None)))
        })
        .unwrap();
    assert!(is_link);
    p.expect_open("br").unwrap();
}

#[test]
pub fn test_expect_open_close_with_attrs() {
    let mut p = parse("<a href='index.html'>Link</a><br/>");
    let (href, text) = p
        .expect_open_close_with(("a", AttrsMatch::new().attr("href", "index.html")), |c, opened| {
            let text = c.expect_text(Matcher::Any)?;
            Ok((opened.attr("href").map(str::to_string), text))
        })
        .unwrap();
    assert_eq!(href.as_deref(), Some("index.html"));
    assert_eq!(text, "Link");
    p.expect_open("br").unwrap();
}

#[test]
pub fn test_expect_open_close_with_content_left() {
    let mut p = parse("<a href='index.html'>Link</a>");
    let err = p
        .expect_open_close_with(("a", AttrsMatch::new()), |_, _| Ok(()))
        .unwrap_err();
    assert!(err.is_unexpected_token());
}

#[test]
pub fn test_if_open_close() {
    let mut p = parse("<img src='pic.jpg'><br>");
    assert_eq!(p.if_open_close("br").unwrap(), None);
    assert_eq!(p.position(), 0);
    let opened = p.if_open_close("img").unwrap().unwrap();
    assert_eq!(opened.attr("src"), Some("pic.jpg"));
    assert!(p.if_open_close(OpenQuery::any()).unwrap().is_some());
    assert_eq!(p.if_open_close(OpenQuery::any()).unwrap(), None);
    p.expect_end().unwrap();
    assert!(p.if_open_close(OpenQuery::any()).unwrap_err().is_end_of_stream());
}

#[test]
pub fn test_if_open_close_close_half_is_mandatory() {
    let mut p = link_cursor();
    let err = p.if_open_close("a").unwrap_err();
    assert!(err.is_unexpected_token());
    assert_eq!(p.position(), 1);
}

#[test]
pub fn test_skip_to_open() {
    let mut p = parse("<!-- Comment --><a href='index.html'>Link</a>");
    let opened = p.skip_to_open(OpenQuery::any()).unwrap();
    let matching = AttrsMatch::new().attr("href", "index.html");
    assert!(opened.token().unwrap().is_open(Some("a"), Some(&matching)));
    p.expect_text(Regex::new(r"\s*Link\s*").unwrap()).unwrap();
    p.expect_close("a").unwrap();
}

#[test]
pub fn test_skip_to_open_exhausted() {
    let mut p = parse("<!-- Comment --><!-- Comment -->");
    let len = p.len();
    assert!(p.skip_to_open(OpenQuery::any()).unwrap_err().is_end_of_stream());
    // skipped tokens are not given back
    assert_eq!(p.position(), len);
}

#[test]
pub fn test_skip_to_open_tag() {
    let mut p = parse("<!-- Comment --><img src='pic.jpg'>");
    let opened = p.skip_to_open("img").unwrap();
    assert_eq!(opened.attr("src"), Some("pic.jpg"));
    p.expect_close("img").unwrap();

    let mut p = parse("<!-- Comment --><img src='pic.jpg'>");
    assert!(p.skip_to_open("a").unwrap_err().is_end_of_stream());
}

#[test]
pub fn test_skip_to_open_tag_and_attrs() {
    let markup = "<img src='other.jpg'><img src='pic.jpg'>";
    let mut p = parse(markup);
    let opened = p
        .skip_to_open(("img", AttrsMatch::new().attr("src", "pic.jpg")))
        .unwrap();
    assert_eq!(opened.attr("src"), Some("pic.jpg"));
    assert_eq!(p.position(), 3);

    let mut p = parse(markup);
    assert!(p
        .skip_to_open(("img", AttrsMatch::new().attr("src", "image.jpg")))
        .unwrap_err()
        .is_end_of_stream());
}

#[test]
pub fn test_skip_to_open_with() {
    let mut p = parse("<!-- Comment --><img src='pic.jpg'>");
    let src = p
        .skip_to_open_with("img", |_, opened| Ok(opened.attr("src").map(str::to_string)))
        .unwrap();
    assert_eq!(src.as_deref(), Some("pic.jpg"));
    p.expect_close("img").unwrap();
}

#[test]
pub fn test_skip_to_close() {
    let mut p = parse("<!-- Comment --><a href='index.html'>Link</a><br/>");
    let token = p.skip_to_close(None).unwrap();
    assert!(token.is_close(Some("a")));
    p.expect_open_close("br").unwrap();

    let mut p = parse("<!-- Comment --><!-- Comment -->");
    assert!(p.skip_to_close(None).unwrap_err().is_end_of_stream());
}

#[test]
pub fn test_skip_to_close_tag() {
    let mut p = parse("<!-- Comment --><img src='pic.jpg'><br/>");
    assert_eq!(p.skip_to_close("img").unwrap(), Token::close("img"));
    p.expect_open_close("br").unwrap();

    let mut p = parse("<!-- Comment --><img src='pic.jpg'><br/>");
    let tag = p
        .skip_to_close_with("br", |c, token| {
            c.expect_end()?;
            Ok(token.tag().map(str::to_string))
        })
        .unwrap();
    assert_eq!(tag.as_deref(), Some("br"));
}

#[test]
pub fn test_peek_skip_to_open() {
    let mut p = Cursor::from(vec![
        Token::comment("x"),
        Token::comment_end(),
        open("img", &[("src", "pic.jpg")]),
        Token::close("img"),
    ]);
    let opened = p.peek_skip_to_open("img").unwrap();
    assert_eq!(opened.attr("src"), Some("pic.jpg"));
    assert_eq!(p.position(), 2);
    // already on the match, nothing more is skipped
    assert_eq!(p.peek_skip_to_open("img").unwrap(), opened);
    assert_eq!(p.position(), 2);
    p.expect_open("img").unwrap();

    let src = p
        .peek_skip_to_open_with(OpenQuery::any(), |_, opened| Ok(opened.attr("src").map(str::to_string)));
    assert!(src.unwrap_err().is_end_of_stream());
    assert_eq!(p.position(), p.len());
}

#[test]
pub fn test_peek_skip_to_close() {
    let mut p = link_cursor();
    assert_eq!(p.peek_skip_to_close("a").unwrap(), Token::close("a"));
    assert_eq!(p.position(), 2);
    let tag = p
        .peek_skip_to_close_with(None, |c, token| {
            c.next()?;
            Ok(token.tag().map(str::to_string))
        })
        .unwrap();
    assert_eq!(tag.as_deref(), Some("a"));
    assert!(p.peek_skip_to_close(None).unwrap_err().is_end_of_stream());
}

#[test]
pub fn test_peek_iter_stops_on_false() {
    let mut p = link_cursor();
    let mut seen = vec![];
    p.peek_iter(|c, token| {
        seen.push(token.clone());
        match token {
            Token::Close { .. } => Ok(false),
            _ => {
                c.next()?;
                Ok(true)
            }
        }
    })
    .unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(p.position(), 2);
    assert!(p.peek().unwrap().is_close(Some("a")));
}

#[test]
pub fn test_peek_iter_stalled() {
    let mut p = link_cursor();
    let err = p.peek_iter(|_, _| Ok(true)).unwrap_err();
    assert!(err.is_iteration_stalled());
    assert_eq!(err.position(), Some(0));
}

#[test]
pub fn test_peek_iter_exhausted() {
    let mut p = link_cursor();
    let err = p
        .peek_iter(|c, _| {
            c.next()?;
            Ok(true)
        })
        .unwrap_err();
    assert!(err.is_end_of_stream());
    assert_eq!(p.position(), p.len());
}

#[test]
pub fn test_peek_iter_step_error() {
    let mut p = link_cursor();
    let err = p
        .peek_iter(|c, _| {
            c.expect_text(Matcher::Any)?;
            Ok(true)
        })
        .unwrap_err();
    assert!(err.is_unexpected_token());
    assert_eq!(p.position(), 0);
}

#[test]
pub fn test_peek_iter_list() {
    let mut p = parse("<ul><li>one</li><li>two</li><li>three</li></ul>");
    p.expect_open("ul").unwrap();
    let mut items = vec![];
    p.peek_iter(|c, token| {
        if !token.is_open(Some("li"), None) {
            return Ok(false);
        }
        let item = c.expect_open_close_with("li", |c, _| c.expect_text(Matcher::Any))?;
        items.push(item);
        Ok(true)
    })
    .unwrap();
    assert_eq!(items, vec!["one", "two", "three"]);
    p.expect_close("ul").unwrap();
    p.expect_end().unwrap();
}
