//! Assertion-style cursor over markup tokens, for scraping code that reads
//! "expect an `<a>` with this `href`, then its text" instead of walking a DOM.
//!
//! ```
//! use markup_cursor::{AttrsMatch, Cursor};
//!
//! # fn main() -> markup_cursor::Result<()> {
//! let mut cursor = Cursor::parse("<p><a href='index.html'>Link</a></p>")?;
//! cursor.expect_open("p")?;
//! let attrs = cursor.expect_open(("a", AttrsMatch::new().attr("href", "index.html")))?;
//! assert_eq!(attrs.attr("href"), Some("index.html"));
//! assert_eq!(cursor.expect_text("Link")?, "Link");
//! cursor.expect_close("a")?;
//! cursor.expect_close("p")?;
//! cursor.expect_end()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod matcher;
pub mod query;
pub mod token;
pub mod tokenize;

mod skip;
mod util;
mod xmlchar;

pub use config::Config;
pub use cursor::{Cursor, CursorBuilder};
pub use error::{CursorError, Result};
pub use matcher::{AttrsMatch, Matcher};
pub use query::{OpenQuery, Opened};
pub use token::{Attributes, Token};
pub use tokenize::{Event, MarkupTokenizer};
pub use util::decode_references;
pub use xmlchar::is_whitespace_only;
