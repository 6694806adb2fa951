#![doc = include_str!("../README.md")]

pub mod error;
pub mod options;
pub mod dialect;
pub mod decode;
pub mod header;
pub mod record;
pub mod reader;

#[cfg(feature = "tokio")]
pub mod async_reader;

pub use crate::decode::matcher::{Matcher, MatcherCache, MatcherKey};
pub use crate::decode::quote::{is_unterminated, normalize, quote_field};
pub use crate::decode::scanner::{Span, split};
pub use crate::dialect::{Dialect, detect_separator};
pub use crate::error::{Error, Result};
pub use crate::header::HeaderMap;
pub use crate::options::{HeaderComparer, HeaderMode, MissingColumnPolicy, Options, Separator, SkipRow};
pub use crate::reader::{
    BufReadLines, IterLines, LineSource, Reader, StrLines, read_from_reader, read_from_str, read_lines,
};
pub use crate::record::Record;

#[cfg(feature = "tokio")]
pub use crate::async_reader::AsyncReader;
