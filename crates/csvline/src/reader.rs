//! Blocking reader and the physical line sources it pulls from.

use std::io::{self, BufRead, BufReader, Read};
use std::sync::Arc;

use crate::decode::assembler::Assembler;
use crate::decode::matcher::MatcherCache;
use crate::error::Result;
use crate::options::Options;
use crate::record::Record;

/// Supplies physical lines with their terminators already stripped.
pub trait LineSource {
    fn next_line(&mut self) -> Option<io::Result<String>>;
}

/// Lines of any `BufRead`; `\n` and `\r\n` are both stripped.
pub struct BufReadLines<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> BufReadLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for BufReadLines<R> {
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.lines.next()
    }
}

/// Lines of an in-memory string.
pub struct StrLines<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> StrLines<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { lines: text.lines() }
    }
}

impl LineSource for StrLines<'_> {
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.lines.next().map(|l| Ok(l.to_string()))
    }
}

/// Lines from any iterator of strings.
pub struct IterLines<I> {
    iter: I,
}

impl<I> IterLines<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(lines: T) -> Self {
        Self {
            iter: lines.into_iter(),
        }
    }
}

impl<I> LineSource for IterLines<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    fn next_line(&mut self) -> Option<io::Result<String>> {
        self.iter.next().map(|l| Ok(l.into()))
    }
}

/// Pulls records from a `LineSource`, blocking on each line.
///
/// Header errors and source I/O errors are yielded once, after which the
/// iterator ends. Errors tied to one record surface on that record's accessors.
pub struct Reader<S> {
    source: S,
    assembler: Assembler,
}

impl<S: LineSource> Reader<S> {
    pub fn new(source: S, options: Options) -> Self {
        Self::with_cache(source, options, Arc::new(MatcherCache::new()))
    }

    /// Share compiled matchers with other readers through `cache`.
    pub fn with_cache(source: S, options: Options, cache: Arc<MatcherCache>) -> Self {
        Self {
            source,
            assembler: Assembler::new(options, cache),
        }
    }

    fn pull(&mut self) -> Result<Option<Record>> {
        loop {
            match self.source.next_line() {
                Some(line) => {
                    if let Some(record) = self.assembler.push_line(line?)? {
                        return Ok(Some(record));
                    }
                }
                None => return self.assembler.finish(),
            }
        }
    }
}

impl<S: LineSource> Iterator for Reader<S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.assembler.is_finished() {
            return None;
        }
        match self.pull() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                tracing::debug!(error = %e, "parse run aborted");
                self.assembler.abort();
                Some(Err(e))
            }
        }
    }
}

pub fn read_from_str<'a>(text: &'a str, options: Options) -> Reader<StrLines<'a>> {
    Reader::new(StrLines::new(text), options)
}

pub fn read_from_reader<R: Read>(reader: R, options: Options) -> Reader<BufReadLines<BufReader<R>>> {
    Reader::new(BufReadLines::new(BufReader::new(reader)), options)
}

pub fn read_lines<T>(lines: T, options: Options) -> Reader<IterLines<T::IntoIter>>
where
    T: IntoIterator,
    T::Item: Into<String>,
{
    Reader::new(IterLines::new(lines), options)
}
