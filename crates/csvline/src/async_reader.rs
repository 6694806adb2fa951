//! Suspend-capable reader over tokio's `AsyncBufRead`.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::decode::assembler::Assembler;
use crate::decode::matcher::MatcherCache;
use crate::error::Result;
use crate::options::Options;
use crate::record::Record;

/// Async counterpart of [`Reader`](crate::Reader); yields while waiting for lines.
pub struct AsyncReader<R> {
    lines: Lines<R>,
    assembler: Assembler,
}

impl<R: AsyncBufRead + Unpin> AsyncReader<R> {
    pub fn new(reader: R, options: Options) -> Self {
        Self::with_cache(reader, options, Arc::new(MatcherCache::new()))
    }

    pub fn with_cache(reader: R, options: Options, cache: Arc<MatcherCache>) -> Self {
        Self {
            lines: reader.lines(),
            assembler: Assembler::new(options, cache),
        }
    }

    /// Next record, or `None` once input is exhausted or a fatal error was returned.
    pub async fn next_record(&mut self) -> Option<Result<Record>> {
        if self.assembler.is_finished() {
            return None;
        }
        match self.pull().await {
            Ok(record) => record.map(Ok),
            Err(e) => {
                tracing::debug!(error = %e, "parse run aborted");
                self.assembler.abort();
                Some(Err(e))
            }
        }
    }

    async fn pull(&mut self) -> Result<Option<Record>> {
        while let Some(line) = self.lines.next_line().await? {
            if let Some(record) = self.assembler.push_line(line)? {
                return Ok(Some(record));
            }
        }
        self.assembler.finish()
    }
}
