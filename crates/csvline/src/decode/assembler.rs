//! Turns physical lines into records.
//!
//! The assembler is fed one physical line at a time and never pulls input
//! itself, so the blocking and the async readers drive the exact same
//! state machine and differ only in how they fetch the next line.

use std::sync::Arc;

use crate::decode::matcher::{Matcher, MatcherCache};
use crate::decode::quote::is_unterminated;
use crate::decode::scanner::{Span, split};
use crate::dialect::Dialect;
use crate::error::Result;
use crate::header;
use crate::options::{HeaderMode, Options};
use crate::record::{Record, RecordContext};

/// A logical line still absorbing continuation lines.
#[derive(Debug)]
struct Pending {
    text: String,
    start_line: usize,
    spans: Vec<Span>,
    continuations: usize,
}

#[derive(Debug)]
pub(crate) struct Assembler {
    options: Options,
    cache: Arc<MatcherCache>,
    line_no: usize,
    resolved: Option<(Dialect, Arc<Matcher>)>,
    context: Option<Arc<RecordContext>>,
    pending: Option<Pending>,
    finished: bool,
}

impl Assembler {
    pub(crate) fn new(options: Options, cache: Arc<MatcherCache>) -> Self {
        Self {
            options,
            cache,
            line_no: 0,
            resolved: None,
            context: None,
            pending: None,
            finished: false,
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    /// Stop after a fatal error; later calls yield nothing.
    pub(crate) fn abort(&mut self) {
        self.finished = true;
        self.pending = None;
    }

    /// Feed the next physical line; returns a record once one is complete.
    pub(crate) fn push_line(&mut self, line: String) -> Result<Option<Record>> {
        self.line_no += 1;

        if let Some(mut pending) = self.pending.take() {
            let Some((dialect, matcher)) = &self.resolved else {
                unreachable!("pending line without a resolved dialect");
            };
            pending.text.push_str(&dialect.line_terminator);
            pending.text.push_str(&line);
            pending.spans = split(&pending.text, matcher);
            pending.continuations += 1;
            return self.complete_or_wait(pending);
        }

        if self.skips(&line) {
            tracing::trace!(line = self.line_no, "skipping row");
            return Ok(None);
        }

        let (dialect, matcher) = self.resolved.get_or_insert_with(|| {
            let dialect = Dialect::resolve(&self.options, &line);
            tracing::debug!(separator = ?dialect.separator, "resolved dialect");
            let matcher = self.cache.get(dialect.matcher_key());
            (dialect, matcher)
        });
        let spans = if dialect.multiline {
            split(&line, matcher)
        } else {
            Vec::new()
        };
        let pending = Pending {
            text: line,
            start_line: self.line_no,
            spans,
            continuations: 0,
        };
        self.complete_or_wait(pending)
    }

    /// Input is exhausted: flush a record left open by an unclosed quote.
    pub(crate) fn finish(&mut self) -> Result<Option<Record>> {
        self.finished = true;
        match self.pending.take() {
            Some(pending) => {
                tracing::debug!(line = pending.start_line, "input ended inside a quoted value");
                self.emit(pending)
            }
            None => Ok(None),
        }
    }

    fn skips(&self, line: &str) -> bool {
        self.line_no <= self.options.rows_to_skip
            || self
                .options
                .skip_row
                .as_ref()
                .is_some_and(|p| p.matches(line, self.line_no))
    }

    fn complete_or_wait(&mut self, pending: Pending) -> Result<Option<Record>> {
        let open = match &self.resolved {
            Some((dialect, matcher)) if dialect.multiline => pending
                .spans
                .last()
                .is_some_and(|s| is_unterminated(s.slice(&pending.text), matcher)),
            _ => false,
        };
        if open {
            self.pending = Some(pending);
            return Ok(None);
        }
        self.emit(pending)
    }

    fn emit(&mut self, pending: Pending) -> Result<Option<Record>> {
        if pending.continuations > 0 {
            tracing::debug!(
                line = pending.start_line,
                continuations = pending.continuations,
                "assembled multiline record"
            );
        }
        let Some((dialect, matcher)) = &self.resolved else {
            unreachable!("record emitted before the dialect was resolved");
        };
        let mut primed = dialect.multiline.then_some(pending.spans);

        let ctx = match &self.context {
            Some(ctx) => Arc::clone(ctx),
            None => {
                let spans = primed.get_or_insert_with(|| split(&pending.text, matcher));
                let headers = header::resolve(
                    &pending.text,
                    spans,
                    dialect,
                    self.options.header_mode,
                    self.options.header_comparer,
                    &self.options.aliases,
                )?;
                let ctx = Arc::new(RecordContext::new(
                    headers,
                    Arc::clone(matcher),
                    dialect.clone(),
                    &self.options,
                ));
                self.context = Some(Arc::clone(&ctx));
                if self.options.header_mode == HeaderMode::Present {
                    return Ok(None);
                }
                ctx
            }
        };
        Ok(Some(Record::new(ctx, pending.text, pending.start_line, primed)))
    }
}
