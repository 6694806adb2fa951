use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use crate::decode::matcher::Matcher;
use crate::decode::quote::normalize;
use crate::decode::scanner::{Span, split};
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::header::HeaderMap;
use crate::options::{MissingColumnPolicy, Options};

/// Read-only state shared by every record of one parse run.
#[derive(Debug)]
pub(crate) struct RecordContext {
    pub(crate) headers: HeaderMap,
    pub(crate) matcher: Arc<Matcher>,
    pub(crate) dialect: Dialect,
    pub(crate) missing_column_policy: MissingColumnPolicy,
    pub(crate) validate_column_count: bool,
    pub(crate) trim_result_on_access: bool,
}

impl RecordContext {
    pub(crate) fn new(headers: HeaderMap, matcher: Arc<Matcher>, dialect: Dialect, options: &Options) -> Self {
        Self {
            headers,
            matcher,
            dialect,
            missing_column_policy: options.missing_column_policy,
            validate_column_count: options.validate_column_count,
            trim_result_on_access: options.trim_result_on_access,
        }
    }
}

/// One logical line bound to the header map of its parse run.
///
/// Fields are split on first access and each value is normalized on its own
/// first access; both results are kept for the life of the record.
pub struct Record {
    ctx: Arc<RecordContext>,
    raw: String,
    index: usize,
    spans: OnceCell<Vec<Span>>,
    values: OnceCell<Box<[OnceCell<String>]>>,
}

impl Record {
    pub(crate) fn new(ctx: Arc<RecordContext>, raw: String, index: usize, spans: Option<Vec<Span>>) -> Self {
        Self {
            ctx,
            raw,
            index,
            spans: spans.map(OnceCell::from).unwrap_or_default(),
            values: OnceCell::new(),
        }
    }

    /// Text of the logical line, continuation lines included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 1-based physical line on which the record starts.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn headers(&self) -> &[String] {
        self.ctx.headers.names()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.ctx.headers.contains(name)
    }

    fn spans(&self) -> &[Span] {
        self.spans.get_or_init(|| split(&self.raw, &self.ctx.matcher))
    }

    /// Raw field text, quotes and escapes included. Never validated.
    pub fn raw_fields(&self) -> Vec<&str> {
        self.spans().iter().map(|s| s.slice(&self.raw)).collect()
    }

    fn fields(&self) -> Result<&[Span]> {
        let spans = self.spans();
        let expected = self.ctx.headers.len();
        if self.ctx.validate_column_count && spans.len() != expected {
            return Err(Error::ColumnCountMismatch {
                line: self.index,
                expected,
                actual: spans.len(),
            });
        }
        Ok(spans)
    }

    fn value_at(&self, spans: &[Span], index: usize) -> &str {
        let cells = self
            .values
            .get_or_init(|| (0..spans.len()).map(|_| OnceCell::new()).collect());
        cells[index].get_or_init(|| normalize(spans[index].slice(&self.raw), &self.ctx.dialect).into_owned())
    }

    pub fn column_count(&self) -> Result<usize> {
        self.fields().map(<[Span]>::len)
    }

    /// Value of the column called `name`.
    ///
    /// `Ok(None)` only under `MissingColumnPolicy::Absent`.
    pub fn get(&self, name: &str) -> Result<Option<&str>> {
        let Some(index) = self.ctx.headers.index_of(name) else {
            return match self.ctx.missing_column_policy {
                MissingColumnPolicy::Empty => Ok(Some("")),
                MissingColumnPolicy::Absent => Ok(None),
                MissingColumnPolicy::Error => Err(Error::UnknownHeader {
                    header: name.to_string(),
                }),
            };
        };
        let spans = self.fields()?;
        if index >= spans.len() {
            return Err(Error::MissingColumn {
                line: self.index,
                header: name.to_string(),
                expected: self.ctx.headers.len(),
                actual: spans.len(),
            });
        }
        Ok(Some(self.accessed(spans, index)))
    }

    fn accessed(&self, spans: &[Span], index: usize) -> &str {
        let value = self.value_at(spans, index);
        if self.ctx.trim_result_on_access {
            value.trim()
        } else {
            value
        }
    }

    pub fn get_index(&self, index: usize) -> Result<&str> {
        let spans = self.fields()?;
        if index >= spans.len() {
            return Err(Error::IndexOutOfRange {
                line: self.index,
                index,
                count: spans.len(),
            });
        }
        Ok(self.value_at(spans, index))
    }

    /// Every normalized value in column order.
    pub fn values(&self) -> Result<Vec<&str>> {
        let spans = self.fields()?;
        Ok((0..spans.len()).map(|i| self.value_at(spans, i)).collect())
    }

    /// Header name paired with this row's value, `None` past the row's end.
    ///
    /// Values are trimmed the same way `get` trims them.
    pub fn iter(&self) -> Result<impl Iterator<Item = (&str, Option<&str>)> + '_> {
        let spans = self.fields()?;
        Ok(self
            .ctx
            .headers
            .names()
            .iter()
            .enumerate()
            .map(move |(i, name)| (name.as_str(), (i < spans.len()).then(|| self.accessed(spans, i)))))
    }

    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let mut map = serde_json::Map::with_capacity(self.ctx.headers.len());
        for (name, value) in self.iter()? {
            let v = match value {
                Some(s) => serde_json::Value::String(s.to_string()),
                None => serde_json::Value::Null,
            };
            map.insert(name.to_string(), v);
        }
        Ok(serde_json::Value::Object(map))
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("index", &self.index)
            .field("raw", &self.raw)
            .finish()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let pairs = self.iter().map_err(serde::ser::Error::custom)?;
        let mut map = serializer.serialize_map(Some(self.ctx.headers.len()))?;
        for (name, value) in pairs {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
