//! Header row resolution: synthesized names, duplicate detection and alias groups.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::decode::quote::normalize;
use crate::decode::scanner::Span;
use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::options::{HeaderComparer, HeaderMode};

/// Column names in order plus the name→index lookup used by records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    names: Vec<String>,
    lookup: HashMap<String, usize>,
    comparer: HeaderComparer,
}

impl HeaderMap {
    /// `Column1..ColumnN`
    pub fn synthesize(count: usize, comparer: HeaderComparer) -> Self {
        let names: Vec<String> = (1..=count).map(|i| format!("Column{i}")).collect();
        let lookup = names
            .iter()
            .enumerate()
            .map(|(i, n)| (comparer.key(n).into_owned(), i))
            .collect();
        Self {
            names,
            lookup,
            comparer,
        }
    }

    pub fn from_names(names: Vec<String>, comparer: HeaderComparer) -> Result<Self> {
        let mut lookup = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            match lookup.entry(comparer.key(name).into_owned()) {
                Entry::Occupied(_) => {
                    return Err(Error::DuplicateHeader {
                        header: name.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(i);
                }
            }
        }
        Ok(Self {
            names,
            lookup,
            comparer,
        })
    }

    /// Point every member of each group at the one column the group matches.
    ///
    /// Only real column names count as matches, so applying the same groups
    /// again leaves the map unchanged.
    pub fn apply_aliases(&mut self, groups: &[Vec<String>]) -> Result<()> {
        let mut resolved: Vec<(usize, &[String])> = Vec::new();
        for group in groups {
            let mut column: Option<usize> = None;
            for alias in group {
                let Some(idx) = self.column_index(alias) else {
                    continue;
                };
                match column {
                    Some(prev) if prev != idx => {
                        return Err(Error::AmbiguousAlias {
                            group: group.clone(),
                        });
                    }
                    _ => column = Some(idx),
                }
            }
            if let Some(idx) = column {
                resolved.push((idx, group));
            }
        }
        // nothing is rewritten until every group has been checked
        for (idx, group) in resolved {
            for alias in group {
                self.lookup.insert(self.comparer.key(alias).into_owned(), idx);
            }
        }
        Ok(())
    }

    /// Index of the column actually named `name` (aliases ignored).
    fn column_index(&self, name: &str) -> Option<usize> {
        let key = self.comparer.key(name);
        let idx = *self.lookup.get(key.as_ref())?;
        (self.comparer.key(&self.names[idx]) == key).then_some(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(self.comparer.key(name).as_ref()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn comparer(&self) -> HeaderComparer {
        self.comparer
    }
}

/// Build the header map from the first eligible logical line.
pub fn resolve(
    line: &str,
    spans: &[Span],
    dialect: &Dialect,
    mode: HeaderMode,
    comparer: HeaderComparer,
    aliases: &[Vec<String>],
) -> Result<HeaderMap> {
    let mut headers = match mode {
        HeaderMode::Absent => HeaderMap::synthesize(spans.len(), comparer),
        HeaderMode::Present => {
            let names = spans
                .iter()
                .map(|s| normalize(s.slice(line), dialect).into_owned())
                .collect();
            HeaderMap::from_names(names, comparer)?
        }
    };
    headers.apply_aliases(aliases)?;
    tracing::debug!(columns = headers.len(), mode = ?mode, "resolved headers");
    Ok(headers)
}
