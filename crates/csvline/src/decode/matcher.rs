//! Compiled splitter tables and the cache that shares them between parse runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatcherKey {
    pub separator: char,
    pub single_quote: bool,
    pub backslash_escape: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Class {
    Other,
    /// First byte of the separator's UTF-8 encoding
    Separator,
    Quote,
    Backslash,
}

/// Byte classification for one `MatcherKey`. Immutable once built.
#[derive(Debug)]
pub struct Matcher {
    key: MatcherKey,
    separator: [u8; 4],
    separator_len: usize,
    classes: [Class; 256],
}

impl Matcher {
    pub fn new(key: MatcherKey) -> Self {
        let mut separator = [0u8; 4];
        let separator_len = key.separator.encode_utf8(&mut separator).len();

        let mut classes = [Class::Other; 256];
        classes[b'"' as usize] = Class::Quote;
        if key.single_quote {
            classes[b'\'' as usize] = Class::Quote;
        }
        if key.backslash_escape {
            classes[b'\\' as usize] = Class::Backslash;
        }
        // separator wins over quote and escape bytes
        classes[separator[0] as usize] = Class::Separator;

        Self {
            key,
            separator,
            separator_len,
            classes,
        }
    }

    pub fn key(&self) -> MatcherKey {
        self.key
    }

    pub fn separator(&self) -> char {
        self.key.separator
    }

    pub fn backslash_escape(&self) -> bool {
        self.key.backslash_escape
    }

    #[inline]
    pub(crate) fn class(&self, b: u8) -> Class {
        self.classes[b as usize]
    }

    #[inline]
    pub(crate) fn is_quote(&self, b: u8) -> bool {
        b == b'"' || (self.key.single_quote && b == b'\'')
    }

    /// Length of the separator if it starts at `bytes[i]`.
    #[inline]
    pub(crate) fn separator_at(&self, bytes: &[u8], i: usize) -> Option<usize> {
        if self.class(bytes[i]) != Class::Separator {
            return None;
        }
        let sep = &self.separator[..self.separator_len];
        bytes[i..].starts_with(sep).then_some(self.separator_len)
    }
}

/// Memoizes one `Matcher` per key.
///
/// Lookup-or-insert runs under a single lock; published matchers are shared
/// as `Arc` and never change.
#[derive(Debug, Default)]
pub struct MatcherCache {
    entries: Mutex<HashMap<MatcherKey, Arc<Matcher>>>,
}

impl MatcherCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: MatcherKey) -> Arc<Matcher> {
        // entries are inserted whole, a panicking holder cannot leave the map torn
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(key)
            .or_insert_with(|| {
                tracing::trace!(separator = ?key.separator, "building matcher");
                Arc::new(Matcher::new(key))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn key(separator: char) -> MatcherKey {
        MatcherKey {
            separator,
            single_quote: false,
            backslash_escape: false,
        }
    }

    #[test]
    fn same_key_shares_matcher() {
        let cache = MatcherCache::new();
        let a = cache.get(key(','));
        let b = cache.get(key(','));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_differing_in_one_flag_do_not_share() {
        let cache = MatcherCache::new();
        let plain = cache.get(key(';'));
        let quoted = cache.get(MatcherKey {
            single_quote: true,
            ..key(';')
        });
        assert!(!Arc::ptr_eq(&plain, &quoted));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn concurrent_callers_observe_one_instance() {
        let cache = Arc::new(MatcherCache::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get(key('\t')))
            })
            .collect();
        let matchers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(matchers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn multibyte_separator_matches_whole_sequence() {
        let m = Matcher::new(key('§'));
        let line = "a§b";
        assert_eq!(m.separator_at(line.as_bytes(), 1), Some('§'.len_utf8()));
        assert_eq!(m.separator_at(line.as_bytes(), 0), None);
    }
}
