//! Prefix lookup and upstream URL rewriting.
//!
//! # Responsibilities
//! - Map a prefix name (first path segment) to an upstream base URL
//! - Rewrite the remaining path segments onto the upstream base
//! - Report no-match explicitly so the caller can fall back to static files
//!
//! # Design Decisions
//! - Plain HashMap: O(1) lookup, duplicate registrations overwrite
//! - The rewrite joins the remaining segments verbatim; no normalization,
//!   no percent-decoding, no trailing-slash fixups

use std::collections::HashMap;

/// Immutable mapping from prefix name to upstream base URL.
///
/// Built once at startup from repeated `--proxy` flags and shared read-only
/// across all concurrently handled requests.
#[derive(Debug, Clone, Default)]
pub struct ProxyTable {
    entries: HashMap<String, String>,
}

impl ProxyTable {
    /// Create an empty table. Every request falls through to static serving.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(url, name)` pairs in registration order.
    /// Registering the same name twice keeps the last URL.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = Self::new();
        for (url, name) in pairs {
            table.insert(name, url);
        }
        table
    }

    /// Register one prefix. An existing entry with the same name is replaced.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.entries.insert(name.into(), url.into());
    }

    /// Look up the upstream base URL for a prefix name, if registered.
    pub fn upstream(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over `(name, url)` entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()))
    }

    /// Resolve a request path against the table.
    ///
    /// The path is split on `/` with the leading empty segment discarded.
    /// If the first segment is a registered prefix, returns the upstream base
    /// URL with the remaining segments appended (`/`-joined); with no
    /// remaining segments the base URL is returned as-is. Returns `None` when
    /// the path has no segments or the first segment is not registered.
    pub fn resolve(&self, path: &str) -> Option<String> {
        let mut segments = path.split('/');
        if path.starts_with('/') {
            segments.next();
        }
        let first = segments.next()?;
        let base = self.entries.get(first)?;
        let rest: Vec<&str> = segments.collect();
        if rest.is_empty() {
            Some(base.clone())
        } else {
            Some(format!("{}/{}", base, rest.join("/")))
        }
    }
}
