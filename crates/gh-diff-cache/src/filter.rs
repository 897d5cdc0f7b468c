//! Include/exclude filtering of changed files
//!
//! Both patterns are unanchored regular expressions: a path is kept when the
//! include pattern matches anywhere in it and the exclude pattern (if any)
//! matches nowhere. An empty include pattern keeps nothing.

use crate::error::{DiffCacheError, Result};
use gh_client::ChangedFile;
use regex::Regex;

/// Compiled include/exclude pattern pair
#[derive(Debug, Clone)]
pub struct PatternFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl PatternFilter {
    pub fn new(include: &str, exclude: &str) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        let Some(include) = &self.include else {
            return false;
        };
        include.is_match(path) && !self.exclude.as_ref().is_some_and(|ex| ex.is_match(path))
    }

    /// Matching paths in input order
    pub fn filter_paths<'a>(&self, files: &'a [ChangedFile]) -> Vec<&'a str> {
        files
            .iter()
            .map(|file| file.filename.as_str())
            .filter(|path| self.matches(path))
            .collect()
    }

    /// Matching paths joined by single spaces
    pub fn filter(&self, files: &[ChangedFile]) -> String {
        self.filter_paths(files).join(" ")
    }
}

fn compile(pattern: &str) -> Result<Option<Regex>> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern)
        .map(Some)
        .map_err(|source| DiffCacheError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Filter `files` with a one-off pattern pair
pub fn filter_with_regex(files: &[ChangedFile], include: &str, exclude: &str) -> Result<String> {
    Ok(PatternFilter::new(include, exclude)?.filter(files))
}
