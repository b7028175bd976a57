//! Eligibility predicate built from [`SelectorConfig`].

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::Result;
use crate::config::SelectorConfig;
use crate::model::Document;
use crate::sink::DocumentFilter;

/// Matches documents by language id or path glob.
#[derive(Debug, Clone)]
pub struct DocumentSelector {
	languages: Vec<String>,
	patterns: GlobSet,
}

impl DocumentSelector {
	/// Compiles the selector. Fails on an invalid glob.
	pub fn new(config: &SelectorConfig) -> Result<Self> {
		let mut builder = GlobSetBuilder::new();
		for pattern in &config.patterns {
			builder.add(Glob::new(pattern)?);
		}
		Ok(Self {
			languages: config.languages.clone(),
			patterns: builder.build()?,
		})
	}
}

impl DocumentFilter for DocumentSelector {
	fn matches(&self, document: &Document) -> bool {
		if self.languages.iter().any(|language| language == document.language_id()) {
			return true;
		}
		document.path().is_some_and(|path| self.patterns.is_match(path))
	}
}
