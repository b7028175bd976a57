//! Coverage configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// User-facing coverage settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CoverageConfig {
	/// Show uncovered ranges as annotations from startup.
	pub show_uncovered: bool,
	/// Which documents coverage is tracked for.
	pub selector: SelectorConfig,
}

impl CoverageConfig {
	/// Parses a TOML document.
	pub fn from_toml(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Initial value of the show-uncovered preference.
	pub fn should_show_uncovered_by_default(&self) -> bool {
		self.show_uncovered
	}
}

/// Document selector settings.
///
/// A document is eligible when its language id is listed, or when its path matches one of
/// the glob patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
	/// LSP language identifiers.
	pub languages: Vec<String>,
	/// Path globs, e.g. `**/*.js.flow`.
	pub patterns: Vec<String>,
}

impl Default for SelectorConfig {
	fn default() -> Self {
		Self {
			languages: vec!["javascript".into(), "javascriptreact".into()],
			patterns: Vec::new(),
		}
	}
}
