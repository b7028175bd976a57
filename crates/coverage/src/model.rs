//! Coverage values and document identity.

use std::path::{Path, PathBuf};

use lsp_types::{Range, Uri};

/// A contiguous source span the backend could not type.
#[derive(Debug, Clone, PartialEq)]
pub struct UncoveredRange {
	/// Span in LSP line/character coordinates.
	pub range: Range,
	/// Optional explanation supplied by the backend.
	pub message: Option<String>,
}

impl UncoveredRange {
	/// Creates a range without a message.
	pub fn new(range: Range) -> Self {
		Self { range, message: None }
	}

	/// Attaches a message.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

/// Result of one coverage computation.
///
/// Replaced wholesale on each computation; the controller shares it behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageResult {
	covered_percent: f64,
	uncovered_ranges: Vec<UncoveredRange>,
}

impl CoverageResult {
	/// Builds a result, clamping the percent into `0..=100`.
	///
	/// Returns `None` for a NaN percent, which the backend uses for "nothing analyzed".
	pub fn new(covered_percent: f64, uncovered_ranges: Vec<UncoveredRange>) -> Option<Self> {
		if covered_percent.is_nan() {
			return None;
		}
		Some(Self {
			covered_percent: covered_percent.clamp(0.0, 100.0),
			uncovered_ranges,
		})
	}

	/// Percentage of the document understood by the backend.
	pub fn covered_percent(&self) -> f64 {
		self.covered_percent
	}

	/// Uncovered spans in backend order.
	pub fn uncovered_ranges(&self) -> &[UncoveredRange] {
		&self.uncovered_ranges
	}
}

/// An editor document as seen by the coverage tracker.
///
/// Identity is the URI: two documents are the same document iff their URIs are equal.
#[derive(Debug, Clone)]
pub struct Document {
	uri: Uri,
	language_id: String,
	path: Option<PathBuf>,
}

impl Document {
	/// Creates a document handle.
	pub fn new(uri: Uri, language_id: impl Into<String>) -> Self {
		Self {
			uri,
			language_id: language_id.into(),
			path: None,
		}
	}

	/// Attaches the filesystem path used for pattern matching.
	pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// Document URI.
	pub fn uri(&self) -> &Uri {
		&self.uri
	}

	/// LSP language identifier.
	pub fn language_id(&self) -> &str {
		&self.language_id
	}

	/// Filesystem path, if the document is backed by a file.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}
}

impl PartialEq for Document {
	fn eq(&self, other: &Self) -> bool {
		self.uri == other.uri
	}
}

impl Eq for Document {}
