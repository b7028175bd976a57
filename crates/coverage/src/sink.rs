//! Collaborator seams between the controller and its host.

use async_trait::async_trait;
use lsp_types::{Diagnostic, Uri};

use crate::Result;
use crate::model::{CoverageResult, Document};
use crate::render::StatusView;

/// Backend capable of computing type coverage for a document.
///
/// `Ok(None)` means the backend had nothing to report. Errors and `None` are both shown to the
/// user as "coverage unknown".
#[async_trait]
pub trait CoverageProvider: Send + Sync {
	/// Computes coverage for `document`.
	async fn provide_type_coverage(&self, document: &Document) -> Result<Option<CoverageResult>>;
}

/// Decides whether a document is within the checker's purview.
pub trait DocumentFilter: Send + Sync {
	/// Returns true if coverage should be tracked for `document`.
	fn matches(&self, document: &Document) -> bool;
}

impl<F> DocumentFilter for F
where
	F: Fn(&Document) -> bool + Send + Sync,
{
	fn matches(&self, document: &Document) -> bool {
		self(document)
	}
}

/// Host query for the document in the focused editor.
pub trait ActiveDocument {
	/// Returns the active editor's document, if any.
	fn active_document(&self) -> Option<Document>;
}

/// Status widget receiving the coverage summary.
pub trait StatusSink {
	/// Replaces the displayed status. `None` means "no coverage".
	fn set_coverage(&mut self, status: Option<StatusView>);
}

/// Diagnostics store receiving uncovered-range annotations.
pub trait AnnotationSink {
	/// Removes every annotation.
	fn clear(&mut self);

	/// Replaces the annotations published for `uri`.
	fn set(&mut self, uri: &Uri, annotations: Vec<Diagnostic>);

	/// Releases the underlying store. Called once from [`crate::CoverageController::dispose`].
	fn dispose(&mut self) {
		self.clear();
	}
}
