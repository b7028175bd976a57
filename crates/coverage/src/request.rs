//! Cancellable single-shot coverage computation.
//!
//! A [`CoverageRequest`] spawns one provider call and owns the cancellation token for it. The
//! result comes back as a [`CoverageCompletion`] over the controller's channel. Suppression
//! happens in two places, both keyed on the same token:
//! - the task stops awaiting the provider and never sends once the token is cancelled,
//! - [`CoverageCompletion::open`] refuses to yield a result whose token was cancelled after it was
//!   queued, so arrival order on the channel never matters.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::model::{CoverageResult, Document};
use crate::sink::CoverageProvider;

/// Monotonic identifier of a coverage request, unique per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "COV#{}", self.0)
	}
}

/// Handle to one in-flight coverage computation.
#[derive(Debug)]
pub struct CoverageRequest {
	id: RequestId,
	document: Document,
	cancel: CancellationToken,
}

impl CoverageRequest {
	/// Starts computing coverage for `document` on the current tokio runtime.
	///
	/// The completion is sent on `completions` at most once, and only if the request has not
	/// been cancelled by the time the provider settles.
	pub fn start(
		id: RequestId,
		provider: Arc<dyn CoverageProvider>,
		document: Document,
		completions: mpsc::UnboundedSender<CoverageCompletion>,
	) -> Self {
		let cancel = CancellationToken::new();
		let task_cancel = cancel.clone();
		let task_document = document.clone();

		trace!(request_id = %id, uri = task_document.uri().as_str(), "coverage.request.start");
		tokio::spawn(async move {
			let outcome = tokio::select! {
				biased;
				_ = task_cancel.cancelled() => return,
				outcome = provider.provide_type_coverage(&task_document) => outcome,
			};

			if task_cancel.is_cancelled() {
				return;
			}

			let result = match outcome {
				Ok(result) => result,
				Err(err) => {
					warn!(request_id = %id, uri = task_document.uri().as_str(), error = %err, "coverage request failed");
					None
				}
			};

			let completion = CoverageCompletion {
				id,
				document: task_document,
				cancel: task_cancel,
				result: result.map(Arc::new),
			};
			if completions.send(completion).is_err() {
				debug!(request_id = %id, "coverage completion dropped: controller gone");
			}
		});

		Self { id, document, cancel }
	}

	/// Request identifier.
	pub fn id(&self) -> RequestId {
		self.id
	}

	/// Document the request computes coverage for.
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// Marks the request cancelled. Idempotent.
	pub fn cancel(&self) {
		if !self.cancel.is_cancelled() {
			trace!(request_id = %self.id, "coverage.request.cancel");
		}
		self.cancel.cancel();
	}

	/// Returns true once [`Self::cancel`] has been called.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}
}

/// Settled result of a [`CoverageRequest`], still gated by its cancellation token.
pub struct CoverageCompletion {
	id: RequestId,
	document: Document,
	cancel: CancellationToken,
	result: Option<Arc<CoverageResult>>,
}

impl CoverageCompletion {
	/// Identifier of the originating request.
	pub fn id(&self) -> RequestId {
		self.id
	}

	/// Returns true if the originating request was cancelled after this completion was queued.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Opens the completion, yielding the document and result only if the request is still live.
	pub fn open(self) -> Option<(Document, Option<Arc<CoverageResult>>)> {
		if self.cancel.is_cancelled() {
			return None;
		}
		Some((self.document, self.result))
	}
}

impl fmt::Debug for CoverageCompletion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CoverageCompletion")
			.field("id", &self.id)
			.field("uri", &self.document.uri().as_str())
			.field("cancelled", &self.cancel.is_cancelled())
			.field("has_result", &self.result.is_some())
			.finish()
	}
}
