//! Coverage state machine.
//!
//! [`CoverageController`] owns [`ControllerState`] exclusively. Every public transition names the
//! fields it touches, then calls [`CoverageController::render`] exactly once, so no intermediate
//! state is ever observable by the sinks.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::config::CoverageConfig;
use crate::model::{CoverageResult, Document};
use crate::render::{render_annotations, render_status};
use crate::request::{CoverageCompletion, CoverageRequest, RequestId};
use crate::sink::{ActiveDocument, AnnotationSink, CoverageProvider, DocumentFilter, StatusSink};

/// Everything the views are projected from.
#[derive(Debug, Default)]
pub struct ControllerState {
	show_uncovered: bool,
	active_document: Option<Document>,
	coverage: Option<Arc<CoverageResult>>,
	pending_request: Option<CoverageRequest>,
	is_connected: bool,
}

impl ControllerState {
	/// Fresh state: disconnected, nothing active.
	pub fn new(show_uncovered: bool) -> Self {
		Self {
			show_uncovered,
			..Self::default()
		}
	}

	/// User display preference for uncovered ranges.
	pub fn show_uncovered(&self) -> bool {
		self.show_uncovered
	}

	/// Document currently tracked.
	pub fn active_document(&self) -> Option<&Document> {
		self.active_document.as_ref()
	}

	/// Last completed result for the active document.
	pub fn coverage(&self) -> Option<&Arc<CoverageResult>> {
		self.coverage.as_ref()
	}

	/// The in-flight computation, if any.
	pub fn pending_request(&self) -> Option<&CoverageRequest> {
		self.pending_request.as_ref()
	}

	/// Backend availability.
	pub fn is_connected(&self) -> bool {
		self.is_connected
	}
}

/// Tracks type coverage for the active document and keeps the status and annotation views
/// consistent with it.
pub struct CoverageController {
	state: ControllerState,
	provider: Arc<dyn CoverageProvider>,
	filter: Box<dyn DocumentFilter>,
	status: Box<dyn StatusSink>,
	annotations: Box<dyn AnnotationSink>,
	completions_tx: mpsc::UnboundedSender<CoverageCompletion>,
	completions_rx: mpsc::UnboundedReceiver<CoverageCompletion>,
	next_request_id: u64,
	disposed: bool,
}

impl CoverageController {
	/// Creates a disconnected controller with the configured display preference.
	pub fn new(
		config: &CoverageConfig,
		provider: Arc<dyn CoverageProvider>,
		filter: impl DocumentFilter + 'static,
		status: impl StatusSink + 'static,
		annotations: impl AnnotationSink + 'static,
	) -> Self {
		let (completions_tx, completions_rx) = mpsc::unbounded_channel();
		Self {
			state: ControllerState::new(config.should_show_uncovered_by_default()),
			provider,
			filter: Box::new(filter),
			status: Box::new(status),
			annotations: Box::new(annotations),
			completions_tx,
			completions_rx,
			next_request_id: 0,
			disposed: false,
		}
	}

	/// Read-only view of the state.
	pub fn state(&self) -> &ControllerState {
		&self.state
	}

	/// Current display preference.
	pub fn show_uncovered(&self) -> bool {
		self.state.show_uncovered
	}

	/// Returns true after [`Self::dispose`].
	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	/// The host's active document changed (focus change, save, or reconnect).
	pub fn on_document_activated(&mut self, document: Option<Document>) {
		if self.disposed {
			return;
		}
		self.activate(document);
		self.render();
	}

	/// A document was saved. Recomputes if it is eligible, keeping its last known percent.
	pub fn on_document_saved(&mut self, document: Document) {
		self.on_document_activated(Some(document));
	}

	/// Backend connectivity changed.
	///
	/// A reconnect re-activates the host's active document since nothing computed before it can
	/// be trusted. A disconnect drops the active document, its coverage and any pending request.
	pub fn on_connection_status_changed(&mut self, is_connected: bool, host: &dyn ActiveDocument) {
		if self.disposed {
			return;
		}

		let was_connected = self.state.is_connected;
		self.state.is_connected = is_connected;
		debug!(is_connected, was_connected, "coverage.connection");

		if !is_connected {
			self.activate(None);
		} else if !was_connected && let Some(document) = host.active_document() {
			self.activate(Some(document));
		}
		self.render();
	}

	/// Flips the show-uncovered preference. Never issues a computation.
	pub fn on_toggle_show_uncovered(&mut self) {
		if self.disposed {
			return;
		}
		self.state.show_uncovered = !self.state.show_uncovered;
		debug!(show_uncovered = self.state.show_uncovered, "coverage.toggle");
		self.render();
	}

	/// Applies a completion. Completions of cancelled requests are dropped without touching state.
	///
	/// Returns true if the completion was applied.
	pub fn on_coverage_computed(&mut self, completion: CoverageCompletion) -> bool {
		if self.disposed {
			return false;
		}
		let id = completion.id();
		let Some((document, result)) = completion.open() else {
			trace!(request_id = %id, "coverage.completion.stale");
			return false;
		};

		debug!(
			request_id = %id,
			uri = document.uri().as_str(),
			covered_percent = result.as_ref().map(|coverage| coverage.covered_percent()),
			"coverage.completion"
		);
		self.state.pending_request = None;
		self.state.coverage = result;
		self.render();
		true
	}

	/// Applies every completion already queued. Returns how many were applied.
	pub fn poll_completions(&mut self) -> usize {
		let mut applied = 0;
		while let Ok(completion) = self.completions_rx.try_recv() {
			if self.on_coverage_computed(completion) {
				applied += 1;
			}
		}
		applied
	}

	/// Waits for the next completion, cancelled or not.
	///
	/// Never resolves to `None` while the controller is alive since it holds a sender itself.
	pub async fn next_completion(&mut self) -> Option<CoverageCompletion> {
		self.completions_rx.recv().await
	}

	/// Cancels any pending request and releases the annotation sink. Idempotent.
	pub fn dispose(&mut self) {
		if self.disposed {
			return;
		}
		self.disposed = true;
		self.cancel_pending();
		self.annotations.dispose();
		debug!("coverage.dispose");
	}

	/// Transition shared by activation, save and reconnect. Does not render.
	fn activate(&mut self, document: Option<Document>) {
		let document = match document {
			Some(document) if self.state.is_connected && self.filter.matches(&document) => document,
			_ => {
				self.cancel_pending();
				self.state.active_document = None;
				self.state.coverage = None;
				return;
			}
		};

		self.cancel_pending();
		let request = self.issue(document.clone());
		if self.state.active_document.as_ref() != Some(&document) {
			self.state.coverage = None;
		}
		self.state.pending_request = Some(request);
		self.state.active_document = Some(document);
	}

	fn issue(&mut self, document: Document) -> CoverageRequest {
		self.next_request_id += 1;
		let id = RequestId(self.next_request_id);
		debug!(request_id = %id, uri = document.uri().as_str(), "coverage.request");
		CoverageRequest::start(id, Arc::clone(&self.provider), document, self.completions_tx.clone())
	}

	fn cancel_pending(&mut self) {
		if let Some(request) = self.state.pending_request.take() {
			request.cancel();
		}
	}

	fn render(&mut self) {
		let status = render_status(&self.state);
		trace!(?status, "coverage.render");
		self.status.set_coverage(status);

		self.annotations.clear();
		if let Some((uri, annotations)) = render_annotations(&self.state) {
			self.annotations.set(uri, annotations);
		}
	}
}

impl Drop for CoverageController {
	fn drop(&mut self) {
		self.cancel_pending();
	}
}
