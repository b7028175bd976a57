//! Event loop driving a [`CoverageController`] from host events and backend connectivity.

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::controller::CoverageController;
use crate::model::Document;
use crate::request::CoverageCompletion;
use crate::sink::ActiveDocument;

/// Lifecycle hooks the host forwards to the coverage service.
#[derive(Debug, Clone)]
pub enum HostEvent {
	/// Editor focus moved; `None` when no editor is active.
	ActiveDocumentChanged(Option<Document>),
	/// A document was written to disk.
	DocumentSaved(Document),
	/// The user invoked the show-uncovered toggle command.
	ToggleShowUncovered,
	/// The host is shutting down.
	Shutdown,
}

enum Step {
	Host(Option<HostEvent>),
	Connection(bool),
	Completion(Option<CoverageCompletion>),
}

/// Owns a controller and feeds it until shutdown.
pub struct CoverageService<H> {
	controller: CoverageController,
	host: H,
}

impl<H: ActiveDocument> CoverageService<H> {
	/// Wraps a controller. `host` answers "which document is active" on reconnect.
	pub fn new(controller: CoverageController, host: H) -> Self {
		Self { controller, host }
	}

	/// The driven controller.
	pub fn controller(&self) -> &CoverageController {
		&self.controller
	}

	/// Runs until [`HostEvent::Shutdown`], until the host event channel closes, or until the
	/// connection status sender is dropped. Disposes the controller before returning it.
	///
	/// The current value of `connection` is applied before the first event is read.
	pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<HostEvent>, mut connection: watch::Receiver<bool>) -> CoverageController {
		let connected = *connection.borrow_and_update();
		self.controller.on_connection_status_changed(connected, &self.host);

		loop {
			let step = tokio::select! {
				event = events.recv() => Step::Host(event),
				changed = connection.changed() => Step::Connection(changed.is_ok()),
				completion = self.controller.next_completion() => Step::Completion(completion),
			};

			match step {
				Step::Host(Some(HostEvent::ActiveDocumentChanged(document))) => self.controller.on_document_activated(document),
				Step::Host(Some(HostEvent::DocumentSaved(document))) => self.controller.on_document_saved(document),
				Step::Host(Some(HostEvent::ToggleShowUncovered)) => self.controller.on_toggle_show_uncovered(),
				Step::Host(Some(HostEvent::Shutdown)) => {
					info!("coverage service shutting down");
					break;
				}
				Step::Host(None) => {
					debug!("coverage host channel closed");
					break;
				}
				Step::Connection(true) => {
					let connected = *connection.borrow_and_update();
					self.controller.on_connection_status_changed(connected, &self.host);
				}
				Step::Connection(false) => {
					debug!("coverage connection status sender dropped");
					break;
				}
				Step::Completion(Some(completion)) => {
					self.controller.on_coverage_computed(completion);
				}
				Step::Completion(None) => break,
			}
		}

		self.controller.dispose();
		self.controller
	}
}
