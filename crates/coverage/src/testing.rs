//! Scripted collaborators shared by the unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lsp_types::{Diagnostic, Position, Range, Uri};
use tokio::sync::oneshot;

use crate::model::{CoverageResult, Document, UncoveredRange};
use crate::render::StatusView;
use crate::sink::{ActiveDocument, AnnotationSink, CoverageProvider, StatusSink};
use crate::{Error, Result};

type Outcome = Result<Option<CoverageResult>>;

pub(crate) fn doc(name: &str) -> Document {
	let uri: Uri = format!("file:///src/{name}").parse().unwrap();
	Document::new(uri, "javascript").with_path(format!("/src/{name}"))
}

pub(crate) fn uri(name: &str) -> Uri {
	doc(name).uri().clone()
}

pub(crate) fn lines(start: u32, end: u32) -> Range {
	Range::new(Position::new(start, 0), Position::new(end, 0))
}

pub(crate) fn coverage(percent: f64, ranges: &[(Range, Option<&str>)]) -> CoverageResult {
	let ranges = ranges
		.iter()
		.map(|(range, message)| UncoveredRange {
			range: *range,
			message: message.map(String::from),
		})
		.collect();
	CoverageResult::new(percent, ranges).unwrap()
}

#[derive(Default)]
struct Script {
	waiting: VecDeque<oneshot::Sender<Outcome>>,
	ready: VecDeque<Outcome>,
	calls: usize,
}

/// Provider whose calls stay pending until the test resolves them, in call order per document.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
	scripts: Mutex<HashMap<String, Script>>,
}

impl ScriptedProvider {
	pub(crate) fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub(crate) fn resolve(&self, name: &str, result: Option<CoverageResult>) {
		self.settle(key(name), Ok(result));
	}

	pub(crate) fn resolve_document(&self, document: &Document, result: Option<CoverageResult>) {
		self.settle(document.uri().as_str().to_owned(), Ok(result));
	}

	pub(crate) fn fail(&self, name: &str, message: &str) {
		self.settle(key(name), Err(Error::Provider(message.into())));
	}

	pub(crate) fn calls(&self, name: &str) -> usize {
		self.scripts.lock().unwrap().get(&key(name)).map_or(0, |script| script.calls)
	}

	/// Provider calls still awaited by a live request task.
	pub(crate) fn live_waiters(&self) -> usize {
		self.scripts
			.lock()
			.unwrap()
			.values()
			.flat_map(|script| script.waiting.iter())
			.filter(|waiter| !waiter.is_closed())
			.count()
	}

	fn settle(&self, key: String, mut outcome: Outcome) {
		let mut scripts = self.scripts.lock().unwrap();
		let script = scripts.entry(key).or_default();
		while let Some(waiter) = script.waiting.pop_front() {
			match waiter.send(outcome) {
				Ok(()) => return,
				Err(returned) => outcome = returned,
			}
		}
		script.ready.push_back(outcome);
	}
}

fn key(name: &str) -> String {
	uri(name).as_str().to_owned()
}

#[async_trait]
impl CoverageProvider for ScriptedProvider {
	async fn provide_type_coverage(&self, document: &Document) -> Result<Option<CoverageResult>> {
		let rx = {
			let mut scripts = self.scripts.lock().unwrap();
			let script = scripts.entry(document.uri().as_str().to_owned()).or_default();
			script.calls += 1;
			if let Some(outcome) = script.ready.pop_front() {
				return outcome;
			}
			let (tx, rx) = oneshot::channel();
			script.waiting.push_back(tx);
			rx
		};
		rx.await.unwrap_or(Ok(None))
	}
}

/// Status sink recording every update.
#[derive(Clone, Default)]
pub(crate) struct RecordingStatus(pub(crate) Rc<RefCell<Vec<Option<StatusView>>>>);

impl RecordingStatus {
	pub(crate) fn last(&self) -> Option<StatusView> {
		self.0.borrow().last().cloned().flatten()
	}

	pub(crate) fn renders(&self) -> usize {
		self.0.borrow().len()
	}
}

impl StatusSink for RecordingStatus {
	fn set_coverage(&mut self, status: Option<StatusView>) {
		self.0.borrow_mut().push(status);
	}
}

#[derive(Default)]
pub(crate) struct AnnotationLog {
	pub(crate) current: HashMap<String, Vec<Diagnostic>>,
	pub(crate) disposed: bool,
}

/// Annotation sink keeping the currently published set.
#[derive(Clone, Default)]
pub(crate) struct RecordingAnnotations(pub(crate) Rc<RefCell<AnnotationLog>>);

impl RecordingAnnotations {
	pub(crate) fn for_doc(&self, name: &str) -> Vec<Diagnostic> {
		self.0.borrow().current.get(&key(name)).cloned().unwrap_or_default()
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.0.borrow().current.values().all(Vec::is_empty)
	}

	pub(crate) fn is_disposed(&self) -> bool {
		self.0.borrow().disposed
	}
}

impl AnnotationSink for RecordingAnnotations {
	fn clear(&mut self) {
		self.0.borrow_mut().current.clear();
	}

	fn set(&mut self, uri: &Uri, annotations: Vec<Diagnostic>) {
		self.0.borrow_mut().current.insert(uri.as_str().to_owned(), annotations);
	}

	fn dispose(&mut self) {
		self.clear();
		self.0.borrow_mut().disposed = true;
	}
}

/// Host whose active editor is set by the test.
#[derive(Clone, Default)]
pub(crate) struct FakeHost(pub(crate) Rc<RefCell<Option<Document>>>);

impl FakeHost {
	pub(crate) fn focus(&self, document: Option<Document>) {
		*self.0.borrow_mut() = document;
	}
}

impl ActiveDocument for FakeHost {
	fn active_document(&self) -> Option<Document> {
		self.0.borrow().clone()
	}
}
