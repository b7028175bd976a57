//! Pure projections of [`ControllerState`] onto the two views.

use std::fmt;

use lsp_types::{Diagnostic, DiagnosticSeverity, Uri};

use crate::controller::ControllerState;
use crate::model::UncoveredRange;

/// Source label attached to every uncovered-range annotation.
pub const ANNOTATION_SOURCE: &str = "Type Coverage";

/// Message used when the backend gives no explanation for a range.
pub const DEFAULT_UNCOVERED_MESSAGE: &str = "Not covered by flow";

/// Status summary pushed to the [`crate::StatusSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
	/// A computation is in flight.
	pub computing: bool,
	/// Last known percent; `None` while the first computation runs.
	pub covered_percent: Option<f64>,
	/// Uncovered-range annotations are enabled.
	pub showing_uncovered: bool,
}

impl fmt::Display for StatusView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.covered_percent {
			Some(percent) => {
				write!(f, "Coverage: {}%", percent.round() as u8)?;
				if self.computing {
					f.write_str(" (computing)")?;
				}
			}
			None => f.write_str("Coverage: computing")?,
		}
		if self.showing_uncovered {
			f.write_str(" (showing uncovered)")?;
		}
		Ok(())
	}
}

/// Projects the status view.
///
/// Returns `None` ("no coverage") without an active document, while disconnected, or when
/// nothing is known and nothing is running.
pub fn render_status(state: &ControllerState) -> Option<StatusView> {
	if state.active_document().is_none() || !state.is_connected() {
		return None;
	}

	let computing = state.pending_request().is_some();
	match state.coverage() {
		None if computing => Some(StatusView {
			computing: true,
			covered_percent: None,
			showing_uncovered: state.show_uncovered(),
		}),
		Some(coverage) => Some(StatusView {
			computing,
			covered_percent: Some(coverage.covered_percent()),
			showing_uncovered: state.show_uncovered(),
		}),
		None => None,
	}
}

/// Projects the annotation set for the active document.
///
/// Returns `None` when nothing should be published: display disabled, no active document, a
/// computation in flight (ranges may no longer match the text), or no uncovered ranges.
pub fn render_annotations(state: &ControllerState) -> Option<(&Uri, Vec<Diagnostic>)> {
	if !state.show_uncovered() || state.pending_request().is_some() {
		return None;
	}
	let document = state.active_document()?;
	let coverage = state.coverage()?;
	if coverage.uncovered_ranges().is_empty() {
		return None;
	}

	let annotations = coverage.uncovered_ranges().iter().map(uncovered_range_to_diagnostic).collect();
	Some((document.uri(), annotations))
}

fn uncovered_range_to_diagnostic(uncovered: &UncoveredRange) -> Diagnostic {
	Diagnostic {
		range: uncovered.range,
		severity: Some(DiagnosticSeverity::INFORMATION),
		source: Some(ANNOTATION_SOURCE.into()),
		message: uncovered.message.clone().unwrap_or_else(|| DEFAULT_UNCOVERED_MESSAGE.into()),
		..Default::default()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn test_status_text() {
		let view = StatusView {
			computing: false,
			covered_percent: Some(86.6),
			showing_uncovered: false,
		};
		assert_eq!(view.to_string(), "Coverage: 87%");

		let view = StatusView {
			computing: true,
			covered_percent: Some(50.0),
			showing_uncovered: true,
		};
		assert_eq!(view.to_string(), "Coverage: 50% (computing) (showing uncovered)");

		let view = StatusView {
			computing: true,
			covered_percent: None,
			showing_uncovered: false,
		};
		assert_eq!(view.to_string(), "Coverage: computing");
	}

	#[test]
	fn test_diagnostic_defaults() {
		let range = crate::testing::lines(3, 4);
		let diagnostic = uncovered_range_to_diagnostic(&UncoveredRange::new(range));
		assert_eq!(diagnostic.range, range);
		assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::INFORMATION));
		assert_eq!(diagnostic.source.as_deref(), Some(ANNOTATION_SOURCE));
		assert_eq!(diagnostic.message, DEFAULT_UNCOVERED_MESSAGE);

		let diagnostic = uncovered_range_to_diagnostic(&UncoveredRange::new(range).with_message("any type"));
		assert_eq!(diagnostic.message, "any type");
	}
}
