//! Wire types for `textDocument/typeCoverage`.

use lsp_types::request::Request;
use lsp_types::{Range, TextDocumentIdentifier};
use serde::{Deserialize, Serialize};
use tycov_coverage::{CoverageResult, UncoveredRange};

/// The `textDocument/typeCoverage` request.
#[derive(Debug)]
pub enum TypeCoverageRequest {}

impl Request for TypeCoverageRequest {
	type Params = TypeCoverageParams;
	type Result = Option<TypeCoverageResponse>;
	const METHOD: &'static str = "textDocument/typeCoverage";
}

/// Request params.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCoverageParams {
	/// Document to compute coverage for.
	pub text_document: TextDocumentIdentifier,
}

/// Server reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCoverageResponse {
	/// Percentage of the document the server could type.
	pub covered_percent: f64,
	/// Spans the server could not type.
	#[serde(default)]
	pub uncovered_ranges: Vec<WireUncoveredRange>,
	/// Message for ranges that carry none.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_message: Option<String>,
}

/// One uncovered span on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireUncoveredRange {
	/// Span in the document.
	pub range: Range,
	/// Optional explanation.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl TypeCoverageResponse {
	/// Converts to the tracker's result, filling absent messages from `default_message`.
	///
	/// Returns `None` if the percent is not a number.
	pub fn into_result(self) -> Option<CoverageResult> {
		let default_message = self.default_message;
		let ranges = self
			.uncovered_ranges
			.into_iter()
			.map(|wire| UncoveredRange {
				range: wire.range,
				message: wire.message.or_else(|| default_message.clone()),
			})
			.collect();
		CoverageResult::new(self.covered_percent, ranges)
	}
}
