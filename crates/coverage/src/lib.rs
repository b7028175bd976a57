//! Type coverage tracking for the active editor document.
//!
//! The crate is centered on [`CoverageController`], a single-owner state machine that follows the
//! host's active document, keeps at most one coverage computation in flight, and re-renders two
//! independent views after every transition:
//! - a status summary pushed to a [`StatusSink`],
//! - informational diagnostics for uncovered ranges pushed to an [`AnnotationSink`].
//!
//! Computations are issued through [`CoverageRequest`], a handle gated by a cancellation token so
//! that a superseded request can never deliver its result. [`CoverageService`] wires host events
//! and backend connectivity into the controller for hosts that run a tokio event loop.
//!
//! ## Usage
//!
//! The host implements [`CoverageProvider`] (usually through `tycov-lsp`), the two sinks, and
//! [`ActiveDocument`]. Eligibility is any [`DocumentFilter`]; [`DocumentSelector`] builds one from
//! [`CoverageConfig`].
#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod model;
mod render;
mod request;
mod selector;
mod service;
mod sink;

pub use config::{CoverageConfig, SelectorConfig};
pub use controller::{ControllerState, CoverageController};
pub use error::{Error, Result};
pub use model::{CoverageResult, Document, UncoveredRange};
pub use render::{ANNOTATION_SOURCE, DEFAULT_UNCOVERED_MESSAGE, StatusView, render_annotations, render_status};
pub use request::{CoverageCompletion, CoverageRequest, RequestId};
pub use selector::DocumentSelector;
pub use service::{CoverageService, HostEvent};
pub use sink::{ActiveDocument, AnnotationSink, CoverageProvider, DocumentFilter, StatusSink};

/// Re-export of the [`lsp_types`] dependency of this crate.
pub use lsp_types;

#[cfg(test)]
mod testing;
