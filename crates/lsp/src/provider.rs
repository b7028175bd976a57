//! [`CoverageProvider`] backed by a language server.

use std::sync::Arc;

use async_trait::async_trait;
use lsp_types::TextDocumentIdentifier;
use lsp_types::request::Request;
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;
use tycov_coverage::{CoverageProvider, CoverageResult, Document};

use crate::protocol::{TypeCoverageParams, TypeCoverageRequest};
use crate::{Error, Result};

/// Minimal JSON-RPC surface of a language client.
#[async_trait]
pub trait LanguageClient: Send + Sync {
	/// Sends `method` with `params` and returns the raw `result` value.
	async fn request(&self, method: &'static str, params: Value) -> Result<Value>;
}

/// Computes coverage by sending `textDocument/typeCoverage` through a [`LanguageClient`].
pub struct LspCoverageProvider<C> {
	client: Arc<C>,
}

impl<C: LanguageClient> LspCoverageProvider<C> {
	/// Wraps a client.
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}

	/// Sends the request and decodes the server's reply.
	pub async fn type_coverage(&self, document: &Document) -> Result<Option<CoverageResult>> {
		let params = TypeCoverageParams {
			text_document: TextDocumentIdentifier {
				uri: document.uri().clone(),
			},
		};
		let value = self.client.request(TypeCoverageRequest::METHOD, serde_json::to_value(params)?).await?;
		let response: <TypeCoverageRequest as Request>::Result = serde_json::from_value(value)?;
		let result = response.and_then(|response| response.into_result());
		debug!(
			uri = document.uri().as_str(),
			covered_percent = result.as_ref().map(CoverageResult::covered_percent),
			"lsp.type_coverage"
		);
		Ok(result)
	}
}

#[async_trait]
impl<C: LanguageClient> CoverageProvider for LspCoverageProvider<C> {
	async fn provide_type_coverage(&self, document: &Document) -> tycov_coverage::Result<Option<CoverageResult>> {
		Ok(self.type_coverage(document).await?)
	}
}

/// Connectivity of the language client, published over a watch channel.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
	tx: Arc<watch::Sender<bool>>,
}

impl ConnectionStatus {
	/// Starts disconnected.
	pub fn new() -> Self {
		let (tx, _) = watch::channel(false);
		Self { tx: Arc::new(tx) }
	}

	/// Records a connectivity change. Subscribers are only notified when the value flips.
	pub fn set_connected(&self, is_connected: bool) {
		let changed = self.tx.send_if_modified(|current| {
			if *current == is_connected {
				return false;
			}
			*current = is_connected;
			true
		});
		if changed {
			debug!(is_connected, "lsp.connection_status");
		}
	}

	/// Current connectivity.
	pub fn is_connected(&self) -> bool {
		*self.tx.borrow()
	}

	/// New receiver for [`tycov_coverage::CoverageService::run`].
	pub fn subscribe(&self) -> watch::Receiver<bool> {
		self.tx.subscribe()
	}
}

impl Default for ConnectionStatus {
	fn default() -> Self {
		Self::new()
	}
}
