//! [Language Server Protocol][lsp] adapter for type coverage.
//!
//! [lsp]: https://microsoft.github.io/language-server-protocol/overviews/lsp/overview/
//!
//! Servers such as Flow expose coverage through the non-standard `textDocument/typeCoverage`
//! request. This crate defines that request in [`protocol`] and wraps any JSON-RPC capable
//! [`LanguageClient`] into a [`tycov_coverage::CoverageProvider`] via [`LspCoverageProvider`].
//! [`ConnectionStatus`] publishes client connectivity as the watch channel consumed by
//! [`tycov_coverage::CoverageService`].
#![warn(missing_docs)]

pub mod protocol;
mod provider;

pub use provider::{ConnectionStatus, LanguageClient, LspCoverageProvider};

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The peer replied with an undecodable response, or params failed to encode.
	#[error("deserialization failed: {0}")]
	Deserialize(#[from] serde_json::Error),
	/// The peer replied with an error.
	#[error("request failed: {0}")]
	Request(String),
	/// The client is not connected to a server.
	#[error("language server disconnected")]
	Disconnected,
}

impl From<Error> for tycov_coverage::Error {
	fn from(err: Error) -> Self {
		tycov_coverage::Error::Provider(err.to_string())
	}
}
