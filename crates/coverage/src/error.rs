/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// The coverage backend failed to compute a result.
	#[error("coverage provider failed: {0}")]
	Provider(String),
	/// The configuration could not be parsed.
	#[error("invalid coverage config: {0}")]
	Config(#[from] toml::de::Error),
	/// A document selector pattern is not a valid glob.
	#[error("invalid document pattern: {0}")]
	Glob(#[from] globset::Error),
}
