use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
	#[error("Invalid profile: {0}")]
	InvalidProfile(String),
	#[error("Invalid filter: {0}")]
	InvalidFilter(String),
	#[error("Invalid params: {0}")]
	InvalidParams(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl DiscoveryError {
	/// Machine-readable error code for this variant.
	pub fn code(&self) -> &str {
		match self {
			Self::InvalidProfile(_) => "PROFILE_INVALID",
			Self::InvalidFilter(_) => "FILTER_INVALID",
			Self::InvalidParams(_) => "INVALID_PARAMS",
			Self::Io(_) => "IO_ERROR",
			Self::Serialization(_) => "SERIALIZATION_ERROR",
		}
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		serde_json::json!({
			"discoveryCode": self.code(),
			"message": self.to_string(),
		})
	}
}

impl From<serde_json::Error> for DiscoveryError {
	fn from(e: serde_json::Error) -> Self {
		Self::Serialization(e.to_string())
	}
}
