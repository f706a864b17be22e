use std::io::{self, Write};

use crate::protocol::{JsonRpcError, JsonRpcResponse};

/// NDJSON transport for JSON-RPC 2.0 responses.
///
/// Writes one JSON object per line to stdout, flushing after each line.
/// Requests are read by the server loop, not here.
pub struct NdjsonTransport;

impl Default for NdjsonTransport {
	fn default() -> Self {
		Self::new()
	}
}

impl NdjsonTransport {
	/// Create a new transport.
	pub fn new() -> Self {
		Self
	}

	/// Write a successful JSON-RPC response.
	pub fn write_response(&self, id: u64, result: serde_json::Value) {
		self.write_line(&JsonRpcResponse {
			jsonrpc: "2.0",
			id,
			result: Some(result),
			error: None,
		});
	}

	/// Write a JSON-RPC error response. `data` carries the structured
	/// `discoveryCode` payload for domain errors.
	pub fn write_error(
		&self,
		id: u64,
		code: i32,
		message: impl Into<String>,
		data: Option<serde_json::Value>,
	) {
		self.write_line(&JsonRpcResponse {
			jsonrpc: "2.0",
			id,
			result: None,
			error: Some(JsonRpcError {
				code,
				message: message.into(),
				data,
			}),
		});
	}

	fn write_line(&self, value: &impl serde::Serialize) {
		let mut stdout = io::stdout().lock();
		if let Err(e) = serde_json::to_writer(&mut stdout, value) {
			tracing::error!("Failed to serialize response: {}", e);
			return;
		}
		if let Err(e) = writeln!(stdout) {
			tracing::error!("Failed to write newline: {}", e);
		}
		if let Err(e) = stdout.flush() {
			tracing::error!("Failed to flush stdout: {}", e);
		}
	}
}
