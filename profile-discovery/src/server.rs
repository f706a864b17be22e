// ---------------------------------------------------------------------------
// DiscoveryServer — JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes incoming JSON-RPC 2.0 requests (NDJSON over stdin) to a single
// DiscoveryEngine. Requests are handled one at a time in arrival order, so a
// recorded interaction is always visible to the next discover call.
// ---------------------------------------------------------------------------

use std::io::{self, BufRead};
use std::path::Path;

use serde::Deserialize;

use crate::engine::{DiscoveryEngine, DEFAULT_DISCOVER_COUNT};
use crate::error::DiscoveryError;
use crate::protocol::*;
use crate::transport::NdjsonTransport;
use crate::types::{Action, FilterCriteria, Profile};

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

pub struct DiscoveryServer {
	transport: NdjsonTransport,
	engine: DiscoveryEngine,
}

impl DiscoveryServer {
	pub fn new(transport: NdjsonTransport, engine: DiscoveryEngine) -> Self {
		Self { transport, engine }
	}

	/// Main loop: read JSON-RPC messages from stdin, dispatch to handlers.
	pub fn run(&mut self) -> Result<(), DiscoveryError> {
		let stdin = io::stdin();
		let reader = stdin.lock();

		for line_result in reader.lines() {
			let line = line_result?;
			if line.trim().is_empty() {
				continue;
			}

			let request: JsonRpcRequest = match serde_json::from_str(&line) {
				Ok(r) => r,
				Err(e) => {
					tracing::error!("Failed to parse request: {}", e);
					continue;
				}
			};

			self.dispatch(request);
		}

		Ok(())
	}

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		let Some(result) = self.call(&req.method, req.params) else {
			self.transport.write_error(
				id,
				METHOD_NOT_FOUND,
				format!("Unknown method: {}", req.method),
				None,
			);
			return;
		};

		match result {
			Ok(value) => self.transport.write_response(id, value),
			Err(e) => {
				let code = match e {
					DiscoveryError::InvalidParams(_) => INVALID_PARAMS,
					_ => DISCOVERY_ERROR,
				};
				self.transport
					.write_error(id, code, e.to_string(), Some(e.to_json_rpc_error()))
			}
		}
	}

	/// Execute one method. `None` means the method is unknown.
	pub fn call(
		&mut self,
		method: &str,
		params: serde_json::Value,
	) -> Option<Result<serde_json::Value, DiscoveryError>> {
		let engine = &mut self.engine;
		let result = match method {
			// -- Ingest --------------------------------------------------
			"profiles/add" => handle_add(engine, params),
			"profiles/addAll" => handle_add_all(engine, params),
			"profiles/get" => handle_get(engine, params),

			// -- Query / mutation ----------------------------------------
			"discovery/discover" => handle_discover(engine, params),
			"discovery/recordInteraction" => handle_record_interaction(engine, params),
			"similarity/compute" => handle_similarity(engine, params),

			// -- Introspection -------------------------------------------
			"metrics/performance" => handle_performance(engine),
			"cache/stats" => {
				serde_json::to_value(engine.cache_stats()).map_err(DiscoveryError::from)
			}
			"cache/clear" => {
				engine.clear_cache();
				Ok(serde_json::json!({}))
			}

			_ => return None,
		};
		Some(result)
	}
}

/// Read profiles from a JSON file holding either an array or
/// `{ "profiles": [...] }`.
pub fn load_profiles_file(path: &Path) -> Result<Vec<Profile>, DiscoveryError> {
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum ProfileFile {
		List(Vec<Profile>),
		Wrapped { profiles: Vec<Profile> },
	}

	let text = std::fs::read_to_string(path)?;
	let parsed: ProfileFile = serde_json::from_str(&text)?;
	Ok(match parsed {
		ProfileFile::List(profiles) => profiles,
		ProfileFile::Wrapped { profiles } => profiles,
	})
}

// ---------------------------------------------------------------------------
// Param types
// ---------------------------------------------------------------------------

fn parse_params<T: serde::de::DeserializeOwned>(
	params: serde_json::Value,
) -> Result<T, DiscoveryError> {
	serde_json::from_value(params).map_err(|e| DiscoveryError::InvalidParams(e.to_string()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddParams {
	profile: Profile,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddAllParams {
	profiles: Vec<Profile>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdParams {
	id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscoverParams {
	user_id: String,
	count: Option<usize>,
	filters: Option<FilterCriteria>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordInteractionParams {
	user_id: String,
	target_id: String,
	action: Action,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimilarityParams {
	user_id: String,
	other_id: String,
}

// ---------------------------------------------------------------------------
// Free-standing handler functions
// ---------------------------------------------------------------------------

fn handle_add(
	engine: &mut DiscoveryEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, DiscoveryError> {
	let p: AddParams = parse_params(params)?;
	engine.add_profile(p.profile)?;
	Ok(serde_json::json!({}))
}

fn handle_add_all(
	engine: &mut DiscoveryEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, DiscoveryError> {
	let p: AddAllParams = parse_params(params)?;
	let count = engine.add_all(p.profiles)?;
	Ok(serde_json::json!({ "count": count }))
}

fn handle_get(
	engine: &mut DiscoveryEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, DiscoveryError> {
	let p: IdParams = parse_params(params)?;
	Ok(serde_json::json!({ "profile": engine.get(&p.id) }))
}

fn handle_discover(
	engine: &mut DiscoveryEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, DiscoveryError> {
	let p: DiscoverParams = parse_params(params)?;
	let filters = p.filters.unwrap_or_default().validate()?;
	let results = engine.discover(
		&p.user_id,
		p.count.unwrap_or(DEFAULT_DISCOVER_COUNT),
		&filters,
	);
	Ok(serde_json::json!({ "results": results }))
}

fn handle_record_interaction(
	engine: &mut DiscoveryEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, DiscoveryError> {
	let p: RecordInteractionParams = parse_params(params)?;
	let outcome = engine.record_interaction(&p.user_id, &p.target_id, p.action);
	Ok(serde_json::json!({ "recorded": outcome.is_recorded() }))
}

fn handle_similarity(
	engine: &mut DiscoveryEngine,
	params: serde_json::Value,
) -> Result<serde_json::Value, DiscoveryError> {
	let p: SimilarityParams = parse_params(params)?;
	let similarity = engine.similarity_breakdown(&p.user_id, &p.other_id);
	Ok(serde_json::json!({ "similarity": similarity }))
}

fn handle_performance(engine: &mut DiscoveryEngine) -> Result<serde_json::Value, DiscoveryError> {
	let metrics = engine.performance_metrics();
	let mut value = serde_json::to_value(&metrics)?;
	if let Some(obj) = value.as_object_mut() {
		obj.insert("hitRate".into(), serde_json::json!(metrics.hit_rate()));
	}
	Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::EngineConfig;
	use serde_json::json;

	fn server() -> DiscoveryServer {
		let engine = DiscoveryEngine::new(EngineConfig {
			freshness_seed: Some(3),
			..Default::default()
		});
		DiscoveryServer::new(NdjsonTransport::new(), engine)
	}

	fn profile_json(id: &str, age: u32) -> serde_json::Value {
		json!({
			"id": id,
			"institution": "IIT Delhi",
			"fieldOfStudy": "Engineering",
			"graduationYear": 2025,
			"city": "Delhi",
			"interests": ["Music", "Art"],
			"age": age,
			"languages": ["Hindi"],
			"dietaryPreference": "Vegetarian"
		})
	}

	fn ok(server: &mut DiscoveryServer, method: &str, params: serde_json::Value) -> serde_json::Value {
		server
			.call(method, params)
			.expect("known method")
			.expect("successful call")
	}

	#[test]
	fn unknown_method_is_none() {
		assert!(server().call("nope/nope", json!({})).is_none());
	}

	#[test]
	fn add_all_then_discover() {
		let mut s = server();
		let added = ok(
			&mut s,
			"profiles/addAll",
			json!({ "profiles": [profile_json("u", 20), profile_json("a", 21), profile_json("b", 22)] }),
		);
		assert_eq!(added["count"], 3);

		let out = ok(&mut s, "discovery/discover", json!({ "userId": "u", "count": 1 }));
		assert_eq!(out["results"].as_array().unwrap().len(), 1);
	}

	#[test]
	fn record_interaction_reports_unknown_user() {
		let mut s = server();
		ok(&mut s, "profiles/add", json!({ "profile": profile_json("u", 20) }));
		let out = ok(
			&mut s,
			"discovery/recordInteraction",
			json!({ "userId": "ghost", "targetId": "u", "action": "like" }),
		);
		assert_eq!(out["recorded"], false);
		let out = ok(
			&mut s,
			"discovery/recordInteraction",
			json!({ "userId": "u", "targetId": "x", "action": "dislike" }),
		);
		assert_eq!(out["recorded"], true);
	}

	#[test]
	fn inverted_age_filter_is_rejected() {
		let mut s = server();
		let err = s
			.call(
				"discovery/discover",
				json!({ "userId": "u", "filters": { "minAge": 30, "maxAge": 20 } }),
			)
			.unwrap()
			.unwrap_err();
		assert_eq!(err.code(), "FILTER_INVALID");
	}

	#[test]
	fn non_numeric_age_is_invalid_params() {
		let mut s = server();
		let err = s
			.call(
				"discovery/discover",
				json!({ "userId": "u", "filters": { "minAge": "twenty" } }),
			)
			.unwrap()
			.unwrap_err();
		assert_eq!(err.code(), "INVALID_PARAMS");
	}

	#[test]
	fn performance_reports_hit_rate() {
		let mut s = server();
		let out = ok(&mut s, "metrics/performance", json!({}));
		assert_eq!(out["hitRate"], 0.0);

		ok(
			&mut s,
			"profiles/addAll",
			json!({ "profiles": [profile_json("u", 20), profile_json("a", 21)] }),
		);
		ok(&mut s, "discovery/discover", json!({ "userId": "u" }));
		ok(&mut s, "discovery/discover", json!({ "userId": "u" }));

		let out = ok(&mut s, "metrics/performance", json!({}));
		let hits = out["cacheHits"].as_f64().unwrap();
		let misses = out["cacheMisses"].as_f64().unwrap();
		assert!(hits >= 1.0);
		assert!((out["hitRate"].as_f64().unwrap() - hits / (hits + misses)).abs() < 1e-10);
	}

	#[test]
	fn get_missing_profile_is_null() {
		let mut s = server();
		let out = ok(&mut s, "profiles/get", json!({ "id": "ghost" }));
		assert!(out["profile"].is_null());
	}

	#[test]
	fn load_profiles_accepts_both_layouts() {
		let dir = tempfile::tempdir().unwrap();
		let list = dir.path().join("list.json");
		let wrapped = dir.path().join("wrapped.json");
		std::fs::write(&list, json!([profile_json("a", 20)]).to_string()).unwrap();
		std::fs::write(
			&wrapped,
			json!({ "profiles": [profile_json("a", 20), profile_json("b", 21)] }).to_string(),
		)
		.unwrap();

		assert_eq!(load_profiles_file(&list).unwrap().len(), 1);
		assert_eq!(load_profiles_file(&wrapped).unwrap().len(), 2);
	}

	#[test]
	fn load_profiles_missing_file_is_io_error() {
		let err = load_profiles_file(Path::new("/definitely/not/here.json")).unwrap_err();
		assert_eq!(err.code(), "IO_ERROR");
	}
}
