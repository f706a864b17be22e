use std::path::Path;

use clap::Parser;
use profile_discovery::config::CliArgs;
use profile_discovery::engine::DiscoveryEngine;
use profile_discovery::server::{load_profiles_file, DiscoveryServer};
use profile_discovery::transport::NdjsonTransport;

fn main() {
	let args = CliArgs::parse();

	// Logging goes to stderr; stdout carries the protocol.
	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	let mut engine = DiscoveryEngine::new(args.engine_config());

	if let Some(path) = &args.profiles {
		let loaded = load_profiles_file(Path::new(path)).and_then(|p| engine.add_all(p));
		if let Err(e) = loaded {
			tracing::error!(path = %path, "Failed to load profiles: {}", e);
			std::process::exit(1);
		}
	}

	let transport = NdjsonTransport::new();
	let mut server = DiscoveryServer::new(transport, engine);

	tracing::info!("profile-discovery-engine ready");

	if let Err(e) = server.run() {
		tracing::error!("Server error: {}", e);
		std::process::exit(1);
	}
}
