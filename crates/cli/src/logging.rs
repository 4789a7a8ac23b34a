use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

pub fn init_logging(verbosity: u8) {
	// 0 = deploy progress narration, browser internals quiet
	// 1 (-v) = debug for the tool, info for the browser layer
	// 2+ (-vv) = everything, protocol traffic included
	let filter = match verbosity {
		0 => "info,hubpush_browser=warn",
		1 => "debug,hubpush_browser=info",
		_ => "trace",
	};

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}
