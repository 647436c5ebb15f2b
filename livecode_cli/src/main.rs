use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use livecode_cli::Commands;
use livecode_cli::LivecodeCli;
use livecode_cli::OutputFormat;
use livecode_core::ComponentMatcher;
use livecode_core::Injection;
use livecode_core::LivecodeConfig;
use livecode_core::LivecodeError;
use livecode_core::LivecodeResult;
use livecode_core::Transform;
use livecode_core::project::DocumentReport;
use livecode_core::project::ScanOptions;
use livecode_core::project::collect_documents;
use livecode_core::project::process_document;
use owo_colors::OwoColorize;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const LOG_ENV: &str = "LIVECODE_LOG";

const SAMPLE_CONFIG: &str = r#"# livecode configuration

# Components receiving the formatted source of the element they wrap.
component_to_inject = "Playground"
# component_to_inject = { pattern = "^(Playground|Example)$" }

# Attribute the formatted code is stored under.
prop_name = "code"

# Extensions tried, in order, for imports without one.
extensions = [".tsx", ".js", ".json", ".ts", ".jsx", ".mdx"]

[format]
indent_width = 4
single_quote = false

[include]
patterns = ["**/*.mdx"]

# Gitignore-style patterns of files and directories to skip.
# [exclude]
# patterns = ["drafts/"]
"#;

fn main() {
	let args = LivecodeCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Check { format }) => run_check(&args, *format),
		Some(Commands::Inject { file }) => run_inject(&args, file),
		None => {
			eprintln!("No subcommand specified. Run `livecode --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<LivecodeError>() {
			Ok(livecode_err) => {
				let report: miette::Report = (*livecode_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr so `inject` output stays valid JSON. `LIVECODE_LOG`
/// takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose {
		"livecode=debug,livecode_core=debug"
	} else {
		"warn"
	};
	let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.init();
}

fn resolve_root(args: &LivecodeCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Load `livecode.toml` from `root` (if any) and apply the command line
/// overrides on top of it.
fn load_config(args: &LivecodeCli, root: &Path) -> LivecodeResult<LivecodeConfig> {
	let mut config = LivecodeConfig::load(root)?.unwrap_or_default();

	if let Some(component) = &args.component {
		config.component_to_inject = Some(ComponentMatcher::name(component.as_str()));
	}

	if let Some(pattern) = &args.pattern {
		config.component_to_inject = Some(ComponentMatcher::pattern(pattern)?);
	}

	if let Some(prop_name) = &args.prop_name {
		config.prop_name.clone_from(prop_name);
	}

	if !args.extensions.is_empty() {
		config.extensions.clone_from(&args.extensions);
	}

	tracing::debug!(root = %root.display(), ?config, "loaded configuration");

	Ok(config)
}

fn run_init(args: &LivecodeCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = LivecodeConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("livecode.toml");
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created config file: {}", config_path.display());

	println!();
	println!("Next steps:");
	println!("  1. Set `component_to_inject` to your example component");
	println!("  2. Wrap an imported element in it:");
	println!("     <Playground>");
	println!("       <Counter />");
	println!("     </Playground>");
	println!("  3. Run `livecode check` to verify every example resolves");

	Ok(())
}

fn run_check(args: &LivecodeCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let transform = Transform::new(config.to_transform_options(&root))?;
	let files = collect_documents(&root, &ScanOptions::from_config(&config))?;

	let outcomes: Vec<(PathBuf, LivecodeResult<DocumentReport>)> = files
		.into_iter()
		.map(|file| {
			let outcome = process_document(&transform, &file).map(|(_, report)| report);
			(file, outcome)
		})
		.collect();

	let failed = outcomes.iter().filter(|(_, outcome)| outcome.is_err()).count();

	match format {
		OutputFormat::Json => print_check_json(&outcomes, &root, failed == 0),
		OutputFormat::Text => print_check_text(&outcomes, &root, failed, args.verbose),
	}

	if failed > 0 {
		process::exit(1);
	}

	Ok(())
}

fn print_check_json(
	outcomes: &[(PathBuf, LivecodeResult<DocumentReport>)],
	root: &Path,
	ok: bool,
) {
	let documents: Vec<serde_json::Value> = outcomes
		.iter()
		.map(|(file, outcome)| {
			let rel = make_relative(file, root);
			match outcome {
				Ok(report) => {
					serde_json::json!({
						"file": rel,
						"injections": report
							.injections
							.iter()
							.map(|injection| injection_to_json(injection, root))
							.collect::<Vec<_>>(),
						"error": null,
					})
				}
				Err(e) => {
					serde_json::json!({
						"file": rel,
						"injections": [],
						"error": e.to_string(),
					})
				}
			}
		})
		.collect();

	let output = serde_json::json!({
		"ok": ok,
		"documents": documents,
	});
	println!("{output}");
}

fn injection_to_json(injection: &Injection, root: &Path) -> serde_json::Value {
	serde_json::json!({
		"component": injection.component,
		"reference": injection.reference,
		"specifier": injection.specifier,
		"path": make_relative(&injection.path, root),
		"line": injection.line,
	})
}

fn print_check_text(
	outcomes: &[(PathBuf, LivecodeResult<DocumentReport>)],
	root: &Path,
	failed: usize,
	verbose: bool,
) {
	if outcomes.is_empty() {
		println!("No documents found.");
		return;
	}

	let mut injected = 0;

	for (file, outcome) in outcomes {
		let rel = make_relative(file, root);
		match outcome {
			Ok(report) => {
				injected += report.injections.len();
				if verbose || !report.injections.is_empty() {
					println!(
						"{} {rel}: {} component(s) injected",
						colored!("ok", green),
						report.injections.len()
					);
				}
				if verbose {
					for injection in &report.injections {
						println!(
							"    <{}> {} from `{}` ({}{})",
							injection.component,
							injection.reference,
							injection.specifier,
							make_relative(&injection.path, root),
							injection
								.line
								.map(|line| format!(", line {line}"))
								.unwrap_or_default()
						);
					}
				}
			}
			Err(e) => {
				eprintln!("{} {rel}: {e}", colored!("error", red));
			}
		}
	}

	println!();
	if failed == 0 {
		println!(
			"{}",
			colored!(
				format!(
					"Check passed: {injected} component(s) injected across {} document(s).",
					outcomes.len()
				),
				bold
			)
		);
	} else {
		eprintln!(
			"Check failed: {failed} of {} document(s) could not be transformed.",
			outcomes.len()
		);
	}
}

fn run_inject(args: &LivecodeCli, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let transform = Transform::new(config.to_transform_options(&root))?;
	let path = root.join(file);

	let (tree, report) = process_document(&transform, &path)?;

	for injection in &report.injections {
		tracing::info!(
			component = %injection.component,
			path = %injection.path.display(),
			"injected"
		);
	}

	println!("{}", serde_json::to_string_pretty(&tree)?);

	Ok(())
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
