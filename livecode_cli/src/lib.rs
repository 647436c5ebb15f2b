use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Inject the formatted source of imported modules into MDX example components.",
	long_about = "livecode keeps the code shown next to live MDX examples in sync with the \
	              modules on disk.\n\nA component such as `<Playground><Counter /></Playground>` \
	              receives the formatted source of the file `Counter` was imported from as an \
	              attribute (`code` by default).\n\nQuick start:\n  livecode init     Create a \
	              livecode.toml file\n  livecode check    Verify every example resolves\n  \
	              livecode inject   Print the transformed tree of a document"
)]
pub struct LivecodeCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,

	/// Name of the components to inject code into. Overrides
	/// `component_to_inject` from the config file.
	#[arg(long, short, global = true, conflicts_with = "pattern")]
	pub component: Option<String>,

	/// Regular expression selecting the components to inject code into.
	#[arg(long, global = true)]
	pub pattern: Option<String>,

	/// Attribute the formatted code is stored under.
	#[arg(long, global = true)]
	pub prop_name: Option<String>,

	/// Extension probed when resolving imports. Repeat to set the priority
	/// order, e.g. `--extension .ts --extension .js`.
	#[arg(long = "extension", short = 'e', global = true)]
	pub extensions: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize livecode in a project by creating a sample config file.
	///
	/// Creates a `livecode.toml` file in the project root. If the file already
	/// exists, this command is a no-op and exits successfully.
	Init,
	/// Check that every matching component in the project can be injected.
	///
	/// Scans the project for MDX documents, resolves and formats the module
	/// referenced by every matching component and reports the result. Exits
	/// with a non-zero status code if any document fails.
	///
	/// Ideal for CI pipelines to catch broken example imports.
	Check {
		/// Output format for check results. Use `text` for human-readable
		/// output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Transform a single document and print the resulting tree as JSON.
	Inject {
		/// The MDX document to transform.
		file: PathBuf,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each document includes its
	/// path, its injections and any error.
	Json,
}
