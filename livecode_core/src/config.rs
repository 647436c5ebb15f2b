use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ComponentMatcher;
use crate::FormatOptions;
use crate::LivecodeError;
use crate::LivecodeResult;
use crate::TransformOptions;
use crate::transform::DEFAULT_EXTENSIONS;
use crate::transform::DEFAULT_PROP_NAME;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"livecode.toml",
	".livecode.toml",
	".config/livecode.toml",
];

/// Documents scanned when `[include]` is not configured.
pub const DEFAULT_INCLUDE_PATTERNS: [&str; 1] = ["**/*.mdx"];

/// Configuration loaded from a `livecode.toml` file.
///
/// ```toml
/// component_to_inject = "Playground"
/// prop_name = "code"
/// extensions = [".tsx", ".ts", ".js"]
///
/// [format]
/// indent_width = 4
/// single_quote = false
///
/// [include]
/// patterns = ["docs/**/*.mdx"]
///
/// [exclude]
/// patterns = ["drafts/"]
///
/// disable_gitignore = false
/// ```
#[derive(Debug, Deserialize)]
pub struct LivecodeConfig {
	/// Name, or `{ pattern = "..." }`, of the components to inject code into.
	#[serde(default)]
	pub component_to_inject: Option<ComponentMatcher>,
	/// Attribute name the formatted code is stored under.
	#[serde(default = "default_prop_name")]
	pub prop_name: String,
	/// Extensions tried, in order, when resolving an import without one.
	#[serde(default = "default_extensions")]
	pub extensions: Vec<String>,
	/// Fallback document path for resolving relative imports, relative to the
	/// project root.
	#[serde(default)]
	pub file_path: Option<PathBuf>,
	#[serde(default)]
	pub format: FormatOptions,
	/// Glob patterns of the documents to process.
	#[serde(default)]
	pub include: IncludeConfig,
	/// Gitignore-style patterns of files and directories to skip.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl Default for LivecodeConfig {
	fn default() -> Self {
		Self {
			component_to_inject: None,
			prop_name: default_prop_name(),
			extensions: default_extensions(),
			file_path: None,
			format: FormatOptions::default(),
			include: IncludeConfig::default(),
			exclude: ExcludeConfig::default(),
			disable_gitignore: false,
		}
	}
}

/// Configuration for the documents to process.
#[derive(Debug, Deserialize)]
pub struct IncludeConfig {
	/// Glob patterns relative to the project root.
	#[serde(default = "default_include_patterns")]
	pub patterns: Vec<String>,
}

impl Default for IncludeConfig {
	fn default() -> Self {
		Self {
			patterns: default_include_patterns(),
		}
	}
}

/// Configuration for excluding files and directories from scanning.
///
/// Patterns follow gitignore syntax and are applied on top of any `.gitignore`
/// rules (unless `disable_gitignore` is set).
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_prop_name() -> String {
	DEFAULT_PROP_NAME.to_string()
}

fn default_extensions() -> Vec<String> {
	DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

fn default_include_patterns() -> Vec<String> {
	DEFAULT_INCLUDE_PATTERNS
		.iter()
		.map(ToString::to_string)
		.collect()
}

impl LivecodeConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> LivecodeResult<Option<LivecodeConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	pub fn parse(content: &str) -> LivecodeResult<LivecodeConfig> {
		toml::from_str(content).map_err(|e| LivecodeError::ConfigParse(e.to_string()))
	}

	/// Build transform options. A relative `file_path` is anchored at `root`.
	pub fn to_transform_options(&self, root: &Path) -> TransformOptions {
		TransformOptions {
			component_to_inject: self.component_to_inject.clone(),
			prop_name: self.prop_name.clone(),
			extensions: self.extensions.clone(),
			file_path: self.file_path.as_ref().map(|path| root.join(path)),
			module_resolver: None,
			format: self.format,
		}
	}
}
