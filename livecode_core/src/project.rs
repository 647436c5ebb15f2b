use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::WalkBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use markdown::mdast::Node;
use serde::Serialize;

use crate::Injection;
use crate::LivecodeConfig;
use crate::LivecodeError;
use crate::LivecodeResult;
use crate::Transform;
use crate::parse_document;

/// Options controlling which documents are discovered under a root.
#[derive(Debug, Clone)]
pub struct ScanOptions {
	/// Documents must match one of these globs (relative to the root).
	pub include_set: GlobSet,
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self::from_config(&LivecodeConfig::default())
	}
}

impl ScanOptions {
	pub fn from_config(config: &LivecodeConfig) -> Self {
		Self {
			include_set: build_glob_set(&config.include.patterns),
			exclude_patterns: config.exclude.patterns.clone(),
			disable_gitignore: config.disable_gitignore,
		}
	}
}

/// The outcome of running the transform over one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
	pub file: PathBuf,
	pub injections: Vec<Injection>,
}

/// Build a `GlobSet` from a list of glob pattern strings. Invalid patterns
/// are ignored.
fn build_glob_set(patterns: &[String]) -> GlobSet {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		if let Ok(glob) = Glob::new(pattern) {
			builder.add(glob);
		}
	}
	builder.build().unwrap_or_else(|_| GlobSet::empty())
}

/// Build a `Gitignore` matcher from `[exclude]` patterns.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> LivecodeResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			LivecodeError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| LivecodeError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Collect every document under `root` matching the include patterns, sorted
/// for deterministic ordering. `node_modules` and hidden directories are
/// skipped.
pub fn collect_documents(root: &Path, options: &ScanOptions) -> LivecodeResult<Vec<PathBuf>> {
	let exclude = build_exclude_matcher(root, &options.exclude_patterns)?;
	let walker = WalkBuilder::new(root)
		.hidden(true)
		.git_ignore(!options.disable_gitignore)
		.git_global(false)
		.git_exclude(false)
		.require_git(false)
		.filter_entry(|entry| entry.file_name() != "node_modules")
		.build();

	let mut files = vec![];

	for entry in walker {
		let entry = entry.map_err(|e| LivecodeError::Io(std::io::Error::other(e.to_string())))?;
		let path = entry.path();
		let is_dir = entry.file_type().is_some_and(|file_type| file_type.is_dir());

		if is_dir || exclude.matched_path_or_any_parents(path, false).is_ignore() {
			continue;
		}

		let Ok(relative) = path.strip_prefix(root) else {
			continue;
		};

		if options.include_set.is_match(relative) {
			files.push(path.to_path_buf());
		}
	}

	files.sort();
	Ok(files)
}

/// Read, parse and transform the document at `path`.
pub fn process_document(
	transform: &Transform,
	path: &Path,
) -> LivecodeResult<(Node, DocumentReport)> {
	let content = std::fs::read_to_string(path)?;
	let mut tree = parse_document(&content)?;
	let injections = transform.apply(&mut tree, Some(path))?;

	Ok((
		tree,
		DocumentReport {
			file: path.to_path_buf(),
			injections,
		},
	))
}
