use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::LivecodeError;
use crate::LivecodeResult;

/// Everything a [`ModuleResolver`] knows about the import being resolved.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext<'a> {
	/// Path of the document containing the import, when the host supplied one.
	pub document: Option<&'a Path>,
	/// Directory relative specifiers are resolved against.
	pub base_dir: Option<&'a Path>,
	/// Candidate extensions in priority order, each with a leading `.`.
	pub extensions: &'a [String],
}

/// Turns a raw module specifier into the path of the file to inject.
///
/// Implementations return:
///
/// - `Ok(Some(path))` when the module was found.
/// - `Ok(None)` when the component should be left untouched.
/// - `Err(_)` when resolution failed, which aborts the transform for the
///   current document.
///
/// Any `Fn(&str, &ResolveContext) -> LivecodeResult<Option<PathBuf>>` is a
/// resolver.
pub trait ModuleResolver: Send + Sync {
	fn resolve(
		&self,
		specifier: &str,
		context: &ResolveContext<'_>,
	) -> LivecodeResult<Option<PathBuf>>;
}

impl<F> ModuleResolver for F
where
	F: Fn(&str, &ResolveContext<'_>) -> LivecodeResult<Option<PathBuf>> + Send + Sync,
{
	fn resolve(
		&self,
		specifier: &str,
		context: &ResolveContext<'_>,
	) -> LivecodeResult<Option<PathBuf>> {
		self(specifier, context)
	}
}

/// The default resolver. Probes the configured extensions, in order, against
/// the specifier resolved relative to the document.
///
/// - `./foo` and `../foo` are joined to the base directory.
/// - `/abs/foo` is used as is.
/// - `pkg` and `@scope/pkg/file` are looked up in `node_modules` directories
///   from the base directory upwards.
///
/// A specifier that already ends in one of the configured extensions is not
/// probed. One with another extension is tried as written before probing.
/// Returned paths have `.` and `..` components folded away. When no candidate
/// exists the error lists every path that was tried. This resolver never
/// returns `Ok(None)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionResolver;

impl ModuleResolver for ExtensionResolver {
	fn resolve(
		&self,
		specifier: &str,
		context: &ResolveContext<'_>,
	) -> LivecodeResult<Option<PathBuf>> {
		let mut tried = vec![];

		let (base, found) = if is_relative(specifier) {
			let Some(base_dir) = context.base_dir else {
				return Err(LivecodeError::MissingBasePath {
					specifier: specifier.to_string(),
				});
			};
			let found = probe(&base_dir.join(specifier), context.extensions, &mut tried);
			(base_dir, found)
		} else if Path::new(specifier).is_absolute() {
			let found = probe(Path::new(specifier), context.extensions, &mut tried);
			(Path::new("/"), found)
		} else {
			let base_dir = context.base_dir.unwrap_or_else(|| Path::new("."));
			let found = probe_node_modules(base_dir, specifier, context.extensions, &mut tried);
			(base_dir, found)
		};

		let Some(path) = found else {
			return Err(LivecodeError::ModuleNotFound {
				specifier: specifier.to_string(),
				base: base.display().to_string(),
				tried: tried
					.iter()
					.map(|path| format!("  - {}", path.display()))
					.collect::<Vec<_>>()
					.join("\n"),
			});
		};

		tracing::debug!(specifier, path = %path.display(), "resolved module");
		Ok(Some(path))
	}
}

fn is_relative(specifier: &str) -> bool {
	specifier == "."
		|| specifier == ".."
		|| specifier.starts_with("./")
		|| specifier.starts_with("../")
}

/// Whether `path` already ends with one of the configured extensions.
fn has_extension(path: &Path, extensions: &[String]) -> bool {
	let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
		return false;
	};

	extensions
		.iter()
		.any(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
}

fn is_readable_file(path: &Path) -> bool {
	path.is_file() && std::fs::File::open(path).is_ok()
}

/// Drop `.` components and fold `..` into the preceding component without
/// touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();

	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
					normalized.pop();
				} else if !matches!(
					normalized.components().next_back(),
					Some(Component::RootDir | Component::Prefix(_))
				) {
					normalized.push("..");
				}
			}
			other => normalized.push(other),
		}
	}

	normalized
}

fn with_extension_appended(path: &Path, ext: &str) -> PathBuf {
	let mut raw = path.as_os_str().to_os_string();
	raw.push(ext);
	PathBuf::from(raw)
}

/// Probe `base` as a file, then as a directory containing an index file.
fn probe(base: &Path, extensions: &[String], tried: &mut Vec<PathBuf>) -> Option<PathBuf> {
	let base = normalize_path(base);
	let base = base.as_path();
	let mut attempt = |candidate: PathBuf| {
		let found = is_readable_file(&candidate);
		tried.push(candidate.clone());
		found.then_some(candidate)
	};

	if has_extension(base, extensions) {
		return attempt(base.to_path_buf());
	}

	// An unconfigured extension, e.g. `./schema.graphql`, names the file before
	// any `schema.graphql.ts` sibling.
	if base.extension().is_some() {
		if let Some(found) = attempt(base.to_path_buf()) {
			return Some(found);
		}
	}

	for ext in extensions {
		if let Some(found) = attempt(with_extension_appended(base, ext)) {
			return Some(found);
		}
	}

	if base.is_dir() {
		for ext in extensions {
			if let Some(found) = attempt(base.join(format!("index{ext}"))) {
				return Some(found);
			}
		}
	}

	None
}

#[derive(Debug, Default, Deserialize)]
struct PackageManifest {
	#[serde(default)]
	main: Option<String>,
}

fn package_main(package_root: &Path) -> Option<String> {
	let content = std::fs::read_to_string(package_root.join("package.json")).ok()?;
	let manifest: PackageManifest = serde_json::from_str(&content).ok()?;
	manifest.main.filter(|main| !main.is_empty())
}

fn probe_node_modules(
	base_dir: &Path,
	specifier: &str,
	extensions: &[String],
	tried: &mut Vec<PathBuf>,
) -> Option<PathBuf> {
	for dir in base_dir.ancestors() {
		let package_root = dir.join("node_modules").join(specifier);

		if let Some(main) = package_main(&package_root) {
			if let Some(found) = probe(&package_root.join(main), extensions, tried) {
				return Some(found);
			}
		}

		if let Some(found) = probe(&package_root, extensions, tried) {
			return Some(found);
		}
	}

	None
}
