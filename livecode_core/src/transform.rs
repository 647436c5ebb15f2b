use std::path::Path;
use std::path::PathBuf;

use markdown::mdast::AttributeContent;
use markdown::mdast::AttributeValue;
use markdown::mdast::MdxJsxAttribute;
use markdown::mdast::MdxJsxFlowElement;
use markdown::mdast::Node;
use serde::Serialize;

use crate::ComponentMatcher;
use crate::ExtensionResolver;
use crate::FormatOptions;
use crate::ImportTable;
use crate::LivecodeError;
use crate::LivecodeResult;
use crate::ModuleResolver;
use crate::ResolveContext;
use crate::Syntax;
use crate::format_code;
use crate::matcher::referenced_name;
use crate::nodes::FilteredNode;
use crate::nodes::NodeKind;
use crate::nodes::filter_nodes;

/// Default name of the injected attribute.
pub const DEFAULT_PROP_NAME: &str = "code";

/// Extensions probed by the default resolver, in priority order.
pub const DEFAULT_EXTENSIONS: [&str; 6] = [".tsx", ".js", ".json", ".ts", ".jsx", ".mdx"];

/// Configuration for a [`Transform`].
///
/// `component_to_inject` is required; everything else has a default.
pub struct TransformOptions {
	/// Name or pattern of the components which receive injected code.
	pub component_to_inject: Option<ComponentMatcher>,
	/// Attribute the formatted code is stored under.
	pub prop_name: String,
	/// Extensions tried by the default resolver.
	pub extensions: Vec<String>,
	/// Fallback document path used to anchor relative imports when the host
	/// does not pass one to [`Transform::apply`].
	pub file_path: Option<PathBuf>,
	/// Replaces the default [`ExtensionResolver`] when set.
	pub module_resolver: Option<Box<dyn ModuleResolver>>,
	pub format: FormatOptions,
}

impl Default for TransformOptions {
	fn default() -> Self {
		Self {
			component_to_inject: None,
			prop_name: DEFAULT_PROP_NAME.to_string(),
			extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
			file_path: None,
			module_resolver: None,
			format: FormatOptions::default(),
		}
	}
}

impl std::fmt::Debug for TransformOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TransformOptions")
			.field("component_to_inject", &self.component_to_inject)
			.field("prop_name", &self.prop_name)
			.field("extensions", &self.extensions)
			.field("file_path", &self.file_path)
			.field("module_resolver", &self.module_resolver.is_some())
			.field("format", &self.format)
			.finish()
	}
}

impl TransformOptions {
	pub fn new(component: impl Into<ComponentMatcher>) -> Self {
		Self {
			component_to_inject: Some(component.into()),
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_prop_name(mut self, prop_name: impl Into<String>) -> Self {
		self.prop_name = prop_name.into();
		self
	}

	#[must_use]
	pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.extensions = extensions.into_iter().map(Into::into).collect();
		self
	}

	#[must_use]
	pub fn with_file_path(mut self, file_path: impl Into<PathBuf>) -> Self {
		self.file_path = Some(file_path.into());
		self
	}

	#[must_use]
	pub fn with_format(mut self, format: FormatOptions) -> Self {
		self.format = format;
		self
	}

	#[must_use]
	pub fn with_resolver(mut self, resolver: impl ModuleResolver + 'static) -> Self {
		self.module_resolver = Some(Box::new(resolver));
		self
	}

	/// Like [`with_resolver`](Self::with_resolver) but lets closures infer
	/// their argument types.
	#[must_use]
	pub fn with_resolver_fn<F>(self, resolver: F) -> Self
	where
		F: Fn(&str, &ResolveContext<'_>) -> LivecodeResult<Option<PathBuf>> + Send + Sync + 'static,
	{
		self.with_resolver(resolver)
	}
}

/// A component which received injected code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Injection {
	/// Name of the matched component.
	pub component: String,
	/// Name of the element wrapped by the component.
	pub reference: String,
	/// Module specifier the reference was imported from.
	pub specifier: String,
	/// File whose formatted content was injected.
	pub path: PathBuf,
	/// 1-indexed line of the component in the document, when known.
	pub line: Option<usize>,
}

/// Injects the formatted source of referenced modules into matching MDX
/// components.
///
/// The transform keeps no state between documents so a single instance can be
/// reused for every document of a build.
pub struct Transform {
	matcher: ComponentMatcher,
	prop_name: String,
	extensions: Vec<String>,
	file_path: Option<PathBuf>,
	resolver: Box<dyn ModuleResolver>,
	format: FormatOptions,
}

impl std::fmt::Debug for Transform {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Transform")
			.field("matcher", &self.matcher)
			.field("prop_name", &self.prop_name)
			.field("extensions", &self.extensions)
			.field("file_path", &self.file_path)
			.field("format", &self.format)
			.finish_non_exhaustive()
	}
}

impl Transform {
	/// Validate `options` and build the transform. Fails when
	/// `component_to_inject` is missing or empty.
	pub fn new(options: TransformOptions) -> LivecodeResult<Self> {
		let TransformOptions {
			component_to_inject,
			prop_name,
			extensions,
			file_path,
			module_resolver,
			format,
		} = options;

		let Some(matcher) = component_to_inject.filter(|matcher| !matcher.is_empty()) else {
			return Err(LivecodeError::MissingComponent);
		};

		Ok(Self {
			matcher,
			prop_name,
			extensions: normalize_extensions(extensions),
			file_path,
			resolver: module_resolver.unwrap_or_else(|| Box::new(ExtensionResolver)),
			format,
		})
	}

	pub fn matcher(&self) -> &ComponentMatcher {
		&self.matcher
	}

	pub fn prop_name(&self) -> &str {
		&self.prop_name
	}

	pub fn extensions(&self) -> &[String] {
		&self.extensions
	}

	/// Run the transform and return the mutated tree.
	pub fn transform(&self, mut tree: Node, document: Option<&Path>) -> LivecodeResult<Node> {
		self.apply(&mut tree, document)?;
		Ok(tree)
	}

	/// Inject code into every matching component among the root's children.
	///
	/// `document` is the path of the file `tree` was parsed from. Relative
	/// imports are resolved against its directory, falling back to the
	/// configured `file_path`.
	#[tracing::instrument(level = "debug", skip_all, fields(document = ?document))]
	pub fn apply(&self, tree: &mut Node, document: Option<&Path>) -> LivecodeResult<Vec<Injection>> {
		let Some(children) = tree.children_mut() else {
			return Ok(vec![]);
		};

		let document = document.or(self.file_path.as_deref());
		let base_dir = document.and_then(Path::parent);
		let context = ResolveContext {
			document,
			base_dir,
			extensions: &self.extensions,
		};

		let filtered = filter_nodes(children);
		let mut table = None;
		let mut injections = vec![];

		for entry in filtered.iter().filter(|entry| entry.kind == NodeKind::Component) {
			let Some(target) = self.locate(children, entry.index, &filtered, &mut table) else {
				continue;
			};

			let Some(path) = self.resolver.resolve(&target.specifier, &context)? else {
				tracing::debug!(
					component = %target.component,
					specifier = %target.specifier,
					"module resolver returned nothing"
				);
				continue;
			};

			let source = std::fs::read_to_string(&path).map_err(|e| {
				LivecodeError::ReadModule {
					path: path.display().to_string(),
					reason: e.to_string(),
				}
			})?;
			let code = format_code(&source, Syntax::from_path(&path), &self.format, &path)?;

			if let Some(Node::MdxJsxFlowElement(element)) = children.get_mut(entry.index) {
				set_attribute(element, &self.prop_name, code);
			}

			tracing::debug!(
				component = %target.component,
				path = %path.display(),
				"injected module source"
			);

			injections.push(Injection {
				component: target.component,
				reference: target.reference,
				specifier: target.specifier,
				path,
				line: target.line,
			});
		}

		Ok(injections)
	}

	/// Match the component at `index` and find the module its first child was
	/// imported from. The import table is built on the first match only.
	fn locate(
		&self,
		children: &[Node],
		index: usize,
		filtered: &[FilteredNode],
		table: &mut Option<ImportTable>,
	) -> Option<Target> {
		let Some(Node::MdxJsxFlowElement(element)) = children.get(index) else {
			return None;
		};

		if !self.matcher.matches(element.name.as_deref()) {
			return None;
		}

		let component = element.name.clone().unwrap_or_default();
		let Some(reference) = referenced_name(element) else {
			tracing::debug!(%component, "matched component has no reference");
			return None;
		};

		let table = table.get_or_insert_with(|| ImportTable::from_nodes(children, filtered));
		let Some(specifier) = table.lookup(reference) else {
			tracing::debug!(%component, reference, "reference is not imported");
			return None;
		};

		Some(Target {
			reference: reference.to_string(),
			specifier: specifier.to_string(),
			line: element.position.as_ref().map(|position| position.start.line),
			component,
		})
	}
}

struct Target {
	component: String,
	reference: String,
	specifier: String,
	line: Option<usize>,
}

/// Append a literal attribute to `element`. Existing attributes, including
/// ones with the same name, are kept.
pub fn set_attribute(element: &mut MdxJsxFlowElement, name: &str, value: String) {
	element
		.attributes
		.push(AttributeContent::Property(MdxJsxAttribute {
			name: name.to_string(),
			value: Some(AttributeValue::Literal(value)),
		}));
}

fn normalize_extensions(extensions: Vec<String>) -> Vec<String> {
	extensions
		.into_iter()
		.map(|ext| ext.trim().to_string())
		.filter(|ext| !ext.is_empty())
		.map(|ext| {
			if ext.starts_with('.') {
				ext
			} else {
				format!(".{ext}")
			}
		})
		.collect()
}
