use markdown::mdast::MdxJsxFlowElement;
use markdown::mdast::Node;
use regex::Regex;
use serde::Deserialize;

use crate::LivecodeError;
use crate::LivecodeResult;

/// Selects which component names receive injected code.
///
/// ```toml
/// component_to_inject = "Playground"
/// # or
/// component_to_inject = { pattern = "^(Playground|Example)$" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ComponentTarget")]
#[non_exhaustive]
pub enum ComponentMatcher {
	/// Match a single component name exactly.
	Name(String),
	/// Match every component whose name the pattern finds a match in.
	Pattern(Regex),
}

impl ComponentMatcher {
	pub fn name(name: impl Into<String>) -> Self {
		Self::Name(name.into())
	}

	/// Compile `pattern` into a matcher.
	pub fn pattern(pattern: &str) -> LivecodeResult<Self> {
		let regex = Regex::new(pattern).map_err(|e| {
			LivecodeError::InvalidPattern {
				pattern: pattern.to_string(),
				reason: e.to_string(),
			}
		})?;

		Ok(Self::Pattern(regex))
	}

	/// An empty name or pattern selects nothing useful and is rejected when the
	/// transform is built.
	pub fn is_empty(&self) -> bool {
		match self {
			Self::Name(name) => name.is_empty(),
			Self::Pattern(regex) => regex.as_str().is_empty(),
		}
	}

	/// Fragments (`<>...</>`) have no name and never match.
	pub fn matches(&self, name: Option<&str>) -> bool {
		let Some(name) = name else {
			return false;
		};

		match self {
			Self::Name(target) => target == name,
			Self::Pattern(regex) => regex.is_match(name),
		}
	}
}

impl From<&str> for ComponentMatcher {
	fn from(value: &str) -> Self {
		Self::name(value)
	}
}

impl From<String> for ComponentMatcher {
	fn from(value: String) -> Self {
		Self::Name(value)
	}
}

impl From<Regex> for ComponentMatcher {
	fn from(value: Regex) -> Self {
		Self::Pattern(value)
	}
}

impl std::fmt::Display for ComponentMatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Name(name) => write!(f, "{name}"),
			Self::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
		}
	}
}

/// Raw config representation of a [`ComponentMatcher`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ComponentTarget {
	Name(String),
	Pattern { pattern: String },
}

impl TryFrom<ComponentTarget> for ComponentMatcher {
	type Error = LivecodeError;

	fn try_from(value: ComponentTarget) -> Result<Self, Self::Error> {
		match value {
			ComponentTarget::Name(name) => Ok(Self::Name(name)),
			ComponentTarget::Pattern { pattern } => Self::pattern(&pattern),
		}
	}
}

/// The name of the element wrapped by a matched component, e.g. `Foo` in
/// `<Target><Foo /></Target>`. Only the first child is considered.
pub fn referenced_name(element: &MdxJsxFlowElement) -> Option<&str> {
	match element.children.first()? {
		Node::MdxJsxFlowElement(child) => child.name.as_deref(),
		Node::MdxJsxTextElement(child) => child.name.as_deref(),
		// `<Target>\n<Foo /> and text\n</Target>` wraps the reference in a
		// paragraph.
		Node::Paragraph(paragraph) => {
			match paragraph.children.first()? {
				Node::MdxJsxTextElement(child) => child.name.as_deref(),
				_ => None,
			}
		}
		_ => None,
	}
}
