use std::path::Path;
use std::path::PathBuf;

use markdown::mdast::AttributeContent;
use markdown::mdast::AttributeValue;
use markdown::mdast::MdxJsxFlowElement;
use markdown::mdast::Node;
use tempfile::TempDir;

use crate::parse_document;

/// A document importing `Foo` from `./foo` and wrapping it in `<Target>`.
pub const TARGET_DOCUMENT: &str = "import Foo from \"./foo\"\n\n# Example\n\nSome text before the \
                                   example.\n\n<Target>\n  <Foo />\n</Target>\n";

pub fn tempdir() -> TempDir {
	tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"))
}

pub fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create_dir_all: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	path
}

pub fn parse(content: &str) -> Node {
	parse_document(content).unwrap_or_else(|e| panic!("parse: {e}"))
}

pub fn root_children(tree: &Node) -> &[Node] {
	tree.children()
		.map(Vec::as_slice)
		.unwrap_or_else(|| panic!("expected a root node"))
}

/// Every top-level flow element named `name`.
pub fn components<'a>(tree: &'a Node, name: &str) -> Vec<&'a MdxJsxFlowElement> {
	root_children(tree)
		.iter()
		.filter_map(|node| {
			match node {
				Node::MdxJsxFlowElement(element) if element.name.as_deref() == Some(name) => {
					Some(element)
				}
				_ => None,
			}
		})
		.collect()
}

pub fn component<'a>(tree: &'a Node, name: &str) -> &'a MdxJsxFlowElement {
	components(tree, name)
		.into_iter()
		.next()
		.unwrap_or_else(|| panic!("no `{name}` component in tree"))
}

/// The literal attributes of `element` as `(name, value)` pairs.
pub fn literal_attributes(element: &MdxJsxFlowElement) -> Vec<(String, String)> {
	element
		.attributes
		.iter()
		.filter_map(|attribute| {
			match attribute {
				AttributeContent::Property(property) => {
					match &property.value {
						Some(AttributeValue::Literal(value)) => {
							Some((property.name.clone(), value.clone()))
						}
						_ => None,
					}
				}
				AttributeContent::Expression(_) => None,
			}
		})
		.collect()
}

pub fn extensions(values: &[&str]) -> Vec<String> {
	values.iter().map(ToString::to_string).collect()
}
