use markdown::mdast::Node;

/// The root children the transform cares about. Everything else (headings,
/// paragraphs, code, text) is dropped by [`filter_nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	/// An ESM block (`import`/`export` statements) at the top level of the
	/// document.
	Import,
	/// A JSX element occupying its own block, e.g. `<Target>...</Target>`.
	Component,
}

impl NodeKind {
	pub fn of(node: &Node) -> Option<Self> {
		match node {
			Node::MdxjsEsm(_) => Some(Self::Import),
			Node::MdxJsxFlowElement(_) => Some(Self::Component),
			_ => None,
		}
	}
}

/// A relevant root child, addressed by its index in the root's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilteredNode {
	pub index: usize,
	pub kind: NodeKind,
}

/// Select the import and component nodes from `children`, preserving
/// document order.
pub fn filter_nodes(children: &[Node]) -> Vec<FilteredNode> {
	children
		.iter()
		.enumerate()
		.filter_map(|(index, node)| NodeKind::of(node).map(|kind| FilteredNode { index, kind }))
		.collect()
}
