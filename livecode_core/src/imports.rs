use derive_more::Deref;
use markdown::mdast::Node;
use oxc::allocator::Allocator;
use oxc::ast::ast::Statement;
use oxc::parser::Parser;
use oxc::span::SourceType;
use serde::Serialize;

use crate::nodes::FilteredNode;
use crate::nodes::NodeKind;

/// A local name bound by an `import` declaration together with the raw module
/// path it was imported from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBinding {
	/// The identifier introduced in the document scope, e.g. `Foo` in
	/// `import Foo from "./foo"`.
	pub local: String,
	/// The unresolved module specifier, e.g. `./foo`.
	pub source: String,
}

/// Every import binding of a document in declaration order.
///
/// The table is derived from a single document and is rebuilt for every
/// transform call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct ImportTable(Vec<ImportBinding>);

impl ImportTable {
	/// Build the table from the `Import` entries of an already filtered child
	/// list.
	pub fn from_nodes(children: &[Node], filtered: &[FilteredNode]) -> Self {
		let sources = filtered
			.iter()
			.filter(|entry| entry.kind == NodeKind::Import)
			.filter_map(|entry| {
				match children.get(entry.index) {
					Some(Node::MdxjsEsm(esm)) => Some(esm.value.as_str()),
					_ => None,
				}
			});

		Self::from_sources(sources)
	}

	/// Build the table from raw ESM sources. Sources which fail to parse are
	/// skipped.
	pub fn from_sources<'a>(sources: impl IntoIterator<Item = &'a str>) -> Self {
		let mut bindings = vec![];

		for source in sources {
			collect_bindings(source, &mut bindings);
		}

		Self(bindings)
	}

	/// Return the module path of the first binding named `local`.
	pub fn lookup(&self, local: &str) -> Option<&str> {
		self.0
			.iter()
			.find(|binding| binding.local == local)
			.map(|binding| binding.source.as_str())
	}
}

fn collect_bindings(source: &str, bindings: &mut Vec<ImportBinding>) {
	let allocator = Allocator::default();
	let source_type = SourceType::mjs().with_jsx(true);
	let ret = Parser::new(&allocator, source, source_type).parse();

	if ret.panicked || !ret.errors.is_empty() {
		tracing::debug!(
			errors = ret.errors.len(),
			"skipping esm block which could not be parsed"
		);
		return;
	}

	for statement in &ret.program.body {
		let Statement::ImportDeclaration(declaration) = statement else {
			continue;
		};

		let Some(specifiers) = &declaration.specifiers else {
			// Side effect imports (`import "./styles.css"`) bind nothing.
			continue;
		};

		for specifier in specifiers {
			bindings.push(ImportBinding {
				local: specifier.local().name.to_string(),
				source: declaration.source.value.to_string(),
			});
		}
	}
}
