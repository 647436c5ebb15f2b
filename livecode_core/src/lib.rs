//! `livecode_core` keeps the code shown next to a live MDX example in sync with
//! the module on disk. It finds components such as
//!
//! ```mdx
//! import Counter from "./counter"
//!
//! <Playground>
//!   <Counter />
//! </Playground>
//! ```
//!
//! resolves the module the wrapped element was imported from, formats its
//! source and appends it to the component as an attribute (`code` by default),
//! ready for the renderer to display.
//!
//! ## Processing Pipeline
//!
//! ```text
//! MDX tree (mdast root)
//!   → Node filter (ESM blocks + flow JSX elements only)
//!   → Component matcher (name or pattern)
//!   → Import table (local binding → module specifier, built once per document)
//!   → Module resolver (extension probing, or a user supplied resolver)
//!   → Formatter (oxc for scripts, serde_json for JSON)
//!   → Attribute injector (appends `prop_name="..."`)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use livecode_core::Transform;
//! use livecode_core::TransformOptions;
//! use livecode_core::parse_document;
//! use std::path::Path;
//!
//! let path = Path::new("docs/counter.mdx");
//! let source = std::fs::read_to_string(path).unwrap();
//! let transform = Transform::new(TransformOptions::new("Playground")).unwrap();
//! let tree = transform
//! 	.transform(parse_document(&source).unwrap(), Some(path))
//! 	.unwrap();
//! ```

pub use config::*;
pub use document::*;
pub use error::*;
pub use formatter::*;
pub use imports::*;
pub use matcher::ComponentMatcher;
pub use resolver::*;
pub use transform::*;

pub mod config;
mod document;
#[allow(unused_assignments)]
mod error;
mod formatter;
mod imports;
pub mod matcher;
pub mod nodes;
pub mod project;
mod resolver;
mod transform;

#[cfg(test)]
mod __fixtures;
