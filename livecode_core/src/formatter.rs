use std::path::Path;

use oxc::allocator::Allocator;
use oxc::ast::ast::Program;
use oxc::codegen::Codegen;
use oxc::codegen::CodegenOptions;
use oxc::codegen::IndentChar;
use oxc::parser::Parser;
use oxc::span::GetSpan;
use oxc::span::SourceType;
use serde::Deserialize;
use serde::Serialize;
use serde::de::IgnoredAny;

use crate::LivecodeError;
use crate::LivecodeResult;
use crate::normalize_line_endings;

/// Default indentation width of formatted code.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Formatting settings. These are fixed per transform so the injected code is
/// identical across machines and runs.
///
/// ```toml
/// [format]
/// indent_width = 4
/// single_quote = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormatOptions {
	/// Number of spaces per indentation level.
	#[serde(default = "default_indent_width")]
	pub indent_width: usize,
	/// Print string literals with single quotes.
	#[serde(default)]
	pub single_quote: bool,
}

impl Default for FormatOptions {
	fn default() -> Self {
		Self {
			indent_width: DEFAULT_INDENT_WIDTH,
			single_quote: false,
		}
	}
}

fn default_indent_width() -> usize {
	DEFAULT_INDENT_WIDTH
}

/// The grammar used to format a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Syntax {
	/// JavaScript or TypeScript, printed with semicolons after every statement.
	Script(SourceType),
	/// JSON, re-indented with its tokens kept as written.
	Json,
	/// Markdown and MDX, which are shown as written.
	Text,
}

impl Default for Syntax {
	/// JavaScript modules with JSX.
	fn default() -> Self {
		Self::Script(SourceType::mjs().with_jsx(true))
	}
}

impl Syntax {
	/// Pick the grammar from the file extension, falling back to
	/// [`Syntax::default`] for unknown or missing extensions.
	pub fn from_path(path: &Path) -> Self {
		let ext = path
			.extension()
			.and_then(|ext| ext.to_str())
			.unwrap_or("")
			.to_ascii_lowercase();

		match ext.as_str() {
			"json" => Self::Json,
			"md" | "mdx" | "markdown" => Self::Text,
			_ => SourceType::from_path(path).map_or_else(|_| Self::default(), Self::Script),
		}
	}
}

/// Format `source` using `syntax`. `path` only appears in error messages.
pub fn format_code(
	source: &str,
	syntax: Syntax,
	options: &FormatOptions,
	path: &Path,
) -> LivecodeResult<String> {
	match syntax {
		Syntax::Script(source_type) => format_script(source, source_type, options, path),
		Syntax::Json => format_json(source, options, path),
		Syntax::Text => Ok(format_text(source)),
	}
}

/// Statements are printed one at a time so a blank line between two top-level
/// statements in `source` survives as a single blank line.
fn format_script(
	source: &str,
	source_type: SourceType,
	options: &FormatOptions,
	path: &Path,
) -> LivecodeResult<String> {
	let source = normalize_line_endings(source);
	let allocator = Allocator::default();
	let program = parse_script(&allocator, &source, source_type, path)?;

	if program.body.len() <= 1 {
		return Ok(print_program(&program, options));
	}

	let last = program.body.len() - 1;
	let mut chunks = vec![];
	let mut start = 0;

	for (index, statement) in program.body.iter().enumerate() {
		let span = statement.span();
		let blank_before = index > 0 && has_blank_line(&source[start..span.start as usize]);
		let end = if index == last {
			source.len()
		} else {
			span.end as usize
		};
		chunks.push((start..end, blank_before));
		start = end;
	}

	let mut code = String::with_capacity(source.len());

	for (range, blank_before) in chunks {
		let allocator = Allocator::default();
		let chunk = parse_script(&allocator, &source[range], source_type, path)?;

		if blank_before && !code.is_empty() {
			code.push('\n');
		}

		code.push_str(&print_program(&chunk, options));
	}

	Ok(code)
}

fn parse_script<'a>(
	allocator: &'a Allocator,
	source: &'a str,
	source_type: SourceType,
	path: &Path,
) -> LivecodeResult<Program<'a>> {
	let ret = Parser::new(allocator, source, source_type).parse();

	if let Some(error) = ret.errors.first() {
		return Err(LivecodeError::Format {
			path: path.display().to_string(),
			reason: error.to_string(),
		});
	}

	if ret.panicked {
		return Err(LivecodeError::Format {
			path: path.display().to_string(),
			reason: "parser aborted".to_string(),
		});
	}

	Ok(ret.program)
}

fn print_program(program: &Program<'_>, options: &FormatOptions) -> String {
	Codegen::new()
		.with_options(CodegenOptions {
			single_quote: options.single_quote,
			indent_char: IndentChar::Space,
			indent_width: options.indent_width,
			..CodegenOptions::default()
		})
		.build(program)
		.code
}

/// Whether the text between two statements contains an empty line.
fn has_blank_line(gap: &str) -> bool {
	let lines: Vec<&str> = gap.split('\n').skip(1).collect();
	lines.len() > 1 && lines[..lines.len() - 1].iter().any(|line| line.trim().is_empty())
}

/// Re-indent JSON token by token. Numbers, escapes and duplicate keys are
/// kept exactly as written.
fn format_json(source: &str, options: &FormatOptions, path: &Path) -> LivecodeResult<String> {
	serde_json::from_str::<IgnoredAny>(source).map_err(|e| {
		LivecodeError::Format {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	let indent = " ".repeat(options.indent_width);
	let mut code = String::with_capacity(source.len());
	let mut depth = 0;
	let mut chars = source.chars().peekable();

	while let Some(ch) = chars.next() {
		match ch {
			'"' => {
				code.push(ch);
				let mut escaped = false;
				for inner in chars.by_ref() {
					code.push(inner);
					if escaped {
						escaped = false;
					} else if inner == '\\' {
						escaped = true;
					} else if inner == '"' {
						break;
					}
				}
			}
			'{' | '[' => {
				let close = if ch == '{' { '}' } else { ']' };
				while chars.peek().is_some_and(|next| next.is_whitespace()) {
					chars.next();
				}

				code.push(ch);
				if chars.peek() == Some(&close) {
					chars.next();
					code.push(close);
				} else {
					depth += 1;
					push_line(&mut code, &indent, depth);
				}
			}
			'}' | ']' => {
				depth -= 1;
				push_line(&mut code, &indent, depth);
				code.push(ch);
			}
			',' => {
				code.push(ch);
				push_line(&mut code, &indent, depth);
			}
			':' => code.push_str(": "),
			ch if ch.is_whitespace() => {}
			ch => code.push(ch),
		}
	}

	code.push('\n');

	Ok(code)
}

fn push_line(code: &mut String, indent: &str, depth: usize) {
	code.push('\n');
	for _ in 0..depth {
		code.push_str(indent);
	}
}

/// Normalize line endings to LF and end with exactly one newline.
fn format_text(source: &str) -> String {
	let mut text = normalize_line_endings(source)
		.trim_end_matches('\n')
		.to_string();
	text.push('\n');
	text
}
