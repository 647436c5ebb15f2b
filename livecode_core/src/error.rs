use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum LivecodeError {
	#[error(transparent)]
	#[diagnostic(code(livecode::io_error))]
	Io(#[from] std::io::Error),

	#[error("failure to load markdown: {0}")]
	#[diagnostic(code(livecode::markdown))]
	Markdown(String),

	#[error("`component_to_inject` needs to be defined")]
	#[diagnostic(
		code(livecode::missing_component),
		help("set `component_to_inject` in livecode.toml or pass `--component`")
	)]
	MissingComponent,

	#[error("invalid component pattern `{pattern}`: {reason}")]
	#[diagnostic(code(livecode::invalid_pattern))]
	InvalidPattern { pattern: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(livecode::config_parse),
		help("check that livecode.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("cannot resolve relative import `{specifier}` without a document path")]
	#[diagnostic(
		code(livecode::missing_base_path),
		help("pass the document path to the transform or set `file_path`")
	)]
	MissingBasePath { specifier: String },

	#[error("module `{specifier}` not found from `{base}`")]
	#[diagnostic(
		code(livecode::module_not_found),
		help("tried:\n{tried}")
	)]
	ModuleNotFound {
		specifier: String,
		base: String,
		tried: String,
	},

	#[error("module resolver failed for `{specifier}`: {reason}")]
	#[diagnostic(code(livecode::resolver))]
	Resolver { specifier: String, reason: String },

	#[error("failed to read module `{path}`: {reason}")]
	#[diagnostic(code(livecode::read_module))]
	ReadModule { path: String, reason: String },

	#[error("failed to format `{path}`: {reason}")]
	#[diagnostic(
		code(livecode::format),
		help("the injected code must be valid for its file type")
	)]
	Format { path: String, reason: String },
}

pub type LivecodeResult<T> = Result<T, LivecodeError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
