use markdown::MdxSignal;
use markdown::ParseOptions;
use markdown::mdast::Node;
use markdown::to_mdast;

use crate::LivecodeError;
use crate::LivecodeResult;

/// Parse an MDX document into the tree consumed by
/// [`Transform`](crate::Transform).
///
/// ESM blocks are accepted as written. Their imports are parsed later when the
/// import table is built, so a broken block only loses its own bindings.
pub fn parse_document(content: impl AsRef<str>) -> LivecodeResult<Node> {
	let content = normalize_line_endings(content.as_ref());
	let options = ParseOptions {
		mdx_esm_parse: Some(Box::new(|_: &str| MdxSignal::Ok)),
		..ParseOptions::mdx()
	};

	to_mdast(&content, &options).map_err(|e| LivecodeError::Markdown(e.to_string()))
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}
