#![allow(dead_code)]

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const DOCUMENT: &str =
	"import Counter from \"./counter\"\n\n# Counter\n\n<Playground>\n  <Counter />\n</Playground>\n";

pub fn livecode_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("livecode"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("LIVECODE_LOG");
	cmd
}

/// Write `content` to `relative` under `root`, creating parent directories.
pub fn write(root: &std::path::Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}
