//! Homebrewery parser renderer built on a Node.js child process.
//!
//! The Homebrewery site publishes its markdown parser as a CommonJS bundle
//! exposing `render(text)`. We keep the downloaded bundle on disk and run it
//! with a `node` binary: a small loader script reads the brew text from a temp
//! file, calls `render`, and writes the HTML to stdout.

use super::Renderer;
use crate::error::RenderError;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;
use which::which;

const LOADER_JS: &str = r#"const fs = require('fs');
const parser = require(process.argv[2]);
const input = fs.readFileSync(process.argv[3], 'utf8');
try {
  process.stdout.write(String(parser.render(input)));
} catch (err) {
  process.stderr.write(String((err && err.stack) || err));
  process.exit(2);
}
"#;

/// Renderer that delegates to the downloaded Homebrewery parser script.
pub struct ScriptRenderer {
    script: PathBuf,
}

impl ScriptRenderer {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl Renderer for ScriptRenderer {
    fn name(&self) -> &str {
        "homebrewery"
    }

    fn description(&self) -> &str {
        "Homebrewery parser run through Node.js"
    }

    fn render(&self, text: &str) -> Result<String, RenderError> {
        if !self.script.is_file() {
            return Err(RenderError::Unavailable(format!(
                "parser script not found at {}",
                self.script.display()
            )));
        }
        let script = fs::canonicalize(&self.script)
            .map_err(|e| RenderError::Unavailable(format!("parser script: {e}")))?;
        let node = resolve_node_binary()?;

        let temp_dir =
            tempdir().map_err(|e| RenderError::Unavailable(format!("temp dir error: {e}")))?;
        let loader_path = temp_dir.path().join("brew-loader.js");
        let input_path = temp_dir.path().join("brew-input.md");
        fs::write(&loader_path, LOADER_JS)
            .and_then(|_| fs::write(&input_path, text))
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;

        let output = Command::new(&node)
            .arg(&loader_path)
            .arg(&script)
            .arg(&input_path)
            .output()
            .map_err(|e| {
                RenderError::Unavailable(format!(
                    "failed to launch Node.js ({}): {}",
                    node.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Failed(format!(
                "parser exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| RenderError::Failed(format!("parser output is not UTF-8: {e}")))
    }
}

fn resolve_node_binary() -> Result<PathBuf, RenderError> {
    if let Some(path) = env::var_os("BREW_NODE_BIN") {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    for candidate in ["node", "nodejs"] {
        if let Ok(path) = which(candidate) {
            return Ok(path);
        }
    }

    Err(RenderError::Unavailable(
        "Unable to locate a Node.js binary. Set BREW_NODE_BIN to override the detection."
            .to_string(),
    ))
}
