//! JSON output formatting
//!
//! ```json
//! {
//!   "root": "/abs/register",
//!   "files": ["README.md", "src/main.py"]
//! }
//! ```

use crate::enumerator::EnumerationResult;
use crate::error::UploaderError;

pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    /// Pretty-printed output
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Single-line output
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn render(&self, result: &EnumerationResult) -> Result<String, UploaderError> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        Ok(rendered)
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}
