use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A raw statement table as scraped from a filing: free-text labels,
/// untyped cells, one row per line item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScrapedTable {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl ScrapedTable {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Pipe-delimited rendering used in the extraction prompt.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if !self.headers.is_empty() {
            out.push_str(&self.headers.join(" | "));
            out.push('\n');
        }
        for row in &self.rows {
            out.push_str(&row.join(" | "));
            out.push('\n');
        }
        out
    }
}
