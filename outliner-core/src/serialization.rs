use crate::rules::refine_outline;
use crate::types::*;
use anyhow::{Context, Result};
use std::path::Path;

impl DocumentOutline {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the outline as pretty JSON. Non-ASCII text is written as-is.
    pub fn save_to_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn load_from_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let outline = serde_json::from_str(&content).with_context(|| format!("parsing outline {}", path.display()))?;
        Ok(outline)
    }

    /// Re-run the hierarchy fixer over this outline's headings
    pub fn refined(self) -> Self {
        Self {
            title: self.title,
            outline: refine_outline(self.outline),
        }
    }
}
