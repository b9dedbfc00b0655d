use crate::commands::{CmdMessage, CmdResult};
use crate::config::{TixConfig, CONFIG_FILENAME};
use crate::error::Result;
use std::path::Path;

/// Writes a default `.tix.json` to `dir`, making it a tix project root.
pub fn run(dir: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() {
        result.add_message(CmdMessage::warning(format!(
            "{} already exists; leaving it untouched.",
            path.display()
        )));
        return Ok(result);
    }
    TixConfig::default().save(dir)?;
    result.add_message(CmdMessage::success(format!(
        "Initialized tix environment in {}.",
        dir.display()
    )));
    Ok(result)
}
