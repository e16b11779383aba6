//! Interactive prompts using dialoguer

use std::path::Path;

use anyhow::Result;
use dialoguer::Confirm;

/// Ask a yes/no question, defaulting to `default`
fn confirm(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}

/// Confirm removing the features flagged by the VIF step
pub fn confirm_vif_removals(removed_count: usize, threshold: f64) -> Result<bool> {
    confirm(
        &format!(
            "Remove {} feature(s) with VIF above {:.2} from the output?",
            removed_count, threshold
        ),
        true,
    )
}

/// Confirm replacing an output file that already exists
pub fn confirm_overwrite(path: &Path) -> Result<bool> {
    confirm(
        &format!("{} already exists. Overwrite it?", path.display()),
        false,
    )
}
