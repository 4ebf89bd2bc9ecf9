//! Interactive prompts using dialoguer

use std::path::Path;

use anyhow::Result;
use dialoguer::Confirm;

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Prompt user before replacing existing report files
pub fn confirm_overwrite(existing: &[&Path]) -> Result<bool> {
    let names: Vec<String> = existing.iter().map(|p| p.display().to_string()).collect();
    let message = format!("Overwrite existing {}?", names.join(", "));
    confirm_step(&message)
}
