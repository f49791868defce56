use anyhow::{Context, Result};
use inquire::{Confirm, Text};

/// Free-text description of where the user is.
pub fn location_query() -> Result<String> {
    let query = Text::new("Enter your current location")
        .with_help_message("an address or place name, e.g. \"דיזנגוף 50, תל אביב\"")
        .prompt()
        .context("Failed to read location")?;
    Ok(query.trim().to_string())
}

/// Ask whether missing geolocations should be fetched this run.
pub fn confirm_resolve(unresolved: usize) -> Result<bool> {
    Confirm::new(&format!(
        "{unresolved} delivery points have no geolocation. Fetch them now?"
    ))
    .with_default(false)
    .with_help_message("lookups run at about one per second and are cached")
    .prompt()
    .context("Failed to read answer")
}
