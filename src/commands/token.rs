// ABOUTME: --delete-token implementation.
// ABOUTME: Removes the saved GitHub token; a missing file is not an error.

use hoist::config::Settings;
use hoist::error::Result;
use hoist::output::Output;

pub fn delete_token(settings: &Settings, output: &Output) -> Result<()> {
    let store = settings.credential_store()?;
    if store.delete()? {
        output.success(&format!("Deleted saved token at {}", store.path().display()));
    } else {
        output.success(&format!("No saved token at {}", store.path().display()));
    }
    Ok(())
}
