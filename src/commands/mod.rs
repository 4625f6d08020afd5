// ABOUTME: Command module aggregator for the hoist CLI.
// ABOUTME: Re-exports the deploy and delete-token handlers.

mod deploy;
mod token;

pub use deploy::deploy;
pub use token::delete_token;
