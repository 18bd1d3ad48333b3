//! Newsletter signup.

use gh_validation::{Form, NewsletterForm};

use crate::output::{error, info, success};
use crate::{CliError, CliResult};

/// Runs `newsletter <email>`.
///
/// Only the first problem with the address is reported.
pub fn run_newsletter(email: String) -> CliResult<()> {
    let signup = NewsletterForm::new(email).validate().map_err(|err| {
        error(&format!("Invalid email: {}", err.first_message().unwrap_or_default()));
        CliError::Validation(err)
    })?;

    tracing::debug!(domain = signup.email.rsplit('@').next().unwrap_or_default(), "newsletter signup");
    success("Successfully subscribed!");
    info("You'll receive the latest gaming news and updates.");
    Ok(())
}
