//! Interactive token prompt

use std::io::{self, BufRead, Write};

use drawsync_core::{
    ChainedCredentialProvider, Credential, CredentialProvider, EnvCredentialProvider,
};

/// Asks for a token on the terminal
///
/// Declines when stdin is not a terminal, so scripted runs fail with
/// `MissingCredential` instead of blocking.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptCredentialProvider;

impl CredentialProvider for PromptCredentialProvider {
    fn provide(&self) -> Option<Credential> {
        if !atty::is(atty::Stream::Stdin) {
            return None;
        }

        eprint!("Enter your GitHub personal access token: ");
        io::stderr().flush().ok()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        Credential::new(line)
    }
}

/// Provider used by commands: `DRAWSYNC_TOKEN` first, then the prompt
pub fn credential_provider() -> ChainedCredentialProvider {
    ChainedCredentialProvider::new()
        .with(EnvCredentialProvider)
        .with(PromptCredentialProvider)
}
