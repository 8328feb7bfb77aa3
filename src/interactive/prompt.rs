//
//  bitbucket-provider
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Prompt helpers built on `dialoguer`.
//!
//! All prompts need a terminal on stdin. Commands that may run in CI take
//! an `--auto-approve` or `--with-token` flag and never reach these.

use std::io::{self, BufRead, IsTerminal};

use anyhow::Result;
use dialoguer::{Confirm, Password};

/// Whether stdin is attached to a terminal.
pub fn is_interactive() -> bool {
    io::stdin().is_terminal()
}

/// Asks a yes/no question, defaulting to `default` on Enter.
///
/// ```no_run
/// use bitbucket_provider::interactive::prompt_confirm_with_default;
///
/// if prompt_confirm_with_default("Destroy all managed resources?", false).unwrap() {
///     // ...
/// }
/// ```
pub fn prompt_confirm_with_default(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}

/// Reads a secret without echoing it.
pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}

/// Reads one line from stdin, trimmed.
pub fn read_line_from_stdin() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
