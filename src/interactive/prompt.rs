//
//  bamboo-cli
//  interactive/prompt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Confirmation and password prompts.
//!
//! Prompts need a terminal. Commands that may prompt take `--no-prompt` (or
//! `BAMBOO_NO_PROMPT`) and then either proceed with a safe default or fail
//! with a message telling the user which flag to pass instead.

use anyhow::{bail, Result};
use console::Term;
use dialoguer::{Confirm, Password};

/// Returns `true` when prompting is possible and allowed.
pub fn can_prompt(no_prompt: bool) -> bool {
    !no_prompt && Term::stderr().is_term()
}

/// Asks a yes/no question.
pub fn prompt_confirm_with_default(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}

/// Asks for confirmation of a destructive action.
///
/// `force` skips the question. Without a terminal the action is refused
/// unless forced.
pub fn confirm_action(message: &str, force: bool, no_prompt: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }
    if !can_prompt(no_prompt) {
        bail!("Refusing to continue without confirmation. Pass --yes to proceed.");
    }
    prompt_confirm_with_default(message, false)
}

/// Reads a password without echoing it.
pub fn prompt_password(message: &str) -> Result<String> {
    let password = Password::new().with_prompt(message).interact()?;
    Ok(password)
}
