//! Input handling helpers for link content and keys.

use std::io::{self, IsTerminal, Read};

use dialoguer::Password;
use slink_core::crypto::validate_passphrase;
use zeroize::Zeroizing;

use crate::errors::CliError;

/// Content from the positional argument, or stdin when it is piped.
pub fn read_content(content: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = content {
        if value.is_empty() {
            return Err(CliError::invalid_input("Content cannot be empty").into());
        }
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        return Err(CliError::invalid_input(
            "No content provided. Pass it as an argument or pipe it on stdin.",
        )
        .into());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    let trimmed = buffer.trim_end();
    if trimmed.is_empty() {
        return Err(CliError::invalid_input("No input provided on stdin").into());
    }
    Ok(trimmed.to_string())
}

/// Key for a new link: `--key` / `SLINK_KEY`, else a confirmed prompt.
pub fn key_for_create(key: Option<String>) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = key {
        validate_passphrase(&value).map_err(|e| CliError::invalid_input(e.to_string()))?;
        return Ok(Zeroizing::new(value));
    }
    if !io::stderr().is_terminal() || !io::stdin().is_terminal() {
        return Err(CliError::invalid_input(
            "No key provided and no TTY available. Pass --key or set SLINK_KEY.",
        )
        .into());
    }
    loop {
        let value = Password::new()
            .with_prompt("Key")
            .with_confirmation("Confirm key", "Keys do not match")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read key: {}", e))?;
        // A blank answer at the prompt is a slip, not a key.
        if value.trim().is_empty() {
            eprintln!("Key cannot be blank");
            continue;
        }
        return Ok(Zeroizing::new(value));
    }
}

/// Key for opening a link: `--key` / `SLINK_KEY`, else a prompt.
///
/// Without a TTY the key is empty, which still opens legacy URL links.
pub fn key_for_open(key: Option<String>) -> anyhow::Result<Zeroizing<String>> {
    if let Some(value) = key {
        return Ok(Zeroizing::new(value));
    }
    if !io::stderr().is_terminal() || !io::stdin().is_terminal() {
        return Ok(Zeroizing::new(String::new()));
    }
    Password::new()
        .with_prompt("Key")
        .allow_empty_password(true)
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read key: {}", e))
}
