//! User input utilities for interactive command-line prompts.
//!
//! This module provides functions for safely collecting user input
//! including strings, passwords and confirmations.

use anyhow::{Context, Result};
use std::io;

/// Prompts the user for a string input.
///
/// Displays a prompt message and waits for the user to enter text.
/// The input is read from stdin and returned with whitespace trimmed.
///
/// # Errors
///
/// Returns an error if reading from stdin fails.
pub fn prompt_string(prompt: &str) -> Result<String> {
    println!("{prompt}: ");

    let mut input: String = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;

    Ok(input.trim().to_string())
}

/// Prompts the user for a password.
///
/// Only the trailing newline is removed, so passwords may start or end
/// with spaces. Use `--password` or `LORMA_PASSWORD` to avoid the prompt.
pub fn prompt_password(prompt: &str) -> Result<String> {
    println!("{prompt}: ");

    let mut input: String = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read password")?;

    Ok(strip_line_ending(&input).to_string())
}

/// Prompts for a new password twice and checks both entries match.
pub fn prompt_new_password(prompt: &str) -> Result<String> {
    let first = prompt_password(prompt)?;
    let second = prompt_password("Repeat the password")?;
    if first != second {
        anyhow::bail!("Passwords do not match");
    }
    Ok(first)
}

/// Prompts the user for a yes/no confirmation.
///
/// Accepts 'y', 'yes', 'n', 'no' (case insensitive).
/// Empty input is treated as 'no'.
///
/// # Errors
///
/// Returns an error if reading from stdin fails.
pub fn prompt_confirmation(prompt: &str) -> Result<bool> {
    loop {
        let input = prompt_string(&format!("{prompt} (y/N)"))?;
        match parse_confirmation(&input) {
            Some(answer) => return Ok(answer),
            None => eprintln!("Please enter 'y' for yes or 'n' for no."),
        }
    }
}

fn parse_confirmation(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "s" | "si" | "sì" => Some(true),
        "n" | "no" | "" => Some(false),
        _ => None,
    }
}

fn strip_line_ending(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}
