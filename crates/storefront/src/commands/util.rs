//! Shared helpers for command handlers.

use std::fmt::Display;

use dialoguer::Input;
use rust_decimal::{Decimal, RoundingStrategy};
use secrecy::SecretString;

use crate::error::CliError;

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Use the flag value if given, otherwise ask.
pub fn text_or_prompt(value: Option<String>, prompt: &str) -> Result<String, CliError> {
    if let Some(v) = value {
        return Ok(v);
    }
    Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(prompt_err)
}

/// Use the flag/env password if given, otherwise read it without echo.
pub fn secret_or_prompt(value: Option<String>) -> Result<SecretString, CliError> {
    let raw = match value {
        Some(v) => v,
        None => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };
    Ok(SecretString::from(raw))
}

/// Price rounded to cents, e.g. `$89.99`. Backend totals are float sums
/// and may carry noise in the last digits.
pub fn money(amount: Decimal) -> String {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${cents:.2}")
}
