//! Environment-driven tuning for property-based suites.
//!
//! Suites call [`cases`] with their own default so CI can raise or lower the
//! amount of generated input for every suite through one variable.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const CASES_ENV_KEY: &str = "BKINDEX_PBT_CASES";

/// Returns the case count from [`CASES_ENV_KEY`], or `default` when the
/// variable is unset or invalid.
///
/// # Examples
/// ```
/// use bkindex_test_support::property_profile::cases;
///
/// assert!(cases(64) > 0);
/// ```
#[must_use]
pub fn cases(default: u32) -> u32 {
    match env::var(CASES_ENV_KEY) {
        Ok(raw) => parse_cases(&raw).unwrap_or_else(|reason| {
            tracing::warn!(
                env = CASES_ENV_KEY,
                raw = %raw,
                reason = %reason,
                "invalid property-test case override; using default",
            );
            default
        }),
        Err(_) => default,
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_owned());
    }
    Ok(parsed)
}
