use anyhow::{bail, Result};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Minimal shape check: one `@` with a non-empty local part and a dotted
/// domain. Full RFC 5322 parsing is deliberately out of scope.
pub fn validate_email(email: &str) -> Result<()> {
    let Some((local, domain)) = email.split_once('@') else {
        bail!("email must contain '@'");
    };
    if local.is_empty() {
        bail!("email has an empty local part");
    }
    if domain.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        bail!("email domain '{}' is not valid", domain);
    }
    if email.contains(char::is_whitespace) {
        bail!("email must not contain whitespace");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LEN {
        bail!("password must be at least {} characters", MIN_PASSWORD_LEN);
    }
    Ok(())
}

/// Rejects empty or whitespace-only values for a required text field.
pub fn validate_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{} must not be empty", field);
    }
    Ok(())
}
