//! Password policy.

use core::fmt;

/// Errors that can occur when a password breaks the policy.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    /// Too short or too long.
    #[error("password must be {min}-{max} characters", min = Password::MIN_LENGTH, max = Password::MAX_LENGTH)]
    Length,
    /// No uppercase letter.
    #[error("password must contain at least one uppercase letter")]
    MissingUppercase,
    /// No character from [`Password::SPECIAL_CHARS`].
    #[error("password must contain at least one special character (!@#$%^&*)")]
    MissingSpecial,
}

/// A plaintext password that satisfies the account password policy.
///
/// Only exists between request parsing and hashing. `Debug` never prints
/// the value.
///
/// ```
/// use storerate_core::Password;
///
/// assert!(Password::parse("Pw1!aaaa").is_ok());
/// assert!(Password::parse("short!A").is_err());
/// assert!(Password::parse("alllowercase!").is_err());
/// assert!(Password::parse("NoSpecials123").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Minimum length in characters.
    pub const MIN_LENGTH: usize = 8;
    /// Maximum length in characters.
    pub const MAX_LENGTH: usize = 16;
    /// At least one of these is required.
    pub const SPECIAL_CHARS: &'static str = "!@#$%^&*";

    /// Check a candidate password against the policy.
    ///
    /// # Errors
    ///
    /// Returns a [`PasswordError`] naming the first rule the input breaks.
    pub fn parse(s: &str) -> Result<Self, PasswordError> {
        let len = s.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&len) {
            return Err(PasswordError::Length);
        }
        if !s.chars().any(char::is_uppercase) {
            return Err(PasswordError::MissingUppercase);
        }
        if !s.chars().any(|c| Self::SPECIAL_CHARS.contains(c)) {
            return Err(PasswordError::MissingSpecial);
        }
        Ok(Self(s.to_owned()))
    }

    /// The plaintext, for handing to the hasher.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}
