//! Email address type.
//!
//! Emails are the natural key of the platform: accounts log in with them,
//! stores are matched to their owner by them, and ratings are keyed by the
//! rater's email. Matching is exact, so the input is kept verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a string was rejected as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email cannot contain whitespace")]
    Whitespace,
    #[error("email must contain exactly one @ symbol")]
    MissingAtSymbol,
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The part after `@` is not `name.tld`.
    #[error("email domain must contain a dot with text on both sides")]
    InvalidDomain,
}

/// A syntactically valid email address, `local@name.tld`.
///
/// At most 254 characters (RFC 5321), no whitespace, one `@`, and a domain
/// with a non-empty label on each side of its last dot. Comparison is
/// case-sensitive.
///
/// ```
/// use storerate_core::Email;
///
/// assert!(Email::parse("owner.name+tag@shop.co.uk").is_ok());
/// assert!(Email::parse("user@localhost").is_err());
/// assert!(Email::parse("us er@x.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// RFC 5321 limit on a forward path.
    pub const MAX_LENGTH: usize = 254;

    /// Validate `s` as an email address.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] rule that `s` breaks.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        match s {
            "" => return Err(EmailError::Empty),
            _ if s.len() > Self::MAX_LENGTH => {
                return Err(EmailError::TooLong {
                    max: Self::MAX_LENGTH,
                });
            }
            _ if s.contains(char::is_whitespace) => return Err(EmailError::Whitespace),
            _ => {}
        }

        let mut parts = s.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(EmailError::MissingAtSymbol);
        };
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        let has_tld = domain
            .rsplit_once('.')
            .is_some_and(|(name, tld)| !name.is_empty() && !tld.is_empty());
        if !has_tld {
            return Err(EmailError::InvalidDomain);
        }

        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_shapes() {
        for ok in [
            "a@x.com",
            "user.name@example.com",
            "user+tag@example.com",
            "owner@shop.example.co.uk",
        ] {
            assert!(Email::parse(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn test_rejections() {
        let cases = [
            ("", EmailError::Empty),
            ("a b@x.com", EmailError::Whitespace),
            (" a@x.com", EmailError::Whitespace),
            ("no-at-symbol", EmailError::MissingAtSymbol),
            ("a@b@x.com", EmailError::MissingAtSymbol),
            ("@x.com", EmailError::EmptyLocalPart),
            ("user@", EmailError::InvalidDomain),
            ("user@localhost", EmailError::InvalidDomain),
            ("user@.com", EmailError::InvalidDomain),
            ("user@x.", EmailError::InvalidDomain),
        ];
        for (input, expected) in cases {
            assert_eq!(Email::parse(input), Err(expected), "{input:?}");
        }
    }

    #[test]
    fn test_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            Email::parse(&long),
            Err(EmailError::TooLong { max: 254 })
        );
    }

    #[test]
    fn test_case_is_preserved_and_significant() {
        let email = Email::parse("Owner@Shop.com").unwrap();
        assert_eq!(email.as_str(), "Owner@Shop.com");
        assert_ne!(email, Email::parse("owner@shop.com").unwrap());
    }

    #[test]
    fn test_serde_is_transparent() {
        let email = Email::parse("a@x.com").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"a@x.com\"");
    }
}
