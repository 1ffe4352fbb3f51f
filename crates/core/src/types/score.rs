//! Rating score type.

use serde::{Deserialize, Serialize};

/// Error returned for a score outside the allowed range.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("score must be an integer between {min} and {max} (got {got})", min = Score::MIN, max = Score::MAX)]
pub struct ScoreError {
    /// The rejected value.
    pub got: i64,
}

/// A single star rating, 1 through 5 inclusive.
///
/// Stored as `SMALLINT` with a matching `CHECK` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i16")]
pub struct Score(u8);

impl Score {
    /// Lowest allowed score.
    pub const MIN: u8 = 1;
    /// Highest allowed score.
    pub const MAX: u8 = 5;

    /// Validate a raw integer as a score.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError`] when `value` is outside `1..=5`.
    pub fn new(value: i64) -> Result<Self, ScoreError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(ScoreError { got: value })
    }

    /// The score as an integer.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based index into a five-bucket star distribution.
    #[must_use]
    pub const fn bucket(self) -> usize {
        (self.0 - Self::MIN) as usize
    }
}

impl TryFrom<i64> for Score {
    type Error = ScoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i16 {
    fn from(score: Score) -> Self {
        Self::from(score.0)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Score {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i16 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i16 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Score {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <i16 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(i64::from(raw))?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Score {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i16 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&i16::from(*self), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_one_through_five() {
        for v in 1..=5 {
            assert_eq!(i64::from(Score::new(v).unwrap().get()), v);
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        for v in [0, 6, -1, 255, 256, i64::MAX, i64::MIN] {
            assert_eq!(Score::new(v), Err(ScoreError { got: v }));
        }
    }

    #[test]
    fn test_bucket() {
        assert_eq!(Score::new(1).unwrap().bucket(), 0);
        assert_eq!(Score::new(5).unwrap().bucket(), 4);
    }

    #[test]
    fn test_serde() {
        let score: Score = serde_json::from_str("4").unwrap();
        assert_eq!(score.get(), 4);
        assert_eq!(serde_json::to_string(&score).unwrap(), "4");
        assert!(serde_json::from_str::<Score>("9").is_err());
    }

    #[test]
    fn test_error_message() {
        let err = Score::new(7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "score must be an integer between 1 and 5 (got 7)"
        );
    }
}
