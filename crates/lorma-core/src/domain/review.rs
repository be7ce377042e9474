//! Restaurant reviews.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A one-to-five star vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Vote {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl Vote {
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Vote {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            4 => Ok(Self::Four),
            5 => Ok(Self::Five),
            other => Err(ValidationError::invalid(
                "vote",
                format!("{other} is not between 1 and 5"),
            )),
        }
    }
}

impl From<Vote> for u8 {
    fn from(vote: Vote) -> Self {
        vote.value()
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filled = usize::from(self.value());
        write!(f, "{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}

/// A client's review of a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub restaurant: String,
    pub author: String,
    pub date: NaiveDate,
    pub vote: Vote,
    pub comment: Option<String>,
}

/// Input for writing a review. The author is the signed-in client.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub restaurant: String,
    pub vote: Vote,
    pub comment: Option<String>,
}

impl NewReview {
    pub const MAX_COMMENT_LEN: usize = 500;

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(comment) = self.normalized_comment() {
            if comment.chars().count() > Self::MAX_COMMENT_LEN {
                return Err(ValidationError::invalid(
                    "comment",
                    format!("must be at most {} characters", Self::MAX_COMMENT_LEN),
                ));
            }
        }
        Ok(())
    }

    /// The comment trimmed, with blank comments dropped.
    #[must_use]
    pub fn normalized_comment(&self) -> Option<String> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}
