use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::editor::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: String,
    /// Snapshot of the author at the time the review was written
    #[serde(default)]
    pub user: Option<ReviewAuthor>,
    #[serde(default)]
    pub content: String,
    pub rating: Rating,
    #[serde(rename = "isVisible", default)]
    pub is_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub name: String,
}

impl Review {
    pub fn author_name(&self) -> &str {
        self.user.as_ref().map(|u| u.name.as_str()).unwrap_or("Anonymous")
    }
}

/// Star rating 1 through 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (1..=5).contains(&value) {
            Ok(Rating(value))
        } else {
            Err(ValidationError::InvalidRating(value))
        }
    }

    /// `0` is the "all ratings" selection
    pub fn selection(value: u8) -> Result<Option<Self>, ValidationError> {
        match value {
            0 => Ok(None),
            n => Rating::new(n).map(Some),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn stars(self) -> String {
        format!("{}{}", "★".repeat(self.0 as usize), "☆".repeat(5 - self.0 as usize))
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> u8 {
        r.0
    }
}

impl FromStr for Rating {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s.trim().parse::<u8>().map_err(|_| ValidationError::InvalidRating(0))?;
        Rating::new(n)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
