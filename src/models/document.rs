use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::editor::ValidationError;

/// Catalog entry as returned by `/documents/*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub size: Option<DocumentSize>,
    pub semester: Semester,
    #[serde(default)]
    pub branch: String,
    /// Thumbnail URL hosted by the backend
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "driveViewLink", default)]
    pub view_link: Option<String>,
}

/// The backend reports size either as raw bytes or as a preformatted label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentSize {
    Bytes(u64),
    Label(String),
}

impl fmt::Display for DocumentSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSize::Bytes(b) if *b >= 1024 * 1024 => {
                write!(f, "{:.2} MB", *b as f64 / (1024.0 * 1024.0))
            }
            DocumentSize::Bytes(b) => write!(f, "{:.2} KB", *b as f64 / 1024.0),
            DocumentSize::Label(s) => f.write_str(s),
        }
    }
}

/// Semester 1 through 8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub struct Semester(u8);

impl Semester {
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (1..=8).contains(&value) {
            Ok(Semester(value))
        } else {
            Err(ValidationError::InvalidSemester(value.to_string()))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

// The backend stores semester as a number but echoes form fields back as text.
impl<'de> Deserialize<'de> for Semester {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u8),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Semester::new(n),
            Repr::Text(s) => s.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}

impl From<Semester> for u8 {
    fn from(s: Semester) -> u8 {
        s.0
    }
}

impl FromStr for Semester {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| ValidationError::InvalidSemester(s.to_string()))
            .and_then(Semester::new)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Branches offered by the upload form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    All,
    #[serde(rename = "CSE")]
    Cse,
    #[serde(rename = "EE")]
    Ee,
    #[serde(rename = "EEE")]
    Eee,
    #[serde(rename = "CE")]
    Ce,
    #[serde(rename = "ME")]
    Me,
}

impl Branch {
    pub const ALL: [Branch; 6] = [
        Branch::All,
        Branch::Cse,
        Branch::Ee,
        Branch::Eee,
        Branch::Ce,
        Branch::Me,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Branch::All => "All",
            Branch::Cse => "CSE",
            Branch::Ee => "EE",
            Branch::Eee => "EEE",
            Branch::Ce => "CE",
            Branch::Me => "ME",
        }
    }
}

impl FromStr for Branch {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Branch::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidBranch(s.to_string()))
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
