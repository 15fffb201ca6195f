use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Registered platform user as returned by `/users/*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub regd_no: Option<String>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phno: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub sem: Option<serde_json::Value>,
    #[serde(default)]
    pub block: bool,
}

impl User {
    /// Date of birth as `dd-mm-yyyy`, or an empty string when absent.
    /// Unparseable values are passed through untouched.
    pub fn formatted_dob(&self) -> String {
        let Some(raw) = self.dob.as_deref() else {
            return String::new();
        };

        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return ts.format("%d-%m-%Y").to_string();
        }
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => date.format("%d-%m-%Y").to_string(),
            Err(_) => raw.to_string(),
        }
    }

    pub fn semester_label(&self) -> String {
        match &self.sem {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// Response of `PATCH /users/{id}/toggle-block`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockToggle {
    #[serde(default)]
    pub message: Option<String>,
    pub user: BlockState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockState {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    pub block: bool,
}
