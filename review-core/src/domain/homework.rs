//! Homework domain types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Key holding the list of assignment records in a status response
pub const HOMEWORKS_KEY: &str = "homeworks";
/// Key holding the server's forward cursor in a status response
pub const CURRENT_DATE_KEY: &str = "current_date";
/// Key holding an assignment's name
pub const HOMEWORK_NAME_KEY: &str = "homework_name";
/// Key holding an assignment's review status
pub const HOMEWORK_STATUS_KEY: &str = "status";

/// Review status of a submitted homework
///
/// The set is closed: anything else the API sends is rejected with
/// [`ValidationError::UnknownStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_statuses() {
        for status in HomeworkStatus::ALL {
            assert_eq!(status.as_str().parse::<HomeworkStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_parse_unknown_status() {
        assert_eq!(
            "Approved".parse::<HomeworkStatus>(),
            Err(ValidationError::UnknownStatus("Approved".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&HomeworkStatus::Reviewing).unwrap();
        assert_eq!(json, "\"reviewing\"");
    }
}
