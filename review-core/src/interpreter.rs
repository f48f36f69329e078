//! Status interpretation
//!
//! Turns a single assignment record into the notification announcing its
//! current review verdict.

use serde_json::Value;

use crate::domain::homework::{HOMEWORK_NAME_KEY, HOMEWORK_STATUS_KEY, HomeworkStatus};
use crate::domain::message::{MessageTemplates, NotificationMessage};
use crate::error::ValidationError;

/// Renders assignment records into status notifications
#[derive(Debug, Clone, Default)]
pub struct StatusInterpreter {
    templates: MessageTemplates,
}

impl StatusInterpreter {
    pub fn new(templates: MessageTemplates) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &MessageTemplates {
        &self.templates
    }

    /// Extracts name and status from `homework` and renders the verdict
    ///
    /// # Errors
    /// - `TypeMismatch` when the record is not a mapping or the name is not a string
    /// - `MissingKey` when `homework_name` or `status` is absent
    /// - `UnknownStatus` when the status is outside the known set
    pub fn parse(&self, homework: &Value) -> Result<NotificationMessage, ValidationError> {
        let record = homework
            .as_object()
            .ok_or_else(|| ValidationError::type_mismatch("homework", "mapping", homework))?;

        let name = record
            .get(HOMEWORK_NAME_KEY)
            .ok_or_else(|| ValidationError::MissingKey(HOMEWORK_NAME_KEY.to_string()))?;
        let name = name
            .as_str()
            .ok_or_else(|| ValidationError::type_mismatch(HOMEWORK_NAME_KEY, "string", name))?;

        let status = record
            .get(HOMEWORK_STATUS_KEY)
            .ok_or_else(|| ValidationError::MissingKey(HOMEWORK_STATUS_KEY.to_string()))?;
        let status: HomeworkStatus = match status {
            Value::String(s) => s.parse()?,
            other => return Err(ValidationError::UnknownStatus(other.to_string())),
        };

        Ok(self.templates.status_message(name, status))
    }
}
