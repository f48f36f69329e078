//! Notification messages and the texts they are rendered from

use serde::{Deserialize, Serialize};

use super::homework::HomeworkStatus;

/// Default template for a status change notification
pub const DEFAULT_STATUS_TEMPLATE: &str =
    "Изменился статус проверки работы \"{homework_name}\". {verdict}";

/// Default template for an error report
pub const DEFAULT_ERROR_TEMPLATE: &str = "Сбой в работе программы: {error}";

/// Human-readable verdict text for each review status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdicts {
    pub approved: String,
    pub reviewing: String,
    pub rejected: String,
}

impl Verdicts {
    /// Verdict text for `status`
    pub fn text(&self, status: HomeworkStatus) -> &str {
        match status {
            HomeworkStatus::Approved => &self.approved,
            HomeworkStatus::Reviewing => &self.reviewing,
            HomeworkStatus::Rejected => &self.rejected,
        }
    }
}

impl Default for Verdicts {
    fn default() -> Self {
        Self {
            approved: "Работа проверена: ревьюеру всё понравилось. Ура!".to_string(),
            reviewing: "Работа взята на проверку ревьюером.".to_string(),
            rejected: "Работа проверена: у ревьюера есть замечания.".to_string(),
        }
    }
}

/// Templates used to render outgoing messages
///
/// `status` may reference `{homework_name}` and `{verdict}`; `error` may
/// reference `{error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplates {
    pub status: String,
    pub error: String,
    pub verdicts: Verdicts,
}

impl MessageTemplates {
    /// Renders a status change notification
    pub fn status_message(&self, homework_name: &str, status: HomeworkStatus) -> NotificationMessage {
        let text = fill(
            &self.status,
            &[
                ("homework_name", homework_name),
                ("verdict", self.verdicts.text(status)),
            ],
        );

        NotificationMessage {
            kind: MessageKind::Status {
                homework_name: homework_name.to_string(),
                status,
            },
            text,
        }
    }

    /// Renders an error report
    pub fn error_message(&self, error: &dyn std::error::Error) -> NotificationMessage {
        let error = error.to_string();
        NotificationMessage {
            kind: MessageKind::Error,
            text: fill(&self.error, &[("error", error.as_str())]),
        }
    }
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            status: DEFAULT_STATUS_TEMPLATE.to_string(),
            error: DEFAULT_ERROR_TEMPLATE.to_string(),
            verdicts: Verdicts::default(),
        }
    }
}

/// Substitutes `{key}` placeholders in a single pass
///
/// Substituted values are never scanned again, so a value containing
/// `{verdict}` stays literal. Unknown placeholders are kept as is.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let placeholder = values.iter().find(|(key, _)| {
            tail[1..]
                .strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });

        match placeholder {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// What a notification is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Status {
        homework_name: String,
        status: HomeworkStatus,
    },
    Error,
}

/// A rendered message ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl NotificationMessage {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, MessageKind::Error)
    }
}
