//! Response validation
//!
//! Checks that a raw status API response has the documented shape before
//! anything tries to read assignments out of it. An empty assignment list
//! is valid here; whether it means anything is up to the caller.

use serde_json::Value;

use crate::domain::homework::{CURRENT_DATE_KEY, HOMEWORKS_KEY};
use crate::error::ValidationError;

/// Validator for status API responses
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseValidator;

/// View over a response that passed validation
#[derive(Debug, Clone, Copy)]
pub struct ValidatedResponse<'a> {
    /// Assignment records, most recent first
    pub homeworks: &'a [Value],
    /// Forward cursor supplied by the server, if any
    pub current_date: Option<i64>,
}

impl ResponseValidator {
    /// Checks the response shape
    ///
    /// # Errors
    /// - `TypeMismatch` when the response is not a mapping
    /// - `MissingKey("homeworks")` when the assignment list is absent
    /// - `TypeMismatch` when the assignment value is not a list (`null` included)
    pub fn validate(&self, response: &Value) -> Result<(), ValidationError> {
        self.check(response).map(|_| ())
    }

    /// Validates the response and returns a view over its contents
    ///
    /// `current_date` is optional, but when present it must be an integer.
    pub fn check<'a>(&self, response: &'a Value) -> Result<ValidatedResponse<'a>, ValidationError> {
        let map = response
            .as_object()
            .ok_or_else(|| ValidationError::type_mismatch("API response", "mapping", response))?;

        let homeworks = map
            .get(HOMEWORKS_KEY)
            .ok_or_else(|| ValidationError::MissingKey(HOMEWORKS_KEY.to_string()))?;

        let homeworks = homeworks
            .as_array()
            .ok_or_else(|| ValidationError::type_mismatch(HOMEWORKS_KEY, "list", homeworks))?;

        let current_date = match map.get(CURRENT_DATE_KEY) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_i64().ok_or_else(|| {
                ValidationError::type_mismatch(CURRENT_DATE_KEY, "integer", value)
            })?),
        };

        Ok(ValidatedResponse {
            homeworks,
            current_date,
        })
    }
}
