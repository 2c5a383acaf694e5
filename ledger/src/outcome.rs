//! The uniform `{success, message[, data]}` result handed to UI callers.

use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, LedgerError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
}

impl<T> Outcome<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(err: &LedgerError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            data: None,
            error: Some(err.kind()),
        }
    }

    /// Wrap an operation result; `describe` builds the success message.
    pub fn from_result(
        result: Result<T, LedgerError>,
        describe: impl FnOnce(&T) -> String,
    ) -> Self {
        match result {
            Ok(data) => {
                let message = describe(&data);
                Self::success(message, data)
            }
            Err(err) => Self::failure(&err),
        }
    }

    /// A failure the UI should swallow (e.g. a reward already granted).
    pub fn is_benign(&self) -> bool {
        self.error == Some(ErrorKind::BenignDuplicate)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            success: self.success,
            message: self.message,
            data: self.data.map(f),
            error: self.error,
        }
    }
}
