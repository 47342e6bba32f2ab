use serde::{Deserialize, Serialize};

/// User-facing notices raised by client flows. A UI renders `Toast` as a
/// transient success banner and `Error` as an inline error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Notice {
    Toast { text: String },
    Error { text: String },
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Toast { text } | Self::Error { text } => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
