use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditorAction {
    GetCodeRequest,
    GetCodeSuccess { code: String },
    GetCodeFailure { error: String },
    ChangeCode { code: String },
    ResetCode,
    PostCodeRequest,
    /// `code` is the text that was posted, which may since have been edited.
    PostCodeSuccess { code: String },
    PostCodeFailure { error: String },
}
