#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorStatus {
    #[default]
    Idle,
    Fetching,
    Saving,
}

/// The editor slice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorState {
    /// Code as currently edited.
    pub code: String,
    /// Code as last fetched from or saved to the server.
    pub code_on_server: String,
    pub status: EditorStatus,
    /// Message of the most recent failed fetch or save.
    pub last_error: Option<String>,
}

impl EditorState {
    pub fn has_unsaved_changes(&self) -> bool {
        self.code != self.code_on_server
    }
}
