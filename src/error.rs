use thiserror::Error;

pub type Result<T> = std::result::Result<T, CursorError>;

#[derive(Debug, Error)]
pub enum CursorError {
    #[error("unexpected end of token stream at position {position}")]
    EndOfStream { position: usize },

    #[error("{operation}: expected {expected}, found {found} at position {position}")]
    UnexpectedToken {
        operation: &'static str,
        expected: String,
        found: String,
        position: usize,
    },

    #[error("peek_iter step made no progress at position {position}")]
    IterationStalled { position: usize },

    #[error("markup could not be tokenized: {0}")]
    Tokenize(#[from] xmlparser::Error),
}

impl CursorError {
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, CursorError::EndOfStream { .. })
    }

    pub fn is_unexpected_token(&self) -> bool {
        matches!(self, CursorError::UnexpectedToken { .. })
    }

    pub fn is_iteration_stalled(&self) -> bool {
        matches!(self, CursorError::IterationStalled { .. })
    }

    /// Position of the cursor when the error was raised, if the error came from the cursor.
    pub fn position(&self) -> Option<usize> {
        match self {
            CursorError::EndOfStream { position }
            | CursorError::UnexpectedToken { position, .. }
            | CursorError::IterationStalled { position } => Some(*position),
            CursorError::Tokenize(_) => None,
        }
    }
}
