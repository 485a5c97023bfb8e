/// Process-level error carrying the exit code reported by `main`.
///
/// Exit codes follow the filtering error taxonomy:
///
/// - 2: input/precondition errors (bad flags, bad ranges, unreadable files)
/// - 3: empty results (nothing fetched, nothing survived ingest)
/// - 4: invariant violations and unrecoverable collaborator failures
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Input/precondition error (exit 2). No partial work has been performed.
    pub fn input(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Empty-result error (exit 3).
    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Invariant violation or collaborator failure (exit 4).
    ///
    /// These signal a defect in a collaborator or the core itself; they are
    /// never retried or silently papered over.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
