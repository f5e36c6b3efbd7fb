// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by fixdiff maps onto one of these kinds. Each kind
/// has a stable error code that tests, logs and the CLI rely on. A content
/// mismatch is deliberately absent: it is a normal comparison result, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input/Configuration
    InvalidInput,
    InvalidConfig,
    NotFound,

    // Fixtures
    FixtureRead,
    FixtureWrite,

    // External tool invocation
    Spawn,
    ToolFailed,
    Timeout,
    Decoding,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::FixtureRead => "ERR_FIXTURE_READ",
            ExErrorKind::FixtureWrite => "ERR_FIXTURE_WRITE",
            ExErrorKind::Spawn => "ERR_SPAWN",
            ExErrorKind::ToolFailed => "ERR_TOOL_FAILED",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Decoding => "ERR_DECODING",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus optional
/// context for humans: the operation, the case being run, the file or program
/// involved and the tool's exit code.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    case: Option<String>,
    path: Option<String>,
    program: Option<String>,
    exit_code: Option<i32>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            case: None,
            path: None,
            program: None,
            exit_code: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add case name context
    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.case = Some(case.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add external program context
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Add the external program's exit code
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the case name, if any
    pub fn case(&self) -> Option<&str> {
        self.case.as_deref()
    }

    /// Get the file path, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the external program, if any
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    /// Get the external program's exit code, if any
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(case) = &self.case {
            write!(f, " (case: {})", case)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(program) = &self.program {
            write!(f, " (program: {})", program)?;
        }
        if let Some(code) = self.exit_code {
            write!(f, " (exit code: {})", code)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========
