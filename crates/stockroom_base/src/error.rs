use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

/* # Why a custom error type and not anyhow/eyre/thiserror?

- Better control over error handling
- No extra dependencies to compile and integrate
- More transparency into error handling logic
 */

/// Error variants that can occur in stockroom operations.
/// Each variant represents a specific error category with its associated context.
#[derive(Debug)]
pub enum ErrorKind {
    /// File system operation failed
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Catch-all for other errors with a message
    Message { message: String },
}

/* # Why separate ErrorKind and StockroomError?

- ErrorKind: structural variants with specific contexts (file paths, io sources)
- StockroomError: wraps ErrorKind with additional runtime context strings

Users can pattern match on ErrorKind for specific handling, while propagation
sites attach context strings without nesting error types.
*/

/// Error type wrapping ErrorKind with optional context.
#[derive(Debug)]
pub struct StockroomError {
    kind: ErrorKind,
    context: Vec<String>,
}

impl StockroomError {
    /// Creates a new error from an ErrorKind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: vec![],
        }
    }

    /// Creates a message-only error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Message {
            message: message.into(),
        })
    }

    /// Creates a file error for the given path and io source.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::new(ErrorKind::FileError {
            path: path.into(),
            source,
        })
    }

    /// Attaches context to an error.
    /// Context is displayed before the error message.
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attaches context using lazy evaluation.
    /// Useful to avoid expensive string construction for successful paths.
    pub fn with_context<F>(mut self, f: F) -> Self
    where
        F: FnOnce() -> String,
    {
        self.context.push(f());
        self
    }

    /// Returns a reference to the underlying ErrorKind.
    /// Allows pattern matching on specific error variants.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the innermost error in the chain.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut current: &(dyn StdError + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }
}

impl From<ErrorKind> for StockroomError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl StdError for StockroomError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            ErrorKind::FileError { source, .. } => Some(source),
            ErrorKind::Message { .. } => None,
        }
    }
}

impl fmt::Display for StockroomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Display context first if present
        for (i, ctx) in self.context.iter().enumerate() {
            if i == 0 {
                write!(f, "{}", ctx)?;
            } else {
                write!(f, ": {}", ctx)?;
            }
        }

        if !self.context.is_empty() {
            write!(f, ": ")?;
        }

        match &self.kind {
            ErrorKind::FileError { path, source } => {
                write!(f, "File error at {}: {}", path.display(), source)
            }
            ErrorKind::Message { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

/* # Why Box<StockroomError> in the result type?

Boxing the error reduces the size of the result type, making it cheaper to
return in the common Ok case.
*/

/// Standard result type for stockroom operations.
pub type StockroomResult<T> = std::result::Result<T, Box<StockroomError>>;

/// Constructs a boxed message error from format arguments.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        Box::new($crate::error::StockroomError::message(format!($($arg)*)))
    };
}

/// Extension trait for attaching context to Results.
pub trait ResultExt<T> {
    /// Attaches context to an error, consuming and re-wrapping it.
    /// Eager evaluation: context is evaluated immediately.
    fn context(self, context: impl Into<String>) -> StockroomResult<T>;

    /// Attaches context using lazy evaluation.
    /// Context is only evaluated if the result is an error.
    fn with_context<F>(self, f: F) -> StockroomResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for StockroomResult<T> {
    fn context(self, context: impl Into<String>) -> StockroomResult<T> {
        self.map_err(|err| Box::new(err.context(context)))
    }

    fn with_context<F>(self, f: F) -> StockroomResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|err| Box::new(err.with_context(f)))
    }
}
