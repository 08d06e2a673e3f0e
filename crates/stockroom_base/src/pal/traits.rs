use std::io::{Read, Write};
use std::sync::Arc;

use crate::StockroomResult;

use super::file_path::FilePath;
use super::http::{HttpServerConfig, HttpServerHandle, HttpService};

/* # Why is Pal a trait instead of a struct?

Using a trait enables two key benefits:
1. Testability: MockPal implements Pal for fast, deterministic tests without
   filesystem or network side effects
2. Flexibility: code depends on the abstraction, not the concrete implementation
*/

/// Platform Abstraction Layer (PAL) trait providing filesystem and HTTP
/// server operations.
///
/// Two implementations are provided:
/// - `RealPal`: real filesystem via `std::fs`, real server via `tiny_http`
/// - `MockPal`: in-memory implementation for testing
pub trait Pal: std::fmt::Debug + Send + Sync + 'static {
    /// Check if a file exists at the given path.
    fn file_exists(&self, path: &FilePath) -> StockroomResult<bool>;

    /// Open a file for reading.
    fn read_file(&self, path: &FilePath) -> StockroomResult<Box<dyn Read + 'static>>;

    /// Read entire file contents as a UTF-8 string.
    fn read_file_to_string(&self, path: &FilePath) -> StockroomResult<String> {
        let bytes = self.read_file_to_bytes(path)?;
        String::from_utf8(bytes).map_err(|_e| crate::err!("File is not valid UTF-8: {}", path))
    }

    /// Read entire file contents as raw bytes.
    fn read_file_to_bytes(&self, path: &FilePath) -> StockroomResult<Vec<u8>> {
        let mut reader = self.read_file(path)?;
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).map_err(|e| {
            Box::new(crate::StockroomError::file(
                path.as_path().to_path_buf(),
                e,
            ))
        })?;
        Ok(contents)
    }

    /// Create a new file, overwriting if it exists.
    fn create_file(&self, path: &FilePath) -> StockroomResult<Box<dyn Write>>;

    /// Write the given content to a file, overwriting if it exists.
    fn write_file(&self, path: &FilePath, content: &[u8]) -> StockroomResult<()> {
        let mut writer = self.create_file(path)?;
        writer.write_all(content).map_err(|e| {
            Box::new(crate::StockroomError::file(
                path.as_path().to_path_buf(),
                e,
            ))
        })?;
        writer.flush().map_err(|e| {
            Box::new(crate::StockroomError::file(
                path.as_path().to_path_buf(),
                e,
            ))
        })?;
        Ok(())
    }

    /// Create a directory and all parent directories.
    fn create_directory_all(&self, path: &FilePath) -> StockroomResult<()>;

    /// List files directly inside a directory that match the given glob
    /// patterns (e.g. `["*.{jpg,jpeg,png,gif}"]`). Matching is
    /// case-insensitive and does not recurse into subdirectories.
    ///
    /// Returns paths in whatever order the underlying enumeration yields.
    fn list_directory(
        &self,
        path: &FilePath,
        globs: &[String],
    ) -> StockroomResult<Vec<FilePath>>;

    /// Start an HTTP server with the given service.
    ///
    /// Returns a handle to the running server. The server starts immediately
    /// and listens for connections. When the handle is dropped (or shutdown()
    /// is called) the server stops accepting new connections.
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> StockroomResult<HttpServerHandle>;
}

/* # Why Arc<dyn Pal> behind PalHandle?

Arc enables cheap cloning of the whole PAL implementation so it can be shared
across the service and the store without lifetime parameters. PalHandle wraps
it for ergonomic Deref access and Clone support.
*/

/// Handle to a PAL implementation, enabling shared ownership.
///
/// # Examples
///
/// ```no_run
/// use stockroom_base::{PalHandle, RealPal};
///
/// let pal = PalHandle::new(RealPal::new(".".into()));
/// let pal_clone = pal.clone(); // Cheap clone, shares the same implementation
/// ```
#[derive(Debug, Clone)]
pub struct PalHandle(Arc<dyn Pal>);

impl PalHandle {
    /// Create a new PalHandle from a Pal implementation.
    pub fn new(pal: impl Pal + 'static) -> Self {
        Self(Arc::new(pal))
    }
}

impl std::ops::Deref for PalHandle {
    type Target = dyn Pal;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}
