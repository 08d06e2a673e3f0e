use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Write};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU16, Ordering};

use crate::{StockroomError, StockroomResult};

use super::FilePath;
use super::http::{HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService};
use super::real_pal::build_glob_set;
use super::traits::Pal;

/* # Why in-memory storage for MockPal?

1. Speed: no filesystem I/O, deterministic and fast for unit tests
2. Isolation: no side effects on the real filesystem
3. Control: easy to set up specific store-file and gallery scenarios
4. Thread-safe: Mutex allows concurrent test execution

start_http_server registers the service in a map instead of binding a socket;
simulate_request dispatches to it directly.
*/

/// In-memory PAL implementation for testing.
///
/// Stores file contents in a HashMap and supports all Pal operations without
/// touching the real filesystem or the network.
///
/// # Examples
///
/// ```
/// use stockroom_base::{FilePath, MockPal, Pal};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("items.json"), b"[]".to_vec());
/// let content = mock.read_file_to_string(&FilePath::from("items.json")).unwrap();
/// assert_eq!(content, "[]");
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: Arc<Mutex<HashMap<FilePath, Vec<u8>>>>,
    directories: Arc<Mutex<HashSet<FilePath>>>,
    http_servers: Arc<Mutex<HashMap<u16, HttpServerInfo>>>,
    next_port: Arc<AtomicU16>,
}

/// Information about a registered HTTP server.
#[derive(Debug)]
struct HttpServerInfo {
    service: Box<dyn HttpService>,
    _config: HttpServerConfig,
}

impl MockPal {
    /// Create a new empty MockPal.
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            directories: Arc::new(Mutex::new(HashSet::new())),
            http_servers: Arc::new(Mutex::new(HashMap::new())),
            next_port: Arc::new(AtomicU16::new(10000)),
        }
    }

    /// Add a file to the mock storage.
    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        self.files.lock().unwrap().insert(path, content);
    }

    /// Add a directory to the mock storage.
    pub fn add_directory(&self, path: FilePath) {
        self.directories.lock().unwrap().insert(path);
    }

    /// Simulate an HTTP request to a running server.
    ///
    /// Looks up the service registered for the given port and invokes it
    /// directly, without any network traffic.
    pub fn simulate_request(
        &self,
        port: u16,
        request: HttpRequest,
    ) -> StockroomResult<HttpResponse> {
        let servers = self.http_servers.lock().unwrap();
        let server_info = servers.get(&port).ok_or_else(|| {
            Box::new(StockroomError::message(format!(
                "No HTTP server registered on port {}",
                port
            )))
        })?;

        server_info.service.handle_request(request)
    }

    /// Get the number of registered HTTP servers.
    pub fn http_server_count(&self) -> usize {
        self.http_servers.lock().unwrap().len()
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

impl Pal for MockPal {
    fn file_exists(&self, path: &FilePath) -> StockroomResult<bool> {
        let files = self.files.lock().unwrap();
        Ok(files.contains_key(path))
    }

    fn read_file(&self, path: &FilePath) -> StockroomResult<Box<dyn Read + 'static>> {
        let files = self.files.lock().unwrap();
        let content = files
            .get(path)
            .ok_or_else(|| {
                Box::new(StockroomError::file(
                    path.as_path().to_path_buf(),
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("File not found: {}", path),
                    ),
                ))
            })?
            .clone();
        Ok(Box::new(Cursor::new(content)))
    }

    fn create_file(&self, path: &FilePath) -> StockroomResult<Box<dyn Write>> {
        // Return a writer that stores into the mock storage when dropped
        Ok(Box::new(MockFileWriter {
            path: path.clone(),
            files: Arc::clone(&self.files),
            buffer: Vec::new(),
        }))
    }

    fn create_directory_all(&self, path: &FilePath) -> StockroomResult<()> {
        self.directories.lock().unwrap().insert(path.clone());
        Ok(())
    }

    fn list_directory(
        &self,
        path: &FilePath,
        globs: &[String],
    ) -> StockroomResult<Vec<FilePath>> {
        let glob_set = build_glob_set(globs)?;
        let dir = path.as_relative();

        let files = self.files.lock().unwrap();
        let mut matching: Vec<FilePath> = files
            .keys()
            .filter(|p| {
                p.as_relative()
                    .parent()
                    .map(|parent| parent == dir || (dir.as_str() == "." && parent.as_str().is_empty()))
                    .unwrap_or(false)
            })
            .filter(|p| {
                p.file_name()
                    .map(|name| glob_set.is_match(name))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        // HashMap iteration order is arbitrary; sort so tests are deterministic.
        matching.sort_by(|a, b| a.as_relative().as_str().cmp(b.as_relative().as_str()));
        Ok(matching)
    }

    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> StockroomResult<HttpServerHandle> {
        // Use the configured port if provided, otherwise auto-assign
        let port = match config.port {
            Some(p) => p,
            None => self.next_port.fetch_add(1, Ordering::SeqCst),
        };

        let server_info = HttpServerInfo {
            service,
            _config: config,
        };
        {
            let mut servers = self.http_servers.lock().unwrap();
            servers.insert(port, server_info);
        }

        Ok(HttpServerHandle::new(port))
    }
}

/// Helper struct for writing files to MockPal.
struct MockFileWriter {
    path: FilePath,
    files: Arc<Mutex<HashMap<FilePath, Vec<u8>>>>,
    buffer: Vec<u8>,
}

impl Write for MockFileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for MockFileWriter {
    fn drop(&mut self) {
        self.files
            .lock()
            .unwrap()
            .insert(self.path.clone(), self.buffer.clone());
    }
}
