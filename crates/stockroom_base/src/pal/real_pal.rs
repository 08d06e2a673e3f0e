use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::{StockroomError, StockroomResult};

use super::FilePath;
use super::http::{
    HttpHeaders, HttpMethod, HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle,
    HttpService, HttpStatusCode,
};
use super::traits::Pal;

/* # Why std::fs and tiny_http instead of async crates?

The whole application is synchronous request/response with a flat-file store.
std::fs plus tiny_http's blocking accept loop cover that without an async
runtime, and the code stays easy to follow.
*/

/// Concrete PAL implementation using the real filesystem via std::fs and a
/// tiny_http server.
///
/// All file paths are resolved relative to a configured base directory,
/// ensuring operations stay within intended boundaries.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    ///
    /// # Arguments
    /// * `base_dir` - All paths will be resolved relative to this directory
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve a FilePath to an absolute filesystem path.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        self.base_dir.join(path.as_path())
    }
}

/// Build a GlobSet from the given patterns.
///
/// Patterns are compiled with brace expansion and case-insensitive matching,
/// so `*.{jpg,jpeg,png,gif}` also matches `CAT.JPG`.
pub(crate) fn build_glob_set(globs: &[String]) -> StockroomResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for glob in globs {
        let compiled = GlobBuilder::new(glob)
            .case_insensitive(true)
            .build()
            .map_err(|e| crate::err!("Invalid glob pattern '{}': {}", glob, e))?;
        builder.add(compiled);
    }
    builder
        .build()
        .map_err(|e| crate::err!("Failed to build glob set: {}", e))
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> StockroomResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.exists();
        debug!(exists, resolved = %resolved.display(), "checked file existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> StockroomResult<Box<dyn Read + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for reading");
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Box::new(StockroomError::file(resolved, e))
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_file(&self, path: &FilePath) -> StockroomResult<Box<dyn Write>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating file");
        let file = fs::File::create(&resolved).map_err(|e| {
            debug!(error = %e, "failed to create file");
            Box::new(StockroomError::file(resolved, e))
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path))]
    fn create_directory_all(&self, path: &FilePath) -> StockroomResult<()> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "creating directory and parents");
        fs::create_dir_all(&resolved)
            .map_err(|e| Box::new(StockroomError::file(resolved, e)))?;
        Ok(())
    }

    #[instrument(skip(self), fields(path = %path, globs = ?globs))]
    fn list_directory(
        &self,
        path: &FilePath,
        globs: &[String],
    ) -> StockroomResult<Vec<FilePath>> {
        let resolved = self.resolve_path(path);

        // A missing directory is an empty listing, not an error. The gallery
        // simply renders with no slides.
        if !resolved.is_dir() {
            debug!(resolved = %resolved.display(), "directory not found, returning empty listing");
            return Ok(Vec::new());
        }

        let glob_set = build_glob_set(globs)?;

        let mut files = Vec::new();
        // max_depth(1): a flat listing, subdirectories are not descended into.
        for entry in WalkDir::new(&resolved).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if glob_set.is_match(name.as_ref()) {
                files.push(path.join(name.as_ref()));
            }
        }

        debug!(count = files.len(), "directory listing complete");
        Ok(files)
    }

    #[instrument(skip(self, service))]
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> StockroomResult<HttpServerHandle> {
        let address = config.address();
        let server = tiny_http::Server::http(&address)
            .map_err(|e| crate::err!("Failed to bind HTTP server on {}: {}", address, e))?;

        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .unwrap_or(0);
        debug!(port, "HTTP server bound");

        let handle = HttpServerHandle::new(port);
        let shutdown = Arc::clone(handle.shutdown_flag());
        let server_name = config.server_name.clone();

        std::thread::spawn(move || {
            serve_loop(server, service, shutdown, server_name);
        });

        Ok(handle)
    }
}

/// Accept loop: polls with a timeout so the shutdown flag is observed even
/// when no requests arrive.
fn serve_loop(
    server: tiny_http::Server,
    service: Box<dyn HttpService>,
    shutdown: Arc<AtomicBool>,
    server_name: String,
) {
    while !shutdown.load(Ordering::SeqCst) {
        let request = match server.recv_timeout(Duration::from_millis(100)) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "error receiving HTTP request");
                continue;
            }
        };
        handle_connection(&*service, &server_name, request);
    }
    debug!("HTTP server shut down");
}

fn handle_connection(service: &dyn HttpService, server_name: &str, mut request: tiny_http::Request) {
    let method = HttpMethod::parse(request.method().as_str());
    let path = request.url().to_string();

    let mut headers = HttpHeaders::new();
    for header in request.headers() {
        headers.insert(header.field.to_string(), header.value.to_string());
    }

    let mut body = Vec::new();
    if let Err(e) = request.as_reader().read_to_end(&mut body) {
        warn!(error = %e, "failed to read request body");
    }

    let response = match method {
        Some(method) => {
            let http_request = HttpRequest::new(method, path)
                .with_headers(headers)
                .with_body(body);
            match service.handle_request(http_request) {
                Ok(response) => response,
                // Service errors become HTTP 599 so they are easy to tell
                // apart from deliberate error pages.
                Err(e) => {
                    warn!(error = %e, "service error handling request");
                    HttpResponse::new(HttpStatusCode::ServiceError)
                        .with_content_type("text/plain")
                        .with_body(e.to_string())
                }
            }
        }
        None => HttpResponse::method_not_allowed(),
    };

    send_response(server_name, request, response);
}

fn send_response(server_name: &str, request: tiny_http::Request, response: HttpResponse) {
    let status_code = response.status().as_u16();
    let headers = response.headers().clone();
    let mut out =
        tiny_http::Response::from_data(response.into_body().into_bytes()).with_status_code(status_code);

    for (key, value) in headers.all() {
        if let Ok(header) = tiny_http::Header::from_bytes(key.as_bytes(), value.as_bytes()) {
            out = out.with_header(header);
        }
    }
    if let Ok(header) = tiny_http::Header::from_bytes(&b"Server"[..], server_name.as_bytes()) {
        out = out.with_header(header);
    }

    if let Err(e) = request.respond(out) {
        warn!(error = %e, "failed to send HTTP response");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, RealPal) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let pal = RealPal::new(temp_dir.path().to_path_buf());
        (temp_dir, pal)
    }

    #[test]
    fn test_file_exists_true() {
        let (temp_dir, pal) = setup_test_dir();
        fs::write(temp_dir.path().join("items.json"), "[]").unwrap();

        assert!(pal.file_exists(&FilePath::from("items.json")).unwrap());
    }

    #[test]
    fn test_file_exists_false() {
        let (_temp_dir, pal) = setup_test_dir();

        assert!(!pal.file_exists(&FilePath::from("missing.json")).unwrap());
    }

    #[test]
    fn test_read_file() {
        let (temp_dir, pal) = setup_test_dir();
        let content = r#"[{"name":"Laptop","stock":15,"price":1200.0}]"#;
        fs::write(temp_dir.path().join("items.json"), content).unwrap();

        let result = pal
            .read_file_to_string(&FilePath::from("items.json"))
            .unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_read_file_not_found() {
        let (_temp_dir, pal) = setup_test_dir();

        let result = pal.read_file(&FilePath::from("missing.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_write_file() {
        let (temp_dir, pal) = setup_test_dir();

        pal.write_file(&FilePath::from("items.json"), b"[]").unwrap();

        let content = fs::read_to_string(temp_dir.path().join("items.json")).unwrap();
        assert_eq!(content, "[]");
    }

    #[test]
    fn test_create_directory_all() {
        let (temp_dir, pal) = setup_test_dir();

        pal.create_directory_all(&FilePath::from("a/b/c")).unwrap();

        assert!(temp_dir.path().join("a/b/c").exists());
    }

    #[test]
    fn test_list_directory_image_globs() {
        let (temp_dir, pal) = setup_test_dir();
        let images = temp_dir.path().join("images");
        fs::create_dir(&images).unwrap();
        fs::write(images.join("cat.jpg"), "").unwrap();
        fs::write(images.join("DOG.PNG"), "").unwrap();
        fs::write(images.join("notes.txt"), "").unwrap();

        let globs = vec!["*.{jpg,jpeg,png,gif}".to_string()];
        let results = pal
            .list_directory(&FilePath::from("images"), &globs)
            .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.contains(&FilePath::from("images/cat.jpg")));
        // Extension matching is case-insensitive
        assert!(results.contains(&FilePath::from("images/DOG.PNG")));
        assert!(!results.contains(&FilePath::from("images/notes.txt")));
    }

    #[test]
    fn test_list_directory_does_not_recurse() {
        let (temp_dir, pal) = setup_test_dir();
        let images = temp_dir.path().join("images");
        fs::create_dir_all(images.join("nested")).unwrap();
        fs::write(images.join("cat.jpg"), "").unwrap();
        fs::write(images.join("nested/deep.jpg"), "").unwrap();

        let globs = vec!["*.{jpg,jpeg,png,gif}".to_string()];
        let results = pal
            .list_directory(&FilePath::from("images"), &globs)
            .unwrap();

        assert_eq!(results, vec![FilePath::from("images/cat.jpg")]);
    }

    #[test]
    fn test_list_directory_missing_is_empty() {
        let (_temp_dir, pal) = setup_test_dir();

        let globs = vec!["*.{jpg,jpeg,png,gif}".to_string()];
        let results = pal
            .list_directory(&FilePath::from("no-such-dir"), &globs)
            .unwrap();

        assert!(results.is_empty());
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let (temp_dir, pal) = setup_test_dir();
        fs::create_dir(temp_dir.path().join("images")).unwrap();
        let invalid_glob = vec!["[invalid".to_string()];

        let result = pal.list_directory(&FilePath::from("images"), &invalid_glob);
        assert!(result.is_err());
    }
}
