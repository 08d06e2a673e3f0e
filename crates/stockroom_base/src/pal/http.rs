/* # Why a dedicated HTTP module in the PAL?

The HTTP abstraction allows the application to serve requests while remaining
fully testable with MockPal:

- Testable request handling: MockPal can dispatch requests in-memory for
  assertions, no sockets involved
- Consistent interface: a single API for both real and test scenarios
- Synchronous simplicity: no async runtime, matching the project's philosophy

Bodies are plain byte buffers. Every page and image this application serves is
fixed-size, so there is no streaming variant.
*/

use std::collections::HashMap;
use std::sync::Arc;

/// HTTP methods understood by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    /// Parse an HTTP method from a string.
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Convert the method to its string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HTTP headers collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    inner: HashMap<String, String>,
}

impl HttpHeaders {
    /// Create empty headers.
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Insert a header.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    /// Get a header value.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.inner.get(key)
    }

    /// Check if a header exists.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Get all headers as a reference.
    pub fn all(&self) -> &HashMap<String, String> {
        &self.inner
    }
}

impl From<HashMap<String, String>> for HttpHeaders {
    fn from(map: HashMap<String, String>) -> Self {
        Self { inner: map }
    }
}

/// HTTP request or response body content.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HttpBody {
    bytes: Vec<u8>,
}

impl HttpBody {
    /// Create an empty body.
    pub fn empty() -> Self {
        Self { bytes: vec![] }
    }

    /// Create from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Create from string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self {
            bytes: s.into().into_bytes(),
        }
    }

    /// Get content as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get content as a string if valid UTF-8.
    pub fn as_string(&self) -> Option<String> {
        String::from_utf8(self.bytes.clone()).ok()
    }

    /// Check if the body is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Get the content length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Take ownership of the content.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl std::fmt::Debug for HttpBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("HttpBody").field(&self.bytes.len()).finish()
    }
}

impl From<Vec<u8>> for HttpBody {
    fn from(v: Vec<u8>) -> Self {
        Self::from_bytes(v)
    }
}

impl From<String> for HttpBody {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl From<&str> for HttpBody {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

/// HTTP request structure.
///
/// The path keeps its raw query string; use [`HttpRequest::path_without_query`]
/// and [`HttpRequest::query`] to split them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    method: HttpMethod,
    path: String,
    headers: HttpHeaders,
    body: HttpBody,
}

impl HttpRequest {
    /// Create a new HTTP request.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HttpHeaders::new(),
            body: HttpBody::empty(),
        }
    }

    /// Get the HTTP method.
    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    /// Get the request path including any query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the request path with the query string removed.
    pub fn path_without_query(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }

    /// Get the raw query string, if any.
    pub fn query(&self) -> Option<&str> {
        self.path.split_once('?').map(|(_, q)| q)
    }

    /// Get the request headers.
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Get the request body.
    pub fn body(&self) -> &HttpBody {
        &self.body
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<HttpBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Replace all headers.
    pub fn with_headers(mut self, headers: HttpHeaders) -> Self {
        self.headers = headers;
        self
    }
}

/// HTTP status codes used by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatusCode {
    Ok = 200,

    // 3xx Redirection
    SeeOther = 303,

    // 4xx Client Errors
    NotFound = 404,
    MethodNotAllowed = 405,

    // 5xx Server Errors
    InternalServerError = 500,
    // Service errors are surfaced as 599 to make them easy to tell apart
    // from responses the service produced deliberately.
    ServiceError = 599,
}

impl HttpStatusCode {
    /// Get the numeric status code.
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the standard reason phrase.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::SeeOther => "See Other",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::InternalServerError => "Internal Server Error",
            Self::ServiceError => "Service Error",
        }
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        match code {
            200 => Self::Ok,
            303 => Self::SeeOther,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            599 => Self::ServiceError,
            _ => Self::InternalServerError,
        }
    }
}

/// HTTP response structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: HttpStatusCode,
    headers: HttpHeaders,
    body: HttpBody,
}

impl HttpResponse {
    /// Create a new response with the given status.
    pub fn new(status: HttpStatusCode) -> Self {
        Self {
            status,
            headers: HttpHeaders::new(),
            body: HttpBody::empty(),
        }
    }

    /// Create a 200 OK response.
    pub fn ok() -> Self {
        Self::new(HttpStatusCode::Ok)
    }

    /// Create a 200 HTML response.
    pub fn html(body: impl Into<String>) -> Self {
        Self::ok()
            .with_content_type("text/html; charset=utf-8")
            .with_body(body.into())
    }

    /// Create a 303 See Other redirect to the given location.
    ///
    /// 303 forces the follow-up request to be a GET, which is what breaks the
    /// resubmit-on-refresh cycle after a form POST.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(HttpStatusCode::SeeOther).with_header("Location", location)
    }

    /// Create a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::new(HttpStatusCode::NotFound)
    }

    /// Create a 405 Method Not Allowed response.
    pub fn method_not_allowed() -> Self {
        Self::new(HttpStatusCode::MethodNotAllowed)
    }

    /// Get the status code.
    pub fn status(&self) -> HttpStatusCode {
        self.status
    }

    /// Get the headers.
    pub fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    /// Get the body.
    pub fn body(&self) -> &HttpBody {
        &self.body
    }

    /// Take ownership of the body.
    pub fn into_body(self) -> HttpBody {
        self.body
    }

    /// Set the response body.
    pub fn with_body(mut self, body: impl Into<HttpBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Set the Content-Type header.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("Content-Type", content_type)
    }
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on. If None, the OS will assign an available port.
    pub port: Option<u16>,
    /// Server name used in responses.
    pub server_name: String,
}

impl HttpServerConfig {
    /// Create a new configuration with the given host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            server_name: "stockroom".to_string(),
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the server name.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Get the address string (host:port, with port 0 for OS-assigned).
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port.unwrap_or(0))
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: None,
            server_name: "stockroom".to_string(),
        }
    }
}

/* # Why a single HttpService trait?

The service receives raw HttpRequest objects and returns HttpResponse objects;
routing lives inside the implementation. One service to register, one handle to
manage, and MockPal tests only need simulate_request().
*/

/// Trait for handling HTTP requests.
///
/// Errors returned from `handle_request` are converted to HTTP 599 responses
/// by the PAL implementation, so deliberate error pages (404 and friends)
/// should be returned as `Ok` responses with the right status.
pub trait HttpService: std::fmt::Debug + Send + Sync + 'static {
    /// Handle an HTTP request and return a response.
    fn handle_request(&self, request: HttpRequest) -> crate::StockroomResult<HttpResponse>;
}

/// Handle to a running HTTP server.
///
/// When dropped, the server stops accepting new connections and shuts down.
#[derive(Debug, Clone)]
pub struct HttpServerHandle {
    port: u16,
    shutdown: Arc<std::sync::atomic::AtomicBool>,
}

impl HttpServerHandle {
    /// Create a new handle for the given port.
    pub fn new(port: u16) -> Self {
        Self {
            port,
            shutdown: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the full address (host:port) the server is listening on.
    pub fn address(&self, host: &str) -> String {
        format!("{}:{}", host, self.port)
    }

    /// Signal the server to shut down.
    pub fn shutdown(&self) {
        self.shutdown
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }

    /// Check if the server has been signaled to shut down.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Access the shutdown flag (for internal use by implementations).
    pub fn shutdown_flag(&self) -> &Arc<std::sync::atomic::AtomicBool> {
        &self.shutdown
    }
}

impl Drop for HttpServerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_parse() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("POST"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("post"), Some(HttpMethod::Post)); // Case insensitive
        assert_eq!(HttpMethod::parse("BREW"), None);
        // Methods the application has no routes for are unknown on purpose
        assert_eq!(HttpMethod::parse("HEAD"), None);
        assert_eq!(HttpMethod::parse("PUT"), None);
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(format!("{}", HttpMethod::Get), "GET");
        assert_eq!(format!("{}", HttpMethod::Post), "POST");
    }

    #[test]
    fn test_http_headers() {
        let mut headers = HttpHeaders::new();
        headers.insert("Content-Type", "text/html");

        assert_eq!(headers.get("Content-Type"), Some(&"text/html".to_string()));
        assert!(headers.contains("Content-Type"));
        assert!(!headers.contains("X-Custom"));
    }

    #[test]
    fn test_http_body() {
        let body = HttpBody::from_string("Hello, World!");
        assert_eq!(body.as_string(), Some("Hello, World!".to_string()));
        assert_eq!(body.len(), 13);

        let empty = HttpBody::empty();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_http_request_query_split() {
        let request = HttpRequest::new(HttpMethod::Get, "/?msg=Added&type=success");
        assert_eq!(request.path_without_query(), "/");
        assert_eq!(request.query(), Some("msg=Added&type=success"));

        let plain = HttpRequest::new(HttpMethod::Get, "/gallery");
        assert_eq!(plain.path_without_query(), "/gallery");
        assert_eq!(plain.query(), None);
    }

    #[test]
    fn test_http_request_builders() {
        let request = HttpRequest::new(HttpMethod::Post, "/")
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body("itemName=Laptop");

        assert_eq!(request.method(), &HttpMethod::Post);
        assert_eq!(
            request.body().as_string(),
            Some("itemName=Laptop".to_string())
        );
    }

    #[test]
    fn test_http_response_helpers() {
        let html = HttpResponse::html("<html></html>");
        assert_eq!(html.status(), HttpStatusCode::Ok);
        assert_eq!(
            html.headers().get("Content-Type"),
            Some(&"text/html; charset=utf-8".to_string())
        );

        let redirect = HttpResponse::redirect("/?msg=Added&type=success");
        assert_eq!(redirect.status(), HttpStatusCode::SeeOther);
        assert_eq!(
            redirect.headers().get("Location"),
            Some(&"/?msg=Added&type=success".to_string())
        );
        assert!(redirect.body().is_empty());

        assert_eq!(
            HttpResponse::not_found().status(),
            HttpStatusCode::NotFound
        );
        assert_eq!(
            HttpResponse::method_not_allowed().status(),
            HttpStatusCode::MethodNotAllowed
        );
    }

    #[test]
    fn test_http_status_code_from_u16() {
        assert_eq!(HttpStatusCode::from(200), HttpStatusCode::Ok);
        assert_eq!(HttpStatusCode::from(303), HttpStatusCode::SeeOther);
        assert_eq!(HttpStatusCode::from(404), HttpStatusCode::NotFound);
        // Codes the application never produces collapse to 500
        assert_eq!(
            HttpStatusCode::from(400),
            HttpStatusCode::InternalServerError
        );
        assert_eq!(
            HttpStatusCode::from(999),
            HttpStatusCode::InternalServerError
        );
    }

    #[test]
    fn test_http_server_config() {
        let config = HttpServerConfig::new("127.0.0.1")
            .with_port(8080)
            .with_server_name("test-server");

        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.server_name, "test-server");

        let default = HttpServerConfig::default();
        assert_eq!(default.address(), "127.0.0.1:0");
    }

    #[test]
    fn test_http_server_handle() {
        let handle = HttpServerHandle::new(8080);
        assert_eq!(handle.port(), 8080);
        assert_eq!(handle.address("127.0.0.1"), "127.0.0.1:8080");

        assert!(!handle.is_shutdown());
        handle.shutdown();
        assert!(handle.is_shutdown());
    }

    #[test]
    fn test_http_service_trait() {
        #[derive(Debug)]
        struct TestService;
        impl HttpService for TestService {
            fn handle_request(&self, request: HttpRequest) -> crate::StockroomResult<HttpResponse> {
                if request.path_without_query() == "/" {
                    Ok(HttpResponse::html("<p>ok</p>"))
                } else {
                    Ok(HttpResponse::not_found())
                }
            }
        }

        let service = TestService;
        let resp = service
            .handle_request(HttpRequest::new(HttpMethod::Get, "/"))
            .unwrap();
        assert_eq!(resp.status(), HttpStatusCode::Ok);

        let resp = service
            .handle_request(HttpRequest::new(HttpMethod::Get, "/missing"))
            .unwrap();
        assert_eq!(resp.status(), HttpStatusCode::NotFound);
    }
}
