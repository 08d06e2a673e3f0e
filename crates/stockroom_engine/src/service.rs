use tracing::{debug, instrument, warn};

use stockroom_base::pal::http::{HttpMethod, HttpRequest, HttpResponse, HttpService};
use stockroom_base::{FilePath, PalHandle, StockroomResult};

use crate::config::Config;
use crate::flash::Flash;
use crate::form::FormData;
use crate::gallery::{image_content_type, list_images};
use crate::item::validate_submission;
use crate::render::{render_gallery_page, render_items_page};
use crate::store::StoreHandle;

/* # Why does validation failure render inline instead of redirecting?

A successful submission changed state, so it redirects (303) and the success
message travels in the query string; refreshing the result page never
resubmits. A rejected submission changed nothing, so there is nothing a
refresh could replay. Rendering the error page directly keeps the message out
of the address bar and saves a round trip.
*/

/// HTTP service for the whole application.
///
/// Routes:
/// - `GET /` - item list page, with an optional flash banner from the query
/// - `POST /` - item submission; redirects on success, renders inline on
///   rejection
/// - `GET /gallery` - image carousel and thumbnail grid
/// - `GET /<images_dir>/<file>` - the gallery images themselves
///
/// Everything else is 404, and non-GET/POST methods are 405.
pub struct AppService {
    store: StoreHandle,
    config: Config,
    pal: PalHandle,
}

impl std::fmt::Debug for AppService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppService {
    pub fn new(store: StoreHandle, config: Config, pal: PalHandle) -> Self {
        Self { store, config, pal }
    }

    /// Render the item list, with whatever flash state the caller decoded.
    fn items_page(&self, flash: Flash) -> StockroomResult<HttpResponse> {
        let items = self.store.load()?;
        Ok(HttpResponse::html(render_items_page(
            &self.config.title,
            &items,
            &flash,
        )))
    }

    /// Handle a form POST to `/`.
    fn handle_submission(&self, request: &HttpRequest) -> StockroomResult<HttpResponse> {
        let Some(body) = request.body().as_string() else {
            warn!("submission body is not valid UTF-8");
            return self.items_page(Flash::Error(
                "Invalid item details: malformed submission".to_string(),
            ));
        };
        let form = FormData::parse(&body);

        // The submit button carries the addItem field; a POST without it is
        // not a submission from our form.
        if !form.contains("addItem") {
            return self.items_page(Flash::Error(
                "Invalid item details: incomplete submission".to_string(),
            ));
        }

        let name = form.get("itemName").unwrap_or("");
        let stock = form.get("itemStock").unwrap_or("");
        let price = form.get("itemPrice").unwrap_or("");

        match validate_submission(name, stock, price) {
            Ok(item) => {
                debug!(name = %item.name, "appending item");
                self.store.append(item)?;
                let flash = Flash::Success("Item added successfully".to_string());
                // to_query() is Some for every variant except Flash::None
                let query = flash.to_query().unwrap_or_default();
                Ok(HttpResponse::redirect(format!("/?{query}")))
            }
            Err(error) => {
                debug!(%error, "submission rejected");
                self.items_page(Flash::Error(format!("Invalid item details: {error}")))
            }
        }
    }

    fn gallery_page(&self) -> StockroomResult<HttpResponse> {
        let images = list_images(&self.pal, &FilePath::from(self.config.images_dir.as_str()))?;
        Ok(HttpResponse::html(render_gallery_page(
            &self.config.title,
            &images,
        )))
    }

    /// Serve a single gallery image.
    ///
    /// Only files directly inside the configured images directory with a known
    /// image extension are served; everything else is 404.
    fn serve_image(&self, file_name: &str) -> StockroomResult<HttpResponse> {
        let decoded = urlencoding::decode(file_name)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| file_name.to_string());

        // No path separators and no parent references: the route serves a
        // flat directory, nothing more.
        if decoded.is_empty()
            || decoded.contains('/')
            || decoded.contains('\\')
            || decoded.contains("..")
        {
            return Ok(HttpResponse::not_found());
        }

        let path = FilePath::from(self.config.images_dir.as_str()).join(&decoded);
        let Some(content_type) = image_content_type(&path) else {
            return Ok(HttpResponse::not_found());
        };
        if !self.pal.file_exists(&path)? {
            return Ok(HttpResponse::not_found());
        }

        let bytes = self.pal.read_file_to_bytes(&path)?;
        Ok(HttpResponse::ok()
            .with_content_type(content_type)
            .with_body(bytes))
    }
}

impl HttpService for AppService {
    #[instrument(skip(self, request), fields(method = %request.method(), path = request.path()))]
    fn handle_request(&self, request: HttpRequest) -> StockroomResult<HttpResponse> {
        let image_prefix = format!("/{}/", self.config.images_dir);

        match (request.method(), request.path_without_query()) {
            (HttpMethod::Get, "/") => self.items_page(Flash::from_query(request.query())),
            (HttpMethod::Post, "/") => self.handle_submission(&request),
            (HttpMethod::Get, "/gallery") => self.gallery_page(),
            (HttpMethod::Get, path) if path.starts_with(&image_prefix) => {
                self.serve_image(&path[image_prefix.len()..])
            }
            (HttpMethod::Get, _) => Ok(HttpResponse::not_found()),
            _ => Ok(HttpResponse::method_not_allowed()),
        }
    }
}
