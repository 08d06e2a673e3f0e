/* # Why server-rendered HTML with no template engine?

Two pages, one form, one table. A template engine would add a dependency and
an indirection for markup that fits comfortably in format strings. Rendering
is pure: items, images and flash state go in, a complete HTML document comes
out, so the functions snapshot-test cleanly.
*/

use stockroom_base::FilePath;

use crate::flash::Flash;
use crate::item::Item;

const BOOTSTRAP_CSS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
const BOOTSTRAP_JS: &str =
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/js/bootstrap.bundle.min.js";

/// How long the status banner stays visible, in milliseconds.
const BANNER_TIMEOUT_MS: u32 = 4000;

/// Escape text for safe interpolation into HTML content and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page_shell(title: &str, body: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link href="{BOOTSTRAP_CSS}" rel="stylesheet">
</head>
<body>
<nav class="navbar navbar-expand-lg navbar-dark bg-dark">
<div class="container">
<a class="navbar-brand" href="/">{title}</a>
<div class="navbar-nav">
<a class="nav-link" href="/">Items</a>
<a class="nav-link" href="/gallery">Gallery</a>
</div>
</div>
</nav>
<main class="container py-4">
{body}</main>
<script src="{BOOTSTRAP_JS}"></script>
{script}</body>
</html>
"#,
        title = escape_html(title),
    )
}

fn banner(flash: &Flash) -> String {
    let (kind, message) = match flash {
        Flash::None => return String::new(),
        Flash::Success(message) => ("success", message),
        Flash::Error(message) => ("danger", message),
    };
    format!(
        "<div class=\"alert alert-{kind}\" role=\"alert\" id=\"statusBanner\">{}</div>\n",
        escape_html(message)
    )
}

/// Script that hides the banner after a timeout and removes the flash query
/// parameters from the address bar, so a reload does not replay the message.
fn banner_script(flash: &Flash) -> String {
    if flash.is_none() {
        return String::new();
    }
    format!(
        r#"<script>
setTimeout(function () {{
  var banner = document.getElementById("statusBanner");
  if (banner) {{ banner.style.display = "none"; }}
  history.replaceState(null, "", window.location.pathname);
}}, {BANNER_TIMEOUT_MS});
</script>
"#
    )
}

/// Render the item list page: status banner, add-item form and stock table.
pub fn render_items_page(title: &str, items: &[Item], flash: &Flash) -> String {
    let mut body = String::new();
    body.push_str(&banner(flash));

    body.push_str(
        r#"<div class="card mb-4">
<div class="card-body">
<h2 class="card-title h5">Add item</h2>
<form method="post" action="/" class="row g-3">
<div class="col-md-4">
<label class="form-label" for="itemName">Name</label>
<input class="form-control" type="text" id="itemName" name="itemName">
</div>
<div class="col-md-3">
<label class="form-label" for="itemStock">Stock</label>
<input class="form-control" type="number" id="itemStock" name="itemStock">
</div>
<div class="col-md-3">
<label class="form-label" for="itemPrice">Price</label>
<input class="form-control" type="number" step="0.01" id="itemPrice" name="itemPrice">
</div>
<div class="col-md-2 d-flex align-items-end">
<button class="btn btn-primary w-100" type="submit" name="addItem">Add</button>
</div>
</form>
</div>
</div>
"#,
    );

    body.push_str(
        "<table class=\"table table-striped\">\n<thead>\n<tr><th>#</th><th>Name</th><th>Stock</th><th>Price</th></tr>\n</thead>\n<tbody>\n",
    );
    for (index, item) in items.iter().enumerate() {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
            index + 1,
            escape_html(&item.name),
            item.stock,
            item.price,
        ));
    }
    body.push_str("</tbody>\n</table>\n");

    page_shell(title, &body, &banner_script(flash))
}

/// Render the gallery page: a carousel over all images plus a thumbnail grid.
///
/// Image paths are served by the application itself under `/<path>`, so the
/// `src` attributes use the store-relative path directly.
pub fn render_gallery_page(title: &str, images: &[FilePath]) -> String {
    let mut body = String::new();
    body.push_str("<h2 class=\"h4 mb-3\">Gallery</h2>\n");

    if images.is_empty() {
        body.push_str("<p class=\"text-muted\">No images found.</p>\n");
        return page_shell(title, &body, "");
    }

    body.push_str(
        "<div id=\"galleryCarousel\" class=\"carousel slide mb-4\" data-bs-ride=\"carousel\">\n<div class=\"carousel-inner\">\n",
    );
    for (index, image) in images.iter().enumerate() {
        let active = if index == 0 { " active" } else { "" };
        body.push_str(&format!(
            "<div class=\"carousel-item{active}\"><img src=\"/{src}\" class=\"d-block w-100\" alt=\"{alt}\"></div>\n",
            src = escape_html(image.as_relative().as_str()),
            alt = escape_html(image.file_name().unwrap_or("")),
        ));
    }
    // The target attribute values contain `"#`, so this literal needs the
    // wider raw string delimiter.
    body.push_str(
        r##"</div>
<button class="carousel-control-prev" type="button" data-bs-target="#galleryCarousel" data-bs-slide="prev">
<span class="carousel-control-prev-icon" aria-hidden="true"></span>
<span class="visually-hidden">Previous</span>
</button>
<button class="carousel-control-next" type="button" data-bs-target="#galleryCarousel" data-bs-slide="next">
<span class="carousel-control-next-icon" aria-hidden="true"></span>
<span class="visually-hidden">Next</span>
</button>
</div>
"##,
    );

    body.push_str("<div class=\"row g-3\">\n");
    for image in images {
        body.push_str(&format!(
            "<div class=\"col-6 col-sm-4 col-md-3\"><img src=\"/{src}\" class=\"img-thumbnail\" alt=\"{alt}\"></div>\n",
            src = escape_html(image.as_relative().as_str()),
            alt = escape_html(image.file_name().unwrap_or("")),
        ));
    }
    body.push_str("</div>\n");

    page_shell(title, &body, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    #[test]
    fn test_escape_html() {
        expect![["&lt;b&gt;5 &amp; a &quot;quote&quot; &#39;here&#39;&lt;/b&gt;"]]
            .assert_eq(&escape_html(r#"<b>5 & a "quote" 'here'</b>"#));
    }

    #[test]
    fn test_items_page_table_rows() {
        let items = vec![
            Item::new("Laptop", 15, 1200.0),
            Item::new("Mouse", 42, 25.5),
        ];
        let html = render_items_page("Item Stock Checker", &items, &Flash::None);

        assert!(html.contains("<tr><td>1</td><td>Laptop</td><td>15</td><td>1200.00</td></tr>"));
        assert!(html.contains("<tr><td>2</td><td>Mouse</td><td>42</td><td>25.50</td></tr>"));
    }

    #[test]
    fn test_items_page_form_fields() {
        let html = render_items_page("Item Stock Checker", &[], &Flash::None);

        assert!(html.contains("method=\"post\" action=\"/\""));
        assert!(html.contains("name=\"itemName\""));
        assert!(html.contains("name=\"itemStock\""));
        assert!(html.contains("name=\"itemPrice\""));
        assert!(html.contains("name=\"addItem\""));
    }

    #[test]
    fn test_items_page_no_banner_without_flash() {
        let html = render_items_page("Item Stock Checker", &[], &Flash::None);
        assert!(!html.contains("statusBanner"));
        assert!(!html.contains("history.replaceState"));
    }

    #[test]
    fn test_items_page_success_banner() {
        let html = render_items_page(
            "Item Stock Checker",
            &[],
            &Flash::Success("Item added successfully".to_string()),
        );
        assert!(html.contains(
            "<div class=\"alert alert-success\" role=\"alert\" id=\"statusBanner\">Item added successfully</div>"
        ));
        assert!(html.contains("history.replaceState"));
    }

    #[test]
    fn test_items_page_danger_banner_escapes_message() {
        let html = render_items_page(
            "Item Stock Checker",
            &[],
            &Flash::Error("Invalid item details: <oops>".to_string()),
        );
        assert!(html.contains("alert-danger"));
        assert!(html.contains("Invalid item details: &lt;oops&gt;"));
    }

    #[test]
    fn test_item_name_is_escaped_in_table() {
        let items = vec![Item::new("<script>alert(1)</script>", 1, 1.0)];
        let html = render_items_page("Item Stock Checker", &items, &Flash::None);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_gallery_page_first_image_active() {
        let images = vec![
            FilePath::from("images/cat.jpg"),
            FilePath::from("images/dog.png"),
        ];
        let html = render_gallery_page("Item Stock Checker", &images);

        assert!(html.contains(
            "<div class=\"carousel-item active\"><img src=\"/images/cat.jpg\""
        ));
        assert!(html.contains("<div class=\"carousel-item\"><img src=\"/images/dog.png\""));
        // One thumbnail per image
        assert_eq!(html.matches("img-thumbnail").count(), 2);
    }

    #[test]
    fn test_banner_script_strips_query_inside_timeout() {
        let html = render_items_page(
            "Item Stock Checker",
            &[],
            &Flash::Success("Item added successfully".to_string()),
        );

        let timeout_start = html.find("setTimeout").unwrap();
        let replace_state = html.find("history.replaceState").unwrap();
        let timeout_end = html.find(&format!("}}, {BANNER_TIMEOUT_MS});")).unwrap();
        assert!(timeout_start < replace_state && replace_state < timeout_end);
    }

    #[test]
    fn test_gallery_page_carousel_controls() {
        let images = vec![FilePath::from("images/cat.jpg")];
        let html = render_gallery_page("Item Stock Checker", &images);

        assert_eq!(html.matches("data-bs-target=\"#galleryCarousel\"").count(), 2);
        assert!(html.contains("carousel-control-prev"));
        assert!(html.contains("carousel-control-next"));
    }

    #[test]
    fn test_gallery_page_empty() {
        let html = render_gallery_page("Item Stock Checker", &[]);
        assert!(html.contains("No images found."));
        assert!(!html.contains("carousel"));
    }
}
