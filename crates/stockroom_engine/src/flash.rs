use crate::form::decode_component;

/* # Why an explicit Flash enum?

The status banner is a one-shot notification attached to a redirect: it
appears once after a form submission and is gone on the next navigation. An
explicit enum keeps the transport (query parameters today) separate from the
meaning, and the renderer only ever sees already-decoded state.
*/

/// One-shot status message carried across the post-submit redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    /// No banner.
    None,
    /// Green "success" banner.
    Success(String),
    /// Red "danger" banner.
    Error(String),
}

impl Flash {
    /// True if there is no message to show.
    pub fn is_none(&self) -> bool {
        matches!(self, Flash::None)
    }

    /// Encode as `msg=<text>&type=<success|danger>` query parameters.
    ///
    /// Returns `None` for `Flash::None` so callers can omit the query string
    /// entirely.
    pub fn to_query(&self) -> Option<String> {
        let (message, kind) = match self {
            Flash::None => return None,
            Flash::Success(message) => (message, "success"),
            Flash::Error(message) => (message, "danger"),
        };
        Some(format!("msg={}&type={}", urlencoding::encode(message), kind))
    }

    /// Decode from a raw query string.
    ///
    /// Anything incomplete or unrecognized (missing `msg`, missing or unknown
    /// `type`) decodes to `Flash::None`; a stray query parameter never breaks
    /// rendering.
    pub fn from_query(query: Option<&str>) -> Flash {
        let Some(query) = query else {
            return Flash::None;
        };

        let mut message = None;
        let mut kind = None;
        for pair in query.split('&') {
            let (key, value) = match pair.split_once('=') {
                Some(split) => split,
                None => continue,
            };
            match key {
                "msg" => message = Some(decode_component(value)),
                "type" => kind = Some(value),
                _ => {}
            }
        }

        match (message, kind) {
            (Some(message), Some("success")) => Flash::Success(message),
            (Some(message), Some("danger")) => Flash::Error(message),
            _ => Flash::None,
        }
    }
}
