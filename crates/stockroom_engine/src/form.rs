use std::borrow::Cow;
use std::collections::HashMap;

/// Decoded `application/x-www-form-urlencoded` form fields.
///
/// Duplicate field names keep the last value, matching what a plain HTML
/// form submits.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    /// Parse a urlencoded request body.
    ///
    /// Never fails: malformed pairs are kept as-is rather than dropped, so a
    /// submission with an oddly encoded value still reaches validation and
    /// gets a proper rejection message.
    pub fn parse(body: &str) -> Self {
        let mut fields = HashMap::new();
        for pair in body.split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            fields.insert(decode_component(key), decode_component(value));
        }
        Self { fields }
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Check if a field is present, regardless of its value.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Percent-decode a form or query component, treating '+' as a space.
///
/// Also used by the flash decoding in [`crate::flash`]; form bodies and query
/// strings share the urlencoded component syntax.
pub(crate) fn decode_component(value: &str) -> String {
    let plus_decoded = value.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => plus_decoded,
    }
}
