//! Home route query (`/?denied=true`)

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HomeQuery {
    /// Set when the lounge bounced the visitor back
    pub denied: bool,
}

impl HomeQuery {
    /// Parse a query string, with or without the leading `?`.
    /// `denied` counts only with a non-empty value.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let denied = form_urlencoded::parse(query.as_bytes())
            .any(|(key, value)| key == "denied" && !value.is_empty());
        Self { denied }
    }
}
