// src/cors.rs

// dependencies
use http::{HeaderValue, Method, StatusCode};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tracing::warn;

pub const ANY_ORIGIN: &str = "*";

// struct type which represents the cross-origin policy of the dev server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsPolicy {
    pub origin: String,
    #[serde(
        serialize_with = "serialize_methods",
        deserialize_with = "deserialize_methods"
    )]
    pub methods: Vec<Method>,
    pub preflight_continue: bool,
    pub options_success_status: u16,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        CorsPolicy {
            origin: ANY_ORIGIN.to_string(),
            methods: vec![Method::GET, Method::HEAD, Method::POST, Method::DELETE],
            preflight_continue: false,
            options_success_status: 204,
        }
    }
}

// methods for the CorsPolicy type
impl CorsPolicy {
    /// The `Access-Control-Allow-Origin` value: `*`, or the configured origin echoed
    /// only to requests from exactly that origin.
    pub fn allow_origin(&self) -> AllowOrigin {
        if self.origin == ANY_ORIGIN {
            return AllowOrigin::any();
        }

        match HeaderValue::from_str(&self.origin) {
            Ok(origin) => AllowOrigin::list([origin]),
            Err(_) => {
                warn!(origin = %self.origin, "cors origin is not a valid header value; no origin will be allowed");
                AllowOrigin::list(Vec::new())
            }
        }
    }

    /// Builds the tower-http layer carrying this policy. It answers every OPTIONS
    /// request itself; [`CorsPolicy::preflight_status`] is the status to report.
    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(self.allow_origin())
            .allow_methods(self.methods.clone())
            .allow_headers(AllowHeaders::mirror_request())
    }

    pub fn preflight_status(&self) -> StatusCode {
        StatusCode::from_u16(self.options_success_status).unwrap_or_else(|_| {
            warn!(
                status = self.options_success_status,
                "invalid optionsSuccessStatus, using 204"
            );
            StatusCode::NO_CONTENT
        })
    }
}

fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

// parse "GET,HEAD,POST,DELETE" into methods, ignoring blanks around the commas
pub fn parse_methods(raw: &str) -> Result<Vec<Method>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| {
            Method::from_bytes(m.to_ascii_uppercase().as_bytes()).map_err(|_| m.to_string())
        })
        .collect()
}

fn serialize_methods<S>(methods: &[Method], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&join_methods(methods))
}

fn deserialize_methods<'de, D>(deserializer: D) -> Result<Vec<Method>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_methods(&raw)
        .map_err(|m| serde::de::Error::custom(format!("invalid HTTP method: {m}")))
}
