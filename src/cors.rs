//! Cross-origin policy for the frontend
//!
//! Origins are matched exactly, or against a pattern with one `*` standing
//! for a run of subdomain characters, e.g. `https://*.vercel.app` for preview
//! deployments.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// A parsed allowed-origin entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPattern {
    Exact(String),
    Wildcard { prefix: String, suffix: String },
}

impl OriginPattern {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let Some((scheme, rest)) = raw.split_once("://") else {
            return Err("missing scheme".to_string());
        };
        if scheme.is_empty() || rest.is_empty() {
            return Err("missing scheme or host".to_string());
        }
        if rest.contains('/') {
            return Err("origin cannot contain a path".to_string());
        }

        match rest.matches('*').count() {
            0 => Ok(OriginPattern::Exact(raw.to_string())),
            1 => {
                let (prefix, suffix) = raw.split_once('*').unwrap_or((raw, ""));
                Ok(OriginPattern::Wildcard {
                    prefix: prefix.to_string(),
                    suffix: suffix.to_string(),
                })
            }
            _ => Err("at most one '*' is allowed".to_string()),
        }
    }

    pub fn matches(&self, origin: &str) -> bool {
        match self {
            OriginPattern::Exact(exact) => exact == origin,
            OriginPattern::Wildcard { prefix, suffix } => {
                if origin.len() <= prefix.len() + suffix.len() {
                    return false;
                }
                let Some(middle) = origin
                    .strip_prefix(prefix.as_str())
                    .and_then(|rest| rest.strip_suffix(suffix.as_str()))
                else {
                    return false;
                };

                middle
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            }
        }
    }
}

/// Build the CORS layer; invalid patterns were rejected by config validation
/// and are skipped here
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let patterns: Vec<OriginPattern> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| OriginPattern::parse(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request_parts| {
                origin
                    .to_str()
                    .map(|origin| patterns.iter().any(|p| p.matches(origin)))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
