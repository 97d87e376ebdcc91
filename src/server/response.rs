use crate::dispatcher::ApiResponse;
use may_minihttp::Response;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

fn status_reason(status: http::StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

/// Header lines built for content types outside the known set, leaked once
/// per distinct type.
static EXTRA_CONTENT_TYPES: Lazy<Mutex<HashMap<&'static str, &'static str>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// `Content-Type` header line for a response content type.
///
/// `may_minihttp` only accepts `'static` header lines. The content types the
/// engine produces are spelled out here; any other type (a custom
/// documentation engine, say) gets a leaked line, cached so each distinct
/// type is leaked at most once.
fn content_type_header(content_type: &'static str) -> &'static str {
    match content_type {
        "application/json" => "Content-Type: application/json",
        "text/markdown; charset=utf-8" => "Content-Type: text/markdown; charset=utf-8",
        "text/plain" | "text/plain; charset=utf-8" => "Content-Type: text/plain; charset=utf-8",
        other => {
            let mut cache = EXTRA_CONTENT_TYPES
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *cache.entry(other).or_insert_with(|| {
                let header: &'static str =
                    Box::leak(format!("Content-Type: {other}").into_boxed_str());
                header
            })
        }
    }
}

pub fn write_api_response(res: &mut Response, response: ApiResponse) {
    res.status_code(
        response.status.as_u16() as usize,
        status_reason(response.status),
    );
    res.header(content_type_header(response.content_type));
    res.body_vec(response.body.into_bytes());
}
