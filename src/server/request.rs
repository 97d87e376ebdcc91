use crate::dispatcher::ApiRequest;
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::route::RawParams;
use http::Method;
use may_minihttp::Request;
use serde_json::Value;
use std::io::Read;
use tracing::{debug, info};

/// Parse query string parameters from a URL path
///
/// Everything after the first `?` is URL-decoded. Repeated keys keep the
/// last value.
#[must_use]
pub fn parse_query_params(raw_path: &str) -> RawParams {
    match raw_path.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        None => RawParams::new(),
    }
}

/// The raw string form of a JSON body value, if it has one.
///
/// Scalars are stringified the way they would appear in a query string
/// (`true`, `5`, `2.5`). `null`, arrays and objects have no such form.
fn json_param(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Merges query-string and body parameters into one raw map.
///
/// Bodies are read as `application/x-www-form-urlencoded` or as a JSON
/// object depending on `content_type`; any other body is ignored. Body
/// values override query values of the same name.
#[must_use]
pub fn parse_params(raw_path: &str, content_type: Option<&str>, body: &str) -> RawParams {
    let mut params = parse_query_params(raw_path);
    if body.is_empty() {
        return params;
    }

    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match mime.as_str() {
        "application/x-www-form-urlencoded" => {
            params.extend(
                url::form_urlencoded::parse(body.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned())),
            );
        }
        "application/json" => match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                for (key, value) in &map {
                    match json_param(value) {
                        Some(raw) => {
                            params.insert(key.clone(), raw);
                        }
                        None => debug!(param = %key, "Skipping non-scalar JSON body value"),
                    }
                }
            }
            Ok(_) => debug!("JSON body is not an object; ignored"),
            Err(err) => debug!(error = %err, "JSON body parse failed; ignored"),
        },
        other => debug!(content_type = %other, "Unsupported body content type; ignored"),
    }
    params
}

/// Converts a `may_minihttp` request into an [`ApiRequest`].
///
/// # Errors
///
/// Fails only when the request method is not a valid HTTP token.
pub fn parse_request(req: Request) -> Result<ApiRequest, http::method::InvalidMethod> {
    let method = Method::from_bytes(req.method().as_bytes())?;
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let mut content_type = None;
    let mut request_id = None;
    for h in req.headers().iter() {
        if h.name.eq_ignore_ascii_case("content-type") {
            content_type = Some(String::from_utf8_lossy(h.value).into_owned());
        } else if h.name.eq_ignore_ascii_case(REQUEST_ID_HEADER) {
            request_id = Some(String::from_utf8_lossy(h.value).into_owned());
        }
    }

    let mut body = String::new();
    if let Err(err) = req.body().read_to_string(&mut body) {
        debug!(error = %err, "Request body unreadable; treated as empty");
        body.clear();
    }

    let params = parse_params(&raw_path, content_type.as_deref(), &body);
    let request = ApiRequest::new(method, path, params)
        .with_request_id(RequestId::from_header_or_new(request_id.as_deref()));

    info!(
        request_id = %request.request_id,
        method = %request.method,
        path = %request.path,
        body_size_bytes = body.len(),
        param_count = request.params.len(),
        "HTTP request parsed"
    );
    Ok(request)
}
