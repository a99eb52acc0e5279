//! Canonical text rendering of one inbound request.

use axum::{
    body::{Body, Bytes, HttpBody},
    http::{header, request::Parts, HeaderMap, HeaderValue, Method, Request},
};
use indexmap::IndexMap;

use crate::dump::json;
use crate::dump::lines::LineBuffer;
use crate::http::request::RequestId;

/// First line of every dump.
pub const SEPARATOR: &str =
    "********************************************************************************";

/// Default upper bound for body reads (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Parsed `application/x-www-form-urlencoded` fields, in first-seen key order.
pub type FormFields = IndexMap<String, Vec<String>>;

/// Rendered bytes of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dump(Vec<u8>);

impl Dump {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Renders requests into [`Dump`]s.
#[derive(Debug, Clone, Copy)]
pub struct RequestFormatter {
    max_body_bytes: usize,
}

impl Default for RequestFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BODY_BYTES)
    }
}

impl RequestFormatter {
    pub fn new(max_body_bytes: usize) -> Self {
        Self { max_body_bytes }
    }

    /// Render `request` into its canonical dump.
    ///
    /// Consumes the request because text and JSON bodies are read to the
    /// end. Errors while reading the body are rendered in place of the body.
    pub async fn render(&self, request_id: &RequestId, request: Request<Body>) -> Dump {
        let (parts, body) = request.into_parts();
        let media = media_type(&parts.headers);

        let mut body = (!body.is_end_stream()).then_some(body);
        let mut form = FormFields::new();
        let mut form_read = false;
        let mut read_error = None;

        if accepts_form(&parts.method) && media == FORM_URLENCODED {
            if let Some(body) = body.take() {
                form_read = true;
                match self.read(body).await {
                    Ok(bytes) => form = parse_form(&bytes),
                    Err(e) => read_error = Some(e),
                }
            }
        }

        let mut buf = LineBuffer::new();
        write_head(&mut buf, request_id, &parts);

        if !form.is_empty() {
            buf.push_str("PostForm:");
            for (key, values) in &form {
                buf.line(format_args!("  {}={}", key, values.join(" ")));
            }
        }

        if let Some(error) = read_error {
            buf.line(format_args!("Body: {}", media));
            buf.blank();
            buf.push_str(&error.to_string());
        } else if let Some(body) = body {
            buf.line(format_args!("Body: {}", media));
            self.write_body(&mut buf, &media, body).await;
        } else if form_read {
            // The form was the body and is rendered above.
            buf.line(format_args!("Body: {}", media));
            buf.push_str("Unsupported media type");
        }

        buf.blank();
        Dump(buf.into_bytes())
    }

    async fn write_body(&self, buf: &mut LineBuffer, media: &str, body: Body) {
        let indent = match media {
            "text/plain" | "text/csv" => false,
            "application/json" => true,
            _ => {
                buf.push_str("Unsupported media type");
                return;
            }
        };

        buf.blank();
        match self.read(body).await {
            Ok(bytes) if indent => match json::indent(&bytes) {
                Some(pretty) => buf.raw(&pretty),
                None => buf.raw(&bytes),
            },
            Ok(bytes) => buf.raw(&bytes),
            Err(e) => buf.push_str(&e.to_string()),
        }
    }

    async fn read(&self, body: Body) -> Result<Bytes, axum::Error> {
        axum::body::to_bytes(body, self.max_body_bytes).await
    }
}

fn write_head(buf: &mut LineBuffer, request_id: &RequestId, parts: &Parts) {
    buf.push_str(SEPARATOR);
    buf.line(format_args!("RequestID: {}", request_id));
    buf.line(format_args!("Method: {}", parts.method));
    buf.line(format_args!("URL: {}", parts.uri));
    buf.push_str("Header:");
    for key in parts.headers.keys() {
        let values: Vec<_> = parts
            .headers
            .get_all(key)
            .iter()
            .map(header_text)
            .collect();
        buf.line(format_args!("  {}: {}", key, values.join(" ")));
    }
}

fn header_text(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

/// Lower-cased media type of the `Content-Type` header, without parameters.
///
/// Returns an empty string when the header is missing or unparsable.
pub fn media_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .map(|m| m.essence_str().to_ascii_lowercase())
        .unwrap_or_default()
}

fn accepts_form(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT || *method == Method::PATCH
}

fn parse_form(bytes: &[u8]) -> FormFields {
    let mut fields = FormFields::new();
    for (key, value) in url::form_urlencoded::parse(bytes) {
        fields
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    fields
}
