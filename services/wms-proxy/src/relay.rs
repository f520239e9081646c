//! Relays an upstream response back to the WMS client.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use tracing::{error, warn};
use wms_common::WmsResult;

use crate::client::UpstreamResponse;

/// Largest body frame handed to the client.
pub const RELAY_CHUNK_SIZE: usize = 32 * 1024;

/// Upstream headers forwarded to the client; everything else is dropped.
pub const FORWARDED_HEADERS: [&str; 6] = [
    "content-type",
    "content-length",
    "cache-control",
    "expires",
    "last-modified",
    "etag",
];

/// Build the client response from an upstream response.
///
/// Status is copied verbatim and the body is streamed unmodified. A `200`
/// without a content type is labelled `image/png`. If the upstream body fails
/// mid-stream the error is logged and the client body is aborted.
pub fn relay_response(upstream: UpstreamResponse) -> Response {
    let status = StatusCode::from_u16(upstream.status).unwrap_or_else(|_| {
        warn!(status = upstream.status, "Upstream returned an invalid status code");
        StatusCode::BAD_GATEWAY
    });

    let mut headers = HeaderMap::new();
    for (name, value) in &upstream.headers {
        let name = name.to_ascii_lowercase();
        if !FORWARDED_HEADERS.contains(&name.as_str()) {
            continue;
        }
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) else {
            continue;
        };
        // First value wins
        if !headers.contains_key(&name) {
            headers.insert(name, value);
        }
    }

    if status == StatusCode::OK && !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/png"));
    }

    let body = rechunk(upstream.body).inspect_err(|e| {
        error!(error = %e, "Failed to relay upstream body");
    });

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Split body chunks into frames of at most [`RELAY_CHUNK_SIZE`] bytes.
pub fn rechunk<S>(body: S) -> impl Stream<Item = WmsResult<Bytes>>
where
    S: Stream<Item = WmsResult<Bytes>>,
{
    body.flat_map(|item| {
        let frames: Vec<WmsResult<Bytes>> = match item {
            Ok(mut chunk) => {
                let mut frames = Vec::with_capacity(chunk.len() / RELAY_CHUNK_SIZE + 1);
                while chunk.len() > RELAY_CHUNK_SIZE {
                    frames.push(Ok(chunk.split_to(RELAY_CHUNK_SIZE)));
                }
                if !chunk.is_empty() {
                    frames.push(Ok(chunk));
                }
                frames
            }
            Err(e) => vec![Err(e)],
        };
        stream::iter(frames)
    })
}
