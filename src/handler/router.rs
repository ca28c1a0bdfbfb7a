//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: collects the body under the size
//! limit, tries the API routes, and falls through to the static responder.

use crate::config::AppState;
use crate::handler::{api, static_files};
use crate::logger;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::sync::Arc;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main entry point for HTTP request handling.
///
/// Returning `Err` tears the connection down; that is the reject path for
/// request bodies over the configured size limit.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, BoxError>
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let access_log = state.config.logging.access_log;
    if access_log {
        logger::log_request(&method, req.uri(), req.version());
    }

    let body = collect_body(req, state.config.http.max_body_size).await?;

    let response = match api::dispatch(&method, &path, &body, &state).await {
        Some(resp) => resp,
        None => static_files::serve(&method, &path, &state.config.site).await,
    };

    if access_log {
        let size = response.body().size_hint().exact().unwrap_or(0);
        logger::log_response(
            response.status().as_u16(),
            usize::try_from(size).unwrap_or(usize::MAX),
        );
    }

    Ok(response)
}

async fn collect_body<B>(req: Request<B>, limit: u64) -> Result<Bytes, BoxError>
where
    B: Body + Send,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let collected = Limited::new(req.into_body(), limit).collect().await?;
    Ok(collected.to_bytes())
}
