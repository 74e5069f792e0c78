//! Routes for axum.

use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use core::fmt::Write as _;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::time::Instant;
use time::OffsetDateTime;
use wiki_status_list::{
    Chrome, MacroContext, RequestFilter as _, WikiMacro as _, db::SqliteStore,
};

/// All errors that may occur during page rendering.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    /// A macro expansion error.
    #[error(transparent)]
    Macro(#[from] wiki_status_list::Error),
    /// A database connection pool error.
    #[error(transparent)]
    Pool(#[from] r2d2::Error),
    /// A page string formatting error.
    #[error(transparent)]
    Fmt(#[from] core::fmt::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        log::error!("{self}");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{self}")).into_response()
    }
}

/// Wraps a rendered page in the standard HTML response headers.
fn html_result(result: String) -> impl IntoResponse {
    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
        ],
        result,
    )
}

/// Query options for `/`.
#[derive(serde::Deserialize)]
pub(crate) struct StatusQuery {
    /// The macro arguments, exactly as they would appear between the
    /// parentheses of the macro call.
    args: Option<String>,
}

/// The status list page route handler.
pub(crate) async fn status_page(
    State(state): State<AppState>,
    Query(StatusQuery { args }): Query<StatusQuery>,
) -> Result<impl IntoResponse, Error> {
    let time = Instant::now();

    let conn = state.pool.get()?;
    let store = SqliteStore::new(&conn);
    let ctx = MacroContext::new(&state.href, &store, OffsetDateTime::now_utc());
    let table = state.status_list.expand(&ctx, args.as_deref())?;

    let mut chrome = Chrome::new();
    state.status_list.post_process_request(&mut chrome);

    let mut out = String::from(
        r#"<!DOCTYPE html><html><head><meta charset="utf-8"><title>Wiki status</title>"#,
    );
    for stylesheet in chrome.stylesheets() {
        write!(
            out,
            r#"<link rel="stylesheet" href="{}">"#,
            attr(&format!("{}/chrome/{stylesheet}", state.href.base()))
        )?;
    }
    write!(
        out,
        "</head><body><h1>{}</h1>{table}</body></html>",
        text(state.status_list.name())
    )?;

    log::info!("Rendered status page in {:.2?}", time.elapsed());
    Ok(html_result(out))
}

/// The static asset route handler.
pub(crate) async fn resource(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    state
        .resources
        .find_resource(&path)
        .ok_or(StatusCode::NOT_FOUND)
}
