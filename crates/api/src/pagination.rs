//! Page-number pagination for list handlers.
//!
//! [`Paginator`] captures the request's `page` parameter and the URL needed to
//! build `next`/`previous` links, then drives a count query and a slice query
//! through [`Paginator::paginate`].

use std::future::Future;

use axum::extract::{FromRequestParts, OriginalUri, Query};
use axum::http::header::HOST;
use axum::http::request::Parts;
use axum::http::{HeaderName, Uri};
use cursos_core::error::CoreError;
use cursos_core::pagination::{page_link, Page, PageNumber, PageWindow};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::Listing;
use crate::state::AppState;

const FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
}

/// The decoded `page` query parameter of `uri`.
///
/// A query string that cannot be decoded names no valid page.
fn page_param(uri: &Uri) -> AppResult<Option<String>> {
    Query::<PageQuery>::try_from_uri(uri)
        .map(|Query(query)| query.page)
        .map_err(|_| CoreError::InvalidPage.into())
}

/// Pagination state for one list request.
#[derive(Debug, Clone)]
pub struct Paginator {
    enabled: bool,
    page_size: i64,
    page: Option<String>,
    base_url: String,
    query: Option<String>,
}

impl Paginator {
    /// `page` is the decoded page parameter; `query` is the raw query string
    /// carried over into the links.
    pub fn new(
        enabled: bool,
        page_size: i64,
        page: Option<String>,
        base_url: impl Into<String>,
        query: Option<&str>,
    ) -> Self {
        Self {
            enabled,
            page_size,
            page,
            base_url: base_url.into(),
            query: query.map(str::to_owned),
        }
    }

    /// Override the page size for this request only.
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Produce a listing from a count query and a `(limit, offset)` slice query.
    ///
    /// Disabled pagination skips the count and fetches everything with a
    /// `None` limit. An invalid page is rejected before any query runs.
    pub async fn paginate<T, C, L, F>(&self, count: C, list: L) -> AppResult<Listing<T>>
    where
        T: serde::Serialize,
        C: Future<Output = Result<i64, sqlx::Error>>,
        L: FnOnce(Option<i64>, i64) -> F,
        F: Future<Output = Result<Vec<T>, sqlx::Error>>,
    {
        if !self.enabled {
            return Ok(Listing::Plain(list(None, 0).await?));
        }

        let requested = PageNumber::parse(self.page.as_deref())?;
        let count = count.await?;
        let window = PageWindow::resolve(requested, count, self.page_size)?;
        let results = list(Some(window.limit()), window.offset()).await?;

        tracing::debug!(
            count,
            page = window.page,
            page_size = window.page_size,
            returned = results.len(),
            "Paginated listing",
        );

        Ok(Listing::Page(Page {
            count,
            next: window.next_page().map(|p| self.link(p)),
            previous: window.previous_page().map(|p| self.link(p)),
            results,
        }))
    }

    fn link(&self, page: i64) -> String {
        page_link(&self.base_url, self.query.as_deref(), page)
    }
}

impl FromRequestParts<AppState> for Paginator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Nested routers strip their prefix from `parts.uri`.
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        let host = parts.headers.get(HOST).and_then(|v| v.to_str().ok());
        let base_url = match host {
            Some(host) => {
                let scheme = parts
                    .headers
                    .get(FORWARDED_PROTO)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("http");
                format!("{scheme}://{host}{}", uri.path())
            }
            None => uri.path().to_owned(),
        };

        let config = state.config.pagination;
        let page = if config.enabled { page_param(&uri)? } else { None };
        Ok(Paginator::new(
            config.enabled,
            config.page_size,
            page,
            base_url,
            uri.query(),
        ))
    }
}
