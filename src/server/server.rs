use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    body::Incoming,
    header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE},
    service::Service,
    Method, Request, Response, StatusCode,
};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use regex::Regex;
use tracing::{debug, error, info};
use url_escape::decode;

use std::{future::Future, pin::Pin, sync::Arc};

use crate::{
    database::sqlite::SqliteDatabase,
    error::{SiteError, SiteResult},
    render::pages::render_menu_page,
    timing::clock::Clock,
};

/// Fresh for 5 minutes in the browser, an hour in shared caches.
pub const MENU_CACHE_CONTROL: &str = "max-age=300, s-maxage=3600";

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// The Server
///
/// Serves the restaurant's menu pages. The restaurant is looked up by the
/// configured tenant key on every request, then the menu by slug.
///
/// This struct implements the `Service` trait from `hyper`. It is cloned for
/// every connection, the pool and the clock are shared behind `Arc`s.
#[derive(Clone)]
pub struct Server {
    connection_pool: Arc<Pool<SqliteConnectionManager>>,
    clock: Arc<dyn Clock>,
    tenant: String,
    slug_sanitizer: Regex,
}

impl Server {
    pub fn setup(
        connection_pool: Arc<Pool<SqliteConnectionManager>>,
        clock: Arc<dyn Clock>,
        tenant: String,
    ) -> Self {
        Self {
            connection_pool,
            clock,
            tenant,
            // Static pattern, always valid.
            slug_sanitizer: Regex::new(r"^[A-Za-z0-9_-]+$").unwrap(),
        }
    }

    /// Obtain a connection from the connection pool.
    fn get_connection(&self) -> SiteResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.connection_pool.get()?)
    }

    /// Turn a request path into the menu slug it addresses.
    ///
    /// `/` addresses no slug in particular. A single percent-decoded segment
    /// made of letters, digits, `-` and `_` is a slug, one trailing slash is
    /// ignored. Anything else cannot be a menu.
    fn parse_slug(&self, path: &str) -> SiteResult<Option<String>> {
        let Some(rest) = path.strip_prefix('/') else {
            return Err(SiteError::NotFound);
        };
        if rest.is_empty() {
            return Ok(None);
        }
        let segment = rest.strip_suffix('/').unwrap_or(rest);
        let slug = decode(segment).to_string();
        if !self.slug_sanitizer.is_match(&slug) {
            return Err(SiteError::NotFound);
        }
        Ok(Some(slug))
    }

    /// Load and render the page for `slug`.
    ///
    /// A missing tenant and a missing menu are both `NotFound`.
    fn menu_page(&self, slug: Option<&str>) -> SiteResult<String> {
        let connection = self.get_connection()?;

        let Some((restaurant_id, restaurant)) =
            SqliteDatabase::query_restaurant(&connection, &self.tenant)?
        else {
            return Err(SiteError::NotFound);
        };
        let Some(menu) = SqliteDatabase::query_menu(&connection, restaurant_id, slug)? else {
            return Err(SiteError::NotFound);
        };

        render_menu_page(&restaurant, &menu, self.clock.as_ref())
    }

    /// Route one request. Blocking, it talks to SQLite.
    pub fn respond(&self, method: &Method, path: &str) -> Response<Full<Bytes>> {
        let page = match method {
            &Method::GET => self.parse_slug(path).and_then(|slug| self.menu_page(slug.as_deref())),
            _ => Err(SiteError::NotFound),
        };

        let response = match page {
            Ok(html) => Self::ok_page(html),
            Err(SiteError::NotFound) => {
                debug!(%method, path, "no such page");
                Self::not_found()
            }
            Err(err) => {
                error!(%method, path, "{}", err);
                Self::server_error()
            }
        };
        info!(%method, path, status = response.status().as_u16(), "request");
        response
    }

    fn html(status: StatusCode, body: String) -> Response<Full<Bytes>> {
        let mut res = Response::new(Full::new(Bytes::from(body)));
        *res.status_mut() = status;
        res.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
        res
    }

    /// Return a 200 OK menu page, cacheable.
    fn ok_page(html: String) -> Response<Full<Bytes>> {
        let mut res = Self::html(StatusCode::OK, html);
        res.headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static(MENU_CACHE_CONTROL));
        res
    }

    /// Return a 404 Not Found page.
    fn not_found() -> Response<Full<Bytes>> {
        Self::html(
            StatusCode::NOT_FOUND,
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\" /><title>Not Found</title></head><body><h1>Not Found</h1></body></html>"
                .to_string(),
        )
    }

    /// Return a 500 Internal Server Error page.
    fn server_error() -> Response<Full<Bytes>> {
        Self::html(
            StatusCode::INTERNAL_SERVER_ERROR,
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\" /><title>Internal Server Error</title></head><body><h1>Internal Server Error</h1></body></html>"
                .to_string(),
        )
    }
}

impl Service<Request<Incoming>> for Server {
    type Response = Response<Full<Bytes>>;
    type Error = hyper::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let server = self.clone();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        Box::pin(async move {
            let res = tokio::task::spawn_blocking(move || server.respond(&method, &path))
                .await
                .unwrap_or_else(|err| {
                    error!("Request handler failed: {}", err);
                    Server::server_error()
                });
            Ok(res)
        })
    }
}
