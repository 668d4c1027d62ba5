//! REST calls against the clinical backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, each bounded by
//! [`REQUEST_TIMEOUT_MS`].
//! Server-side (SSR): stubs returning transport errors since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Transport outcomes are reduced to `(status, body)` and handed to the
//! `roles::wire` parsers, so browser and CLI share one interpretation of
//! success, fallback, and role validation.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
#[cfg(feature = "hydrate")]
use roles::REQUEST_TIMEOUT_MS;
use roles::wire::{AdminUser, SyncRequest};
use roles::{AdminActionError, DEFAULT_API_URL, Role, RoleSyncError};

/// Backend base URL baked in at compile time from `CLINICAL_API_URL`.
#[must_use]
pub fn api_base_url() -> &'static str {
    resolve_base_url(option_env!("CLINICAL_API_URL"))
}

fn resolve_base_url(configured: Option<&'static str>) -> &'static str {
    configured
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_URL)
}

/// Exchanges a bearer credential for the caller's role.
#[async_trait(?Send)]
pub trait RoleSource {
    async fn sync_role(&self, token: &str, request: &SyncRequest) -> Result<Role, RoleSyncError>;
}

/// User-management endpoints reserved for `SUPER_ADMIN`.
#[async_trait(?Send)]
pub trait AdminApi {
    async fn list_users(&self, token: &str) -> Result<Vec<AdminUser>, AdminActionError>;

    /// Returns the server's confirmation message.
    async fn update_user_role(&self, token: &str, uid: &str, role: Role) -> Result<String, AdminActionError>;
}

/// HTTP implementation of [`RoleSource`] and [`AdminApi`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpBackend {
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into().trim_end_matches('/').to_owned() }
    }

    /// Backend at the compile-time configured URL.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(api_base_url())
    }

    fn url(&self, path: &str) -> String {
        roles::wire::endpoint(&self.base_url, path)
    }
}

#[cfg(feature = "hydrate")]
enum Exchange {
    Done { status: u16, body: String },
    Failed(String),
    TimedOut,
}

/// Await a request and read its body, giving up after [`REQUEST_TIMEOUT_MS`].
#[cfg(feature = "hydrate")]
async fn exchange<F>(request: F) -> Exchange
where
    F: std::future::Future<Output = Result<gloo_net::http::Response, gloo_net::Error>>,
{
    use futures::future::{Either, select};

    let work = async move {
        let resp = request.await.map_err(|e| e.to_string())?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| e.to_string())?;
        Ok::<_, String>((status, body))
    };
    let timeout = gloo_timers::future::TimeoutFuture::new(REQUEST_TIMEOUT_MS);
    futures::pin_mut!(work);
    futures::pin_mut!(timeout);

    match select(work, timeout).await {
        Either::Left((Ok((status, body)), _)) => Exchange::Done { status, body },
        Either::Left((Err(e), _)) => Exchange::Failed(e),
        Either::Right(((), _)) => Exchange::TimedOut,
    }
}

#[async_trait(?Send)]
impl RoleSource for HttpBackend {
    async fn sync_role(&self, token: &str, request: &SyncRequest) -> Result<Role, RoleSyncError> {
        #[cfg(feature = "hydrate")]
        {
            let req = gloo_net::http::Request::post(&self.url(roles::wire::SYNC_PATH))
                .header("Authorization", &roles::wire::bearer(token))
                .json(request)
                .map_err(|e| RoleSyncError::Transport(e.to_string()))?;
            match exchange(req.send()).await {
                Exchange::Done { status, body } => roles::wire::parse_sync_response(status, &body),
                Exchange::Failed(e) => Err(RoleSyncError::Transport(e)),
                Exchange::TimedOut => Err(RoleSyncError::Timeout),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (token, request, self.url(roles::wire::SYNC_PATH));
            Err(RoleSyncError::Transport("not available on server".to_owned()))
        }
    }
}

#[async_trait(?Send)]
impl AdminApi for HttpBackend {
    async fn list_users(&self, token: &str) -> Result<Vec<AdminUser>, AdminActionError> {
        #[cfg(feature = "hydrate")]
        {
            let req = gloo_net::http::Request::get(&self.url(roles::wire::ADMIN_USERS_PATH))
                .header("Authorization", &roles::wire::bearer(token))
                .send();
            match exchange(req).await {
                Exchange::Done { status, body } => roles::wire::parse_admin_users(status, &body),
                Exchange::Failed(e) => Err(AdminActionError::Transport(e)),
                Exchange::TimedOut => Err(AdminActionError::Timeout),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
            Err(AdminActionError::Transport("not available on server".to_owned()))
        }
    }

    async fn update_user_role(&self, token: &str, uid: &str, role: Role) -> Result<String, AdminActionError> {
        #[cfg(feature = "hydrate")]
        {
            let payload = roles::wire::RoleUpdate { role };
            let req = gloo_net::http::Request::put(&self.url(&roles::wire::user_role_path(uid)))
                .header("Authorization", &roles::wire::bearer(token))
                .json(&payload)
                .map_err(|e| AdminActionError::Transport(e.to_string()))?;
            match exchange(req.send()).await {
                Exchange::Done { status, body } => roles::wire::parse_role_update(status, &body),
                Exchange::Failed(e) => Err(AdminActionError::Transport(e)),
                Exchange::TimedOut => Err(AdminActionError::Timeout),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (token, uid, role);
            Err(AdminActionError::Transport("not available on server".to_owned()))
        }
    }
}
