pub mod session_cookie;
pub mod session_guard;

use std::sync::Arc;

use poem::{web::Redirect, Endpoint, IntoResponse, Middleware, Response};

use crate::db::SupabaseClient;

pub const LOGIN_PATH: &str = "/login";

pub const PROTECTED_PREFIXES: [&str; 6] = [
    "/admin",
    "/designer",
    "/supervisor",
    "/analytics",
    "/cart",
    "/quote",
];

const STATIC_PREFIXES: [&str; 2] = ["/static/", "/favicon.ico"];

const IMAGE_EXTENSIONS: [&str; 6] = [".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

// 必须在 CookieJarManager 里面
pub struct SessionGuard {
    client: Arc<SupabaseClient>,
    cookie_name: Arc<str>,
}

impl SessionGuard {
    pub fn new(client: Arc<SupabaseClient>, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            cookie_name: cookie_name.into(),
        }
    }
}

impl<E: Endpoint> Middleware<E> for SessionGuard {
    type Output = session_guard::SessionGuardEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        session_guard::SessionGuardEndpoint {
            inner: ep,
            client: self.client.clone(),
            cookie_name: self.cookie_name.clone(),
        }
    }
}

pub fn is_protected_path(path: &str) -> bool {
    PROTECTED_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

pub fn is_static_asset(path: &str) -> bool {
    if STATIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return true;
    }

    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

pub fn login_redirect() -> Response {
    Redirect::temporary(LOGIN_PATH).into_response()
}
