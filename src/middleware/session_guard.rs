use std::sync::Arc;

use chrono::Utc;
use poem::{web::cookie::CookieJar, Endpoint, IntoResponse, Request, Response, Result};
use tracing::{debug, error, info, warn};

use crate::db::{
    auth::{decode_claims, User},
    SupabaseClient,
};

use super::{is_protected_path, is_static_asset, login_redirect, session_cookie};

#[derive(Clone, Debug)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
}

pub struct SessionGuardEndpoint<E> {
    pub(super) inner: E,
    pub(super) client: Arc<SupabaseClient>,
    pub(super) cookie_name: Arc<str>,
}

impl<E: Endpoint> Endpoint for SessionGuardEndpoint<E> {
    type Output = Response;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        let path = req.uri().path().to_string();

        if is_static_asset(&path) {
            return self.inner.call(req).await.map(IntoResponse::into_response);
        }

        let session = update_session(&self.client, req.cookie(), &self.cookie_name).await;

        if !is_protected_path(&path) {
            if let Some(session) = session {
                req.set_data(session);
            }
            return self.call_inner(req).await;
        }

        let Some(session) = session else {
            info!("no session for protected path {path}, redirect to login");
            // 刷新过程中写入 jar 的 cookie 由 CookieJarManager 带到重定向响应上
            return Ok(login_redirect());
        };

        debug!("user {} on {path}", session.user.id);
        req.set_data(session);

        self.call_inner(req).await
    }
}

impl<E: Endpoint> SessionGuardEndpoint<E> {
    async fn call_inner(&self, req: Request) -> Result<Response> {
        let res = self.inner.call(req).await;
        match res {
            Ok(resp) => {
                let resp = resp.into_response();
                debug!("response: {}", resp.status());
                Ok(resp)
            }
            Err(err) => {
                error!("error: {err}");
                Err(err)
            }
        }
    }
}

// 刷新后的 session 写回 jar, 下游和响应都能拿到新 cookie
pub async fn update_session(
    client: &SupabaseClient,
    jar: &CookieJar,
    cookie_name: &str,
) -> Option<AuthSession> {
    let mut session = session_cookie::read_session(jar, cookie_name)?;

    let claims = match decode_claims(&session.access_token, client.jwt_secret()) {
        Ok(claims) => Some(claims),
        Err(e) if client.jwt_secret().is_some() => {
            warn!("access token failed verification: {e}");
            return None;
        }
        Err(e) => {
            debug!("access token claims unreadable: {e}");
            None
        }
    };

    let now = Utc::now().timestamp();
    if session.is_expiring(claims.map(|c| c.exp), now) {
        match client.refresh_session(&session.refresh_token).await {
            Ok(Some(fresh)) => {
                if let Err(e) = session_cookie::write_session(jar, cookie_name, &fresh) {
                    error!("write refreshed session cookie error: {e}");
                }
                session = fresh;
            }
            Ok(None) => {
                info!("refresh token rejected, clearing session cookies");
                session_cookie::clear_session(jar, cookie_name);
                return None;
            }
            Err(e) => {
                error!("refresh session error: {e}");
                return None;
            }
        }
    }

    match client.get_user(&session.access_token).await {
        Ok(Some(user)) => Some(AuthSession {
            user,
            access_token: session.access_token,
        }),
        Ok(None) => None,
        Err(e) => {
            error!("get user error: {e}");
            None
        }
    }
}
