use std::sync::Arc;

use poem::{Endpoint, IntoResponse, Request, Response, Result};
use tracing::debug;

use crate::{db::SupabaseClient, middleware::session_guard::AuthSession};

use super::{protect_route, Role};

pub struct RoleGuard<E> {
    pub(super) inner: E,
    pub(super) client: Arc<SupabaseClient>,
    pub(super) allowed: &'static [&'static str],
}

impl<E: Endpoint> Endpoint for RoleGuard<E> {
    type Output = Response;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        let session = req.data::<AuthSession>();

        let role = match protect_route(&self.client, session, self.allowed).await {
            Ok(role) => role,
            Err(redirect) => return Ok(redirect.into_response()),
        };

        debug!("{} granted as {role}", req.uri().path());
        req.set_data(Role(role));

        self.inner.call(req).await.map(IntoResponse::into_response)
    }
}
