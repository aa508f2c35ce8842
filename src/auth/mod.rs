pub mod role_guard;

use std::sync::Arc;

use poem::{web::Redirect, Endpoint, Middleware};
use tracing::{error, info};

use crate::{
    db::SupabaseClient,
    middleware::{session_guard::AuthSession, LOGIN_PATH},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Role(pub String);

// 需要放在 SessionGuard 之后
pub struct RequireRole {
    client: Arc<SupabaseClient>,
    allowed: &'static [&'static str],
}

impl RequireRole {
    pub fn new(client: Arc<SupabaseClient>, allowed: &'static [&'static str]) -> Self {
        Self { client, allowed }
    }
}

impl<E: Endpoint> Middleware<E> for RequireRole {
    type Output = role_guard::RoleGuard<E>;

    fn transform(&self, ep: E) -> Self::Output {
        role_guard::RoleGuard {
            inner: ep,
            client: self.client.clone(),
            allowed: self.allowed,
        }
    }
}

pub async fn protect_route(
    client: &SupabaseClient,
    session: Option<&AuthSession>,
    allowed_roles: &[&str],
) -> Result<String, Redirect> {
    let Some(session) = session else {
        return Err(Redirect::temporary(LOGIN_PATH));
    };

    let role = client
        .get_role_name(&session.access_token, session.user.id)
        .await;

    let role = match role {
        Ok(Some(role)) => role,
        Ok(None) => {
            info!("user {} has no profile role", session.user.id);
            return Err(Redirect::temporary(LOGIN_PATH));
        }
        Err(e) => {
            error!("role lookup error for user {}: {e}", session.user.id);
            return Err(Redirect::temporary(LOGIN_PATH));
        }
    };

    if !allowed_roles.contains(&role.as_str()) {
        info!(
            "user {} with role {role} not in {:?}",
            session.user.id, allowed_roles
        );
        return Err(Redirect::temporary(LOGIN_PATH));
    }

    Ok(role)
}
