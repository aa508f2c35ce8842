use poem::{http::StatusCode, Error, FromRequest, Request, RequestBody, Result};

use crate::{auth::Role, db::auth::User, middleware::session_guard::AuthSession};

pub struct AuthUser {
    pub user: User,

    // 仅在 RequireRole 之后有值
    pub role: Option<String>,
}

// Implements a session extractor
impl<'a> FromRequest<'a> for AuthUser {
    async fn from_request(req: &'a Request, _body: &mut RequestBody) -> Result<Self> {
        let Some(session) = req.data::<AuthSession>() else {
            return Err(Error::from_string(
                "not signed in".to_string(),
                StatusCode::UNAUTHORIZED,
            ));
        };

        Ok(AuthUser {
            user: session.user.clone(),
            role: req.data::<Role>().map(|r| r.0.clone()),
        })
    }
}
