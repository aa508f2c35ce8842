use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::{unexpected_status, SupabaseClient};

// 提前 90 秒刷新
pub const EXPIRY_MARGIN_SECS: i64 = 90;

const AUDIENCE: &str = "authenticated";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: Uuid,

    #[serde(default)]
    pub email: Option<String>,
}

// GoTrue 返回的 session, 也是 cookie 里存的内容
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,

    // unix 秒
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    // 没有 expires_at 时用 token 的 exp
    pub fn is_expiring(&self, fallback_exp: Option<i64>, now: i64) -> bool {
        match self.expires_at.or(fallback_exp) {
            Some(exp) => exp - now < EXPIRY_MARGIN_SECS,
            None => false,
        }
    }

    fn stamp_expiry(mut self) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|secs| Utc::now().timestamp() + secs);
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
}

// 有 secret 时校验签名和 aud, 否则只解码; exp 不在这里校验, 由调用方决定是否刷新
pub fn decode_claims(token: &str, secret: Option<&str>) -> anyhow::Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    let key = match secret {
        Some(secret) => {
            validation.set_audience(&[AUDIENCE]);
            DecodingKey::from_secret(secret.as_bytes())
        }
        None => {
            validation.insecure_disable_signature_validation();
            validation.validate_aud = false;
            DecodingKey::from_secret(&[])
        }
    };

    let data = decode::<Claims>(token, &key, &validation)?;

    Ok(data.claims)
}

impl SupabaseClient {
    pub async fn get_user(&self, access_token: &str) -> anyhow::Result<Option<User>> {
        let resp = self
            .client
            .get(self.endpoint("/auth/v1/user")?)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("get_user req error: {:?}", e))?;

        match resp.status() {
            StatusCode::OK => Ok(Some(resp.json::<User>().await?)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("get_user rejected: {}", resp.status());
                Ok(None)
            }
            _ => Err(unexpected_status("get_user", resp).await),
        }
    }

    // refresh token 失效或已被使用时返回 None
    pub async fn refresh_session(&self, refresh_token: &str) -> anyhow::Result<Option<Session>> {
        let mut url = self.endpoint("/auth/v1/token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");

        let resp = self
            .client
            .post(url)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("refresh_session req error: {:?}", e))?;

        match resp.status() {
            StatusCode::OK => {
                let session = resp.json::<Session>().await?;
                Ok(Some(session.stamp_expiry()))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                debug!("refresh_session rejected: {}", resp.status());
                Ok(None)
            }
            _ => Err(unexpected_status("refresh_session", resp).await),
        }
    }
}
