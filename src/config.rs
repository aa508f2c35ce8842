use std::env;

use anyhow::{anyhow, Context, Result};
use url::Url;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug)]
pub struct Config {
    pub supabase_url: Url,
    pub supabase_anon_key: String,

    // 本地校验 access token, 未配置时只解码不校验
    pub jwt_secret: Option<String>,

    pub addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let url = env::var("SUPABASE_URL").context("SUPABASE_URL is not set")?;
        let anon_key = env::var("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY is not set")?;
        let jwt_secret = env::var("SUPABASE_JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty());
        let addr = env::var("EKATAN_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

        Self::new(&url, anon_key, jwt_secret, addr)
    }

    pub fn new(
        supabase_url: &str,
        supabase_anon_key: String,
        jwt_secret: Option<String>,
        addr: String,
    ) -> Result<Self> {
        let supabase_url =
            Url::parse(supabase_url).with_context(|| format!("invalid SUPABASE_URL: {supabase_url}"))?;

        if supabase_url.host_str().is_none() {
            return Err(anyhow!("SUPABASE_URL has no host: {supabase_url}"));
        }

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            jwt_secret,
            addr,
        })
    }

    /// `https://abcd.supabase.co` -> `abcd`
    pub fn project_ref(&self) -> &str {
        self.supabase_url
            .host_str()
            .and_then(|host| host.split('.').next())
            .unwrap_or_default()
    }

    pub fn session_cookie_name(&self) -> String {
        format!("sb-{}-auth-token", self.project_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_name_uses_first_host_label() {
        let config = Config::new(
            "https://xyzcompany.supabase.co",
            "anon".to_string(),
            None,
            DEFAULT_ADDR.to_string(),
        )
        .unwrap();

        assert_eq!(config.project_ref(), "xyzcompany");
        assert_eq!(config.session_cookie_name(), "sb-xyzcompany-auth-token");
    }

    #[test]
    fn rejects_bad_url() {
        let r = Config::new("not a url", "anon".to_string(), None, DEFAULT_ADDR.to_string());
        assert!(r.is_err());
    }
}
