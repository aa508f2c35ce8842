use std::{collections::HashMap, time::Duration};

use reqwest::{header::HeaderMap, Client, Response};
use url::Url;

use crate::config::Config;

pub mod auth;
pub mod profile;

// GoTrue: /auth/v1, PostgREST: /rest/v1
pub struct SupabaseClient {
    client: Client,
    base_url: Url,
    jwt_secret: Option<String>,
}

impl SupabaseClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .default_headers(get_headers(&config.supabase_anon_key)?)
            .connect_timeout(Duration::from_secs(3))
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: config.supabase_url.clone(),
            jwt_secret: config.jwt_secret.clone(),
        })
    }

    pub fn jwt_secret(&self) -> Option<&str> {
        self.jwt_secret.as_deref()
    }

    fn endpoint(&self, path: &str) -> anyhow::Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

fn get_headers(anon_key: &str) -> anyhow::Result<HeaderMap> {
    let mut headers = HashMap::with_capacity(2);
    headers.insert("apikey".to_string(), anon_key.to_string());
    headers.insert("content-type".to_string(), "application/json".to_string());

    Ok((&headers).try_into()?)
}

async fn unexpected_status(op: &str, resp: Response) -> anyhow::Error {
    let status = resp.status();
    let msg = resp.text().await.unwrap_or_default();
    anyhow::anyhow!("{op} resp error: status_code={status:?}, msg={msg}")
}
