use reqwest::{header::ACCEPT, StatusCode};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use super::{unexpected_status, SupabaseClient};

// PostgREST 单行响应, 0 行或多行时返回 406
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Deserialize)]
struct ProfileRow {
    roles: Option<RoleRow>,
}

#[derive(Debug, Deserialize)]
struct RoleRow {
    name: String,
}

impl SupabaseClient {
    // 用用户自己的 token 查询, RLS 生效
    pub async fn get_role_name(
        &self,
        access_token: &str,
        user_id: Uuid,
    ) -> anyhow::Result<Option<String>> {
        let mut url = self.endpoint("/rest/v1/profiles")?;
        url.query_pairs_mut()
            .append_pair("select", "roles(name)")
            .append_pair("id", &format!("eq.{user_id}"));

        let resp = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("get_role_name req error: {:?}", e))?;

        match resp.status() {
            StatusCode::OK => {
                let row = resp.json::<ProfileRow>().await?;
                Ok(row.roles.map(|r| r.name))
            }
            StatusCode::NOT_ACCEPTABLE => {
                debug!("no profile row for user {user_id}");
                Ok(None)
            }
            _ => Err(unexpected_status("get_role_name", resp).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::db::auth::tests::{test_client, USER_ID};

    fn profile_query() -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "roles(name)".into()),
            Matcher::UrlEncoded("id".into(), format!("eq.{USER_ID}")),
        ])
    }

    #[tokio::test]
    async fn joined_role_name() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", "/rest/v1/profiles")
            .match_query(profile_query())
            .match_header("accept", SINGLE_OBJECT)
            .match_header("authorization", "Bearer token")
            .with_status(200)
            .with_body(r#"{"roles":{"name":"designer"}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url(), None);
        let role = client
            .get_role_name("token", USER_ID.parse().unwrap())
            .await
            .unwrap();

        assert_eq!(role.as_deref(), Some("designer"));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn profile_without_role() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/profiles")
            .match_query(profile_query())
            .with_status(200)
            .with_body(r#"{"roles":null}"#)
            .create_async()
            .await;

        let client = test_client(&server.url(), None);
        let role = client
            .get_role_name("token", USER_ID.parse().unwrap())
            .await
            .unwrap();
        assert!(role.is_none());
    }

    #[tokio::test]
    async fn missing_profile_and_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/profiles")
            .match_query(profile_query())
            .match_header("authorization", "Bearer nobody")
            .with_status(406)
            .with_body(r#"{"code":"PGRST116"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/rest/v1/profiles")
            .match_query(profile_query())
            .match_header("authorization", "Bearer broken")
            .with_status(500)
            .create_async()
            .await;

        let client = test_client(&server.url(), None);
        let id: Uuid = USER_ID.parse().unwrap();

        assert!(client.get_role_name("nobody", id).await.unwrap().is_none());
        assert!(client.get_role_name("broken", id).await.is_err());
    }
}
