// src/fetch/mod.rs

use reqwest::{header, Client};
use std::collections::HashSet;
use tracing::{debug, error, info};
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
    types::{Category, Item},
};

pub mod urls;

/// Authenticated client for the per-project category listings.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: Client,
    base_url: Url,
    project_id: String,
    api_key: String,
}

impl Fetcher {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn endpoint(&self, category: Category) -> Result<Url> {
        urls::category_url(&self.base_url, &self.project_id, category)
    }

    /// GET the item list for `category`. Single attempt.
    ///
    /// Non-2xx → `RemoteRequest`; a body that is not a JSON array of
    /// `{id, data}` items, or whose ids cannot each name their own file,
    /// → `MalformedResponse`.
    pub async fn fetch(&self, category: Category) -> Result<Vec<Item>> {
        let url = self.endpoint(category)?;
        debug!(%url, "GET");

        let resp = self
            .client
            .get(url.clone())
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(%url, error = %e, "reading error body failed");
                    String::new()
                }
            };
            error!(%url, status = status.as_u16(), "request failed");
            return Err(Error::RemoteRequest {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let items: Vec<Item> =
            serde_json::from_str(&body).map_err(|e| Error::malformed(url.as_str(), e.to_string()))?;
        check_ids(&items).map_err(|reason| Error::malformed(url.as_str(), reason))?;

        info!(%category, count = items.len(), "fetched items");
        Ok(items)
    }
}

/// Every id must be usable as a file name and unique within the listing,
/// so no two items ever share an output file.
fn check_ids(items: &[Item]) -> std::result::Result<(), String> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        item.id
            .check_file_safe()
            .map_err(|why| format!("item id {:?}: {}", item.id.to_string(), why))?;
        // 1 and "1" both render as `_1.csv`
        if !seen.insert(item.id.to_string()) {
            return Err(format!("duplicate item id {}", item.id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemId;
    use chrono::Local;
    use std::path::Path;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher(server: &MockServer) -> Fetcher {
        let cfg = Config::new(
            &format!("{}/api", server.uri()),
            Some("proj".into()),
            Some("secret-token".into()),
            Path::new("unused"),
            None,
            Local::now(),
        )
        .unwrap();
        Fetcher::new(Client::new(), &cfg)
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/proj/experiments"))
            .and(header("authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"id": 1, "data": [{"a": 1}]}, {"id": "two", "data": []}]"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let items = fetcher(&server).fetch(Category::Experiments).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, ItemId::Int(1));
        assert_eq!(items[1].id, ItemId::Text("two".into()));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/proj/datasets"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = fetcher(&server).fetch(Category::Datasets).await.unwrap_err();
        match err {
            Error::RemoteRequest { status, body, url } => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
                assert!(url.ends_with("/api/proj/datasets"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_truncated_error_body_still_reports_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        // promises 100 body bytes, sends 5, then hangs up
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            sock.write_all(
                b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort",
            )
            .await
            .unwrap();
        });

        let cfg = Config::new(
            &format!("http://{}", addr),
            Some("proj".into()),
            Some("k".into()),
            Path::new("unused"),
            None,
            Local::now(),
        )
        .unwrap();
        let err = Fetcher::new(Client::new(), &cfg)
            .fetch(Category::Experiments)
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            Error::RemoteRequest { status, body, .. } => {
                assert_eq!(status, 500);
                assert!(body.is_empty(), "body: {body:?}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bad_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops"))
            .mount(&server)
            .await;

        let err = fetcher(&server).fetch(Category::Datasets).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_wrong_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"items": []}"#))
            .mount(&server)
            .await;

        let err = fetcher(&server).fetch(Category::Experiments).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        let server = MockServer::builder().start().await;
        let f = fetcher(&server);
        drop(server);

        let err = f.fetch(Category::Experiments).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "{err:?}");
    }

    #[test]
    fn test_check_ids() {
        let items: Vec<Item> =
            serde_json::from_str(r#"[{"id": 1, "data": []}, {"id": "1", "data": []}]"#).unwrap();
        assert!(check_ids(&items).unwrap_err().contains("duplicate"));

        let items: Vec<Item> =
            serde_json::from_str(r#"[{"id": "../x", "data": []}]"#).unwrap();
        assert!(check_ids(&items).is_err());

        let items: Vec<Item> =
            serde_json::from_str(r#"[{"id": 1, "data": []}, {"id": 2, "data": []}]"#).unwrap();
        assert!(check_ids(&items).is_ok());
    }
}
