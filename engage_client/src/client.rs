use log::debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::model::{ActivityPage, ActivitySearch, Envelope, Supporter, SupporterList, SupporterSearch};

const ACTIVITY_SEARCH_PATH: &str = "/api/integration/ext/v1/activities/search";
const SUPPORTER_SEARCH_PATH: &str = "/api/integration/ext/v1/supporters/search";
const SUPPORTERS_PATH: &str = "/api/integration/ext/v1/supporters";
// Header names are case-insensitive; `HeaderName` only accepts lowercase.
const AUTH_TOKEN_HEADER: &str = "authtoken";

/// The three Engage calls the tools need. Implemented over HTTP by
/// [`EngageClient`]; tests script their own.
#[allow(async_fn_in_trait)]
pub trait EngageApi {
    async fn search_activities(&self, search: &ActivitySearch) -> Result<ActivityPage, ApiError>;

    async fn search_supporters(&self, search: &SupporterSearch) -> Result<SupporterList, ApiError>;

    async fn update_supporters(&self, supporters: &[Supporter]) -> Result<SupporterList, ApiError>;
}

/// HTTP client for one Engage host, carrying the `authToken` header on every call.
#[derive(Debug, Clone)]
pub struct EngageClient {
    client: Client,
    base_url: Url,
}

impl EngageClient {
    pub fn new(host: &str, token: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(host).map_err(|e| ApiError::InvalidHost {
            host: host.to_string(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(token).map_err(|_| ApiError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn call<B, R>(&self, method: Method, path: &str, payload: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base_url.join(path).map_err(|e| ApiError::InvalidHost {
            host: self.base_url.to_string(),
            reason: e.to_string(),
        })?;
        debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, url)
            .json(&Envelope::new(payload))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let body = response.text().await?;
        let envelope: Envelope<R> = serde_json::from_str(&body)?;
        Ok(envelope.payload)
    }
}

impl EngageApi for EngageClient {
    async fn search_activities(&self, search: &ActivitySearch) -> Result<ActivityPage, ApiError> {
        debug!("activity search offset={} count={}", search.offset, search.count);
        self.call(Method::POST, ACTIVITY_SEARCH_PATH, search).await
    }

    async fn search_supporters(&self, search: &SupporterSearch) -> Result<SupporterList, ApiError> {
        self.call(Method::POST, SUPPORTER_SEARCH_PATH, search).await
    }

    async fn update_supporters(&self, supporters: &[Supporter]) -> Result<SupporterList, ApiError> {
        #[derive(Serialize)]
        struct UpdateBody<'a> {
            supporters: &'a [Supporter],
        }

        self.call(Method::PUT, SUPPORTERS_PATH, &UpdateBody { supporters }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_host_without_scheme() {
        let err = EngageClient::new("api.salsalabs.org", "token").unwrap_err();
        assert!(matches!(err, ApiError::InvalidHost { .. }));
    }

    #[test]
    fn joins_paths_onto_host() {
        let client = EngageClient::new("https://hq.uat.igniteaction.net", "token").unwrap();
        let url = client.base_url().join(SUPPORTER_SEARCH_PATH).unwrap();
        assert_eq!(
            url.as_str(),
            "https://hq.uat.igniteaction.net/api/integration/ext/v1/supporters/search"
        );
    }

    #[test]
    fn rejects_token_with_newline() {
        let err = EngageClient::new("https://api.salsalabs.org", "abc\ndef").unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }
}
