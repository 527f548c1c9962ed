use carlot_auth::Credentials;
use carlot_service::{CreateListing, ListQuery};
use carlot_types::{Listing, ListingUpdate};
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{SdkError, SdkResult};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct CreatedBody {
    id: String,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Typed client for the `/api/cars` endpoints.
///
/// Every request carries the client's credential as
/// `Authorization: Bearer <token>` when one is set.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl ApiClient {
    pub fn new(base_url: &str, credentials: Credentials) -> SdkResult<Self> {
        Self::with_client(reqwest::Client::new(), base_url, credentials)
    }

    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        credentials: Credentials,
    ) -> SdkResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SdkError::Config(format!("invalid api url {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SdkError::Config(format!("api url {base_url} cannot be a base")));
        }
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.http.request(method, self.url(segments));
        match self.credentials.to_header_value() {
            Some(value) => builder.header(reqwest::header::AUTHORIZATION, value),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> SdkResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    text
                }
            });
        tracing::debug!(status = status.as_u16(), %message, "api request failed");
        Err(SdkError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// `GET /api/cars`
    pub async fn list(&self, query: &ListQuery) -> SdkResult<Vec<Listing>> {
        let builder = self.request(Method::GET, &["api", "cars"]).query(query);
        Self::send(builder).await
    }

    /// `GET /api/cars/{id}`
    pub async fn get(&self, id: &str) -> SdkResult<Listing> {
        Self::send(self.request(Method::GET, &["api", "cars", id])).await
    }

    /// `POST /api/cars`. Returns the new listing's id.
    pub async fn create(&self, request: &CreateListing) -> SdkResult<String> {
        let builder = self.request(Method::POST, &["api", "cars"]).json(request);
        let body: CreatedBody = Self::send(builder).await?;
        Ok(body.id)
    }

    /// `PUT /api/cars/{id}`
    pub async fn update(&self, id: &str, update: &ListingUpdate) -> SdkResult<String> {
        let builder = self.request(Method::PUT, &["api", "cars", id]).json(update);
        let body: MessageBody = Self::send(builder).await?;
        Ok(body.message)
    }

    /// `DELETE /api/cars/{id}`
    pub async fn delete(&self, id: &str) -> SdkResult<String> {
        let body: MessageBody = Self::send(self.request(Method::DELETE, &["api", "cars", id])).await?;
        Ok(body.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_joined_by_segment() {
        let client = ApiClient::new("http://localhost:3000/", Credentials::Anonymous).unwrap();
        assert_eq!(client.url(&["api", "cars"]).as_str(), "http://localhost:3000/api/cars");
        assert_eq!(
            client.url(&["api", "cars", "a b/c"]).as_str(),
            "http://localhost:3000/api/cars/a%20b%2Fc"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let client = ApiClient::new("https://example.com/carlot", Credentials::Anonymous).unwrap();
        assert_eq!(
            client.url(&["api", "cars"]).as_str(),
            "https://example.com/carlot/api/cars"
        );
    }

    #[test]
    fn invalid_base_url_rejected() {
        assert!(matches!(
            ApiClient::new("not a url", Credentials::Anonymous),
            Err(SdkError::Config(_))
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com", Credentials::Anonymous),
            Err(SdkError::Config(_))
        ));
    }
}
