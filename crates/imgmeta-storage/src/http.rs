//! reqwest client for the remote image service
//!
//! Contract:
//! - `POST {base}` with `{data, contentType}` answers 201 and `{id, imageUrl}`
//! - `DELETE {base}/{id}` answers 204
//!
//! Both calls carry the private access token in a configurable header.

use crate::traits::{ImageServiceError, ImageServiceResult, ImageStorage, RemoteImage};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateImageBody<'a> {
    data: &'a str,
    content_type: &'a str,
}

#[derive(Clone, Debug)]
pub struct HttpImageStorage {
    client: Client,
    base_url: String,
    token_header: String,
    access_token: String,
}

impl HttpImageStorage {
    pub fn new(
        base_url: &str,
        token_header: &str,
        access_token: &str,
        timeout: Duration,
    ) -> ImageServiceResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ImageServiceError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_header: token_header.to_string(),
            access_token: access_token.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn image_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    fn with_token(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(self.token_header.as_str(), self.access_token.as_str())
    }

    async fn expect_status(
        response: reqwest::Response,
        expected: StatusCode,
    ) -> ImageServiceResult<reqwest::Response> {
        let status = response.status();
        if status == expected {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        tracing::warn!(
            status = status.as_u16(),
            expected = expected.as_u16(),
            body = %body,
            "Image service returned unexpected status"
        );

        Err(ImageServiceError::UnexpectedStatus {
            status: status.as_u16(),
            expected: expected.as_u16(),
        })
    }
}

#[async_trait]
impl ImageStorage for HttpImageStorage {
    #[tracing::instrument(skip(self, data), fields(http.method = "POST", content_type = %content_type, payload_len = data.len()))]
    async fn create_image(
        &self,
        data: &str,
        content_type: &str,
    ) -> ImageServiceResult<RemoteImage> {
        let request = self.with_token(self.client.post(&self.base_url)).json(&CreateImageBody {
            data,
            content_type,
        });

        let response = request
            .send()
            .await
            .map_err(|e| ImageServiceError::RequestFailed(e.to_string()))?;
        let response = Self::expect_status(response, StatusCode::CREATED).await?;

        let image: RemoteImage = response
            .json()
            .await
            .map_err(|e| ImageServiceError::InvalidResponse(e.to_string()))?;

        if image.id.is_empty() {
            return Err(ImageServiceError::InvalidResponse(
                "Image service returned an empty id".to_string(),
            ));
        }

        tracing::info!(remote_id = %image.id, "Image created in image service");
        Ok(image)
    }

    #[tracing::instrument(skip(self), fields(http.method = "DELETE", remote_id = %id))]
    async fn delete_image(&self, id: &str) -> ImageServiceResult<()> {
        let request = self.with_token(self.client.delete(self.image_url(id)));

        let response = request
            .send()
            .await
            .map_err(|e| ImageServiceError::RequestFailed(e.to_string()))?;
        Self::expect_status(response, StatusCode::NO_CONTENT).await?;

        tracing::info!("Image deleted from image service");
        Ok(())
    }
}
