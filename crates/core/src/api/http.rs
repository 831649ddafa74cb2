use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::config::ClientConfig;
use crate::errors::ClientError;
use super::traits::{ApiRequest, ApiResponse, RequestBody, Transport};

/// [`Transport`] over HTTP(S) using reqwest.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: config.normalized_base_url().to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Transport for ReqwestTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = self.url_for(&request.path);
        let mut builder = self.client.request(request.method.clone(), &url);

        if let Some(token) = &request.bearer {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        builder = match &request.body {
            Some(body @ RequestBody::Json(value)) => builder
                .header(CONTENT_TYPE, body.content_type())
                .body(value.to_string()),
            Some(RequestBody::Form(fields)) => builder.form(fields),
            None => builder,
        };

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;

        Ok(ApiResponse { status, body })
    }
}
