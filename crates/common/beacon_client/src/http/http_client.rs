use std::time::Duration;

use anyhow::anyhow;
use reqwest::{
    Client, Request, RequestBuilder, Response, StatusCode, Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderValue},
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::BeaconError;

pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ClientWithBaseUrl {
    client: Client,
    base_url: Url,
}

impl ClientWithBaseUrl {
    pub fn new(url: Url, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| anyhow!("Failed to build HTTP client {err:?}"))?;

        Ok(Self {
            client,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn get(&self, path: &str) -> anyhow::Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        Ok(self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE)))
    }

    pub fn post(&self, path: &str) -> anyhow::Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        Ok(self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .header(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE)))
    }

    pub async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        self.client.execute(request).await
    }

    /// Sends the request and fails on any non-success status.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, BeaconError> {
        ensure_success(self.execute(request.build()?).await?).await
    }

    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, BeaconError> {
        Ok(self.send(request).await?.json().await?)
    }

    /// Like [ClientWithBaseUrl::send_json], but a 404 yields `None`.
    pub async fn send_optional_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, BeaconError> {
        optional_json(self.execute(request.build()?).await?).await
    }
}

async fn ensure_success(response: Response) -> Result<Response, BeaconError> {
    if !response.status().is_success() {
        return Err(request_failed(response).await);
    }
    Ok(response)
}

async fn optional_json<T: DeserializeOwned>(response: Response) -> Result<Option<T>, BeaconError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    Ok(Some(ensure_success(response).await?.json().await?))
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

async fn request_failed(response: Response) -> BeaconError {
    let status_code = response.status();
    match response.text().await {
        Ok(body) if !body.is_empty() => BeaconError::RequestFailedWithMessage {
            status_code,
            message: serde_json::from_str::<ErrorBody>(&body)
                .map(|error| error.message)
                .unwrap_or(body),
        },
        _ => BeaconError::RequestFailed { status_code },
    }
}
