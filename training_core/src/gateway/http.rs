use super::CatalogGateway;
use crate::config::BackendConfig;
use crate::error::TransportError;
use crate::types::*;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Catalog gateway backed by the catalog HTTP service
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    api_base: String,
    timeout: Duration,
}

impl HttpGateway {
    /// Build a gateway for `{base_url}/api` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: format!("{}/api", base_url.trim().trim_end_matches('/')),
            timeout,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(config.require_base_url()?, config.timeout())
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn transport_error(&self, url: &str, source: reqwest::Error) -> TransportError {
        if source.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else if source.is_decode() {
            TransportError::Decode {
                url: url.to_string(),
                source,
            }
        } else {
            TransportError::Network {
                url: url.to_string(),
                source,
            }
        }
    }

    /// Send a request and decode the JSON body
    ///
    /// `not_found` names the entity to report when the service answers 404.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        not_found: Option<(&'static str, u32)>,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let response = self
            .client
            .request(method, &url)
            .send()
            .await
            .map_err(|e| {
                let err = self.transport_error(&url, e);
                tracing::warn!("{}", err);
                err
            })?;

        let status = response.status();
        tracing::debug!("{} -> {}", url, status);

        if status == StatusCode::NOT_FOUND {
            if let Some((entity, id)) = not_found {
                tracing::warn!("{} {} not found at {}", entity, id, url);
                return Err(Error::NotFound { entity, id });
            }
        }

        if !status.is_success() {
            tracing::warn!("{} returned {}", url, status);
            return Err(TransportError::Status { url, status }.into());
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| self.transport_error(&url, e))?;
        Ok(body)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None).await
    }
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    async fn list_mesocycles(&self) -> Result<Vec<Mesocycle>> {
        self.get("/mesociclos").await
    }

    async fn get_mesocycle(&self, id: MesocycleId) -> Result<Mesocycle> {
        self.request(
            Method::GET,
            &format!("/mesociclos/{}", id),
            Some(("mesocycle", id)),
        )
        .await
    }

    async fn get_mesocycle_detail(&self, id: MesocycleId) -> Result<MesocycleDetail> {
        self.request(
            Method::GET,
            &format!("/mesociclos/{}/detalle", id),
            Some(("mesocycle", id)),
        )
        .await
    }

    async fn list_sessions_of_mesocycle(&self, id: MesocycleId) -> Result<Vec<WeeklyBlock>> {
        self.get(&format!("/mesociclos/{}/sesiones", id)).await
    }

    async fn get_full_plan(&self) -> Result<FullPlan> {
        self.get("/planificacion").await
    }

    async fn get_basic_material(&self) -> Result<Vec<String>> {
        let list: MaterialList = self.get("/material-basico").await?;
        Ok(list.material)
    }

    async fn init_data(&self) -> Result<ServiceMessage> {
        self.request(Method::POST, "/init-data", None).await
    }

    async fn health(&self) -> Result<ServiceMessage> {
        self.get("/").await
    }
}
