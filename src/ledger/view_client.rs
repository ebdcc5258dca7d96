//! Ledger REST API client
//!
//! ## API Reference
//!
//! View call: `POST {api}/view`
//! ```json
//! {"function": "0xmod::payments::get_senders_streams", "type_arguments": [], "arguments": ["0xalice"]}
//! ```
//! Returns the five stream columns described in `stream_core::ingestion`.
//!
//! Events: `GET {api}/accounts/{resource}/events/{module}::ModuleEventStore/{handle}`

use super::source::{LedgerError, StreamSource};
use crate::config::LedgerConfig;
use crate::stream_core::EventStore;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFunction {
    SendersStreams,
    ReceiversStreams,
}

impl ViewFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewFunction::SendersStreams => "get_senders_streams",
            ViewFunction::ReceiversStreams => "get_receivers_streams",
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ViewRequest {
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<String>,
}

pub struct ViewClient {
    http: reqwest::Client,
    config: LedgerConfig,
}

impl ViewClient {
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    fn module_path(&self) -> String {
        format!("{}::{}", self.config.module_address, self.config.module_name)
    }

    pub fn view_request(&self, function: ViewFunction, account: &str) -> ViewRequest {
        ViewRequest {
            function: format!("{}::{}", self.module_path(), function.as_str()),
            type_arguments: Vec::new(),
            arguments: vec![account.to_string()],
        }
    }

    pub fn events_url(&self, store: EventStore) -> Result<String, LedgerError> {
        let resource = self
            .config
            .resource_account
            .as_deref()
            .ok_or(LedgerError::MissingResourceAccount)?;

        Ok(format!(
            "{}/accounts/{}/events/{}::ModuleEventStore/{}",
            self.config.api_url,
            resource,
            self.module_path(),
            store.handle()
        ))
    }

    async fn call_view(&self, function: ViewFunction, account: &str) -> Result<Value, LedgerError> {
        let url = format!("{}/view", self.config.api_url);
        let request = self.view_request(function, account);

        log::debug!("POST {} {}", url, request.function);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&request)
            .send()
            .await?;

        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, LedgerError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(LedgerError::Status(status.as_u16(), body));
    }

    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl StreamSource for ViewClient {
    async fn senders_streams(&self, account: &str) -> Result<Value, LedgerError> {
        self.call_view(ViewFunction::SendersStreams, account).await
    }

    async fn receivers_streams(&self, account: &str) -> Result<Value, LedgerError> {
        self.call_view(ViewFunction::ReceiversStreams, account).await
    }

    async fn events(&self, store: EventStore) -> Result<Vec<Value>, LedgerError> {
        let url = self.events_url(store)?;
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        match read_json(response).await? {
            Value::Array(events) => Ok(events),
            other => Err(LedgerError::UnexpectedResponse(format!("expected an event array, got {}", other))),
        }
    }

    fn source_type(&self) -> &'static str {
        "ledger-rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_config(resource_account: Option<&str>) -> LedgerConfig {
        LedgerConfig {
            api_url: "https://ledger.example/v1".to_string(),
            module_address: "0xmod".to_string(),
            module_name: "payments".to_string(),
            resource_account: resource_account.map(str::to_string),
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn test_view_request_body() {
        let client = ViewClient::new(ledger_config(None)).unwrap();
        let request = client.view_request(ViewFunction::ReceiversStreams, "0xalice");

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "function": "0xmod::payments::get_receivers_streams",
                "type_arguments": [],
                "arguments": ["0xalice"]
            })
        );
    }

    #[test]
    fn test_events_url() {
        let client = ViewClient::new(ledger_config(Some("0xres"))).unwrap();
        assert_eq!(
            client.events_url(EventStore::Claim).unwrap(),
            "https://ledger.example/v1/accounts/0xres/events/0xmod::payments::ModuleEventStore/stream_claim_events"
        );
    }

    #[test]
    fn test_events_need_resource_account() {
        let client = ViewClient::new(ledger_config(None)).unwrap();
        assert!(matches!(
            client.events_url(EventStore::Create),
            Err(LedgerError::MissingResourceAccount)
        ));
    }

    #[tokio::test]
    #[ignore] // Run only when testing with a live ledger
    async fn test_live_senders_streams() {
        let config = crate::config::Config::from_env().unwrap();
        let account = config.account_address.clone().unwrap();
        let client = ViewClient::new(config.ledger).unwrap();

        let response = client.senders_streams(&account).await.unwrap();
        assert!(response.is_array());
    }
}
