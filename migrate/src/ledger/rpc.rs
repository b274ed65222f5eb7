use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::bail;
use crate::error::{ErrorKind, MigrateResult};
use crate::ledger::LedgerClient;
use crate::types::{Confirmation, RecordIdentifier, RecordKind, RemoteRecord, UpdateRequest};

const JSON_RPC_VERSION: &str = "2.0";

const LIST_RECORDS_METHOD: &str = "listRecords";
const FETCH_RECORD_METHOD: &str = "fetchRecord";
const APPLY_UPDATE_METHOD: &str = "applyUpdate";

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: P,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Serialize)]
struct ListRecordsParams {
    kind: RecordKind,
}

#[derive(Debug, Serialize)]
struct FetchRecordParams<'a> {
    id: &'a RecordIdentifier,
}

#[derive(Debug, Serialize)]
struct ApplyUpdateParams<'a> {
    request: &'a UpdateRequest,
}

/// JSON-RPC 2.0 client for the ledger gateway.
///
/// Each call is a single HTTP POST bounded by the configured request timeout.
/// Transport failures surface as [`ErrorKind::LedgerRequestFailed`], errors returned
/// by the gateway itself as [`ErrorKind::LedgerRejected`].
#[derive(Clone)]
pub struct RpcLedgerClient {
    client: Client,
    endpoint: String,
    auth_token: Option<SecretString>,
    next_request_id: Arc<AtomicU64>,
}

impl fmt::Debug for RpcLedgerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcLedgerClient")
            .field("endpoint", &self.endpoint)
            .field("authenticated", &self.auth_token.is_some())
            .finish()
    }
}

impl RpcLedgerClient {
    pub fn new(
        endpoint: String,
        auth_token: Option<SecretString>,
        request_timeout: Duration,
    ) -> MigrateResult<RpcLedgerClient> {
        let client = Client::builder().timeout(request_timeout).build()?;

        Ok(RpcLedgerClient {
            client,
            endpoint,
            auth_token,
            next_request_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<P, T>(&self, method: &str, params: P) -> MigrateResult<T>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: JSON_RPC_VERSION,
            id,
            method,
            params,
        };

        debug!(method, id, "sending ledger request");

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                ErrorKind::LedgerRequestFailed,
                "Ledger gateway returned an error status",
                format!("{method} -> {status}: {body}")
            );
        }

        let response: RpcResponse = response.json().await?;
        if let Some(error) = response.error {
            bail!(
                ErrorKind::LedgerRejected,
                "Ledger rejected the request",
                format!("{method} -> code {}: {}", error.code, error.message)
            );
        }

        Ok(serde_json::from_value(response.result)?)
    }
}

impl LedgerClient for RpcLedgerClient {
    async fn list_records(&self, kind: RecordKind) -> MigrateResult<Vec<RemoteRecord>> {
        self.call(LIST_RECORDS_METHOD, ListRecordsParams { kind })
            .await
    }

    async fn fetch_record(&self, id: &RecordIdentifier) -> MigrateResult<Option<RemoteRecord>> {
        self.call(FETCH_RECORD_METHOD, FetchRecordParams { id })
            .await
    }

    async fn apply_update(&self, request: &UpdateRequest) -> MigrateResult<Confirmation> {
        self.call(APPLY_UPDATE_METHOD, ApplyUpdateParams { request })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UpdateParams;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_gateway(status: u16, body: &'static str) -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(status).set_body_raw(body, "application/json"),
            )
            .named("ledger gateway")
            .expect(1)
            .mount(&server)
            .await;

        server
    }

    async fn received_body(server: &MockServer) -> serde_json::Value {
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);

        requests[0].body_json().unwrap()
    }

    fn client(endpoint: String, token: Option<&str>) -> RpcLedgerClient {
        RpcLedgerClient::new(
            endpoint,
            token.map(|token| SecretString::from(token.to_string())),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn list_records_sends_kind_and_decodes_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer token-123"))
            .and(body_partial_json(serde_json::json!({
                "jsonrpc": "2.0",
                "method": "listRecords",
                "params": { "kind": "pool_state" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"jsonrpc":"2.0","id":1,"result":[{"id":"pool-1","kind":"pool_state","vault_a":"va","vault_b":"vb","data":{}}]}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;
        let client = client(server.uri(), Some("token-123"));

        let records = client.list_records(RecordKind::PoolState).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_str(), "pool-1");
        assert_eq!(records[0].vault_a.as_ref().unwrap().as_str(), "va");
    }

    #[tokio::test]
    async fn fetch_record_maps_null_result_to_none() {
        let server = mock_gateway(200, r#"{"jsonrpc":"2.0","id":1,"result":null}"#).await;
        let client = client(server.uri(), None);

        let record = client.fetch_record(&"missing".into()).await.unwrap();

        assert!(record.is_none());
        let body = received_body(&server).await;
        assert_eq!(body["method"], "fetchRecord");
        assert_eq!(body["params"]["id"], "missing");
    }

    #[tokio::test]
    async fn apply_update_surfaces_rpc_error_as_rejection() {
        let server = mock_gateway(
            200,
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32002,"message":"custom program error: 0x1771"}}"#,
        )
        .await;
        let client = client(server.uri(), None);
        let request = UpdateRequest {
            record: "pool-1".into(),
            vault_a: "va".into(),
            vault_b: "vb".into(),
            authority: "authority".to_string(),
            params: UpdateParams::new(10, 10),
        };

        let err = client.apply_update(&request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::LedgerRejected);
        assert!(err.detail().unwrap().contains("0x1771"));

        let requests = server.received_requests().await.unwrap();
        assert!(!requests[0].headers.contains_key("authorization"));
        let body = received_body(&server).await;
        assert_eq!(body["method"], "applyUpdate");
        assert_eq!(body["params"]["request"]["record"], "pool-1");
        assert_eq!(body["params"]["request"]["params"]["param"], 10);
    }

    #[tokio::test]
    async fn error_status_is_a_request_failure() {
        let server = mock_gateway(503, r#"{"message":"overloaded"}"#).await;
        let client = client(server.uri(), None);

        let err = client.list_records(RecordKind::PoolState).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::LedgerRequestFailed);
        assert!(err.detail().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn unreachable_gateway_is_a_request_failure() {
        // Nothing listens on the tcpmux port on loopback.
        let client = client("http://127.0.0.1:1".to_string(), None);

        let err = client.list_records(RecordKind::PoolState).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::LedgerRequestFailed);
    }
}
