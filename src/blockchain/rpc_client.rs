use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::blockchain::ChainReader;
use crate::error::{MonitorError, Result, TransportError, ValidationError};
use crate::logging::{LogContext, MetricsLogger, PerformanceMonitor};
use crate::models::{lower_hex, parse_address, Address, Amount, Block, Transaction};

/// Wait used when a 429 carries no usable `Retry-After` header
const DEFAULT_RATE_LIMIT_SECONDS: u64 = 1;

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Vec<Value>,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// Block as returned by `eth_getBlockByNumber` with full transactions
#[derive(Debug, Deserialize)]
struct RpcBlock {
    number: String,
    hash: Option<String>,
    transactions: Vec<RpcTransaction>,
}

#[derive(Debug, Deserialize)]
struct RpcTransaction {
    hash: String,
    from: String,
    to: Option<String>,
    value: String,
}

/// JSON-RPC client for an Ethereum-compatible node
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
    timeout_seconds: u64,
}

impl RpcClient {
    pub fn new(endpoint: String) -> Result<Self> {
        Self::new_with_config(endpoint, 30)
    }

    pub fn new_with_config(endpoint: String, timeout_seconds: u64) -> Result<Self> {
        LogContext::new("rpc_client", "initialization")
            .with_metadata("endpoint", serde_json::json!(endpoint))
            .with_metadata("timeout_seconds", serde_json::json!(timeout_seconds))
            .debug("Initializing RPC client");

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .pool_max_idle_per_host(2)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            timeout_seconds,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn make_request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let monitor = PerformanceMonitor::new(&format!("rpc_{}", method))
            .with_metadata("endpoint", serde_json::json!(self.endpoint));
        let result = self.send(method, params).await;
        let duration = monitor.finish_with_result(&result);
        MetricsLogger::log_rpc_call(method, duration, result.is_ok());
        result
    }

    async fn send(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        LogContext::new("rpc_client", "make_request")
            .with_metadata("method", serde_json::json!(method))
            .trace(&format!("Sending RPC request: {}", method));

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let seconds = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RATE_LIMIT_SECONDS);
            return Err(TransportError::RateLimit { seconds }.into());
        }
        if !status.is_success() {
            return Err(TransportError::Connection(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ))
            .into());
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let rpc_response: JsonRpcResponse =
            serde_json::from_str(&body).map_err(TransportError::Json)?;

        if let Some(error) = rpc_response.error {
            return Err(TransportError::Method {
                code: error.code,
                message: error.message,
            }
            .into());
        }

        // `null` is a valid answer, e.g. for a block that does not exist yet
        Ok(rpc_response.result.unwrap_or(Value::Null))
    }

    fn classify(&self, e: reqwest::Error) -> MonitorError {
        if e.is_timeout() {
            TransportError::Timeout {
                seconds: self.timeout_seconds,
            }
            .into()
        } else if e.is_connect() {
            TransportError::Connection(e.to_string()).into()
        } else {
            TransportError::Http(e).into()
        }
    }

    pub async fn get_block_number(&self) -> Result<u64> {
        let result = self.make_request("eth_blockNumber", vec![]).await?;
        let hex = result.as_str().ok_or_else(|| {
            TransportError::InvalidResponse("Block number is not a string".to_string())
        })?;
        parse_hex_to_u64(hex).map_err(invalid_response)
    }

    pub async fn get_block(&self, height: u64) -> Result<Block> {
        let params = vec![
            Value::String(format!("0x{:x}", height)),
            Value::Bool(true), // full transaction objects
        ];

        let result = self.make_request("eth_getBlockByNumber", params).await?;
        if result.is_null() {
            return Err(MonitorError::NotFound { height });
        }

        let raw: RpcBlock = serde_json::from_value(result).map_err(TransportError::Json)?;
        let block = convert_block(raw).map_err(invalid_response)?;

        if block.height != height {
            return Err(TransportError::InvalidResponse(format!(
                "Requested block {} but node returned {}",
                height, block.height
            ))
            .into());
        }

        LogContext::new("rpc_client", "get_block")
            .with_block_height(height)
            .with_metadata("transaction_count", serde_json::json!(block.transactions.len()))
            .trace(&format!(
                "Retrieved block {} with {} transactions",
                height,
                block.transactions.len()
            ));

        Ok(block)
    }

    pub async fn get_balance(&self, address: &Address) -> Result<Amount> {
        let params = vec![
            Value::String(lower_hex(address)),
            Value::String("latest".to_string()),
        ];

        let result = self.make_request("eth_getBalance", params).await?;
        let hex = result.as_str().ok_or_else(|| {
            TransportError::InvalidResponse("Balance is not a string".to_string())
        })?;
        Amount::from_hex(hex).map_err(invalid_response)
    }
}

#[async_trait]
impl ChainReader for RpcClient {
    async fn current_height(&self) -> Result<u64> {
        self.get_block_number().await
    }

    async fn block_at(&self, height: u64) -> Result<Block> {
        self.get_block(height).await
    }

    async fn balance_of(&self, address: &Address) -> Result<Amount> {
        self.get_balance(address).await
    }
}

fn invalid_response(err: ValidationError) -> MonitorError {
    TransportError::InvalidResponse(err.to_string()).into()
}

fn convert_block(raw: RpcBlock) -> std::result::Result<Block, ValidationError> {
    let height = parse_hex_to_u64(&raw.number)?;

    let transactions = raw
        .transactions
        .into_iter()
        .map(convert_transaction)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Block {
        height,
        hash: raw.hash.unwrap_or_default(),
        transactions,
    })
}

fn convert_transaction(raw: RpcTransaction) -> std::result::Result<Transaction, ValidationError> {
    let to = match raw.to.as_deref() {
        None | Some("") => None,
        Some(to) => Some(parse_address(to)?),
    };

    Ok(Transaction {
        from: parse_address(&raw.from)?,
        to,
        value: Amount::from_hex(&raw.value)?,
        hash: raw.hash,
    })
}

fn parse_hex_to_u64(hex_str: &str) -> std::result::Result<u64, ValidationError> {
    let hex_without_prefix = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    u64::from_str_radix(hex_without_prefix, 16)
        .map_err(|e| ValidationError::InvalidBlockNumber(format!("{}: {}", hex_str, e)))
}
