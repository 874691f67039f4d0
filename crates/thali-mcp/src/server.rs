//! MCP server implementation

use crate::protocol::*;
use crate::tools::{self, SharedDatabase};
use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::{Arc, Mutex};
use thali_core::{Database, Retriever};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "thali-food";

pub struct McpServer {
    retriever: Retriever,
    db: SharedDatabase,
}

impl McpServer {
    pub fn new(retriever: Retriever, db: SharedDatabase) -> Self {
        Self { retriever, db }
    }

    /// Serve over stdio until stdin closes
    pub async fn run(&self) -> Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = BufWriter::new(tokio::io::stdout());
        self.serve(reader, writer).await
    }

    /// Line-delimited JSON-RPC loop over any reader/writer pair.
    ///
    /// Requests are handled concurrently: a slow index or store call does
    /// not hold up lines read after it, and responses are written as they
    /// complete. Pending requests are drained once input closes.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut in_flight = FuturesUnordered::new();
        let mut input_open = true;

        loop {
            tokio::select! {
                biased;

                Some(response) = in_flight.next(), if !in_flight.is_empty() => {
                    if let Some(response) = response {
                        self.write_response(&mut writer, &response).await?;
                    }
                }

                line = lines.next_line(), if input_open => {
                    let Some(line) = line? else {
                        input_open = false;
                        continue;
                    };

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                        Ok(request) => {
                            in_flight.push(async move { self.handle_request(&request).await });
                        }
                        Err(e) => {
                            tracing::debug!("Unparseable request: {}", e);
                            let response = JsonRpcResponse::error(
                                None,
                                PARSE_ERROR,
                                &format!("Parse error: {}", e),
                            );
                            self.write_response(&mut writer, &response).await?;
                        }
                    }
                }

                else => break,
            }
        }

        tracing::debug!("Input closed, stopping MCP server");
        Ok(())
    }

    async fn write_response<W: AsyncWrite + Unpin>(
        &self,
        writer: &mut W,
        response: &JsonRpcResponse,
    ) -> Result<()> {
        let json = serde_json::to_string(response)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    /// Dispatch a request. Notifications never get a response.
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!("Notification '{}'", request.method);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            "ping" => JsonRpcResponse::success(request.id.clone(), serde_json::json!({})),
            _ => JsonRpcResponse::error(
                request.id.clone(),
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let result = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        });
        JsonRpcResponse::success(request.id.clone(), result)
    }

    fn handle_tools_list(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let tools = tools::tool_definitions();
        JsonRpcResponse::success(request.id.clone(), serde_json::json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let name = request
            .params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("");

        let arguments = request
            .params
            .get("arguments")
            .cloned()
            .unwrap_or(serde_json::json!({}));

        tracing::debug!("tools/call '{}'", name);
        let result = tools::call_tool(&self.retriever, &self.db, name, arguments).await;

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
            Err(e) => JsonRpcResponse::error(
                request.id.clone(),
                INTERNAL_ERROR,
                &format!("Failed to encode tool result: {}", e),
            ),
        }
    }
}

pub async fn start_server(retriever: Retriever, db: Database) -> Result<()> {
    let server = McpServer::new(retriever, Arc::new(Mutex::new(db)));
    server.run().await
}
