use serde::Deserialize;
use serde_json::{json, Value};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::aggregate::Aggregator;
use crate::error::PlatformError;
use crate::model::{RequireWords, SearchParams, SourceId};
use crate::{toon, PlatformRegistry};
use rmcp::model::*;

#[derive(Debug, Deserialize)]
struct ComparePricesArgs {
    query: String,
    #[serde(default = "default_result_cap")]
    top_n: usize,
    #[serde(default)]
    min_price: u64,
    #[serde(default)]
    max_price: u64,
    #[serde(default)]
    require_words: Option<Vec<Vec<String>>>,
    #[serde(default)]
    include_auction: bool,
}

#[derive(Debug, Deserialize)]
struct SearchPlatformArgs {
    query: String,
    platform: String,
    #[serde(default = "default_result_cap")]
    max_results: usize,
    #[serde(default)]
    min_price: u64,
    #[serde(default)]
    max_price: u64,
    #[serde(default)]
    require_words: Option<Vec<Vec<String>>>,
    #[serde(default)]
    include_auction: bool,
}

fn default_result_cap() -> usize {
    20
}

/// MCP server exposing the aggregation engine as two tools.
pub struct McpServer {
    registry: Arc<PlatformRegistry>,
}

impl McpServer {
    pub fn new(registry: Arc<PlatformRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle_initialize(
        &self,
        _request: InitializeRequestParam,
    ) -> Result<InitializeResult, PlatformError> {
        info!("MCP server initializing");

        Ok(InitializeResult {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "pricecompare".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Price comparison across Taiwan e-commerce platforms. Use compare_prices to rank \
                 the cheapest matching products across every platform, or search_platform for one \
                 platform at a time."
                    .to_string(),
            ),
        })
    }

    pub async fn handle_list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
    ) -> Result<ListToolsResult, PlatformError> {
        let platforms = self.registry.list_platforms();
        let platform_names: Vec<&str> = platforms.iter().map(|p| p.id.as_str()).collect();
        let platform_help = platforms
            .iter()
            .map(|p| format!("{}: {}", p.id, p.description))
            .collect::<Vec<_>>()
            .join("; ");

        let query_props = json!({
            "query": {
                "type": "string",
                "description": "Complete product description (brand + type + specs), e.g. \"SONY 50吋電視\". Too-broad queries return accessories."
            },
            "min_price": {
                "type": "integer",
                "description": "Min price filter, 0=off (default: 0)"
            },
            "max_price": {
                "type": "integer",
                "description": "Max price filter, 0=off (default: 0)"
            },
            "require_words": {
                "type": "array",
                "items": {"type": "array", "items": {"type": "string"}},
                "description": "Require results to contain specific words. AND between groups, OR within group. Example: [[\"SONY\",\"索尼\"],[\"50\"]]"
            },
            "include_auction": {
                "type": "boolean",
                "description": "Include open auction bids (default: false)"
            }
        });

        let mut compare_schema = query_props.as_object().expect("Schema object").clone();
        compare_schema.insert(
            "top_n".to_string(),
            json!({"type": "integer", "description": "Results count (default: 20)"}),
        );

        let mut platform_schema = query_props.as_object().expect("Schema object").clone();
        platform_schema.insert(
            "platform".to_string(),
            json!({"type": "string", "enum": platform_names, "description": platform_help}),
        );
        platform_schema.insert(
            "max_results".to_string(),
            json!({"type": "integer", "description": "Results count (default: 20)"}),
        );

        let tools = vec![
            Tool {
                name: Cow::Borrowed("compare_prices"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Search cheapest products across all registered platforms, ranked ascending by price. Returns TOON: name, price, url, source.",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": compare_schema,
                        "required": ["query"]
                    })
                    .as_object()
                    .expect("Schema object")
                    .clone(),
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("search_platform"),
                title: None,
                description: Some(Cow::Borrowed(
                    "Search a single platform only. Useful for comparing one platform against another with the same query.",
                )),
                input_schema: Arc::new(
                    json!({
                        "type": "object",
                        "properties": platform_schema,
                        "required": ["query", "platform"]
                    })
                    .as_object()
                    .expect("Schema object")
                    .clone(),
                ),
                output_schema: None,
                annotations: None,
                icons: None,
            },
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    pub async fn handle_call_tool(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, PlatformError> {
        match request.name.as_ref() {
            "compare_prices" => {
                let args: ComparePricesArgs = parse_args(request.arguments)?;
                let params = SearchParams {
                    query: args.query,
                    max_results: args.top_n,
                    min_price: args.min_price,
                    max_price: args.max_price,
                    require_words: RequireWords::from(args.require_words.unwrap_or_default()),
                    include_bids: args.include_auction,
                };

                let outcome = Aggregator::new(&self.registry)
                    .compare_across_sources(&params)
                    .await;
                if outcome.all_failed() {
                    warn!(query = %outcome.query, "every platform failed");
                }

                let summary = json!({
                    "query": outcome.query,
                    "count": outcome.listings.len(),
                    "completed": outcome.completed,
                    "failures": outcome.failures,
                    "all_sources_failed": outcome.all_failed(),
                    "duration_ms": outcome.duration_ms,
                });

                Ok(CallToolResult {
                    content: vec![Content::text(toon::encode_listings(&outcome.listings))],
                    structured_content: Some(summary),
                    is_error: Some(false),
                    meta: None,
                })
            }
            "search_platform" => {
                let args: SearchPlatformArgs = parse_args(request.arguments)?;
                let source: SourceId = args.platform.parse()?;
                let params = SearchParams {
                    query: args.query,
                    max_results: args.max_results,
                    min_price: args.min_price,
                    max_price: args.max_price,
                    require_words: RequireWords::from(args.require_words.unwrap_or_default()),
                    include_bids: args.include_auction,
                };

                let listings = Aggregator::new(&self.registry)
                    .search_one_source(source, &params)
                    .await?;

                let summary = json!({
                    "query": params.query,
                    "platform": source,
                    "count": listings.len(),
                });

                Ok(CallToolResult {
                    content: vec![Content::text(toon::encode_listings(&listings))],
                    structured_content: Some(summary),
                    is_error: Some(false),
                    meta: None,
                })
            }
            _ => Err(PlatformError::ToolNotFound),
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, PlatformError> {
    serde_json::from_value(Value::Object(arguments.unwrap_or_default()))
        .map_err(|e| PlatformError::InvalidParams(e.to_string()))
}

/// JSON-RPC message handler for the MCP server
pub struct JsonRpcHandler {
    server: McpServer,
}

impl JsonRpcHandler {
    pub fn new(server: McpServer) -> Self {
        Self { server }
    }

    /// Process a JSON-RPC request and return a response
    pub async fn handle_request(&self, request: Value) -> Value {
        debug!("Handling JSON-RPC request: {:?}", request);

        let id = request.get("id").cloned();
        let method = request.get("method").and_then(|m| m.as_str()).unwrap_or("");
        let params = request.get("params").cloned().unwrap_or(json!({}));

        let result = match method {
            "initialize" => match serde_json::from_value::<InitializeRequestParam>(params) {
                Ok(req) => self
                    .server
                    .handle_initialize(req)
                    .await
                    .and_then(|r| serde_json::to_value(r).map_err(PlatformError::SerdeJson))
                    .map_err(|e| e.to_jsonrpc_error()),
                Err(e) => Err(PlatformError::SerdeJson(e).to_jsonrpc_error()),
            },
            "tools/list" => match serde_json::from_value::<Option<PaginatedRequestParam>>(params) {
                Ok(req) => self
                    .server
                    .handle_list_tools(req)
                    .await
                    .and_then(|r| serde_json::to_value(r).map_err(PlatformError::SerdeJson))
                    .map_err(|e| e.to_jsonrpc_error()),
                Err(e) => Err(PlatformError::SerdeJson(e).to_jsonrpc_error()),
            },
            "tools/call" => match serde_json::from_value::<CallToolRequestParam>(params) {
                Ok(req) => self
                    .server
                    .handle_call_tool(req)
                    .await
                    .and_then(|r| serde_json::to_value(r).map_err(PlatformError::SerdeJson))
                    .map_err(|e| e.to_jsonrpc_error()),
                Err(e) => Err(PlatformError::SerdeJson(e).to_jsonrpc_error()),
            },
            _ => Err(PlatformError::MethodNotFound.to_jsonrpc_error()),
        };

        match result {
            Ok(result) => json!({
                "jsonrpc": "2.0",
                "result": result,
                "id": id,
            }),
            Err(error) => json!({
                "jsonrpc": "2.0",
                "error": error,
                "id": id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Listing;
    use crate::Platform;
    use async_trait::async_trait;

    struct StubPlatform {
        id: SourceId,
        listings: Vec<Listing>,
    }

    #[async_trait]
    impl Platform for StubPlatform {
        fn id(&self) -> SourceId {
            self.id
        }
        fn description(&self) -> &'static str {
            "stub"
        }
        async fn search(&self, _params: &SearchParams) -> Result<Vec<Listing>, PlatformError> {
            Ok(self.listings.clone())
        }
    }

    fn server() -> McpServer {
        let mut registry = PlatformRegistry::new();
        registry.register(Arc::new(StubPlatform {
            id: SourceId::Pchome,
            listings: vec![
                Listing::new(SourceId::Pchome, "SONY 50吋電視", 15000, "https://p/1"),
                Listing::new(SourceId::Pchome, "SONY 55吋電視", 21000, "https://p/2"),
            ],
        }));
        McpServer::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn lists_both_tools() {
        let tools = server().handle_list_tools(None).await.unwrap();
        let names: Vec<&str> = tools.tools.iter().map(|t| t.name.as_ref()).collect();
        assert_eq!(names, vec!["compare_prices", "search_platform"]);
    }

    #[tokio::test]
    async fn platform_enum_reflects_registry() {
        let tools = server().handle_list_tools(None).await.unwrap();
        let schema = &tools.tools[1].input_schema;
        let platform = &schema["properties"]["platform"];

        assert_eq!(platform["enum"], json!(["pchome"]));
        assert_eq!(platform["description"], "pchome: stub");
    }

    #[tokio::test]
    async fn compare_prices_returns_toon_and_summary() {
        let request = CallToolRequestParam {
            name: "compare_prices".into(),
            arguments: json!({"query": "SONY", "max_price": 16000})
                .as_object()
                .cloned(),
        };

        let result = server().handle_call_tool(request).await.unwrap();
        let summary = result.structured_content.unwrap();
        assert_eq!(summary["count"], 1);
        assert_eq!(summary["all_sources_failed"], false);
        assert_eq!(summary["completed"][0], "pchome");
    }

    #[tokio::test]
    async fn search_platform_rejects_unknown_name() {
        let request = CallToolRequestParam {
            name: "search_platform".into(),
            arguments: json!({"query": "SONY", "platform": "amazon"})
                .as_object()
                .cloned(),
        };

        let err = server().handle_call_tool(request).await.unwrap_err();
        assert!(matches!(err, PlatformError::UnknownSource(name) if name == "amazon"));
    }

    #[tokio::test]
    async fn missing_required_arg_is_invalid_params() {
        let request = CallToolRequestParam {
            name: "compare_prices".into(),
            arguments: json!({"top_n": 5}).as_object().cloned(),
        };
        let err = server().handle_call_tool(request).await.unwrap_err();
        assert!(matches!(err, PlatformError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn jsonrpc_handler_maps_unknown_method() {
        let handler = JsonRpcHandler::new(server());
        let response = handler
            .handle_request(json!({"jsonrpc": "2.0", "id": 7, "method": "prompts/list"}))
            .await;
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["id"], 7);
    }

    #[tokio::test]
    async fn jsonrpc_handler_round_trips_tools_call() {
        let handler = JsonRpcHandler::new(server());
        let response = handler
            .handle_request(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "compare_prices", "arguments": {"query": "SONY"}}
            }))
            .await;
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["structuredContent"]["count"], 2);
    }
}
