//! MCP Server implementation with Google Analytics Data API tools.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, ErrorCode, ErrorData as McpError, Implementation,
        ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    schemars::{self, JsonSchema},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::types::{dimensions_from, metrics_from, DateRange, MAX_ROW_LIMIT};
use crate::api::{Metadata, ReportingApi, RunRealtimeReportRequest, RunReportRequest};
use crate::debug::DebugLogger;
use crate::error::ApiError;
use crate::hints;
use crate::property::{self, PropertyName, PropertyRef};

/// Google Analytics MCP Server.
#[derive(Clone)]
pub struct AnalyticsServer {
    api: Arc<dyn ReportingApi>,
    debug: Arc<DebugLogger>,
    tool_router: ToolRouter<Self>,
}

impl AnalyticsServer {
    pub fn new(api: Arc<dyn ReportingApi>, debug: Arc<DebugLogger>) -> Self {
        Self {
            api,
            debug,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert any error to McpError
fn to_mcp_error<E: std::fmt::Display>(e: E) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

fn invalid_params<E: std::fmt::Display>(e: E) -> McpError {
    McpError {
        code: ErrorCode::INVALID_PARAMS,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

/// Argument problems are the caller's fault; everything else is ours or the API's.
fn api_error_to_mcp(e: ApiError) -> McpError {
    match e {
        e @ ApiError::InvalidArgument(_) => invalid_params(e),
        other => to_mcp_error(other),
    }
}

fn resolve_property(input: Option<&PropertyRef>) -> Result<PropertyName, McpError> {
    property::normalize(input).map_err(invalid_params)
}

fn json_result(value: &Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Null, `{}` and `[]` count as not supplied.
fn non_empty(value: Option<Value>) -> Option<Value> {
    value.filter(|v| match v {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    })
}

fn non_empty_list(values: Option<Vec<Value>>) -> Option<Vec<Value>> {
    values.filter(|v| !v.is_empty())
}

/// Zero means "not set"; otherwise the API accepts 1..=250,000.
fn row_limit(limit: Option<i64>) -> Result<Option<i64>, ApiError> {
    match limit {
        None | Some(0) => Ok(None),
        Some(n) if (1..=MAX_ROW_LIMIT).contains(&n) => Ok(Some(n)),
        Some(n) => Err(ApiError::InvalidArgument(format!(
            "limit must be between 1 and {}, got {}",
            MAX_ROW_LIMIT, n
        ))),
    }
}

fn row_offset(offset: Option<i64>) -> Result<Option<i64>, ApiError> {
    match offset {
        None | Some(0) => Ok(None),
        Some(n) if n > 0 => Ok(Some(n)),
        Some(n) => Err(ApiError::InvalidArgument(format!(
            "offset must not be negative, got {}",
            n
        ))),
    }
}

// ============================================================================
// Tool Parameter Structs
// ============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PropertyParams {
    /// Google Analytics property ID: a number, a numeric string, or "properties/<number>"
    #[serde(default)]
    pub property_id: Option<PropertyRef>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RunReportParams {
    /// Google Analytics property ID: a number, a numeric string, or "properties/<number>"
    #[serde(default)]
    pub property_id: Option<PropertyRef>,
    /// Date ranges to include in the report. See run_report_date_ranges_hints.
    pub date_ranges: Vec<DateRange>,
    /// Dimension names to include in the report
    pub dimensions: Vec<String>,
    /// Metric names to include in the report
    pub metrics: Vec<String>,
    /// Data API FilterExpression applied to dimensions. See run_report_dimension_filter_hints.
    pub dimension_filter: Option<Value>,
    /// Data API FilterExpression applied to metrics. See run_report_metric_filter_hints.
    pub metric_filter: Option<Value>,
    /// Data API OrderBy objects. See run_report_order_bys_hints.
    pub order_bys: Option<Vec<Value>>,
    /// Maximum rows per response (1 to 250,000)
    pub limit: Option<i64>,
    /// Row count of the start row; the first row is row 0
    pub offset: Option<i64>,
    /// ISO 4217 currency code such as "USD"; defaults to the property's currency
    pub currency_code: Option<String>,
    /// Whether to include property quota in the response
    #[serde(default)]
    pub return_property_quota: bool,
}

impl RunReportParams {
    fn to_request(&self) -> Result<RunReportRequest, ApiError> {
        Ok(RunReportRequest {
            dimensions: dimensions_from(self.dimensions.clone()),
            metrics: metrics_from(self.metrics.clone()),
            date_ranges: self.date_ranges.clone(),
            dimension_filter: non_empty(self.dimension_filter.clone()),
            metric_filter: non_empty(self.metric_filter.clone()),
            order_bys: non_empty_list(self.order_bys.clone()),
            limit: row_limit(self.limit)?,
            offset: row_offset(self.offset)?,
            currency_code: self
                .currency_code
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            return_property_quota: self.return_property_quota,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RunRealtimeReportParams {
    /// Google Analytics property ID: a number, a numeric string, or "properties/<number>"
    #[serde(default)]
    pub property_id: Option<PropertyRef>,
    /// Realtime dimension names to include in the report
    pub dimensions: Vec<String>,
    /// Realtime metric names to include in the report
    pub metrics: Vec<String>,
    /// Data API FilterExpression applied to dimensions
    pub dimension_filter: Option<Value>,
    /// Data API FilterExpression applied to metrics
    pub metric_filter: Option<Value>,
    /// Data API OrderBy objects
    pub order_bys: Option<Vec<Value>>,
    /// Maximum rows per response (1 to 250,000)
    pub limit: Option<i64>,
    /// Whether to include realtime property quota in the response
    #[serde(default)]
    pub return_property_quota: bool,
}

impl RunRealtimeReportParams {
    fn to_request(&self) -> Result<RunRealtimeReportRequest, ApiError> {
        Ok(RunRealtimeReportRequest {
            dimensions: dimensions_from(self.dimensions.clone()),
            metrics: metrics_from(self.metrics.clone()),
            dimension_filter: non_empty(self.dimension_filter.clone()),
            metric_filter: non_empty(self.metric_filter.clone()),
            order_bys: non_empty_list(self.order_bys.clone()),
            limit: row_limit(self.limit)?,
            return_property_quota: self.return_property_quota,
        })
    }
}

// ============================================================================
// Tool Bodies
// ============================================================================

impl AnalyticsServer {
    async fn property_metadata(
        &self,
        tool_name: &str,
        params: &PropertyParams,
        keep: fn(Metadata) -> Metadata,
    ) -> Result<Value, McpError> {
        self.debug.log_tool_call(tool_name, &json!(params));

        let property = resolve_property(params.property_id.as_ref()).inspect_err(|e| {
            self.debug.log_error(tool_name, &e.message);
        })?;
        tracing::debug!(property_id = property.id(), tool = tool_name, "Fetching metadata");

        let metadata = self.api.get_metadata(&property).await.map_err(|e| {
            self.debug.log_error(tool_name, &e.to_string());
            api_error_to_mcp(e)
        })?;

        let json = serde_json::to_value(keep(metadata)).map_err(to_mcp_error)?;
        self.debug.log_tool_result(tool_name, &json);
        Ok(json)
    }

    async fn report(&self, params: &RunReportParams) -> Result<Value, McpError> {
        self.debug.log_tool_call("run_report", &json!(params));

        let property = resolve_property(params.property_id.as_ref()).inspect_err(|e| {
            self.debug.log_error("run_report", &e.message);
        })?;
        let request = params.to_request().map_err(|e| {
            self.debug.log_error("run_report", &e.to_string());
            api_error_to_mcp(e)
        })?;

        let result = self
            .api
            .run_report(&property, &request)
            .await
            .map_err(|e| {
                self.debug.log_error("run_report", &e.to_string());
                api_error_to_mcp(e)
            })?;

        self.debug.log_tool_result("run_report", &result);
        Ok(result)
    }

    async fn realtime_report(&self, params: &RunRealtimeReportParams) -> Result<Value, McpError> {
        self.debug.log_tool_call("run_realtime_report", &json!(params));

        let property = resolve_property(params.property_id.as_ref()).inspect_err(|e| {
            self.debug.log_error("run_realtime_report", &e.message);
        })?;
        let request = params.to_request().map_err(|e| {
            self.debug.log_error("run_realtime_report", &e.to_string());
            api_error_to_mcp(e)
        })?;

        let result = self
            .api
            .run_realtime_report(&property, &request)
            .await
            .map_err(|e| {
                self.debug.log_error("run_realtime_report", &e.to_string());
                api_error_to_mcp(e)
            })?;

        self.debug.log_tool_result("run_realtime_report", &result);
        Ok(result)
    }

    fn hint(&self, tool_name: &str, text: String) -> CallToolResult {
        self.debug.log_tool_call(tool_name, &json!({}));
        CallToolResult::success(vec![Content::text(text)])
    }
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl AnalyticsServer {
    // ========================================================================
    // Metadata Tools
    // ========================================================================

    #[tool(description = "Retrieves the core reporting dimensions for a property, including its custom dimensions. Custom dimensions have customDefinition: true.")]
    async fn get_dimensions(&self, Parameters(params): Parameters<PropertyParams>) -> Result<CallToolResult, McpError> {
        let json = self
            .property_metadata("get_dimensions", &params, Metadata::dimensions_only)
            .await?;
        json_result(&json)
    }

    #[tool(description = "Retrieves the core reporting metrics for a property, including its custom metrics. Custom metrics have customDefinition: true.")]
    async fn get_metrics(&self, Parameters(params): Parameters<PropertyParams>) -> Result<CallToolResult, McpError> {
        let json = self
            .property_metadata("get_metrics", &params, Metadata::metrics_only)
            .await?;
        json_result(&json)
    }

    #[tool(description = "Retrieves the list of standard dimensions available to every property.")]
    async fn get_standard_dimensions(&self) -> Result<CallToolResult, McpError> {
        Ok(self.hint("get_standard_dimensions", hints::standard_dimensions()))
    }

    #[tool(description = "Retrieves the list of standard metrics available to every property.")]
    async fn get_standard_metrics(&self) -> Result<CallToolResult, McpError> {
        Ok(self.hint("get_standard_metrics", hints::standard_metrics()))
    }

    // ========================================================================
    // Hint Tools
    // ========================================================================

    #[tool(description = "Provides hints about the expected values for the date_ranges argument for the run_report tool.")]
    async fn run_report_date_ranges_hints(&self) -> Result<CallToolResult, McpError> {
        let text = hints::date_ranges().map_err(to_mcp_error)?;
        Ok(self.hint("run_report_date_ranges_hints", text))
    }

    #[tool(description = "Provides hints about the expected values for the metric_filter argument for the run_report and run_realtime_report tools.")]
    async fn run_report_metric_filter_hints(&self) -> Result<CallToolResult, McpError> {
        let text = hints::metric_filters().map_err(to_mcp_error)?;
        Ok(self.hint("run_report_metric_filter_hints", text))
    }

    #[tool(description = "Provides hints about the expected values for the dimension_filter argument for the run_report and run_realtime_report tools.")]
    async fn run_report_dimension_filter_hints(&self) -> Result<CallToolResult, McpError> {
        let text = hints::dimension_filters().map_err(to_mcp_error)?;
        Ok(self.hint("run_report_dimension_filter_hints", text))
    }

    #[tool(description = "Provides hints about the expected values for the order_bys argument for the run_report and run_realtime_report tools.")]
    async fn run_report_order_bys_hints(&self) -> Result<CallToolResult, McpError> {
        let text = hints::order_bys().map_err(to_mcp_error)?;
        Ok(self.hint("run_report_order_bys_hints", text))
    }

    // ========================================================================
    // Report Tools
    // ========================================================================

    #[tool(description = "Runs a Google Analytics Data API report. Field names inside filters and order_bys use snake_case protobuf names. Required: property_id, date_ranges, dimensions, metrics. Use limit and offset to paginate.")]
    async fn run_report(&self, Parameters(params): Parameters<RunReportParams>) -> Result<CallToolResult, McpError> {
        let json = self.report(&params).await?;
        json_result(&json)
    }

    #[tool(description = "Runs a Google Analytics Data API realtime report covering roughly the last 30 minutes. Required: property_id, dimensions, metrics.")]
    async fn run_realtime_report(&self, Parameters(params): Parameters<RunRealtimeReportParams>) -> Result<CallToolResult, McpError> {
        let json = self.realtime_report(&params).await?;
        json_result(&json)
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl ServerHandler for AnalyticsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Google Analytics MCP Server - Read property metadata and run core and \
                realtime reports through the Google Analytics Data API. Use the *_hints \
                tools to learn the expected shapes of date ranges, filters and order bys."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{DimensionMetadata, MetricMetadata};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records what the tools send and answers with canned data.
    #[derive(Default)]
    struct FakeApi {
        properties: Mutex<Vec<String>>,
        reports: Mutex<Vec<Value>>,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl ReportingApi for FakeApi {
        async fn get_metadata(&self, property: &PropertyName) -> Result<Metadata, ApiError> {
            self.properties.lock().unwrap().push(property.to_string());
            if let Some(code) = self.fail_with {
                return Err(ApiError::GoogleError {
                    code,
                    status: "PERMISSION_DENIED".into(),
                    message: "denied".into(),
                });
            }
            Ok(Metadata {
                name: property.metadata_name(),
                dimensions: vec![DimensionMetadata {
                    api_name: "country".into(),
                    ..Default::default()
                }],
                metrics: vec![MetricMetadata {
                    api_name: "activeUsers".into(),
                    ..Default::default()
                }],
            })
        }

        async fn run_report(
            &self,
            property: &PropertyName,
            request: &RunReportRequest,
        ) -> Result<Value, ApiError> {
            self.properties.lock().unwrap().push(property.to_string());
            self.reports
                .lock()
                .unwrap()
                .push(serde_json::to_value(request)?);
            Ok(json!({"rowCount": 1, "kind": "analyticsData#runReport"}))
        }

        async fn run_realtime_report(
            &self,
            property: &PropertyName,
            request: &RunRealtimeReportRequest,
        ) -> Result<Value, ApiError> {
            self.properties.lock().unwrap().push(property.to_string());
            self.reports
                .lock()
                .unwrap()
                .push(serde_json::to_value(request)?);
            Ok(json!({"rowCount": 0, "kind": "analyticsData#runRealtimeReport"}))
        }
    }

    fn server(api: Arc<FakeApi>) -> AnalyticsServer {
        AnalyticsServer::new(api, Arc::new(DebugLogger::disabled()))
    }

    fn report_params(value: Value) -> RunReportParams {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_get_dimensions_strips_metrics() {
        let api = Arc::new(FakeApi::default());
        let params = PropertyParams {
            property_id: Some(PropertyRef::Text(" 12345 ".into())),
        };

        let json = server(api.clone())
            .property_metadata("get_dimensions", &params, Metadata::dimensions_only)
            .await
            .unwrap();

        assert_eq!(json["name"], "properties/12345/metadata");
        assert_eq!(json["dimensions"][0]["apiName"], "country");
        assert!(json.get("metrics").is_none());
        assert_eq!(*api.properties.lock().unwrap(), vec!["properties/12345"]);
    }

    #[tokio::test]
    async fn test_get_metrics_strips_dimensions() {
        let api = Arc::new(FakeApi::default());
        let params = PropertyParams {
            property_id: Some(PropertyRef::from(777_i64)),
        };

        let json = server(api)
            .property_metadata("get_metrics", &params, Metadata::metrics_only)
            .await
            .unwrap();

        assert_eq!(json["metrics"][0]["apiName"], "activeUsers");
        assert!(json.get("dimensions").is_none());
    }

    #[tokio::test]
    async fn test_invalid_property_never_reaches_api() {
        let api = Arc::new(FakeApi::default());
        let srv = server(api.clone());

        for property_id in [
            None,
            Some(PropertyRef::Text("abc".into())),
            Some(PropertyRef::Text("properties/1/2".into())),
        ] {
            let params = PropertyParams { property_id };
            let err = srv
                .property_metadata("get_dimensions", &params, Metadata::dimensions_only)
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        }

        assert!(api.properties.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_property_message() {
        let api = Arc::new(FakeApi::default());
        let params: PropertyParams = serde_json::from_value(json!({"property_id": null})).unwrap();

        let err = server(api)
            .property_metadata("get_metrics", &params, Metadata::metrics_only)
            .await
            .unwrap_err();

        assert_eq!(err.message, "Must supply a property ID");
    }

    #[tokio::test]
    async fn test_api_failure_is_internal_error() {
        let api = Arc::new(FakeApi {
            fail_with: Some(403),
            ..Default::default()
        });
        let params = PropertyParams {
            property_id: Some(PropertyRef::from(1_i64)),
        };

        let err = server(api)
            .property_metadata("get_dimensions", &params, Metadata::dimensions_only)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("403"));
    }

    #[tokio::test]
    async fn test_run_report_forwards_request() {
        let api = Arc::new(FakeApi::default());
        let params = report_params(json!({
            "property_id": "properties/42",
            "date_ranges": [{"start_date": "2025-01-01", "end_date": "2025-01-31", "name": "Jan2025"}],
            "dimensions": ["eventName"],
            "metrics": ["eventCount"],
            "dimension_filter": {"filter": {"field_name": "eventName", "string_filter": {"match_type": "BEGINS_WITH", "value": "add"}}},
            "metric_filter": {},
            "order_bys": [{"metric": {"metric_name": "eventCount"}, "desc": true}],
            "limit": 100,
            "offset": 0,
            "currency_code": "USD",
            "return_property_quota": true
        }));

        let result = server(api.clone()).report(&params).await.unwrap();
        assert_eq!(result["kind"], "analyticsData#runReport");

        let reports = api.reports.lock().unwrap();
        let sent = &reports[0];
        assert_eq!(api.properties.lock().unwrap()[0], "properties/42");
        assert_eq!(sent["dimensions"], json!([{"name": "eventName"}]));
        assert_eq!(sent["dateRanges"][0]["name"], "Jan2025");
        assert_eq!(
            sent["dimensionFilter"]["filter"]["string_filter"]["value"],
            "add"
        );
        assert!(sent.get("metricFilter").is_none());
        assert_eq!(sent["orderBys"][0]["desc"], true);
        assert_eq!(sent["limit"], 100);
        assert!(sent.get("offset").is_none());
        assert_eq!(sent["currencyCode"], "USD");
        assert_eq!(sent["returnPropertyQuota"], true);
    }

    #[tokio::test]
    async fn test_run_report_rejects_limit_out_of_range() {
        let api = Arc::new(FakeApi::default());
        let params = report_params(json!({
            "property_id": 42,
            "date_ranges": [{"startDate": "yesterday", "endDate": "today"}],
            "dimensions": [],
            "metrics": ["activeUsers"],
            "limit": 250001
        }));

        let err = server(api.clone()).report(&params).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("250000"));
        assert!(api.reports.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_realtime_report_forwards_request() {
        let api = Arc::new(FakeApi::default());
        let params: RunRealtimeReportParams = serde_json::from_value(json!({
            "property_id": "  9876 ",
            "dimensions": ["country"],
            "metrics": ["activeUsers"],
            "order_bys": [],
            "limit": 10
        }))
        .unwrap();

        let result = server(api.clone()).realtime_report(&params).await.unwrap();
        assert_eq!(result["kind"], "analyticsData#runRealtimeReport");

        let reports = api.reports.lock().unwrap();
        let sent = &reports[0];
        assert_eq!(api.properties.lock().unwrap()[0], "properties/9876");
        assert!(sent.get("orderBys").is_none());
        assert_eq!(sent["limit"], 10);
        assert_eq!(sent["returnPropertyQuota"], false);
    }

    #[test]
    fn test_row_limit_bounds() {
        assert_eq!(row_limit(None).unwrap(), None);
        assert_eq!(row_limit(Some(0)).unwrap(), None);
        assert_eq!(row_limit(Some(1)).unwrap(), Some(1));
        assert_eq!(row_limit(Some(MAX_ROW_LIMIT)).unwrap(), Some(MAX_ROW_LIMIT));
        assert!(row_limit(Some(-1)).is_err());
        assert!(row_limit(Some(MAX_ROW_LIMIT + 1)).is_err());
    }

    #[test]
    fn test_row_offset_bounds() {
        assert_eq!(row_offset(Some(0)).unwrap(), None);
        assert_eq!(row_offset(Some(10_000)).unwrap(), Some(10_000));
        assert!(matches!(row_offset(Some(-5)), Err(ApiError::InvalidArgument(_))));
    }

    #[test]
    fn test_non_empty_filters() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(Value::Null)), None);
        assert_eq!(non_empty(Some(json!({}))), None);
        assert_eq!(non_empty(Some(json!([]))), None);
        assert_eq!(non_empty(Some(json!({"a": 1}))), Some(json!({"a": 1})));
        assert_eq!(non_empty_list(Some(vec![])), None);
    }

    #[test]
    fn test_blank_currency_code_is_dropped() {
        let params = report_params(json!({
            "property_id": 1,
            "date_ranges": [],
            "dimensions": [],
            "metrics": [],
            "currency_code": "  "
        }));
        assert_eq!(params.to_request().unwrap().currency_code, None);
    }
    #[tokio::test]
    async fn test_report_argument_errors_reach_trace_file() {
        let api = Arc::new(FakeApi::default());
        let debug = Arc::new(DebugLogger::new(true));
        let srv = AnalyticsServer::new(api.clone(), debug.clone());

        let bad_property = report_params(json!({
            "property_id": "properties/abc",
            "date_ranges": [],
            "dimensions": [],
            "metrics": ["activeUsers"]
        }));
        srv.report(&bad_property).await.unwrap_err();

        let bad_limit: RunRealtimeReportParams = serde_json::from_value(json!({
            "property_id": 5,
            "dimensions": [],
            "metrics": ["activeUsers"],
            "limit": -1
        }))
        .unwrap();
        srv.realtime_report(&bad_limit).await.unwrap_err();

        assert!(api.reports.lock().unwrap().is_empty());
        let Some(path) = debug.trace_path() else {
            return;
        };
        let trace = std::fs::read_to_string(path).unwrap();
        assert!(trace.contains("ERROR [run_report]"));
        assert!(trace.contains("ERROR [run_realtime_report]: limit must be between"));
        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn test_property_id_beyond_i64_is_normalized() {
        let api = Arc::new(FakeApi::default());
        let params: PropertyParams =
            serde_json::from_value(json!({"property_id": 9223372036854775808u64})).unwrap();

        server(api.clone())
            .property_metadata("get_metrics", &params, Metadata::metrics_only)
            .await
            .unwrap();

        assert_eq!(
            *api.properties.lock().unwrap(),
            vec!["properties/9223372036854775808"]
        );
    }

    #[tokio::test]
    async fn test_fractional_property_id_is_invalid_params() {
        let api = Arc::new(FakeApi::default());
        let params: PropertyParams =
            serde_json::from_value(json!({"property_id": 12.0})).unwrap();

        let err = server(api.clone())
            .property_metadata("get_metrics", &params, Metadata::metrics_only)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("12.0"));
        assert!(api.properties.lock().unwrap().is_empty());
    }
    #[tokio::test]
    async fn test_filter_hint_tools_render_typed_examples() {
        let srv = server(Arc::new(FakeApi::default()));

        let result = srv.run_report_dimension_filter_hints().await.unwrap();
        let text = serde_json::to_string(&result).unwrap();
        assert!(text.contains("BEGINS_WITH"));

        let result = srv.run_report_metric_filter_hints().await.unwrap();
        let text = serde_json::to_string(&result).unwrap();
        assert!(text.contains("GREATER_THAN"));
    }
}
