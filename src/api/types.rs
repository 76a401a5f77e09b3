//! Data API request fragments, report envelopes and metadata.
//!
//! Fragment types (date ranges, filters, order bys) use the protobuf field
//! names, which the Data API accepts alongside lowerCamelCase. Request
//! envelopes use the REST field names.

use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Upper bound the Data API places on `limit`.
pub const MAX_ROW_LIMIT: i64 = 250_000;

// ============================================================================
// Request fragments
// ============================================================================

/// A contiguous set of days: `start_date` through `end_date`, inclusive.
/// Dates are `YYYY-MM-DD`, `today`, `yesterday` or `NdaysAgo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateRange {
    /// Inclusive start date (YYYY-MM-DD, NdaysAgo, yesterday, or today)
    #[serde(alias = "startDate")]
    pub start_date: String,
    /// Inclusive end date (YYYY-MM-DD, NdaysAgo, yesterday, or today)
    #[serde(alias = "endDate")]
    pub end_date: String,
    /// Optional name used for the dateRange dimension in the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DateRange {
    pub fn named(start_date: &str, end_date: &str, name: &str) -> Self {
        Self {
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            name: Some(name.to_string()),
        }
    }
}

/// Filter expression tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterExpression {
    AndGroup(FilterExpressionList),
    OrGroup(FilterExpressionList),
    NotExpression(Box<FilterExpression>),
    Filter(Filter),
}

impl FilterExpression {
    pub fn and(expressions: Vec<FilterExpression>) -> Self {
        FilterExpression::AndGroup(FilterExpressionList { expressions })
    }

    pub fn or(expressions: Vec<FilterExpression>) -> Self {
        FilterExpression::OrGroup(FilterExpressionList { expressions })
    }

    pub fn not(expression: FilterExpression) -> Self {
        FilterExpression::NotExpression(Box::new(expression))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterExpressionList {
    pub expressions: Vec<FilterExpression>,
}

/// A single-field filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub field_name: String,
    #[serde(flatten)]
    pub condition: FilterCondition,
}

impl Filter {
    pub fn on(field_name: &str, condition: FilterCondition) -> FilterExpression {
        FilterExpression::Filter(Filter {
            field_name: field_name.to_string(),
            condition,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    StringFilter {
        match_type: MatchType,
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        case_sensitive: Option<bool>,
    },
    InListFilter {
        values: Vec<String>,
        case_sensitive: bool,
    },
    NumericFilter {
        operation: Operation,
        value: NumericValue,
    },
    BetweenFilter {
        from_value: NumericValue,
        to_value: NumericValue,
    },
    EmptyFilter {},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    Exact,
    BeginsWith,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    GreaterThan,
}

/// Numeric filter operand. int64 values are JSON strings on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericValue {
    #[serde(serialize_with = "int64_as_string")]
    Int64Value(i64),
    DoubleValue(f64),
}

fn int64_as_string<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// Sort key for report rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBy {
    #[serde(flatten)]
    pub key: OrderKey,
    pub desc: bool,
}

impl OrderBy {
    pub fn dimension(dimension_name: &str, order_type: OrderType, desc: bool) -> Self {
        Self {
            key: OrderKey::Dimension {
                dimension_name: dimension_name.to_string(),
                order_type,
            },
            desc,
        }
    }

    pub fn metric(metric_name: &str, desc: bool) -> Self {
        Self {
            key: OrderKey::Metric {
                metric_name: metric_name.to_string(),
            },
            desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKey {
    Dimension {
        dimension_name: String,
        order_type: OrderType,
    },
    Metric {
        metric_name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Alphanumeric,
    CaseInsensitiveAlphanumeric,
    Numeric,
}

// ============================================================================
// Request envelopes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub name: String,
}

/// Body of `properties/{id}:runReport`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportRequest {
    pub dimensions: Vec<Dimension>,
    pub metrics: Vec<Metric>,
    pub date_ranges: Vec<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_bys: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    pub return_property_quota: bool,
}

/// Body of `properties/{id}:runRealtimeReport`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRealtimeReportRequest {
    pub dimensions: Vec<Dimension>,
    pub metrics: Vec<Metric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_bys: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    pub return_property_quota: bool,
}

pub fn dimensions_from(names: Vec<String>) -> Vec<Dimension> {
    names.into_iter().map(|name| Dimension { name }).collect()
}

pub fn metrics_from(names: Vec<String>) -> Vec<Metric> {
    names.into_iter().map(|name| Metric { name }).collect()
}

// ============================================================================
// Metadata
// ============================================================================

/// Dimensions and metrics available to a property.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<DimensionMetadata>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<MetricMetadata>,
}

impl Metadata {
    /// Keep only the dimensions.
    pub fn dimensions_only(self) -> Self {
        Self {
            name: self.name,
            dimensions: self.dimensions,
            metrics: Vec::new(),
        }
    }

    /// Keep only the metrics.
    pub fn metrics_only(self) -> Self {
        Self {
            name: self.name,
            dimensions: Vec::new(),
            metrics: self.metrics,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionMetadata {
    pub api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deprecated_api_names: Vec<String>,
    #[serde(default)]
    pub custom_definition: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricMetadata {
    pub api_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deprecated_api_names: Vec<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default)]
    pub custom_definition: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
