//! Static hint text describing argument shapes for the report tools.

use serde::Serialize;

use crate::api::types::{
    DateRange, Filter, FilterCondition, FilterExpression, MatchType, NumericValue, Operation,
    OrderBy, OrderType,
};

const API_SCHEMA_URL: &str =
    "https://developers.google.com/analytics/devguides/reporting/data/v1/api-schema";

/// Caveats shared by the dimension and metric filter hints.
const FILTER_NOTES: &str = r#"
  Notes:
    The API applies `dimension_filter` and `metric_filter` independently of
    each other. Some combinations of dimension and metric conditions can
    therefore not be expressed in a single report request.

    For example, this condition cannot be expressed:

    (
      (eventName = "page_view" AND eventCount > 100)
      OR
      (eventName = "join_group" AND eventCount < 50)
    )

    There is no way to apply "eventCount > 100" only to rows where eventName
    is "page_view" while applying "eventCount < 50" only to rows where
    eventName is "join_group".

    In general, the API cannot evaluate:

    (
      ((dimension condition D1) AND (metric condition M1))
      OR
      ((dimension condition D2) AND (metric condition M2))
    )

    For conditions like this, either:

    a)  Run one report that applies the subset of conditions the API does
        support, include the data needed for the rest, and finish filtering
        on the client. For the example above, filter on
        eventName one of "page_view" or "join_group"
        include the eventCount metric, and apply the per-event metric
        conditions to the response rows.

    or

    b)  Run one report per combination of dimension condition and metric
        condition. For the example above, one report for (D1 AND M1) and
        another for (D2 AND M2).

    Prefer option a) since it runs fewer reports. If that costs too much
    quota, use option b). Quota usage is described at
    https://developers.google.com/analytics/blog/2023/data-api-quota-management.
  "#;

fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string(value)
}

pub fn standard_dimensions() -> String {
    format!(
        "Standard dimensions defined in the HTML table at\n    {}#dimensions\n    \
         These dimensions are available to *every* property",
        API_SCHEMA_URL
    )
}

pub fn standard_metrics() -> String {
    format!(
        "Standard metrics defined in the HTML table at\n    {}#metrics\n    \
         These metrics are available to *every* property",
        API_SCHEMA_URL
    )
}

pub fn date_ranges() -> serde_json::Result<String> {
    let jan = to_json(&DateRange::named("2025-01-01", "2025-01-31", "Jan2025"))?;
    let feb = to_json(&DateRange::named("2025-02-01", "2025-02-28", "Feb2025"))?;
    let last_2_days = to_json(&DateRange::named("yesterday", "today", "YesterdayAndToday"))?;
    let prev_30_days = to_json(&DateRange::named("30daysAgo", "yesterday", "Previous30Days"))?;

    Ok(format!(
        r#"Example date_ranges arguments:
      1. A single date range:
        [ {jan} ]

      2. A relative date range using 'yesterday' and 'today':
        [ {last_2_days} ]

      3. A relative date range using 'NdaysAgo' and 'yesterday':
        [ {prev_30_days} ]

      4. Multiple date ranges:
        [ {jan}, {feb} ]
    "#
    ))
}

pub fn metric_filters() -> serde_json::Result<String> {
    let event_count_gt_10 = Filter::on(
        "eventCount",
        FilterCondition::NumericFilter {
            operation: Operation::GreaterThan,
            value: NumericValue::Int64Value(10),
        },
    );
    let revenue_between = Filter::on(
        "purchaseRevenue",
        FilterCondition::BetweenFilter {
            from_value: NumericValue::DoubleValue(10.0),
            to_value: NumericValue::DoubleValue(25.0),
        },
    );
    let empty = Filter::on("purchaseRevenue", FilterCondition::EmptyFilter {});
    let not = FilterExpression::not(event_count_gt_10.clone());
    let and = FilterExpression::and(vec![event_count_gt_10.clone(), revenue_between.clone()]);
    let or = FilterExpression::or(vec![event_count_gt_10.clone(), revenue_between]);

    filter_examples("metric_filter", [&event_count_gt_10, &not, &empty, &and, &or])
}

pub fn dimension_filters() -> serde_json::Result<String> {
    let begins_with = Filter::on(
        "eventName",
        FilterCondition::StringFilter {
            match_type: MatchType::BeginsWith,
            value: "add".to_string(),
            case_sensitive: None,
        },
    );
    let source_medium = Filter::on(
        "sourceMedium",
        FilterCondition::StringFilter {
            match_type: MatchType::Exact,
            value: "google / cpc".to_string(),
            case_sensitive: None,
        },
    );
    let event_list = Filter::on(
        "eventName",
        FilterCondition::InListFilter {
            values: vec![
                "first_visit".to_string(),
                "purchase".to_string(),
                "add_to_cart".to_string(),
            ],
            case_sensitive: true,
        },
    );
    let empty = Filter::on("source", FilterCondition::EmptyFilter {});
    let not = FilterExpression::not(begins_with.clone());
    let and = FilterExpression::and(vec![source_medium.clone(), event_list.clone()]);
    let or = FilterExpression::or(vec![source_medium, event_list]);

    filter_examples("dimension_filter", [&begins_with, &not, &empty, &and, &or])
}

/// Render the five canonical filter examples, in order: simple, NOT,
/// empty value, AND group, OR group.
fn filter_examples(
    argument: &str,
    examples: [&FilterExpression; 5],
) -> serde_json::Result<String> {
    let [simple, not, empty, and, or] = examples.map(|e| to_json(e));
    let (simple, not, empty, and, or) = (simple?, not?, empty?, and?, or?);

    Ok(format!(
        r#"Example {argument} arguments:
      1. A simple filter:
        {simple}

      2. A NOT filter:
        {not}

      3. An empty value filter:
        {empty}

      4. An AND group filter:
        {and}

      5. An OR group filter:
        {or}

    {FILTER_NOTES}"#
    ))
}

pub fn order_bys() -> serde_json::Result<String> {
    let name_asc = to_json(&OrderBy::dimension("eventName", OrderType::Alphanumeric, false))?;
    let campaign_no_case_desc = to_json(&OrderBy::dimension(
        "campaignName",
        OrderType::CaseInsensitiveAlphanumeric,
        true,
    ))?;
    let audience_numeric_asc =
        to_json(&OrderBy::dimension("audienceId", OrderType::Numeric, false))?;
    let count_asc = to_json(&OrderBy::metric("eventCount", false))?;
    let value_desc = to_json(&OrderBy::metric("eventValue", true))?;

    Ok(format!(
        r#"Example order_bys arguments:

    1.  Order by ascending 'eventName':
        [ {name_asc} ]

    2.  Order by descending 'campaignName', ignoring case:
        [ {campaign_no_case_desc} ]

    3.  Order by ascending 'audienceId':
        [ {audience_numeric_asc} ]

    4.  Order by descending 'eventValue':
        [ {value_desc} ]

    5.  Order by ascending 'eventCount':
        [ {count_asc} ]

    6.  Combination of dimension and metric order bys:
        [
          {name_asc},
          {value_desc},
        ]

    7.  Order by multiple dimensions and metrics:
        [
          {name_asc},
          {audience_numeric_asc},
          {value_desc},
        ]

    The dimensions and metrics in order_bys must also be present in the report
    request's "dimensions" and "metrics" arguments, respectively.
    "#
    ))
}
