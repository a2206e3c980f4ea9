//! Product filter parameters (`filter.<key>=<json>`).
//!
//! A request like `?filter.productVendor="ACME"&filter.price={"min":10}`
//! becomes the `ProductFilter` list `[{"productVendor":"ACME"},
//! {"price":{"min":10}}]` sent with the collection query. The same module
//! builds the links that add, remove and clear filters.

use demo_store_core::{CurrencyCode, Price};
use serde_json::{Map, Value};

use super::QueryParams;
use crate::shopify::{Filter, FilterType, FilterValue};

/// Query-string prefix marking a product filter.
pub const FILTER_URL_PREFIX: &str = "filter.";

/// Pagination params dropped whenever the filter set changes.
const CURSOR_PARAMS: [&str; 2] = ["cursor", "direction"];

/// One requested filter, as sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    /// Key without the prefix (`productVendor`, `price`, `variantOption`).
    pub key: String,
    /// Parsed JSON value.
    pub value: Value,
    /// The value exactly as it appeared in the query string.
    pub raw: String,
}

impl ProductFilter {
    /// The `{ key: value }` object the API expects.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.key.clone(), self.value.clone());
        Value::Object(map)
    }

    fn is_price(&self) -> bool {
        self.key == "price"
    }
}

/// Parse every `filter.*` pair. Values that are not JSON are skipped.
#[must_use]
pub fn parse_filters(params: &QueryParams) -> Vec<ProductFilter> {
    params
        .pairs()
        .iter()
        .filter_map(|(key, raw)| {
            let key = key.strip_prefix(FILTER_URL_PREFIX)?;
            match serde_json::from_str::<Value>(raw) {
                Ok(value) => Some(ProductFilter {
                    key: key.to_string(),
                    value,
                    raw: raw.clone(),
                }),
                Err(e) => {
                    tracing::warn!(key, value = %raw, error = %e, "Ignoring malformed filter");
                    None
                }
            }
        })
        .collect()
}

/// A filter currently applied to the listing.
#[derive(Debug, Clone)]
pub struct AppliedFilter {
    pub label: String,
    /// Link to the same listing without this filter.
    pub remove_href: String,
}

/// Match requested filters against the collection's available values.
///
/// Unmatched filters are dropped with a warning.
#[must_use]
pub fn applied_filters(
    requested: &[ProductFilter],
    available: &[Filter],
    params: &QueryParams,
    path: &str,
    currency: CurrencyCode,
) -> Vec<AppliedFilter> {
    let values: Vec<(&FilterValue, Value)> = available
        .iter()
        .flat_map(|f| f.values.iter())
        .filter_map(|v| serde_json::from_str(&v.input).ok().map(|input| (v, input)))
        .collect();

    requested
        .iter()
        .filter_map(|filter| {
            let wanted = filter.to_json();
            let found = values.iter().find(|(_, input)| {
                if filter.is_price() {
                    input.get("price").is_some()
                } else {
                    *input == wanted
                }
            });
            let Some((value, _)) = found else {
                tracing::warn!(filter = %wanted, "No filter value matches requested filter");
                return None;
            };

            let label = if filter.is_price() {
                price_label(&filter.value, currency)
            } else {
                value.label.clone()
            };
            Some(AppliedFilter {
                label,
                remove_href: remove_filter_link(filter, params, path),
            })
        })
        .collect()
}

/// `"$10.00 - $50.00"`, or `"Price"` unless both bounds are present.
fn price_label(range: &Value, currency: CurrencyCode) -> String {
    let bound = |name: &str| {
        let amount = range.get(name)?;
        let amount = match amount {
            Value::Number(n) => n.to_string(),
            Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return None,
        };
        Price::parse(&amount, &currency.to_string())
            .ok()
            .map(|p| p.display())
    };
    match (bound("min"), bound("max")) {
        (Some(min), Some(max)) => format!("{min} - {max}"),
        _ => "Price".to_string(),
    }
}

/// Link that adds a filter value's `input` to the current params.
///
/// Pagination is reset; an already-present pair is left alone; `price`
/// replaces any existing price filter.
#[must_use]
pub fn add_filter_link(input: &str, params: &QueryParams, path: &str) -> String {
    let mut next = params.clone();
    for param in CURSOR_PARAMS {
        next.delete(param);
    }

    if let Ok(Value::Object(entries)) = serde_json::from_str::<Value>(input) {
        for (key, value) in entries {
            let full_key = format!("{FILTER_URL_PREFIX}{key}");
            let json = value.to_string();
            if next.contains(&full_key, &json) {
                continue;
            }
            if key == "price" {
                next.delete(&full_key);
            }
            next.append(&full_key, &json);
        }
    }
    next.href(path)
}

/// Link without exactly this filter's pairs.
#[must_use]
pub fn remove_filter_link(filter: &ProductFilter, params: &QueryParams, path: &str) -> String {
    let mut next = params.clone();
    next.delete_pair(&format!("{FILTER_URL_PREFIX}{}", filter.key), &filter.raw);
    next.href(path)
}

/// Link with `filter.price` replaced by the provided bounds.
///
/// With neither bound the price filter is removed.
#[must_use]
pub fn price_range_link(
    min: Option<f64>,
    max: Option<f64>,
    params: &QueryParams,
    path: &str,
) -> String {
    let key = format!("{FILTER_URL_PREFIX}price");
    let mut next = params.clone();
    for param in CURSOR_PARAMS {
        next.delete(param);
    }

    let mut range = Map::new();
    if let Some(min) = min {
        range.insert("min".to_string(), json_number(min));
    }
    if let Some(max) = max {
        range.insert("max".to_string(), json_number(max));
    }

    if range.is_empty() {
        next.delete(&key);
    } else {
        next.set(&key, &Value::Object(range).to_string());
    }
    next.href(path)
}

/// Link without any filters.
#[must_use]
pub fn clear_filters_link(params: &QueryParams, path: &str) -> String {
    let mut next = params.clone();
    next.delete_prefixed(FILTER_URL_PREFIX);
    for param in CURSOR_PARAMS {
        next.delete(param);
    }
    next.href(path)
}

/// Integral amounts serialize without a fraction (`10`, not `10.0`).
#[allow(clippy::cast_possible_truncation)]
fn json_number(amount: f64) -> Value {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        Value::from(amount as i64)
    } else {
        serde_json::Number::from_f64(amount).map_or(Value::Null, Value::Number)
    }
}

/// The applied price bounds, for pre-filling the price form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceRange {
    pub min: String,
    pub max: String,
}

impl PriceRange {
    /// Bounds from the requested `price` filter, if any.
    #[must_use]
    pub fn from_filters(filters: &[ProductFilter]) -> Self {
        let Some(price) = filters.iter().find(|f| f.is_price()) else {
            return Self::default();
        };
        let bound = |name: &str| match price.value.get(name) {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };
        Self {
            min: bound("min"),
            max: bound("max"),
        }
    }
}

/// A selectable filter value.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub label: String,
    pub count: i64,
    pub href: String,
    pub active: bool,
}

/// A filter rendered in the sidebar.
#[derive(Debug, Clone)]
pub struct FilterGroup {
    pub id: String,
    pub label: String,
    /// `LIST` and `BOOLEAN` render links; `PRICE_RANGE` renders a form.
    pub is_price_range: bool,
    pub options: Vec<FilterOption>,
}

/// Shape the collection's filters for rendering.
#[must_use]
pub fn filter_groups(available: &[Filter], params: &QueryParams, path: &str) -> Vec<FilterGroup> {
    available
        .iter()
        .map(|filter| {
            let is_price_range = filter.kind == FilterType::PriceRange;
            let options = if is_price_range {
                Vec::new()
            } else {
                filter
                    .values
                    .iter()
                    .map(|value| FilterOption {
                        label: value.label.clone(),
                        count: value.count,
                        href: add_filter_link(&value.input, params, path),
                        active: is_active(&value.input, params),
                    })
                    .collect()
            };
            FilterGroup {
                id: filter.id.clone(),
                label: filter.label.clone(),
                is_price_range,
                options,
            }
        })
        .collect()
}

fn is_active(input: &str, params: &QueryParams) -> bool {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(entries)) if !entries.is_empty() => entries.iter().all(|(key, value)| {
            params.contains(&format!("{FILTER_URL_PREFIX}{key}"), &value.to_string())
        }),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn vendor_filter() -> Filter {
        serde_json::from_value(json!({
            "id": "filter.p.vendor",
            "label": "Vendor",
            "type": "LIST",
            "values": [
                {"id": "filter.p.vendor.acme", "label": "ACME", "count": 3, "input": "{\"productVendor\":\"ACME\"}"},
                {"id": "filter.p.vendor.hydrogen", "label": "Hydrogen", "count": 5, "input": "{\"productVendor\":\"Hydrogen\"}"}
            ]
        }))
        .unwrap()
    }

    fn price_filter() -> Filter {
        serde_json::from_value(json!({
            "id": "filter.v.price",
            "label": "Price",
            "type": "PRICE_RANGE",
            "values": [{"id": "filter.v.price", "label": "Price", "count": 0, "input": "{\"price\":{\"min\":0,\"max\":750}}"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_filters() {
        let params = QueryParams::parse(
            "filter.productVendor=%22ACME%22&filter.available=true&filter.bad=%7Bnope&sort=newest",
        );
        let filters = parse_filters(&params);
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].to_json(), json!({"productVendor": "ACME"}));
        assert_eq!(filters[1].to_json(), json!({"available": true}));
    }

    #[test]
    fn test_applied_filters_match_and_drop() {
        let params = QueryParams::parse(
            "filter.productVendor=%22ACME%22&filter.productVendor=%22Nobody%22&filter.price=%7B%22min%22%3A10%2C%22max%22%3A50%7D",
        );
        let requested = parse_filters(&params);
        let applied = applied_filters(
            &requested,
            &[vendor_filter(), price_filter()],
            &params,
            "/collections/skis",
            CurrencyCode::USD,
        );

        assert_eq!(applied.len(), 2);
        assert_eq!(applied[0].label, "ACME");
        assert_eq!(
            applied[0].remove_href,
            "/collections/skis?filter.productVendor=%22Nobody%22&filter.price=%7B%22min%22%3A10%2C%22max%22%3A50%7D"
        );
        assert_eq!(applied[1].label, "$10.00 - $50.00");
    }

    #[test]
    fn test_price_label_needs_both_bounds() {
        assert_eq!(price_label(&json!({"min": 10}), CurrencyCode::USD), "Price");
        assert_eq!(
            price_label(&json!({"min": 5, "max": "20"}), CurrencyCode::CAD),
            "$5.00 - $20.00"
        );
    }

    #[test]
    fn test_add_filter_link() {
        let params = QueryParams::parse("cursor=abc&direction=next&sort=newest");
        let href = add_filter_link("{\"productVendor\":\"ACME\"}", &params, "/collections/skis");
        assert_eq!(
            href,
            "/collections/skis?sort=newest&filter.productVendor=%22ACME%22"
        );

        let again = QueryParams::parse(href.split_once('?').unwrap().1);
        assert_eq!(
            add_filter_link("{\"productVendor\":\"ACME\"}", &again, "/collections/skis"),
            href
        );
    }

    #[test]
    fn test_add_price_filter_replaces() {
        let params = QueryParams::parse("filter.price=%7B%22min%22%3A1%7D");
        let href = add_filter_link("{\"price\":{\"min\":0,\"max\":750}}", &params, "/c");
        assert_eq!(href, "/c?filter.price=%7B%22max%22%3A750%2C%22min%22%3A0%7D");
    }

    #[test]
    fn test_price_range_link() {
        let params = QueryParams::parse("filter.price=%7B%22min%22%3A1%7D&cursor=x&q=a");
        assert_eq!(
            price_range_link(Some(10.0), None, &params, "/c"),
            "/c?filter.price=%7B%22min%22%3A10%7D&q=a"
        );
        assert_eq!(
            price_range_link(Some(10.5), Some(20.0), &params, "/c"),
            "/c?filter.price=%7B%22max%22%3A20%2C%22min%22%3A10.5%7D&q=a"
        );
        assert_eq!(price_range_link(None, None, &params, "/c"), "/c?q=a");
    }

    #[test]
    fn test_clear_filters_link() {
        let params = QueryParams::parse("filter.a=1&sort=newest&filter.b=2&direction=previous");
        assert_eq!(clear_filters_link(&params, "/c"), "/c?sort=newest");
    }

    #[test]
    fn test_filter_groups_mark_active() {
        let params = QueryParams::parse("filter.productVendor=%22ACME%22");
        let groups = filter_groups(&[vendor_filter(), price_filter()], &params, "/c");
        assert_eq!(groups.len(), 2);
        assert!(groups[0].options[0].active);
        assert!(!groups[0].options[1].active);
        assert!(groups[1].is_price_range);
        assert!(groups[1].options.is_empty());
    }

    #[test]
    fn test_price_range_prefill() {
        let filters = parse_filters(&QueryParams::parse("filter.price=%7B%22min%22%3A10%7D"));
        let range = PriceRange::from_filters(&filters);
        assert_eq!(range.min, "10");
        assert_eq!(range.max, "");
    }
}
