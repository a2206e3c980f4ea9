//! Variant selection on product pages.
//!
//! The product URL's query pairs are the selected options
//! (`/products/board?Size=154cm&Color=Red`). A product without a matching
//! variant is redirected to its first variant's options.

use super::QueryParams;
use crate::shopify::{ProductOption, ProductVariant, SelectedOption};

/// Selected options from every query pair.
#[must_use]
pub fn selected_options(params: &QueryParams) -> Vec<SelectedOption> {
    params
        .pairs()
        .iter()
        .map(|(name, value)| SelectedOption {
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}

/// The product URL carrying a variant's selected options.
#[must_use]
pub fn variant_url(path: &str, variant: &ProductVariant) -> String {
    let mut params = QueryParams::default();
    for option in &variant.selected_options {
        params.append(&option.name, &option.value);
    }
    params.href(path)
}

/// One option value in the selector.
#[derive(Debug, Clone)]
pub struct OptionValue {
    pub value: String,
    /// The product URL with this value swapped in.
    pub href: String,
    pub active: bool,
    /// A variant with the resulting combination exists.
    pub exists: bool,
    /// That variant is available for sale.
    pub available: bool,
}

/// An option (Size, Color) with its values.
#[derive(Debug, Clone)]
pub struct OptionGroup {
    pub name: String,
    pub values: Vec<OptionValue>,
}

/// Build the option selector.
///
/// Options with a single value are omitted; there is nothing to choose.
#[must_use]
pub fn option_groups(
    options: &[ProductOption],
    variants: &[ProductVariant],
    params: &QueryParams,
    path: &str,
) -> Vec<OptionGroup> {
    options
        .iter()
        .filter(|option| option.values.len() > 1)
        .map(|option| OptionGroup {
            name: option.name.clone(),
            values: option
                .values
                .iter()
                .map(|value| {
                    let mut next = params.clone();
                    next.set(&option.name, value);
                    let combination = selected_options(&next);
                    let variant = find_variant(variants, &combination);
                    OptionValue {
                        value: value.clone(),
                        href: next.href(path),
                        active: params.get(&option.name) == Some(value.as_str()),
                        exists: variant.is_some(),
                        available: variant.is_some_and(|v| v.available_for_sale),
                    }
                })
                .collect(),
        })
        .collect()
}

/// The variant whose options include every selected option that names one of
/// its options.
fn find_variant<'a>(
    variants: &'a [ProductVariant],
    selected: &[SelectedOption],
) -> Option<&'a ProductVariant> {
    variants.iter().find(|variant| {
        variant.selected_options.iter().all(|option| {
            selected
                .iter()
                .find(|s| s.name == option.name)
                .is_none_or(|s| s.value == option.value)
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn variant(size: &str, color: &str, available: bool) -> ProductVariant {
        serde_json::from_value(json!({
            "id": format!("gid://shopify/ProductVariant/{size}-{color}"),
            "title": format!("{size} / {color}"),
            "availableForSale": available,
            "price": {"amount": "600.0", "currencyCode": "USD"},
            "selectedOptions": [{"name": "Size", "value": size}, {"name": "Color", "value": color}]
        }))
        .unwrap()
    }

    fn options() -> Vec<ProductOption> {
        serde_json::from_value(json!([
            {"name": "Size", "values": ["154cm", "158cm"]},
            {"name": "Color", "values": ["Red", "Blue"]},
            {"name": "Material", "values": ["Wood"]}
        ]))
        .unwrap()
    }

    #[test]
    fn test_selected_options_from_query() {
        let selected = selected_options(&QueryParams::parse("Size=154cm&Color=Red"));
        assert_eq!(
            selected,
            vec![
                SelectedOption { name: "Size".into(), value: "154cm".into() },
                SelectedOption { name: "Color".into(), value: "Red".into() },
            ]
        );
    }

    #[test]
    fn test_variant_url() {
        assert_eq!(
            variant_url("/products/board", &variant("154cm", "Red", true)),
            "/products/board?Size=154cm&Color=Red"
        );
    }

    #[test]
    fn test_option_groups() {
        let variants = vec![
            variant("154cm", "Red", true),
            variant("158cm", "Red", false),
            variant("154cm", "Blue", true),
        ];
        let params = QueryParams::parse("Size=154cm&Color=Red");
        let groups = option_groups(&options(), &variants, &params, "/products/board");

        assert_eq!(groups.len(), 2, "single-value options are hidden");
        let size = &groups[0];
        assert!(size.values[0].active);
        assert_eq!(size.values[1].href, "/products/board?Size=158cm&Color=Red");
        assert!(size.values[1].exists);
        assert!(!size.values[1].available);

        let color = &groups[1];
        assert!(color.values[1].exists && color.values[1].available);
        assert!(!color.values[1].active);
    }

    #[test]
    fn test_missing_combination() {
        let variants = vec![variant("154cm", "Red", true)];
        let params = QueryParams::parse("Size=154cm&Color=Red");
        let groups = option_groups(&options(), &variants, &params, "/p");
        assert!(!groups[1].values[1].exists);
        assert!(!groups[1].values[1].available);
    }
}
