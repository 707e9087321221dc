// src/output/render.rs
use crate::config::OutputFormat;
use crate::engine::{CatalogSnapshot, QueryOutcome};
use crate::error::AppError;
use crate::model::{FilterResult, Product};

/// Renders `outcome` in the requested format.
pub fn render(
    format: OutputFormat,
    outcome: &QueryOutcome,
    snapshot: &CatalogSnapshot,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Json => render_json(&outcome.result),
        OutputFormat::Table => Ok(render_table(outcome, snapshot)),
    }
}

/// The page as pretty-printed JSON with the public field names.
pub fn render_json(result: &FilterResult) -> Result<String, AppError> {
    serde_json::to_string_pretty(result).map_err(|e| AppError::InternalError {
        message: format!("Failed to serialize result page: {}", e),
        source: Some(Box::new(e)),
    })
}

/// One line per product, category and brand ids resolved to names where the
/// snapshot knows them, followed by a page summary.
pub fn render_table(outcome: &QueryOutcome, snapshot: &CatalogSnapshot) -> String {
    let result = &outcome.result;
    let mut out = format!(
        "{:<24} {:<32} {:>10} {:>6}  {:<20} {:<20}\n",
        "ID", "NAME", "PRICE", "RATING", "CATEGORY", "BRAND"
    );
    for product in &result.items {
        out.push_str(&table_row(product, snapshot));
        out.push('\n');
    }

    out.push_str(&format!(
        "\nPage {} of {} ({} products)",
        result.page, result.total_pages, result.total_count
    ));
    if result.has_prev {
        out.push_str(" [prev]");
    }
    if result.has_next {
        out.push_str(" [next]");
    }
    if let Some(cause) = &outcome.degradation {
        out.push_str(&format!("\nServed from recent listing: {}", cause));
    }
    out
}

fn table_row(product: &Product, snapshot: &CatalogSnapshot) -> String {
    let category = product
        .category_id
        .as_ref()
        .map(|id| snapshot.category_name(id).unwrap_or(id.as_str()))
        .unwrap_or("-");
    let brand = product
        .brand_id
        .as_ref()
        .map(|id| snapshot.brand_name(id).unwrap_or(id.as_str()))
        .unwrap_or("-");

    format!(
        "{:<24} {:<32} {:>10} {:>6}  {:<20} {:<20}",
        truncate(product.id.as_str(), 24),
        truncate(&product.name, 32),
        product
            .price
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "-".to_string()),
        product
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string()),
        truncate(category, 20),
        truncate(brand, 20),
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let head: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{paginate, QueryPlan};
    use crate::model::{Brand, Category};
    use crate::types::BrandId;

    fn outcome(items: Vec<Product>) -> QueryOutcome {
        QueryOutcome {
            result: paginate(items, 1, 9),
            plan: QueryPlan::GenericListing,
            degradation: None,
        }
    }

    #[test]
    fn test_empty_page_json_shape() {
        let result = outcome(Vec::new()).result;
        insta::assert_snapshot!(
            serde_json::to_string(&result).unwrap(),
            @r#"{"products":[],"totalProducts":0,"currentPage":1,"totalPages":0,"hasNextPage":false,"hasPrevPage":false}"#
        );

        let pretty = render_json(&result).unwrap();
        let reparsed: FilterResult = serde_json::from_str(&pretty).unwrap();
        assert_eq!(reparsed, result);
    }

    #[test]
    fn test_table_resolves_names() {
        let snapshot = CatalogSnapshot::new(
            vec![Category::main("c1", "Phones")],
            vec![Brand {
                id: BrandId::from("b1"),
                name: "Acme".into(),
            }],
        );
        let product = Product {
            id: "p1".into(),
            name: "Pocket phone".into(),
            price: Some(199.0),
            category_id: Some("c1".into()),
            brand_id: Some("b-unknown".into()),
            rating: None,
            created_at: None,
        };

        let table = render_table(&outcome(vec![product]), &snapshot);
        assert!(table.contains("Phones"));
        assert!(table.contains("b-unknown"));
        assert!(table.contains("199.00"));
        assert!(table.ends_with("Page 1 of 1 (1 products)"));
    }

    #[test]
    fn test_table_summary_lists_flags_and_degradation() {
        let items = (0..3)
            .map(|i| Product {
                id: format!("p{}", i).as_str().into(),
                name: format!("Item {}", i),
                price: None,
                category_id: None,
                brand_id: None,
                rating: None,
                created_at: None,
            })
            .collect();
        let outcome = QueryOutcome {
            result: paginate(items, 2, 1),
            plan: QueryPlan::BrandSpecific(BrandId::from("b1")),
            degradation: Some(AppError::http(503, "products/brand/b1", "")),
        };

        let table = render_table(&outcome, &CatalogSnapshot::default());
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("p1"));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Page 2 of 3 (3 products) [prev] [next]");
        assert!(lines[4].starts_with("Served from recent listing: "));
        assert!(lines[4].contains("503"));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ääääää", 4), "äää…");
    }
}
