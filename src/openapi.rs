use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockroom API",
        version = "0.1.0",
        description = r#"
# Stockroom Inventory Management API

CRUD API over products, categories, stock transactions, and settings, plus
read-only dashboard aggregates.

## Error Handling

Every failing endpoint returns a flat JSON body with an appropriate 4xx/5xx
status:

```json
{
  "error": "Category already exists"
}
```

## Pagination

The product list supports `page` (1-based) and `limit` query parameters.
Out-of-range pages return an empty data array, never an error.
        "#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "products", description = "Product catalog"),
        (name = "categories", description = "Category management"),
        (name = "transactions", description = "Stock movement ledger"),
        (name = "settings", description = "Key/value configuration"),
        (name = "dashboard", description = "Derived statistics"),
        (name = "health", description = "Health check")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::categories::list_categories,
        crate::handlers::categories::create_category,
        crate::handlers::categories::delete_category,
        crate::handlers::transactions::list_transactions,
        crate::handlers::transactions::record_transaction,
        crate::handlers::settings::get_settings,
        crate::handlers::settings::update_settings,
        crate::handlers::dashboard::get_dashboard,
        crate::handlers::health::health_check,
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the generated document from
/// `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_includes_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/v1/products",
            "/api/v1/products/{id}",
            "/api/v1/categories",
            "/api/v1/categories/{id}",
            "/api/v1/transactions",
            "/api/v1/settings",
            "/api/v1/dashboard",
            "/health",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {} in {:?}",
                expected,
                paths
            );
        }
    }
}
