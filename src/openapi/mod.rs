use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Products API",
        version = "1.0.0",
        description = r#"
# Products API

Create, list, read, update and soft-delete products.

## Error Handling

Validation failures return `400` with one message per offending field:

```json
{ "name": "name must not be empty.", "price": "price must not be less than 0." }
```

Every other failure returns a single message:

```json
{ "detail": "product not found" }
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product catalogue endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::create_product,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::health::health_check,
    ),
    components(
        schemas(
            crate::dto::ProductRequest,
            crate::dto::ProductResponse,
            crate::dto::FieldErrors,
            crate::errors::DetailResponse,
            crate::health::HealthInfo,
            crate::health::HealthStatus
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
