use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::ProductQuery;
use super::service::ProductStore;
use crate::http;

/// HTTP Handler: GET /admin/products
pub async fn list_products_handler<S: ProductStore>(
    store: &S,
    query: ProductQuery,
) -> Result<Response<Body>, Error> {
    match store.list_products(&query).await {
        Ok(products) => http::json(StatusCode::OK, &products),
        Err(e) => http::persistence_error("list_products", &e),
    }
}

/// HTTP Handler: DELETE /admin/products/{id}
pub async fn delete_product_handler<S: ProductStore>(
    store: &S,
    product_id: &str,
) -> Result<Response<Body>, Error> {
    match store.delete_product(product_id).await {
        Ok(()) => http::no_content(),
        Err(e) => http::persistence_error("delete_product", &e),
    }
}
