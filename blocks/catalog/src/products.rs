use lambda_http::{http::StatusCode, Body, Error, Response};
use paperworks_atoms::http;
use paperworks_atoms::products::{ProductStore, SaveProductPayload};

use crate::editor::{EditorError, ProductEditor};

/// HTTP Handler: GET /admin/products/{id}
///
/// Returns the editor view: images sorted by sequence, legacy single image expanded.
pub async fn get_product_editor_handler<S: ProductStore>(
    store: &S,
    product_id: &str,
) -> Result<Response<Body>, Error> {
    match ProductEditor::load(store, product_id).await {
        Ok(editor) => http::json(StatusCode::OK, &editor.state()),
        Err(e) => editor_error("load_product", &e),
    }
}

/// HTTP Handler: POST /admin/products and PUT /admin/products/{id}
pub async fn save_product_handler<S: ProductStore>(
    store: &S,
    product_id: Option<&str>,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: SaveProductPayload = match http::parse_body(body) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };

    tracing::info!(
        "📥 save_product_handler: product_id={:?}, images={}",
        product_id,
        payload.product_images.len()
    );

    let editor = match ProductEditor::from_payload(product_id.map(str::to_string), payload) {
        Ok(editor) => editor,
        Err(e) => return editor_error("save_product", &e),
    };

    match editor.save(store).await {
        Ok(product) => {
            let status = if product_id.is_some() {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            http::json(status, &product)
        }
        Err(e) => editor_error("save_product", &e),
    }
}

fn editor_error(context: &str, err: &EditorError) -> Result<Response<Body>, Error> {
    match err {
        EditorError::SaveInProgress => http::error(StatusCode::CONFLICT, err.to_string()),
        EditorError::TooManyImages { .. } => http::error(StatusCode::BAD_REQUEST, err.to_string()),
        EditorError::Persistence(e) => http::persistence_error(context, e),
    }
}
