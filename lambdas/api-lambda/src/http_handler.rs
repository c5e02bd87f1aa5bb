use catalog_block::{products, storefront, uploads};
use lambda_http::http::header::{HeaderValue, VARY};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use paperworks_atoms as atoms;
use paperworks_atoms::products::ProductQuery;
use paperworks_shared::{auth, contact, AppState, Config};
use std::sync::Arc;

fn with_cors_headers(
    mut resp: Response<Body>,
    config: &Config,
    request_origin: Option<&str>,
) -> Response<Body> {
    let cors_origin = config.cors_origin(request_origin);

    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(&cors_origin).unwrap_or_else(|_| HeaderValue::from_static("*")),
    );
    headers.insert("Access-Control-Allow-Credentials", HeaderValue::from_static("true"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PUT,PATCH,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization,Cookie"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));

    resp
}

fn finalize_response(
    resp: Result<Response<Body>, Error>,
    config: &Config,
    request_origin: Option<&str>,
) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(r, config, request_origin))
}

/// Main Lambda handler - routes storefront and admin requests
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body: &[u8] = event.body().as_ref();
    let request_origin = event.headers().get("Origin").and_then(|v| v.to_str().ok());
    tracing::info!("🚀 API Lambda invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp, &state.config, request_origin));
    }

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if parts.first() == Some(&"admin") {
        return admin_routes(&event, &state, method, &parts, body, request_origin).await;
    }

    let table_name = state.table_name();
    let params = event.query_string_parameters_ref();

    let resp = match (method, parts.as_slice()) {
        // GET /products?category={slug}&featured=true
        (&Method::GET, ["products"]) => {
            let category = params.and_then(|p| p.first("category"));
            let featured = params
                .and_then(|p| p.first("featured"))
                .map(|v| v == "true")
                .unwrap_or(false);
            storefront::list_products_handler(
                &state.dynamo_client,
                table_name,
                &state.product_store,
                category,
                featured,
            )
            .await
        }
        (&Method::GET, ["products", slug]) => {
            storefront::get_product_handler(&state.product_store, slug).await
        }
        (&Method::GET, ["categories"]) => {
            storefront::list_categories_handler(&state.dynamo_client, table_name).await
        }
        // GET /categories/{slug} - category page with its render strategy
        (&Method::GET, ["categories", slug]) => {
            storefront::category_page_handler(
                &state.dynamo_client,
                table_name,
                &state.product_store,
                slug,
            )
            .await
        }
        (&Method::GET, ["blog"]) => {
            atoms::blog::list_posts_handler(&state.dynamo_client, table_name, true).await
        }
        (&Method::GET, ["blog", slug]) => {
            atoms::blog::get_published_post_handler(&state.dynamo_client, table_name, slug).await
        }
        (&Method::GET, ["announcement"]) => {
            atoms::announcements::current_announcement_handler(&state.dynamo_client, table_name)
                .await
        }
        (&Method::GET, ["hero-slides"]) => {
            atoms::hero::list_active_slides_handler(&state.dynamo_client, table_name).await
        }
        (&Method::GET, ["settings"]) => {
            atoms::settings::get_settings_handler(&state.dynamo_client, table_name).await
        }
        // Contact form route (public - no auth required)
        (&Method::POST, ["contact"]) => {
            contact::handle_contact(&state.dynamo_client, &state.ses_client, &state.config, body)
                .await
        }
        _ => {
            tracing::warn!("⚠️ No route matched - Method: {} Path: {}", method, path);
            not_found()
        }
    };

    finalize_response(resp, &state.config, request_origin)
}

async fn admin_routes(
    event: &Request,
    state: &AppState,
    method: &Method,
    parts: &[&str],
    body: &[u8],
    request_origin: Option<&str>,
) -> Result<Response<Body>, Error> {
    // Session endpoints that don't need an existing session
    match (method, parts) {
        (&Method::POST, ["admin", "login"]) => {
            return finalize_response(
                auth::login_handler(&state.config, body).await,
                &state.config,
                request_origin,
            );
        }
        (&Method::POST, ["admin", "logout"]) => {
            return finalize_response(auth::logout_handler().await, &state.config, request_origin);
        }
        _ => {}
    }

    let session = match auth::authenticate_request(&state.config, event.headers()) {
        Ok(session) => session,
        Err(resp) => return Ok(with_cors_headers(resp, &state.config, request_origin)),
    };
    tracing::info!(
        "🔐 Admin request: user={}, method={}, path={}",
        session.username,
        method,
        event.uri().path()
    );

    let client = &state.dynamo_client;
    let table_name = state.table_name();
    let store = &state.product_store;

    let resp = match (method, parts) {
        (&Method::GET, ["admin", "session"]) => auth::session_handler(&session).await,

        // --- PRODUCTS ---
        (&Method::GET, ["admin", "products"]) => {
            let query = ProductQuery {
                category_id: event
                    .query_string_parameters_ref()
                    .and_then(|p| p.first("categoryId"))
                    .map(str::to_string),
                ..Default::default()
            };
            atoms::products::list_products_handler(store, query).await
        }
        (&Method::POST, ["admin", "products"]) => {
            products::save_product_handler(store, None, body).await
        }
        (&Method::GET, ["admin", "products", product_id]) => {
            products::get_product_editor_handler(store, product_id).await
        }
        (&Method::PUT, ["admin", "products", product_id]) => {
            products::save_product_handler(store, Some(*product_id), body).await
        }
        (&Method::DELETE, ["admin", "products", product_id]) => {
            atoms::products::delete_product_handler(store, product_id).await
        }

        // --- CATEGORIES ---
        (&Method::GET, ["admin", "categories"]) => {
            atoms::categories::list_categories_handler(client, table_name).await
        }
        (&Method::POST, ["admin", "categories"]) => {
            atoms::categories::create_category_handler(client, table_name, body).await
        }
        (&Method::GET, ["admin", "categories", category_id]) => {
            atoms::categories::get_category_handler(client, table_name, category_id).await
        }
        (&Method::PUT, ["admin", "categories", category_id]) => {
            atoms::categories::update_category_handler(client, table_name, category_id, body).await
        }
        (&Method::DELETE, ["admin", "categories", category_id]) => {
            atoms::categories::delete_category_handler(client, table_name, category_id).await
        }

        // --- ANNOUNCEMENTS ---
        (&Method::GET, ["admin", "announcements"]) => {
            atoms::announcements::list_announcements_handler(client, table_name).await
        }
        (&Method::POST, ["admin", "announcements"]) => {
            atoms::announcements::create_announcement_handler(client, table_name, body).await
        }
        (&Method::PUT, ["admin", "announcements", announcement_id]) => {
            atoms::announcements::update_announcement_handler(
                client,
                table_name,
                announcement_id,
                body,
            )
            .await
        }
        (&Method::DELETE, ["admin", "announcements", announcement_id]) => {
            atoms::announcements::delete_announcement_handler(client, table_name, announcement_id)
                .await
        }

        // --- BLOG ---
        (&Method::GET, ["admin", "blog"]) => {
            atoms::blog::list_posts_handler(client, table_name, false).await
        }
        (&Method::POST, ["admin", "blog"]) => {
            atoms::blog::create_post_handler(client, table_name, body).await
        }
        (&Method::GET, ["admin", "blog", post_id]) => {
            atoms::blog::get_post_handler(client, table_name, post_id).await
        }
        (&Method::PUT, ["admin", "blog", post_id]) => {
            atoms::blog::update_post_handler(client, table_name, post_id, body).await
        }
        (&Method::DELETE, ["admin", "blog", post_id]) => {
            atoms::blog::delete_post_handler(client, table_name, post_id).await
        }

        // --- CONTACT SUBMISSIONS ---
        (&Method::GET, ["admin", "contact-submissions"]) => {
            atoms::contacts::list_submissions_handler(client, table_name).await
        }
        (&Method::PATCH, ["admin", "contact-submissions", submission_id]) => {
            atoms::contacts::update_submission_handler(client, table_name, submission_id, body)
                .await
        }
        (&Method::DELETE, ["admin", "contact-submissions", submission_id]) => {
            atoms::contacts::delete_submission_handler(client, table_name, submission_id).await
        }

        // --- SETTINGS ---
        (&Method::GET, ["admin", "settings"]) => {
            atoms::settings::get_settings_handler(client, table_name).await
        }
        (&Method::PUT, ["admin", "settings"]) => {
            atoms::settings::update_settings_handler(client, table_name, body).await
        }

        // --- HERO CAROUSEL ---
        (&Method::GET, ["admin", "hero-slides"]) => {
            atoms::hero::list_slides_handler(client, table_name).await
        }
        (&Method::PUT, ["admin", "hero-slides"]) => {
            atoms::hero::replace_slides_handler(client, table_name, body).await
        }
        (&Method::POST, ["admin", "hero-slides", "reorder"]) => {
            atoms::hero::reorder_slides_handler(client, table_name, body).await
        }

        // --- UPLOADS ---
        (&Method::POST, ["admin", "uploads", "credential"]) => {
            uploads::request_credential_handler(state.gateway.storage(), body).await
        }
        (&Method::POST, ["admin", "uploads"]) => {
            uploads::batch_upload_handler(&state.gateway, body).await
        }

        _ => {
            tracing::warn!(
                "⚠️ No admin route matched - Method: {} Path: {}",
                method,
                event.uri().path()
            );
            not_found()
        }
    };

    finalize_response(resp, &state.config, request_origin)
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(serde_json::json!({"error": "Not found"}).to_string().into())
        .map_err(Box::new)?)
}
