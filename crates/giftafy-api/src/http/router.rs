//! Axum router configuration with middleware.
//!
//! - `/functions/v1/*`: the hosted gift functions (flat error bodies)
//! - `/auth/v1/*`: sign-up, sign-in, session lookup, sign-out
//! - `/api/v1/*`: dashboard and gift finder (envelope responses)
//!
//! Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let function_routes = Router::new()
        .route("/search-gifts", post(handlers::functions::search_gifts))
        .route("/save-gift", post(handlers::functions::save_gift));

    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::sign_up))
        .route("/token", post(handlers::auth::sign_in))
        .route("/user", get(handlers::auth::current_user))
        .route("/logout", post(handlers::auth::sign_out));

    let api_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/saved-gifts", get(handlers::dashboard::list_saved_gifts))
        .route(
            "/saved-gifts/{id}/favorite",
            patch(handlers::dashboard::toggle_favorite),
        )
        .route(
            "/saved-gifts/{id}",
            delete(handlers::dashboard::delete_saved_gift),
        )
        .route(
            "/search-history",
            get(handlers::dashboard::list_search_history),
        )
        // Public
        .route("/gift-finder", post(handlers::finder::find_gifts))
        .route("/catalog", get(handlers::finder::get_catalog));

    Router::new()
        .nest("/functions/v1", function_routes)
        .nest("/auth/v1", auth_routes)
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ClientContext;
    use giftafy_core::search::remote::{GiftSaver, RemoteGiftSearch};
    use giftafy_infra::http::client::HttpGiftFunctions;
    use giftafy_types::account::{Credentials, SubscriptionTier};
    use giftafy_types::config::GiftafyConfig;
    use giftafy_types::error::{SaveError, SearchError};
    use giftafy_types::function::{SaveGiftRequest, SearchGiftsRequest};
    use secrecy::SecretString;
    use serde_json::Value;

    struct TestServer {
        base_url: String,
        state: AppState,
        http: reqwest::Client,
    }

    async fn spawn_server() -> TestServer {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_path_buf();
        // Leak tempdir so the database outlives the test body
        std::mem::forget(dir);

        let ctx = ClientContext::from_config(data_dir, GiftafyConfig::default())
            .await
            .unwrap();
        let state = AppState::open(ctx).await.unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = build_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestServer {
            base_url: format!("http://{addr}"),
            state,
            http: reqwest::Client::new(),
        }
    }

    async fn sign_up(server: &TestServer, email: &str) -> String {
        let session = server
            .state
            .account_service
            .sign_up(&Credentials {
                email: email.to_string(),
                password: "correct horse battery".to_string(),
            })
            .await
            .unwrap();
        session.access_token
    }

    fn client(server: &TestServer, token: Option<&str>) -> HttpGiftFunctions {
        let client = HttpGiftFunctions::new(&server.base_url, Some(10)).unwrap();
        match token {
            Some(t) => client.with_access_token(SecretString::from(t.to_string())),
            None => client,
        }
    }

    fn request(terms: &str) -> SearchGiftsRequest {
        SearchGiftsRequest {
            search_terms: terms.to_string(),
            min_price: Some(50.0),
            max_price: Some(100.0),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let server = spawn_server().await;
        let body: Value = server
            .http
            .get(format!("{}/health", server.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_search_requires_session() {
        let server = spawn_server().await;
        let err = client(&server, None)
            .search_gifts(&request("Birthday gift for Friend"))
            .await
            .unwrap_err();
        assert_eq!(err, SearchError::AuthenticationRequired);

        let err = client(&server, Some("not-a-session"))
            .search_gifts(&request("Birthday gift for Friend"))
            .await
            .unwrap_err();
        assert_eq!(err, SearchError::AuthenticationRequired);
    }

    #[tokio::test]
    async fn test_search_within_budget_then_quota() {
        let server = spawn_server().await;
        let token = sign_up(&server, "quota@example.com").await;
        let remote = client(&server, Some(&token));

        let gifts = remote
            .search_gifts(&request("Birthday cooking gift for Friend 26-35"))
            .await
            .unwrap();
        assert!(!gifts.is_empty());
        for gift in &gifts {
            let price = gift.price_value().unwrap();
            assert!((50.0..=100.0).contains(&price), "{} out of budget", gift.title);
        }

        // Free tier allows five searches a day.
        for _ in 0..4 {
            remote.search_gifts(&request("Birthday")).await.unwrap();
        }
        let err = remote.search_gifts(&request("Birthday")).await.unwrap_err();
        assert_eq!(err, SearchError::QuotaExceeded);
    }

    #[tokio::test]
    async fn test_save_gift_and_favorite_gate() {
        let server = spawn_server().await;
        let token = sign_up(&server, "saver@example.com").await;
        let remote = client(&server, Some(&token));

        let gift = server.state.catalog.baseline()[0].record.clone();

        let err = client(&server, None)
            .save_gift(&SaveGiftRequest { gift: gift.clone(), is_favorite: false })
            .await
            .unwrap_err();
        assert_eq!(err, SaveError::AuthenticationRequired);

        let err = remote
            .save_gift(&SaveGiftRequest { gift: gift.clone(), is_favorite: true })
            .await
            .unwrap_err();
        assert_eq!(err, SaveError::CapabilityDenied);

        let saved = remote
            .save_gift(&SaveGiftRequest { gift: gift.clone(), is_favorite: false })
            .await
            .unwrap();
        assert_eq!(saved.gift.title, gift.title);

        server
            .state
            .account_service
            .set_tier("saver@example.com", SubscriptionTier::Pro)
            .await
            .unwrap();
        let favorite = remote
            .save_gift(&SaveGiftRequest { gift, is_favorite: true })
            .await
            .unwrap();
        assert!(favorite.is_favorite);
    }

    #[tokio::test]
    async fn test_dashboard_envelope() {
        let server = spawn_server().await;
        let token = sign_up(&server, "dash@example.com").await;
        client(&server, Some(&token))
            .search_gifts(&request("Wedding gift for Partner"))
            .await
            .unwrap();

        let body: Value = server
            .http
            .get(format!("{}/api/v1/dashboard", server.base_url))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"]["account"]["searchCount"], 1);
        assert_eq!(body["data"]["account"]["dailySearches"], 5);
        assert_eq!(
            body["data"]["recentSearches"][0]["searchTerms"],
            "Wedding gift for Partner"
        );
        assert!(body["meta"]["request_id"].is_string());

        let unauthorized = server
            .http
            .get(format!("{}/api/v1/dashboard", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(unauthorized.status().as_u16(), 401);
        let body: Value = unauthorized.json().await.unwrap();
        assert_eq!(body["errors"][0]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_cannot_delete_another_users_gift() {
        let server = spawn_server().await;
        let owner = sign_up(&server, "owner@example.com").await;
        let intruder = sign_up(&server, "intruder@example.com").await;

        let gift = server.state.catalog.baseline()[0].record.clone();
        let saved = client(&server, Some(&owner))
            .save_gift(&SaveGiftRequest { gift, is_favorite: false })
            .await
            .unwrap();

        let response = server
            .http
            .delete(format!("{}/api/v1/saved-gifts/{}", server.base_url, saved.id))
            .bearer_auth(&intruder)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404);

        let response = server
            .http
            .delete(format!("{}/api/v1/saved-gifts/{}", server.base_url, saved.id))
            .bearer_auth(&owner)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn test_gift_finder_projection() {
        let server = spawn_server().await;
        let body: Value = server
            .http
            .post(format!(
                "{}/api/v1/gift-finder?sort=priceAsc&price=50to100",
                server.base_url
            ))
            .json(&serde_json::json!({
                "relationship": "Friend",
                "ageRange": "26-35",
                "occasion": "Birthday",
                "interests": "cooking",
                "budgetLabel": "$50-$100"
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body["data"]["phrase"], "Birthday cooking gift for Friend 26-35");
        let prices: Vec<f64> = body["data"]["gifts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| {
                g["price"]
                    .as_str()
                    .unwrap()
                    .trim_start_matches('$')
                    .parse::<f64>()
                    .unwrap()
            })
            .collect();
        assert!(!prices.is_empty());
        assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_auth_endpoints_roundtrip() {
        let server = spawn_server().await;
        let signup = server
            .http
            .post(format!("{}/auth/v1/signup", server.base_url))
            .json(&serde_json::json!({ "email": "Ada@Example.com", "password": "longenough" }))
            .send()
            .await
            .unwrap();
        assert_eq!(signup.status().as_u16(), 200);

        let weak = server
            .http
            .post(format!("{}/auth/v1/signup", server.base_url))
            .json(&serde_json::json!({ "email": "bob@example.com", "password": "short" }))
            .send()
            .await
            .unwrap();
        assert_eq!(weak.status().as_u16(), 400);

        let token_body: Value = server
            .http
            .post(format!("{}/auth/v1/token", server.base_url))
            .json(&serde_json::json!({ "email": "ada@example.com", "password": "longenough" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let token = token_body["data"]["access_token"].as_str().unwrap().to_string();

        let user: Value = server
            .http
            .get(format!("{}/auth/v1/user", server.base_url))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(user["data"]["email"], "ada@example.com");
        assert!(user["data"].get("password_hash").is_none());

        server
            .http
            .post(format!("{}/auth/v1/logout", server.base_url))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        let after = server
            .http
            .get(format!("{}/auth/v1/user", server.base_url))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(after.status().as_u16(), 401);
    }
}
