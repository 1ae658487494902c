use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::auth::auth_middleware;
use crate::booking::{PromotionService, ReservationService};
use crate::handlers::{
    auth as auth_handlers, promotions as promotion_handlers,
    reservations as reservation_handlers, schedules as schedule_handlers,
    users as user_handlers, workspaces as workspace_handlers,
};
use crate::store::Store;
use crate::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
    pub reservations: ReservationService,
    pub promotions: PromotionService,
}

pub fn create_router(store: Arc<dyn Store>, config: Config) -> Router {
    let state = AppState {
        reservations: ReservationService::new(store.clone(), config.enforce_schedule_window),
        promotions: PromotionService::new(store.clone()),
        store,
        config,
    };

    // Public auth routes (no middleware)
    let public_auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login));

    // Protected auth routes (need auth)
    let protected_auth_routes = Router::new()
        .route("/me", get(auth_handlers::me).patch(auth_handlers::update_me))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let auth_routes = Router::new()
        .merge(public_auth_routes)
        .merge(protected_auth_routes);

    let workspace_routes = Router::new()
        .route(
            "/",
            get(workspace_handlers::list_workspaces).post(workspace_handlers::create_workspace),
        )
        .route(
            "/:id",
            get(workspace_handlers::get_workspace)
                .patch(workspace_handlers::update_workspace)
                .delete(workspace_handlers::delete_workspace),
        );

    // Schedule routes (nested under workspaces)
    let schedule_routes = Router::new()
        .route(
            "/",
            get(schedule_handlers::list_schedules).post(schedule_handlers::create_schedule),
        )
        .route(
            "/:schedule_id",
            patch(schedule_handlers::update_schedule_status)
                .delete(schedule_handlers::delete_schedule),
        );

    let reservation_routes = Router::new()
        .route(
            "/",
            get(reservation_handlers::list_reservations)
                .post(reservation_handlers::create_reservation),
        )
        .route(
            "/cancelled",
            get(reservation_handlers::list_cancelled_reservations),
        )
        .route(
            "/:id",
            get(reservation_handlers::get_reservation)
                .patch(reservation_handlers::update_reservation)
                .delete(reservation_handlers::cancel_reservation),
        );

    let promotion_routes = Router::new()
        .route(
            "/",
            get(promotion_handlers::list_promotions).post(promotion_handlers::create_promotion),
        )
        .route("/active", get(promotion_handlers::list_active_promotions))
        .route("/quote", post(promotion_handlers::quote_promotion))
        .route(
            "/:id",
            get(promotion_handlers::get_promotion)
                .patch(promotion_handlers::update_promotion)
                .delete(promotion_handlers::delete_promotion),
        );

    let user_routes = Router::new()
        .route("/", get(user_handlers::list_users))
        .route(
            "/:id",
            get(user_handlers::get_user).delete(user_handlers::delete_user),
        )
        .route("/:id/role", patch(user_handlers::update_user_role))
        .route(
            "/:id/reservations",
            get(reservation_handlers::list_user_reservations),
        )
        .route(
            "/:id/promotions",
            get(promotion_handlers::list_user_promotions),
        );

    // Protected routes with auth middleware
    let protected_routes = Router::new()
        .nest("/workspaces", workspace_routes)
        .nest("/workspaces/:id/schedules", schedule_routes)
        .nest("/reservations", reservation_routes)
        .nest("/promotions", promotion_routes)
        .nest("/users", user_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1", protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::store::MemoryStore;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use booking_shared::{Person, Role, Workspace, WorkspaceKind};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    const PASSWORD: &str = "Passw0rd!";

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            database_max_connections: 1,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in: 300,
            port: 0,
            enforce_schedule_window: false,
            admin_seed: None,
        }
    }

    struct TestApp {
        app: Router,
        store: Arc<MemoryStore>,
        workspace_id: Uuid,
    }

    async fn test_app() -> TestApp {
        let store = Arc::new(MemoryStore::new());
        let workspace = Workspace {
            id: Uuid::new_v4(),
            kind: WorkspaceKind::Desk,
            capacity: 2,
            hourly_rate: Decimal::new(10, 0),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        store.insert_workspace(&workspace).await.unwrap();

        TestApp {
            app: create_router(store.clone(), test_config()),
            store,
            workspace_id: workspace.id,
        }
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn login(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "email": email, "password": PASSWORD }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Registers a plain user over HTTP. Returns the token and user id.
    async fn register(app: &Router, email: &str) -> (String, String) {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            json!({ "name": "Test", "email": email, "password": PASSWORD }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        (
            body["access_token"].as_str().unwrap().to_string(),
            body["user_id"].as_str().unwrap().to_string(),
        )
    }

    /// Admins cannot self-register, so they go straight into the store.
    async fn admin(t: &TestApp, email: &str) -> (String, String) {
        let person = Person {
            id: Uuid::new_v4(),
            name: "Root".to_string(),
            email: email.to_string(),
            password_hash: hash_password(PASSWORD).unwrap(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        t.store.insert_person(&person).await.unwrap();
        (login(&t.app, email).await, person.id.to_string())
    }

    fn booking(reserved_by: &str, workspace_id: Uuid) -> Value {
        json!({
            "reserved_by": reserved_by,
            "workspace_id": workspace_id,
            "start_time": "2026-03-02T09:00:00Z",
            "end_time": "2026-03-02T11:00:00Z",
            "price": "20"
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        let t = test_app().await;
        let response = t
            .app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let t = test_app().await;
        let (status, body) =
            send(&t.app, Method::GET, "/api/v1/reservations", None, Value::Null).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["kind"], "unauthorized");
    }

    #[tokio::test]
    async fn test_register_ignores_requested_role() {
        let t = test_app().await;
        let (status, body) = send(
            &t.app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            json!({
                "name": "Mallory",
                "email": "mallory@example.com",
                "password": PASSWORD,
                "role": "admin"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "user");

        let token = body["access_token"].as_str().unwrap();
        let (status, _) =
            send(&t.app, Method::GET, "/api/v1/reservations", Some(token), Value::Null).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let t = test_app().await;
        let (status, body) = send(
            &t.app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            json!({ "name": "Ana", "email": "ana@example.com", "password": "password123" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let t = test_app().await;
        register(&t.app, "ana@example.com").await;

        let (status, body) = send(
            &t.app,
            Method::POST,
            "/api/v1/auth/register",
            None,
            json!({ "name": "Ana", "email": "ana@example.com", "password": PASSWORD }),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "conflict");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let t = test_app().await;
        register(&t.app, "ana@example.com").await;

        let (status, _) = send(
            &t.app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "email": "ana@example.com", "password": "not-the-password" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_reservation_lifecycle_over_http() {
        let t = test_app().await;
        let (token, user_id) = register(&t.app, "ana@example.com").await;

        let (status, body) = send(
            &t.app,
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            booking(&user_id, t.workspace_id),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reservation"]["status"], "active");
        let reservation_id = body["reservation"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &t.app,
            Method::DELETE,
            &format!("/api/v1/reservations/{}", reservation_id),
            Some(&token),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "cancelled");
        assert!(body["cancelled_at"].is_string());

        let (status, body) = send(
            &t.app,
            Method::GET,
            &format!("/api/v1/users/{}/reservations", user_id),
            Some(&token),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_admin_cannot_hold_reservation() {
        let t = test_app().await;
        let (token, admin_id) = admin(&t, "root@example.com").await;

        let (status, body) = send(
            &t.app,
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            booking(&admin_id, t.workspace_id),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_user");
    }

    #[tokio::test]
    async fn test_user_cannot_book_for_someone_else() {
        let t = test_app().await;
        let (token, _) = register(&t.app, "ana@example.com").await;
        let (_, other_id) = register(&t.app, "bo@example.com").await;

        let (status, _) = send(
            &t.app,
            Method::POST,
            "/api/v1/reservations",
            Some(&token),
            booking(&other_id, t.workspace_id),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_only_listing() {
        let t = test_app().await;
        let (user_token, _) = register(&t.app, "ana@example.com").await;
        let (admin_token, _) = admin(&t, "root@example.com").await;

        let uri = "/api/v1/reservations/cancelled";

        let (status, _) = send(&t.app, Method::GET, uri, Some(&user_token), Value::Null).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) =
            send(&t.app, Method::GET, uri, Some(&admin_token), Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_management() {
        let t = test_app().await;
        let (user_token, user_id) = register(&t.app, "ana@example.com").await;
        let (_, other_id) = register(&t.app, "bo@example.com").await;
        let (admin_token, admin_id) = admin(&t, "root@example.com").await;

        let (status, _) =
            send(&t.app, Method::GET, "/api/v1/users", Some(&user_token), Value::Null).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) =
            send(&t.app, Method::GET, "/api/v1/users", Some(&admin_token), Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert!(body[0].get("password_hash").is_none());

        // Users see themselves, not each other
        let own = format!("/api/v1/users/{}", user_id);
        let (status, body) = send(&t.app, Method::GET, &own, Some(&user_token), Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "ana@example.com");

        let other = format!("/api/v1/users/{}", other_id);
        let (status, _) = send(&t.app, Method::GET, &other, Some(&user_token), Value::Null).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &t.app,
            Method::PATCH,
            &format!("/api/v1/users/{}/role", other_id),
            Some(&admin_token),
            json!({ "role": "admin" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "admin");

        let (status, _) = send(
            &t.app,
            Method::DELETE,
            &format!("/api/v1/users/{}", admin_id),
            Some(&admin_token),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            send(&t.app, Method::DELETE, &other, Some(&admin_token), Value::Null).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&t.app, Method::GET, &other, Some(&admin_token), Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user_with_reservations_conflicts() {
        let t = test_app().await;
        let (user_token, user_id) = register(&t.app, "ana@example.com").await;
        let (admin_token, _) = admin(&t, "root@example.com").await;

        let (status, _) = send(
            &t.app,
            Method::POST,
            "/api/v1/reservations",
            Some(&user_token),
            booking(&user_id, t.workspace_id),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &t.app,
            Method::DELETE,
            &format!("/api/v1/users/{}", user_id),
            Some(&admin_token),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["kind"], "conflict");
    }

    #[tokio::test]
    async fn test_promotion_quote() {
        let t = test_app().await;
        let (admin_token, _) = admin(&t, "root@example.com").await;

        let (status, _) = send(
            &t.app,
            Method::POST,
            "/api/v1/promotions",
            Some(&admin_token),
            json!({
                "description": "Monday deal",
                "discount": "20",
                "discount_type": "percent",
                "start_time": "2026-03-01T00:00:00Z",
                "end_time": "2026-03-31T00:00:00Z",
                "min_duration_minutes": 60,
                "applicable_days": ["Mon"]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &t.app,
            Method::POST,
            "/api/v1/promotions/quote",
            Some(&admin_token),
            json!({
                "workspace_id": t.workspace_id,
                "start_time": "2026-03-02T09:00:00Z",
                "end_time": "2026-03-02T11:00:00Z",
                "price": "100"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let adjusted: Decimal = body["adjusted_price"].as_str().unwrap().parse().unwrap();
        assert_eq!(adjusted, Decimal::new(80, 0));

        // Outside the promotion window
        let (status, body) = send(
            &t.app,
            Method::POST,
            "/api/v1/promotions/quote",
            Some(&admin_token),
            json!({
                "workspace_id": t.workspace_id,
                "start_time": "2026-04-06T09:00:00Z",
                "end_time": "2026-04-06T11:00:00Z",
                "price": "100"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn test_oversized_min_duration_is_rejected() {
        let t = test_app().await;
        let (admin_token, _) = admin(&t, "root@example.com").await;

        let (status, body) = send(
            &t.app,
            Method::POST,
            "/api/v1/promotions",
            Some(&admin_token),
            json!({
                "description": "Forever deal",
                "discount": "20",
                "discount_type": "percent",
                "start_time": "2026-03-01T00:00:00Z",
                "end_time": "2026-03-31T00:00:00Z",
                "min_duration_minutes": i64::MAX,
                "applicable_days": ["Mon"]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");

        let (status, body) = send(
            &t.app,
            Method::POST,
            "/api/v1/promotions/quote",
            Some(&admin_token),
            json!({
                "workspace_id": t.workspace_id,
                "start_time": "2026-03-02T09:00:00Z",
                "end_time": "2026-03-02T11:00:00Z",
                "price": "100"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_null());
    }
}
