//! Full-constellation test: the auth and user services run on real
//! sockets, the gateway forwards to them, and the user service verifies
//! bearer tokens against the live auth service.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::sync::Arc;
use switchyard::auth_delegate::{AuthDelegate, HttpTokenVerifier};
use switchyard::auth_service::{self, AuthServiceContext};
use switchyard::config::Config;
use switchyard::gateway::registry::{ServiceRegistry, ServiceRoute};
use switchyard::gateway::router::{self, GatewayState};
use switchyard::gateway::service_client::ServiceClient;
use switchyard::store::{InMemoryProfileStore, InMemoryUserStore};
use switchyard::token::TokenService;
use switchyard::user_service::{self, UserServiceContext};
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        port: 0,
        jwt_secret: "end-to-end-test-secret-0123456789".to_string(),
        access_token_expire_minutes: 60,
        auth_service_url: String::new(),
        user_service_url: String::new(),
        analytics_service_url: String::new(),
        gateway_timeout_secs: 5,
        verify_timeout_secs: 5,
        rust_log: "info".to_string(),
    }
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn spawn_constellation() -> Router {
    let config = Arc::new(test_config());

    let auth_app = auth_service::router(Arc::new(AuthServiceContext {
        tokens: TokenService::new(&config.jwt_secret),
        users: Arc::new(InMemoryUserStore::new()),
        config: config.clone(),
    }));
    let auth_url = serve(auth_app).await;

    let verifier = HttpTokenVerifier::new(&auth_url, config.verify_timeout_secs).unwrap();
    let user_app = user_service::router(Arc::new(UserServiceContext {
        auth: AuthDelegate::new(Arc::new(verifier)),
        profiles: Arc::new(InMemoryProfileStore::new()),
    }));
    let user_url = serve(user_app).await;

    let registry = ServiceRegistry::new(vec![
        ServiceRoute::new("auth", "/auth", &auth_url),
        ServiceRoute::new("users", "/users", &user_url),
    ])
    .unwrap();
    let service_client = ServiceClient::new(config.gateway_timeout_secs).unwrap();

    router::router(Arc::new(GatewayState {
        registry,
        service_client,
    }))
}

#[tokio::test]
async fn register_login_and_manage_profile_through_gateway() {
    let gateway = spawn_constellation().await;

    // Register through the gateway
    let registered = gateway
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "email": "alice@example.com", "password": "wonderland" })
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(registered.status(), StatusCode::CREATED);

    // Log in through the gateway
    let login = gateway
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/token")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from("username=alice%40example.com&password=wonderland"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let token = json_body(login).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    // Create a profile; the user service verifies the token against the
    // live auth service before acting
    let created = gateway
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users/profiles")
                .header("authorization", format!("Bearer {}", token))
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({ "name": "Alice", "bio": "explorer" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    assert_eq!(json_body(created).await["user_id"], 1);

    // Read it back
    let me = gateway
        .clone()
        .oneshot(
            Request::builder()
                .uri("/users/profiles/me")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(json_body(me).await["name"], "Alice");

    // A forged token is rejected by the delegation chain with 401
    let forged = gateway
        .oneshot(
            Request::builder()
                .uri("/users/profiles/me")
                .header("authorization", "Bearer abc.def.ghi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
}
