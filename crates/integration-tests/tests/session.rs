//! Session handling: bearer header, login/logout and forced logout.

use dancemode_client::api::ApiError;
use dancemode_client::services::AuthError;
use dancemode_client::state::{keys, pages};
use dancemode_client::storage::Storage;
use dancemode_client::store::Readable;
use dancemode_core::models::LoginRequest;
use dancemode_core::{AuthState, CartItem, CartItemKind, Price};
use dancemode_integration_tests::{TestContext, id, ok, user_json};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn login_request() -> LoginRequest {
    LoginRequest {
        email: "ada@example.com".to_string(),
        password: "swingout".to_string().into(),
    }
}

fn add_to_cart(ctx: &TestContext) {
    ctx.client.cart().add_item(CartItem::new(
        id(1),
        CartItemKind::Event,
        Price::from_cents(4500),
    ));
}

#[tokio::test]
async fn test_sign_in_stores_session_and_sends_bearer() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "swingout" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({
            "token": "tok\u{e9}en-1",
            "user": user_json(),
        }))))
        .expect(1)
        .mount(&ctx.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/events"))
        .and(header("authorization", "Bearer token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .expect(1)
        .mount(&ctx.server)
        .await;

    ctx.client
        .auth()
        .sign_in(ctx.client.api(), &login_request())
        .await
        .unwrap();

    let auth = ctx.client.state().auth().get();
    assert!(auth.is_authenticated);
    assert_eq!(auth.token.as_deref(), Some("token-1"));
    assert!(ctx.storage.contains(keys::AUTH));

    let events = ctx.client.api().list_events().await.unwrap();
    assert!(events.is_empty());
}

#[tokio::test]
async fn test_anonymous_requests_have_no_bearer() {
    let ctx = TestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/venues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .mount(&ctx.server)
        .await;

    ctx.client.api().list_venues().await.unwrap();

    assert_eq!(ctx.authorization_headers().await, vec![None]);
}

#[tokio::test]
async fn test_unauthorized_forces_logout_and_keeps_cart() {
    let ctx = TestContext::new().await;
    ctx.sign_in("stale-token");
    ctx.storage.set(keys::AUTH_TOKEN, "stale-token").unwrap();
    add_to_cart(&ctx);

    Mock::given(method("GET"))
        .and(path("/api/users/registrations"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "Invalid token",
        })))
        .mount(&ctx.server)
        .await;

    let err = ctx.client.api().my_registrations().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    let state = ctx.client.state();
    assert_eq!(state.auth().get(), AuthState::anonymous());
    assert!(!ctx.storage.contains(keys::AUTH));
    assert!(!ctx.storage.contains(keys::AUTH_TOKEN));
    assert_eq!(state.navigation().get().current_page, pages::LOGIN);
    assert_eq!(state.cart().get().len(), 1);
}

#[tokio::test]
async fn test_failed_sign_in_leaves_state_anonymous() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;

    let err = ctx
        .client
        .auth()
        .sign_in(ctx.client.api(), &login_request())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Api(ApiError::Unauthorized)));
    assert!(!ctx.client.state().is_authenticated());
    assert!(!ctx.client.state().loading().get().auth);
}

#[tokio::test]
async fn test_sign_out_clears_session_even_if_request_fails() {
    let ctx = TestContext::new().await;
    ctx.sign_in("token-2");
    add_to_cart(&ctx);

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(header("authorization", "Bearer token-2"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&ctx.server)
        .await;

    ctx.client.auth().sign_out(ctx.client.api()).await;

    assert_eq!(ctx.client.state().auth().get(), AuthState::anonymous());
    assert!(!ctx.storage.contains(keys::AUTH));
    assert!(ctx.client.state().cart().get().is_empty());
}

#[tokio::test]
async fn test_logout_policy_can_keep_cart() {
    let ctx = TestContext::with_config(|config| config.logout_policy.clear_cart = false).await;
    ctx.sign_in("token-3");
    add_to_cart(&ctx);

    ctx.client.auth().logout();

    assert!(!ctx.client.state().is_authenticated());
    assert_eq!(ctx.client.state().cart().get().len(), 1);
}

#[tokio::test]
async fn test_save_profile_updates_stored_user() {
    let ctx = TestContext::new().await;
    ctx.sign_in("token-4");

    let mut updated = user_json();
    updated["first_name"] = json!("Norma");
    updated["role"] = json!("creator");

    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .and(body_json(json!({ "first_name": "Norma" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(updated)))
        .mount(&ctx.server)
        .await;

    let update = dancemode_core::models::UserProfileUpdate {
        first_name: Some("Norma".to_string()),
        ..Default::default()
    };
    ctx.client
        .auth()
        .save_profile(ctx.client.api(), &update)
        .await
        .unwrap();

    let state = ctx.client.state();
    assert_eq!(state.display_name().get().as_deref(), Some("Norma Lindy"));
    assert!(state.is_creator().get());
    assert_eq!(state.auth().get().token.as_deref(), Some("token-4"));
}
