use reqwest::Method;
use wiremock::{Mock, ResponseTemplate, matchers::any};

use crate::helpers::{spawn_app, spawn_app_with};

#[tokio::test]
async fn preflight_returns_200_with_an_empty_body() {
    let app = spawn_app().await;

    let response = app.request_subscription(Method::OPTIONS).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
    assert!(
        response.headers()["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .contains("POST")
    );
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn preflight_succeeds_even_without_provider_configuration() {
    let app = spawn_app_with(|config| {
        config.email_client.audience_id = None;
        config.email_client.sender_email = None;
    })
    .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.request_subscription(Method::OPTIONS).await;

    assert_eq!(200, response.status().as_u16());
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn other_methods_are_rejected_with_405() {
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
        let response = app.request_subscription(method.clone()).await;

        assert_eq!(
            405,
            response.status().as_u16(),
            "The API did not return 405 for {method}."
        );
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Method not allowed" }));
    }
}

#[tokio::test]
async fn configured_origin_is_sent_on_every_response() {
    let app = spawn_app_with(|config| {
        config.app.allowed_origin = "https://blssm.framer.website".into();
    })
    .await;

    let response = app.post_subscription("name=Ursula".into()).await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://blssm.framer.website"
    );
}
