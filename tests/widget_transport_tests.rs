//! Widget against an HTTP chat endpoint, served by `wiremock`.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kokotajlo_site::error::{CHAT_ERROR_MESSAGE, CHAT_FALLBACK_RESPONSE};
use kokotajlo_site::widget::{ChatWidget, HttpTransport, PageContext, Role, RETRY_PROMPT};

#[tokio::test]
async fn test_widget_round_trip_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "message": "Vous faites du RAG ?",
            "language": "fr",
            "context": { "page": "services" }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "response": "Oui, RAG + MCP." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&format!("{}/", server.uri()));
    assert_eq!(transport.endpoint(), format!("{}/api/chat", server.uri()));

    let mut widget = ChatWidget::new().with_page_context(PageContext::Services);
    widget.set_input("  Vous faites du RAG ?  ");
    assert!(widget.send(&transport).await);

    let messages = widget.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "Vous faites du RAG ?");
    assert_eq!(messages[1].role, Role::Bot);
    assert_eq!(messages[1].content, "Oui, RAG + MCP.");
}

#[tokio::test]
async fn test_proxy_error_body_is_shown_as_its_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": CHAT_ERROR_MESSAGE,
            "response": CHAT_FALLBACK_RESPONSE
        })))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&server.uri());
    let mut widget = ChatWidget::new();
    widget.set_input("bonjour");
    widget.send(&transport).await;

    assert_eq!(widget.messages()[1].role, Role::Bot);
    assert_eq!(widget.messages()[1].content, CHAT_FALLBACK_RESPONSE);
}

#[tokio::test]
async fn test_undecodable_reply_becomes_retry_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let transport = HttpTransport::new(&server.uri());
    let mut widget = ChatWidget::new();
    widget.set_input("bonjour");
    widget.send(&transport).await;

    assert_eq!(widget.messages()[1].role, Role::Error);
    assert_eq!(widget.messages()[1].content, RETRY_PROMPT);
    assert!(!widget.is_sending());
}
