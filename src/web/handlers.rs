use std::sync::{Arc, LazyLock};

use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse, Responder};
use chrono::{SecondsFormat, Utc};
use log::{debug, error, info, warn};
use regex::Regex;
use serde_json::json;
use tera::Context;
use uuid::Uuid;

use crate::error::ProxyError;
use crate::web::models::{
    ChatForm, ChatPayload, ChatRequest, ContactPayload, ContactRequest, ContactResponse,
};
use crate::widget::page::{locale_from_path, PageContext};
use crate::widget::{ChatWidget, LogSink};
use crate::AppState;

pub const MESSAGE_REQUIRED: &str = "Le message est requis";
pub const INVALID_JSON: &str = "Requête JSON invalide";
pub const CONTACT_FIELDS_REQUIRED: &str = "Tous les champs obligatoires doivent être remplis";
pub const CONTACT_GDPR_REQUIRED: &str = "Vous devez accepter les conditions RGPD";
pub const CONTACT_INVALID_EMAIL: &str = "Format d'email invalide";
pub const CONTACT_RECEIVED: &str = "Votre demande a été reçue. Nous vous contacterons sous 24h.";

const PREVIEW_CHARS: usize = 100;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub(crate) fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()[..7].to_string()
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn page_widget(path: &str) -> ChatWidget {
    ChatWidget::new()
        .with_language(locale_from_path(path))
        .with_page_context(PageContext::from_path(path))
        .with_sink(Arc::new(LogSink))
}

fn render_page(data: &AppState, path: &str, widget: &ChatWidget) -> HttpResponse {
    let mut context = Context::new();
    context.insert("path", path);
    context.insert("locale", locale_from_path(path));
    context.insert("page", PageContext::from_path(path).as_str());
    context.insert("chat", &widget.view());

    match data.tera.render("index.html", &context) {
        Ok(html) => HttpResponse::Ok().content_type("text/html").body(html),
        Err(e) => {
            error!("Template error: {}", e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

// Site page, with the chat widget rendered in its initial state
pub async fn index(data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    render_page(&data, req.path(), &page_widget(req.path()))
}

// Chat form posted from a page without script: one turn on a fresh widget,
// relayed through the backend, then the page is rendered again
pub async fn chat_form(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<ChatForm>,
) -> impl Responder {
    let mut widget = page_widget(req.path());
    widget.set_input(form.into_inner().message);

    if !widget.send(&data.backend).await {
        debug!("Blank chat form on {}", req.path());
    }
    render_page(&data, req.path(), &widget)
}

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Turns a body that could not be decoded into an `InvalidRequest`.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected body on {}: {}", req.path(), err);
    ProxyError::invalid(INVALID_JSON).into()
}

// Chat API endpoint: validate, forward to the backend, relay its JSON
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, ProxyError> {
    let request_id = new_request_id();
    info!("[{}] Chat API request started", request_id);

    let req = req.into_inner();
    let language = req.language_or_default();
    let ChatRequest { message, context, .. } = req;

    let message = match message {
        Some(message) if !message.is_empty() => message,
        _ => {
            warn!("[{}] Missing message in request", request_id);
            return Err(ProxyError::invalid(MESSAGE_REQUIRED));
        }
    };

    info!(
        "[{}] Message: {:?} (language: {}, context: {})",
        request_id,
        preview(&message),
        language,
        context.is_some()
    );

    let payload = ChatPayload {
        message,
        language,
        context,
    };

    match data.backend.chat(&payload, &request_id).await {
        Ok(body) => {
            debug!(
                "[{}] Backend reply has response: {}",
                request_id,
                body.get("response").is_some_and(|r| r.is_string())
            );
            info!("[{}] Chat API request completed successfully", request_id);
            Ok(HttpResponse::Ok().json(body))
        }
        Err(e) => {
            error!("[{}] Proxy error: {}", request_id, e);
            Err(e)
        }
    }
}

fn required(field: Option<String>) -> Result<String, ProxyError> {
    field
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ProxyError::invalid(CONTACT_FIELDS_REQUIRED))
}

/// Checks a contact submission in the order the form reports problems:
/// missing fields, then consent, then email format.
pub fn validate_contact(req: ContactRequest) -> Result<ContactPayload, ProxyError> {
    let name = required(req.name)?;
    let email = required(req.email)?;
    let company = required(req.company)?;
    let sector = required(req.sector)?;
    let message = required(req.message)?;

    if req.gdpr != Some(true) {
        return Err(ProxyError::invalid(CONTACT_GDPR_REQUIRED));
    }
    if !EMAIL_RE.is_match(&email) {
        return Err(ProxyError::invalid(CONTACT_INVALID_EMAIL));
    }

    Ok(ContactPayload {
        name,
        email,
        company,
        sector,
        message,
        gdpr: true,
        source: "contact_form",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

// Contact API endpoint. Backend failures are reported to the visitor as a
// received request; only input errors are surfaced.
pub async fn contact(
    data: web::Data<AppState>,
    req: web::Json<ContactRequest>,
) -> Result<HttpResponse, ProxyError> {
    let request_id = new_request_id();
    let payload = validate_contact(req.into_inner())?;

    info!(
        "[{}] Contact request from {} ({})",
        request_id, payload.company, payload.sector
    );

    match data.backend.contact(&payload, &request_id).await {
        Ok(body) => Ok(HttpResponse::Ok().json(body)),
        Err(e) => {
            warn!("[{}] Contact backend failed, answering with fallback: {}", request_id, e);
            Ok(HttpResponse::Ok().json(ContactResponse {
                success: true,
                message: CONTACT_RECEIVED.to_string(),
                fallback: Some(true),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_request() -> ContactRequest {
        ContactRequest {
            name: Some("Camille Martin".to_string()),
            email: Some("camille@usine.fr".to_string()),
            company: Some("Usine SA".to_string()),
            sector: Some("industrie".to_string()),
            message: Some("Un pilote ?".to_string()),
            gdpr: Some(true),
        }
    }

    fn invalid_message(result: Result<ContactPayload, ProxyError>) -> String {
        match result {
            Err(ProxyError::InvalidRequest(message)) => message,
            other => panic!("expected InvalidRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_truncates_long_messages() {
        assert_eq!(preview("bonjour"), "bonjour");
        let long = "é".repeat(150);
        let short = preview(&long);
        assert_eq!(short.chars().count(), PREVIEW_CHARS + 3);
        assert!(short.ends_with("..."));
        assert_eq!(preview(&"a".repeat(PREVIEW_CHARS)), "a".repeat(PREVIEW_CHARS));
    }

    #[test]
    fn test_request_ids_are_short() {
        let id = new_request_id();
        assert_eq!(id.len(), 7);
        assert_ne!(id, new_request_id());
    }

    #[test]
    fn test_valid_contact_is_stamped() {
        let payload = validate_contact(contact_request()).unwrap();
        assert_eq!(payload.source, "contact_form");
        assert!(payload.gdpr);
        assert!(payload.timestamp.ends_with('Z'));
        assert_eq!(payload.email, "camille@usine.fr");
    }

    #[test]
    fn test_missing_field_is_reported_first() {
        let mut req = contact_request();
        req.company = Some(String::new());
        req.gdpr = None;
        req.email = Some("not-an-email".to_string());
        assert_eq!(invalid_message(validate_contact(req)), CONTACT_FIELDS_REQUIRED);
    }

    #[test]
    fn test_consent_is_checked_before_email() {
        let mut req = contact_request();
        req.gdpr = Some(false);
        req.email = Some("not-an-email".to_string());
        assert_eq!(invalid_message(validate_contact(req)), CONTACT_GDPR_REQUIRED);
    }

    #[test]
    fn test_email_format() {
        for bad in ["camille", "camille@usine", "ca mille@usine.fr", "@usine.fr"] {
            let mut req = contact_request();
            req.email = Some(bad.to_string());
            assert_eq!(
                invalid_message(validate_contact(req)),
                CONTACT_INVALID_EMAIL,
                "{}",
                bad
            );
        }
    }
}
