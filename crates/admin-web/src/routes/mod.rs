//! Route handlers for the admin web console.

pub mod alert;
pub mod auth;
pub mod health;

use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // HTML pages
        .route("/", get(|| async { Redirect::to(alert::PAGE) }))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route(alert::PAGE, get(alert::send_alert_page))
        // HTMX actions
        .route("/admin/send-alert/toggle/:id", post(alert::toggle))
        .route("/admin/send-alert/toggle-all", post(alert::toggle_all))
        .route("/admin/send-alert/compose", post(alert::open_compose))
        .route("/admin/send-alert/compose/close", post(alert::close_compose))
        .route("/admin/send-alert/compose/edit", post(alert::edit_compose))
        .route("/admin/send-alert/send", post(alert::send))
        // Health check
        .route("/health", get(health::health))
        // API endpoints
        .route("/api/console", get(alert::console_api))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use alert_desk::SessionContext;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use disaster_api::{AlertApi, AlertRequest, ApiError, LoginRequest, Recipient};
    use tower::ServiceExt;

    use super::*;

    #[derive(Default)]
    struct MockApi {
        fail_users: AtomicBool,
        fail_send: AtomicBool,
        sent: Mutex<Vec<AlertRequest>>,
    }

    #[async_trait]
    impl AlertApi for MockApi {
        async fn list_users(&self) -> Result<Vec<Recipient>, ApiError> {
            if self.fail_users.load(Ordering::SeqCst) {
                return Err(ApiError::Config("down".to_string()));
            }
            Ok(vec![
                Recipient::new("1", "Alice", "a@x.com"),
                Recipient::new("2", "Bob", "b@x.com"),
            ])
        }

        async fn send_alert(&self, request: &AlertRequest) -> Result<(), ApiError> {
            self.sent.lock().unwrap().push(request.clone());
            if self.fail_send.load(Ordering::SeqCst) {
                return Err(ApiError::Config("down".to_string()));
            }
            Ok(())
        }

        async fn login(&self, request: &LoginRequest) -> Result<(), ApiError> {
            if request.password == "secret" {
                Ok(())
            } else {
                Err(ApiError::Config("bad credentials".to_string()))
            }
        }
    }

    struct Harness {
        app: Router,
        api: Arc<MockApi>,
        state: AppState,
    }

    impl Harness {
        fn new(session: SessionContext) -> Self {
            let api = Arc::new(MockApi::default());
            let state = AppState::new(api.clone(), "Disaster Alert", session).unwrap();
            Self {
                app: router().with_state(state.clone()),
                api,
                state,
            }
        }

        fn logged_in() -> Self {
            Self::new(SessionContext::authenticated())
        }

        async fn get(&self, uri: &str) -> Response {
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            self.app.clone().oneshot(request).await.unwrap()
        }

        async fn post(&self, uri: &str, form: &[(&str, &str)]) -> Response {
            let body = form
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            let request = Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap();
            self.app.clone().oneshot(request).await.unwrap()
        }

        async fn snapshot(&self) -> serde_json::Value {
            let response = self.get("/api/console").await;
            serde_json::from_str(&body_text(response).await).unwrap()
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    const BODY: &str = "<h1>Disaster Alert</h1><p>Dear User,</p>";

    #[tokio::test]
    async fn test_page_requires_session() {
        let harness = Harness::new(SessionContext::anonymous());
        let response = harness.get("/admin/send-alert").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_root_redirects_to_console() {
        let harness = Harness::logged_in();
        let response = harness.get("/").await;
        assert_eq!(location(&response), "/admin/send-alert");
    }

    #[tokio::test]
    async fn test_page_lists_roster() {
        let harness = Harness::logged_in();
        let response = harness.get("/admin/send-alert").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Alice"));
        assert!(html.contains("b@x.com"));
        assert!(html.contains("Select All"));
    }

    #[tokio::test]
    async fn test_page_load_failure_shows_toast() {
        let harness = Harness::logged_in();
        harness.api.fail_users.store(true, Ordering::SeqCst);

        let html = body_text(harness.get("/admin/send-alert").await).await;
        assert!(html.contains("Failed to fetch users"));
        assert_eq!(harness.snapshot().await["rows"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_toggle_and_toggle_all() {
        let harness = Harness::logged_in();
        harness.get("/admin/send-alert").await;

        let response = harness.post("/admin/send-alert/toggle/1", &[]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/send-alert");
        assert_eq!(harness.snapshot().await["selected"], serde_json::json!(["1"]));

        let response = harness.post("/admin/send-alert/toggle-all", &[]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/send-alert");

        // Following the redirect remounts; the selection survives the reload.
        let html = body_text(harness.get("/admin/send-alert").await).await;
        assert!(html.contains("Deselect All"));
        let snapshot = harness.snapshot().await;
        assert_eq!(snapshot["selected"], serde_json::json!(["1", "2"]));
        assert_eq!(snapshot["all_selected"], true);

        harness.post("/admin/send-alert/toggle-all", &[]).await;
        assert_eq!(harness.snapshot().await["selected"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_compose_needs_selection() {
        let harness = Harness::logged_in();
        harness.get("/admin/send-alert").await;

        let response = harness.post("/admin/send-alert/compose", &[]).await;
        assert_eq!(location(&response), "/admin/send-alert");
        assert_eq!(harness.snapshot().await["modal_open"], false);

        harness.post("/admin/send-alert/toggle/2", &[]).await;
        harness.post("/admin/send-alert/compose", &[]).await;
        assert_eq!(harness.snapshot().await["modal_open"], true);
        let html = body_text(harness.get("/admin/send-alert").await).await;
        assert!(html.contains("Selected Users"));

        let response = harness.post("/admin/send-alert/compose/close", &[]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(harness.snapshot().await["modal_open"], false);
    }

    #[tokio::test]
    async fn test_send_success_closes_modal() {
        let harness = Harness::logged_in();
        harness.get("/admin/send-alert").await;
        harness.post("/admin/send-alert/toggle/1", &[]).await;
        harness.post("/admin/send-alert/compose", &[]).await;

        let html = body_text(
            harness
                .post(
                    "/admin/send-alert/send",
                    &[("subject", "Disaster Alert"), ("body", BODY)],
                )
                .await,
        )
        .await;
        assert!(html.contains("Email sent successfully"));

        let sent = harness.api.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].users, vec![Recipient::new("1", "Alice", "a@x.com")]);
        assert_eq!(
            sent[0].html_content,
            "<h1>Disaster Alert</h1>\n<p>Dear User,</p>\n"
        );
        assert_eq!(harness.snapshot().await["modal_open"], false);
    }

    #[tokio::test]
    async fn test_send_failure_keeps_modal_and_state() {
        let harness = Harness::logged_in();
        harness.api.fail_send.store(true, Ordering::SeqCst);
        harness.get("/admin/send-alert").await;
        harness.post("/admin/send-alert/toggle/1", &[]).await;
        harness.post("/admin/send-alert/compose", &[]).await;

        let html = body_text(
            harness
                .post(
                    "/admin/send-alert/send",
                    &[("subject", "Disaster Alert"), ("body", BODY)],
                )
                .await,
        )
        .await;
        assert!(html.contains("Failed to send email"));

        let snapshot = harness.snapshot().await;
        assert_eq!(snapshot["modal_open"], true);
        assert_eq!(snapshot["selected"], serde_json::json!(["1"]));
        assert_eq!(
            snapshot["html_content"],
            "<h1>Disaster Alert</h1>\n<p>Dear User,</p>\n"
        );
        assert_eq!(snapshot["sending"], false);
    }

    #[tokio::test]
    async fn test_invalid_markup_is_not_sent() {
        let harness = Harness::logged_in();
        harness.get("/admin/send-alert").await;
        harness.post("/admin/send-alert/toggle/1", &[]).await;
        harness.post("/admin/send-alert/compose", &[]).await;
        let before = harness.snapshot().await["html_content"].clone();

        let html = body_text(
            harness
                .post(
                    "/admin/send-alert/send",
                    &[("subject", "Disaster Alert"), ("body", "<p>unclosed")],
                )
                .await,
        )
        .await;
        assert!(html.contains("Invalid alert body"));
        assert!(harness.api.sent.lock().unwrap().is_empty());
        assert_eq!(harness.snapshot().await["html_content"], before);
    }

    #[tokio::test]
    async fn test_live_edit_updates_preview() {
        let harness = Harness::logged_in();
        harness.get("/admin/send-alert").await;

        harness
            .post(
                "/admin/send-alert/compose/edit",
                &[("subject", "Flood Alert"), ("body", "<p>Move to <b>high</b> ground</p>")],
            )
            .await;
        let snapshot = harness.snapshot().await;
        assert_eq!(snapshot["subject"], "Flood Alert");
        assert_eq!(
            snapshot["html_content"],
            "<p>Move to <strong>high</strong> ground</p>\n"
        );
    }

    #[tokio::test]
    async fn test_live_edit_with_invalid_markup_shows_toast() {
        let harness = Harness::logged_in();
        harness.get("/admin/send-alert").await;
        let before = harness.snapshot().await["html_content"].clone();

        let html = body_text(
            harness
                .post(
                    "/admin/send-alert/compose/edit",
                    &[("subject", "Disaster Alert"), ("body", "<p>unclosed")],
                )
                .await,
        )
        .await;
        let start = html.find("id=\"toasts\"").unwrap();
        let end = html.find("<main").unwrap();
        let toasts = &html[start..end];
        assert!(toasts.contains("Invalid alert body"));
        assert_eq!(harness.snapshot().await["html_content"], before);
    }

    #[tokio::test]
    async fn test_send_while_in_flight_keeps_draft() {
        let harness = Harness::logged_in();
        harness.get("/admin/send-alert").await;
        harness.post("/admin/send-alert/toggle/1", &[]).await;
        harness.post("/admin/send-alert/compose", &[]).await;
        let before = harness.snapshot().await;

        let guard = harness.state.dispatcher.try_begin().unwrap();
        let html = body_text(
            harness
                .post(
                    "/admin/send-alert/send",
                    &[("subject", "Changed"), ("body", BODY)],
                )
                .await,
        )
        .await;
        assert!(html.contains("Sending..."));

        let after = harness.snapshot().await;
        assert_eq!(after["subject"], before["subject"]);
        assert_eq!(after["html_content"], before["html_content"]);
        assert_eq!(after["sending"], true);
        assert!(harness.api.sent.lock().unwrap().is_empty());

        drop(guard);
        assert_eq!(harness.snapshot().await["sending"], false);
    }

    #[tokio::test]
    async fn test_login_flow() {
        let harness = Harness::new(SessionContext::anonymous());

        let html = body_text(
            harness
                .post("/login", &[("email", "admin@x.com"), ("password", "wrong")])
                .await,
        )
        .await;
        assert!(html.contains("Login failed"));
        assert_eq!(harness.snapshot().await["authenticated"], false);

        let response = harness
            .post("/login", &[("email", "admin@x.com"), ("password", "secret")])
            .await;
        assert_eq!(location(&response), "/admin/send-alert");
        assert_eq!(harness.snapshot().await["authenticated"], true);

        let response = harness.post("/logout", &[]).await;
        assert_eq!(location(&response), "/login");
        assert_eq!(harness.snapshot().await["authenticated"], false);
    }

    #[tokio::test]
    async fn test_health() {
        let harness = Harness::logged_in();
        let response = harness.get("/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["sending"], false);
    }
}
