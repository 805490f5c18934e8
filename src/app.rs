use axum::{extract::FromRef, middleware, routing::get, Router};
use std::sync::Arc;
use tera::Tera;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::{
    api::ApiClient,
    auth::{auth_middleware, InFlight},
    config::Config,
    handlers,
    models::session_store::SweepingMemoryStore,
};

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub in_flight: InFlight,
    pub tera: Tera,
    pub config: Arc<Config>,
    pub sessions: SweepingMemoryStore,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let api = ApiClient::new(&config.api.base_url, config.api_timeout())?;
        let tera = Tera::new("templates/**/*.html")?;

        Ok(Self {
            api,
            in_flight: InFlight::default(),
            tera,
            config: Arc::new(config),
            sessions: SweepingMemoryStore::default(),
        })
    }
}

impl FromRef<AppState> for ApiClient {
    fn from_ref(state: &AppState) -> Self {
        state.api.clone()
    }
}

impl FromRef<AppState> for InFlight {
    fn from_ref(state: &AppState) -> Self {
        state.in_flight.clone()
    }
}

impl FromRef<AppState> for Tera {
    fn from_ref(state: &AppState) -> Self {
        state.tera.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

pub fn router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(state.sessions.clone())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(7)));

    Router::new()
        .route("/", get(handlers::home::index))
        .route(
            "/signin",
            get(handlers::auth::auth_page).post(handlers::auth::signin_submit),
        )
        .route(
            "/signup",
            get(handlers::auth::signup_page).post(handlers::auth::signup_submit),
        )
        .route("/logout", get(handlers::auth::logout))
        .route(
            "/chat",
            get(handlers::chat::chat_page).post(handlers::chat::chat_submit),
        )
        .nest_service("/static", ServeDir::new("static"))
        .layer(middleware::from_fn(auth_middleware))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(server: &MockServer) -> Router {
        let state = AppState::new(Config::for_tests(&server.uri())).expect("state builds");
        router(state)
    }

    fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_with(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn session_cookie(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/auth/login/"))
            .and(body_json(json!({"username": "bob", "password": "secret"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"user_id": "42", "username": "bob"})),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    async fn sign_in(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(form_post("/signin", "username=bob&password=secret", None))
            .await
            .unwrap();
        session_cookie(&response).expect("session cookie is set")
    }

    #[tokio::test]
    async fn signin_page_renders_both_tabs() {
        let server = MockServer::start().await;
        let response = app(&server).oneshot(get_with("/signin", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(r#"action="/signin""#));
        assert!(body.contains(r#"action="/signup""#));
    }

    #[tokio::test]
    async fn blank_password_shows_error_without_backend_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let response = app(&server)
            .oneshot(form_post("/signin", "username=bob&password=", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Please enter username and password."));
        assert!(!body.contains("url=/chat"));
    }

    #[tokio::test]
    async fn successful_signin_schedules_redirect_and_opens_chat() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let app = app(&server);

        let response = app
            .clone()
            .oneshot(form_post("/signin", "username=bob&password=secret", None))
            .await
            .unwrap();
        let cookie = session_cookie(&response).expect("session cookie is set");
        let body = body_text(response).await;
        assert!(body.contains("Sign in successful!"));
        assert!(body.contains("content=\"0.5;url=/chat\""));

        let response = app.oneshot(get_with("/chat", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Hi bob!"));
    }

    #[tokio::test]
    async fn signup_conflict_shows_default_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/signup/"))
            .respond_with(ResponseTemplate::new(409))
            .expect(1)
            .mount(&server)
            .await;

        let response = app(&server)
            .oneshot(form_post("/signup", "username=bob&password=pw", None))
            .await
            .unwrap();

        let body = body_text(response).await;
        assert!(body.contains("Username already exists."));
        assert!(!body.contains("url=/chat"));
    }

    #[tokio::test]
    async fn chat_requires_identity() {
        let server = MockServer::start().await;
        let response = app(&server).oneshot(get_with("/chat", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/signin");
    }

    #[tokio::test]
    async fn signup_tab_query_shows_signup_form() {
        let server = MockServer::start().await;
        let response = app(&server)
            .oneshot(get_with("/signin?tab=signup", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(r#"id="tab-signup" href="/signin?tab=signup" class="active""#));
        assert!(body.contains(r#"id="form-signin" method="post" action="/signin" class="hidden""#));
        assert!(body.contains(r#"id="form-signup" method="post" action="/signup" class="""#));
    }

    #[tokio::test]
    async fn signin_tab_is_the_default() {
        let server = MockServer::start().await;
        let body = body_text(app(&server).oneshot(get_with("/signin", None)).await.unwrap()).await;

        assert!(body.contains(r#"id="tab-signin" href="/signin" class="active""#));
        assert!(body.contains(r#"id="form-signin" method="post" action="/signin" class="""#));
        assert!(body.contains(r#"id="form-signup" method="post" action="/signup" class="hidden""#));
    }

    #[tokio::test]
    async fn signed_in_visitor_skips_the_signin_page() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let app = app(&server);
        let cookie = sign_in(&app).await;

        let response = app.oneshot(get_with("/signin", Some(&cookie))).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/chat");
    }

    #[tokio::test]
    async fn home_routes_by_identity() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let app = app(&server);

        let response = app.clone().oneshot(get_with("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/signin");

        let cookie = sign_in(&app).await;
        let response = app.oneshot(get_with("/", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/chat");
    }

    #[tokio::test]
    async fn signup_page_redirects_to_signup_tab() {
        let server = MockServer::start().await;
        let response = app(&server).oneshot(get_with("/signup", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/signin?tab=signup");
    }

    #[tokio::test]
    async fn seat_flow_over_http_searches_once() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("POST"))
            .and(path("/chat/seats/"))
            .and(body_json(json!({"pnr": "RWQ248", "src": "ATL", "dst": "MIA"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "seats": [{"flight_id": "AA0201", "seat_no": "12A", "src": "ATL", "dst": "MIA"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        let app = app(&server);
        let cookie = sign_in(&app).await;

        for line in ["seat availability", "RWQ248", "skip", "ATL", "MIA", "skip"] {
            let body = format!("message={}", line.replace(' ', "+"));
            let response = app
                .clone()
                .oneshot(form_post("/chat", &body, Some(&cookie)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/chat");
        }

        let response = app.oneshot(get_with("/chat", Some(&cookie))).await.unwrap();
        let body = body_text(response).await;
        assert!(body.contains("AA0201 ATL → MIA, seat 12A"));
    }

    #[tokio::test]
    async fn logout_forgets_identity() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        let app = app(&server);
        let cookie = sign_in(&app).await;

        let response = app.clone().oneshot(get_with("/logout", Some(&cookie))).await.unwrap();
        assert_eq!(location(&response), "/signin");

        let response = app.oneshot(get_with("/chat", Some(&cookie))).await.unwrap();
        assert_eq!(location(&response), "/signin");
    }
}
