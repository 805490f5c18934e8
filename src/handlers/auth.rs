use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Extension, Form,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Tera;
use tower_sessions::Session;

use crate::{
    api::ApiClient,
    auth::{AuthAction, AuthBinder, AuthOutcome, CredentialsForm, CurrentUser, InFlight},
    config::Config,
    error::AppResult,
    ui::{Navigation, PageEffects},
};

pub const CHAT_PATH: &str = "/chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Signin,
    Signup,
}

impl Tab {
    fn title(self) -> &'static str {
        match self {
            Tab::Signin => "Sign in",
            Tab::Signup => "Sign up",
        }
    }
}

impl From<AuthAction> for Tab {
    fn from(action: AuthAction) -> Self {
        match action {
            AuthAction::Login => Tab::Signin,
            AuthAction::Signup => Tab::Signup,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthPageQuery {
    pub tab: Option<String>,
}

impl AuthPageQuery {
    fn tab(&self) -> Tab {
        match self.tab.as_deref() {
            Some("signup") => Tab::Signup,
            _ => Tab::Signin,
        }
    }
}

fn render_auth_page(
    tera: &Tera,
    config: &Config,
    tab: Tab,
    effects: &PageEffects,
) -> AppResult<Html<String>> {
    let mut context = tera::Context::new();
    context.insert("site_name", &config.site.name);
    context.insert("title", tab.title());
    context.insert("tab", &tab);
    effects.insert_into(&mut context);

    let html = tera.render("auth.html", &context)?;
    Ok(Html(html))
}

/// GET /signin - Sign-in and sign-up tabs
pub async fn auth_page(
    State(tera): State<Tera>,
    State(config): State<Arc<Config>>,
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
    Query(query): Query<AuthPageQuery>,
) -> AppResult<Result<Html<String>, Redirect>> {
    if current_user.is_some() {
        return Ok(Err(Redirect::to(CHAT_PATH)));
    }

    let effects = PageEffects::new(config.ui.toast_ms);
    Ok(Ok(render_auth_page(&tera, &config, query.tab(), &effects)?))
}

/// GET /signup - Kept for bookmarks; the form lives on the sign-in page.
pub async fn signup_page() -> Redirect {
    Redirect::to("/signin?tab=signup")
}

/// POST /signin
pub async fn signin_submit(
    State(api): State<ApiClient>,
    State(in_flight): State<InFlight>,
    State(tera): State<Tera>,
    State(config): State<Arc<Config>>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Html<String>> {
    submit(AuthAction::Login, &api, &in_flight, &tera, &config, &session, &form).await
}

/// POST /signup
pub async fn signup_submit(
    State(api): State<ApiClient>,
    State(in_flight): State<InFlight>,
    State(tera): State<Tera>,
    State(config): State<Arc<Config>>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Html<String>> {
    submit(AuthAction::Signup, &api, &in_flight, &tera, &config, &session, &form).await
}

async fn submit(
    action: AuthAction,
    api: &ApiClient,
    in_flight: &InFlight,
    tera: &Tera,
    config: &Config,
    session: &Session,
    form: &CredentialsForm,
) -> AppResult<Html<String>> {
    let landing = Navigation::new(CHAT_PATH, config.ui.redirect_delay_ms);
    let binder = AuthBinder::new(api, in_flight, landing);

    let mut effects = PageEffects::new(config.ui.toast_ms);
    let outcome = binder.submit(action, form, session, &mut effects).await;

    if let AuthOutcome::Rejected { status, message } = &outcome {
        tracing::debug!(action = action.as_str(), ?status, %message, "auth form rejected");
    }

    render_auth_page(tera, config, action.into(), &effects)
}

/// GET /logout
pub async fn logout(session: Session) -> AppResult<Redirect> {
    session.delete().await?;

    Ok(Redirect::to("/signin"))
}
