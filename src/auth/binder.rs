use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::InFlight;
use crate::{
    api::{ApiClient, ApiError, ApiReply, LOGIN_PATH, SIGNUP_PATH},
    models::session::SessionIdentity,
    ui::{Navigation, Navigator, Notifier, ToastKind},
};

pub const MISSING_FIELDS_MESSAGE: &str = "Please enter username and password.";
pub const DUPLICATE_SUBMIT_MESSAGE: &str = "Your request is already being processed.";
pub const PERSIST_FAILED_MESSAGE: &str = "Could not save your session.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Signup,
}

impl AuthAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthAction::Login => "login",
            AuthAction::Signup => "signup",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            AuthAction::Login => LOGIN_PATH,
            AuthAction::Signup => SIGNUP_PATH,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            AuthAction::Login => "Sign in successful!",
            AuthAction::Signup => "Account created successfully!",
        }
    }

    pub fn fallback_message(self) -> &'static str {
        match self {
            AuthAction::Login => "Sign in failed.",
            AuthAction::Signup => "Sign up failed.",
        }
    }

    fn status_message(self, status: StatusCode) -> Option<&'static str> {
        match (self, status.as_u16()) {
            (AuthAction::Login, 401) => Some("Incorrect username or password."),
            (AuthAction::Signup, 409) => Some("Username already exists."),
            _ => None,
        }
    }

    /// Server error string first, then the status default, then the generic message.
    pub fn failure_message(self, reply: &ApiReply) -> String {
        reply
            .error_message()
            .or_else(|| self.status_message(reply.status))
            .unwrap_or_else(|| self.fallback_message())
            .to_string()
    }
}

/// Raw form fields as posted by the browser.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Username is trimmed. Password is kept verbatim but must not be blank.
    pub fn from_form(form: &CredentialsForm) -> Option<Self> {
        let username = form.username.trim();
        if username.is_empty() || form.password.trim().is_empty() {
            return None;
        }

        Some(Self {
            username: username.to_string(),
            password: form.password.clone(),
        })
    }
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn authenticate(
        &self,
        action: AuthAction,
        credentials: &Credentials,
    ) -> Result<ApiReply, ApiError>;
}

#[async_trait]
impl AuthGateway for ApiClient {
    async fn authenticate(
        &self,
        action: AuthAction,
        credentials: &Credentials,
    ) -> Result<ApiReply, ApiError> {
        self.post_json(action.endpoint(), credentials).await
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to persist session identity: {0}")]
pub struct PersistError(pub String);

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn persist(&self, identity: &SessionIdentity) -> Result<(), PersistError>;
}

/// Signing in issues a fresh session id so a pre-login cookie cannot be
/// reused to ride the authenticated session.
#[async_trait]
impl IdentityStore for Session {
    async fn persist(&self, identity: &SessionIdentity) -> Result<(), PersistError> {
        self.cycle_id()
            .await
            .map_err(|e| PersistError(e.to_string()))?;

        identity
            .save(self)
            .await
            .map_err(|e| PersistError(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    /// A required field was blank; nothing was sent.
    Invalid,
    /// The same submission is already waiting on the backend; nothing was sent.
    Duplicate,
    SignedIn(SessionIdentity),
    Rejected {
        status: Option<u16>,
        message: String,
    },
}

/// Handles sign-in and sign-up submissions.
pub struct AuthBinder<'a, G: ?Sized> {
    gateway: &'a G,
    in_flight: &'a InFlight,
    landing: Navigation,
}

impl<'a, G> AuthBinder<'a, G>
where
    G: AuthGateway + ?Sized,
{
    pub fn new(gateway: &'a G, in_flight: &'a InFlight, landing: Navigation) -> Self {
        Self {
            gateway,
            in_flight,
            landing,
        }
    }

    pub async fn submit<S, U>(
        &self,
        action: AuthAction,
        form: &CredentialsForm,
        store: &S,
        ui: &mut U,
    ) -> AuthOutcome
    where
        S: IdentityStore + ?Sized,
        U: Notifier + Navigator,
    {
        let Some(credentials) = Credentials::from_form(form) else {
            ui.toast(ToastKind::Error, MISSING_FIELDS_MESSAGE);
            return AuthOutcome::Invalid;
        };

        let Some(_guard) = self.in_flight.try_begin(action, &credentials.username) else {
            tracing::info!(action = action.as_str(), "duplicate auth submission ignored");
            ui.toast(ToastKind::Info, DUPLICATE_SUBMIT_MESSAGE);
            return AuthOutcome::Duplicate;
        };

        let reply = match self.gateway.authenticate(action, &credentials).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(action = action.as_str(), "auth request failed: {}", e);
                return reject(ui, None, action.fallback_message().to_string());
            }
        };

        let status = Some(reply.status.as_u16());

        if !reply.ok() {
            tracing::info!(action = action.as_str(), status = reply.status.as_u16(), "auth rejected");
            return reject(ui, status, action.failure_message(&reply));
        }

        let Some(identity) = SessionIdentity::from_reply(&reply.data) else {
            tracing::warn!(action = action.as_str(), "auth reply is missing identity fields");
            return reject(ui, status, action.fallback_message().to_string());
        };

        if let Err(e) = store.persist(&identity).await {
            tracing::error!("{}", e);
            return reject(ui, status, PERSIST_FAILED_MESSAGE.to_string());
        }

        tracing::info!(action = action.as_str(), user_id = %identity.user_id, "signed in");
        ui.toast(ToastKind::Success, action.success_message());
        ui.navigate(self.landing.clone());

        AuthOutcome::SignedIn(identity)
    }
}

fn reject<U: Notifier>(ui: &mut U, status: Option<u16>, message: String) -> AuthOutcome {
    ui.toast(ToastKind::Error, &message);
    AuthOutcome::Rejected { status, message }
}
