use axum::{
    extract::State,
    response::{Html, Redirect},
    Extension, Form,
};
use serde::Deserialize;
use std::sync::Arc;
use tera::Tera;
use tower_sessions::Session;

use crate::{
    api::ApiClient,
    auth::CurrentUser,
    chat::Conversation,
    config::Config,
    error::{AppError, AppResult},
    models::session::{SessionIdentity, SESSION_CONVERSATION_KEY},
};

pub const MAX_MESSAGE_CHARS: usize = 500;

async fn load_conversation(session: &Session, user: &SessionIdentity) -> AppResult<Conversation> {
    let conversation = session
        .get::<Conversation>(SESSION_CONVERSATION_KEY)
        .await?
        .unwrap_or_else(|| Conversation::greet(&user.username));

    Ok(conversation)
}

/// GET /chat - Transcript and input box
pub async fn chat_page(
    State(tera): State<Tera>,
    State(config): State<Arc<Config>>,
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
    session: Session,
) -> AppResult<Result<Html<String>, Redirect>> {
    let Some(user) = current_user else {
        return Ok(Err(Redirect::to("/signin")));
    };

    let conversation = load_conversation(&session, &user).await?;

    let mut context = tera::Context::new();
    context.insert("site_name", &config.site.name);
    context.insert("title", "Chat");
    context.insert("current_user", &user);
    context.insert("messages", &conversation.messages);
    context.insert("flow_active", &conversation.seat_flow.is_active());
    if let Some(step) = conversation.seat_flow.step() {
        context.insert("flow_prompt", step.prompt());
        context.insert("flow_data", conversation.seat_flow.data());
    }

    let html = tera.render("chat.html", &context)?;
    Ok(Ok(Html(html)))
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub message: String,
}

/// POST /chat - One line from the user
pub async fn chat_submit(
    State(api): State<ApiClient>,
    Extension(CurrentUser(current_user)): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<ChatForm>,
) -> AppResult<Redirect> {
    let Some(user) = current_user else {
        return Ok(Redirect::to("/signin"));
    };

    if form.message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::BadRequest(format!(
            "message longer than {} characters",
            MAX_MESSAGE_CHARS
        )));
    }

    let mut conversation = load_conversation(&session, &user).await?;
    conversation.handle(&user, &form.message, &api).await;
    session.insert(SESSION_CONVERSATION_KEY, &conversation).await?;

    Ok(Redirect::to("/chat"))
}
