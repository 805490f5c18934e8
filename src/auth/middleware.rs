use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::models::session::SessionIdentity;

#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<SessionIdentity>);

pub async fn auth_middleware(session: Session, mut request: Request, next: Next) -> Response {
    let identity = match SessionIdentity::load(&session).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Could not read session identity: {}", e);
            None
        }
    };

    request.extensions_mut().insert(CurrentUser(identity));
    next.run(request).await
}
