use axum::{response::Redirect, Extension};

use crate::auth::CurrentUser;

pub async fn index(Extension(CurrentUser(current_user)): Extension<CurrentUser>) -> Redirect {
    if current_user.is_some() {
        Redirect::to("/chat")
    } else {
        Redirect::to("/signin")
    }
}
