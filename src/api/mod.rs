pub mod client;
pub mod lenient;

pub use client::{ApiClient, ApiError, ApiReply};

pub const LOGIN_PATH: &str = "/auth/login/";
pub const SIGNUP_PATH: &str = "/auth/signup/";
pub const MY_TICKETS_PATH: &str = "/chat/my-tickets/";
pub const CANCEL_TICKET_PATH: &str = "/chat/cancel/";
pub const SEAT_SEARCH_PATH: &str = "/chat/seats/";
