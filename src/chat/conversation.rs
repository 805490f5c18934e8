use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::command::Command;
use crate::{
    api::ApiError,
    models::session::SessionIdentity,
    seat::{FlowOutput, SeatFlow, SeatQuery, SeatSearch},
    tickets::TicketDesk,
};

pub const MAX_TRANSCRIPT: usize = 50;

pub const HELP_MESSAGE: &str = "I can help with:\n\
    • seat availability: find open seats step by step\n\
    • my tickets: list your booked tickets\n\
    • cancel <flight id> <seat>: cancel a booked seat, e.g. cancel LH0100 9B";
pub const CANCEL_USAGE_MESSAGE: &str = "To cancel, type: cancel <flight id> <seat>, e.g. cancel LH0100 9B";
pub const NO_SEATS_MESSAGE: &str = "No available seats found for your search.";
pub const NO_TICKETS_MESSAGE: &str = "You have no booked tickets.";
pub const BACKEND_DOWN_MESSAGE: &str = "Sorry, I couldn't reach the booking service. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Transcript and wizard state of one signed-in browser.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub seat_flow: SeatFlow,
}

impl Conversation {
    pub fn greet(username: &str) -> Self {
        let mut conversation = Self::default();
        conversation.push(
            Speaker::Bot,
            format!("Hi {}! How can I help you today?\n{}", username, HELP_MESSAGE),
        );
        conversation
    }

    fn push(&mut self, from: Speaker, text: String) {
        self.messages.push(ChatMessage {
            from,
            text,
            at: Utc::now(),
        });

        if self.messages.len() > MAX_TRANSCRIPT {
            let excess = self.messages.len() - MAX_TRANSCRIPT;
            self.messages.drain(..excess);
        }
    }

    /// Handles one line typed by the user and returns the bot replies,
    /// which are also appended to the transcript.
    pub async fn handle<B>(&mut self, user: &SessionIdentity, input: &str, backend: &B) -> Vec<String>
    where
        B: SeatSearch + TicketDesk + ?Sized,
    {
        let input = input.trim();
        if input.is_empty() {
            return Vec::new();
        }

        self.push(Speaker::User, input.to_string());

        let replies = if self.seat_flow.is_active() {
            let (flow, output) = std::mem::take(&mut self.seat_flow).advance(input);
            self.seat_flow = flow;
            self.render_flow(output, backend).await
        } else {
            self.run_command(Command::parse(input), user, backend).await
        };

        for reply in &replies {
            self.push(Speaker::Bot, reply.clone());
        }

        replies
    }

    async fn run_command<B>(&mut self, command: Command, user: &SessionIdentity, backend: &B) -> Vec<String>
    where
        B: SeatSearch + TicketDesk + ?Sized,
    {
        match command {
            Command::SeatAvailability => {
                let (flow, output) = SeatFlow::start();
                self.seat_flow = flow;
                self.render_flow(output, backend).await
            }
            Command::MyTickets => list_tickets(user, backend).await,
            Command::Cancel { flight_id, seat_no } => {
                match backend.cancel_ticket(&user.user_id, &flight_id, &seat_no).await {
                    Ok(message) => {
                        tracing::info!(user_id = %user.user_id, %flight_id, %seat_no, "ticket cancelled");
                        vec![message]
                    }
                    Err(e) => vec![backend_failure(e)],
                }
            }
            Command::CancelUsage => vec![CANCEL_USAGE_MESSAGE.to_string()],
            Command::Help => vec![HELP_MESSAGE.to_string()],
        }
    }

    async fn render_flow<B>(&self, output: FlowOutput, backend: &B) -> Vec<String>
    where
        B: SeatSearch + ?Sized,
    {
        match output {
            FlowOutput::Prompt(text) => vec![text],
            FlowOutput::Cancelled(text) | FlowOutput::NothingToSearch(text) => vec![text.to_string()],
            FlowOutput::Search(query) => search_seats(&query, backend).await,
            FlowOutput::Inactive => Vec::new(),
        }
    }
}

async fn search_seats<B>(query: &SeatQuery, backend: &B) -> Vec<String>
where
    B: SeatSearch + ?Sized,
{
    tracing::info!(fields = ?query.filled_fields(), "searching seats");

    match backend.search_seats(query).await {
        Ok(seats) if seats.is_empty() => vec![NO_SEATS_MESSAGE.to_string()],
        Ok(seats) => {
            let mut lines = vec![format!("I found {} available seat(s):", seats.len())];
            lines.extend(seats.iter().map(|seat| seat.summary()));
            vec![lines.join("\n")]
        }
        Err(e) => vec![backend_failure(e)],
    }
}

async fn list_tickets<B>(user: &SessionIdentity, backend: &B) -> Vec<String>
where
    B: TicketDesk + ?Sized,
{
    match backend.my_tickets(&user.user_id).await {
        Ok(tickets) if tickets.is_empty() => vec![NO_TICKETS_MESSAGE.to_string()],
        Ok(tickets) => {
            let mut lines = vec!["Your booked tickets:".to_string()];
            lines.extend(tickets.iter().map(|ticket| ticket.summary()));
            vec![lines.join("\n")]
        }
        Err(e) => vec![backend_failure(e)],
    }
}

fn backend_failure(error: ApiError) -> String {
    tracing::warn!("Backend call failed: {}", error);
    match error {
        ApiError::Rejected { message, .. } => message,
        ApiError::Transport(_) | ApiError::Decode(_) => BACKEND_DOWN_MESSAGE.to_string(),
    }
}
