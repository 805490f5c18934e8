use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::{lenient, ApiClient, ApiError, CANCEL_TICKET_PATH, MY_TICKETS_PATH};

/// A booked ticket as listed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Ticket {
    #[serde(default, deserialize_with = "lenient::string")]
    pub pnr: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub flight_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub src: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dst: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dep_time: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub arr_time: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub seat_no: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub airline_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub current_status: String,
}

impl Ticket {
    pub fn summary(&self) -> String {
        let mut line = format!(
            "PNR {}: {} {} → {}, seat {}",
            self.pnr, self.flight_id, self.src, self.dst, self.seat_no
        );
        if !self.airline_name.is_empty() {
            line.push_str(&format!(" ({})", self.airline_name));
        }
        if !self.dep_time.is_empty() {
            line.push_str(&format!(", departs {}", self.dep_time));
        }
        if !self.arr_time.is_empty() {
            line.push_str(&format!(", arrives {}", self.arr_time));
        }
        if !self.current_status.is_empty() {
            line.push_str(&format!(" [{}]", self.current_status));
        }
        line
    }
}

#[derive(Debug, Deserialize)]
struct TicketList {
    #[serde(default)]
    tickets: Vec<Ticket>,
}

#[derive(Debug, Serialize)]
struct CancelRequest<'a> {
    user_id: &'a str,
    flight_id: &'a str,
    seat_no: &'a str,
}

#[async_trait]
pub trait TicketDesk: Send + Sync {
    async fn my_tickets(&self, user_id: &str) -> Result<Vec<Ticket>, ApiError>;

    /// Returns the confirmation message on success.
    async fn cancel_ticket(
        &self,
        user_id: &str,
        flight_id: &str,
        seat_no: &str,
    ) -> Result<String, ApiError>;
}

#[async_trait]
impl TicketDesk for ApiClient {
    async fn my_tickets(&self, user_id: &str) -> Result<Vec<Ticket>, ApiError> {
        let reply = self.get_json(MY_TICKETS_PATH, &[("user_id", user_id)]).await?;

        if !reply.ok() {
            return Err(ApiError::Rejected {
                status: reply.status.as_u16(),
                message: reply
                    .error_message()
                    .unwrap_or("Could not load your tickets.")
                    .to_string(),
            });
        }

        let list: TicketList = serde_json::from_value(reply.data)?;
        Ok(list.tickets)
    }

    async fn cancel_ticket(
        &self,
        user_id: &str,
        flight_id: &str,
        seat_no: &str,
    ) -> Result<String, ApiError> {
        let request = CancelRequest {
            user_id,
            flight_id,
            seat_no,
        };
        let reply = self.post_json(CANCEL_TICKET_PATH, &request).await?;

        if !reply.ok() {
            return Err(ApiError::Rejected {
                status: reply.status.as_u16(),
                message: reply
                    .error_message()
                    .unwrap_or("Could not cancel the ticket.")
                    .to_string(),
            });
        }

        Ok(reply.message().unwrap_or("Cancelled successfully").to_string())
    }
}
