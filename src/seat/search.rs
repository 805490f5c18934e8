use async_trait::async_trait;
use serde::Deserialize;

use super::SeatQuery;
use crate::api::{lenient, ApiClient, ApiError, SEAT_SEARCH_PATH};

/// One available seat as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Seat {
    #[serde(default, deserialize_with = "lenient::string")]
    pub flight_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub seat_no: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub src: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dst: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dep_time: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub airline_name: String,
}

impl Seat {
    pub fn summary(&self) -> String {
        let mut line = format!("{} {} → {}, seat {}", self.flight_id, self.src, self.dst, self.seat_no);
        if !self.airline_name.is_empty() {
            line.push_str(&format!(" ({})", self.airline_name));
        }
        if !self.dep_time.is_empty() {
            line.push_str(&format!(", departs {}", self.dep_time));
        }
        line
    }
}

#[derive(Debug, Deserialize)]
struct SeatList {
    #[serde(default)]
    seats: Vec<Seat>,
}

#[async_trait]
pub trait SeatSearch: Send + Sync {
    async fn search_seats(&self, query: &SeatQuery) -> Result<Vec<Seat>, ApiError>;
}

#[async_trait]
impl SeatSearch for ApiClient {
    async fn search_seats(&self, query: &SeatQuery) -> Result<Vec<Seat>, ApiError> {
        let reply = self.post_json(SEAT_SEARCH_PATH, query).await?;

        if !reply.ok() {
            return Err(ApiError::Rejected {
                status: reply.status.as_u16(),
                message: reply
                    .error_message()
                    .unwrap_or("Seat search failed.")
                    .to_string(),
            });
        }

        let list: SeatList = serde_json::from_value(reply.data)?;
        Ok(list.seats)
    }
}
