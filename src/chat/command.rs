/// What a chat line asks for when no seat flow is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SeatAvailability,
    MyTickets,
    Cancel { flight_id: String, seat_no: String },
    CancelUsage,
    Help,
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let lowered = input.trim().to_lowercase();
        let mut words = lowered.split_whitespace();

        if words.next() == Some("cancel") {
            return match (words.next(), words.next()) {
                (Some(flight_id), Some(seat_no)) => Command::Cancel {
                    flight_id: flight_id.to_uppercase(),
                    seat_no: seat_no.to_uppercase(),
                },
                _ => Command::CancelUsage,
            };
        }

        if lowered.contains("seat") {
            Command::SeatAvailability
        } else if lowered.contains("ticket") {
            Command::MyTickets
        } else {
            Command::Help
        }
    }
}
