use serde::{Deserialize, Serialize};

pub const INTRO_MESSAGE: &str = "Let's check seat availability. Type 'skip' to leave a detail out, or 'exit' to stop.";
pub const CANCELLED_MESSAGE: &str = "Seat availability check cancelled.";
pub const NOTHING_TO_SEARCH_MESSAGE: &str = "Please provide at least one detail to search for seats.";

/// The questions asked by the wizard, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Pnr,
    FlightId,
    Src,
    Dst,
    AirlineName,
}

impl Step {
    pub const FIRST: Step = Step::Pnr;

    /// `None` after the last question.
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Pnr => Some(Step::FlightId),
            Step::FlightId => Some(Step::Src),
            Step::Src => Some(Step::Dst),
            Step::Dst => Some(Step::AirlineName),
            Step::AirlineName => None,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Step::Pnr => "What is your PNR (booking reference)?",
            Step::FlightId => "Which flight ID are you interested in (e.g. LH0100)?",
            Step::Src => "What is the departure airport code (e.g. FRA)?",
            Step::Dst => "What is the arrival airport code (e.g. JFK)?",
            Step::AirlineName => "Which airline are you flying with?",
        }
    }

    /// Codes are upper-cased; the airline name is free text.
    fn normalize(self, input: &str) -> String {
        match self {
            Step::AirlineName => input.to_string(),
            _ => input.to_uppercase(),
        }
    }
}

/// Search criteria collected by the wizard. Blank fields are left out when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatQuery {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pnr: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub flight_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub src: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dst: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub airline_name: String,
}

impl SeatQuery {
    fn field_mut(&mut self, step: Step) -> &mut String {
        match step {
            Step::Pnr => &mut self.pnr,
            Step::FlightId => &mut self.flight_id,
            Step::Src => &mut self.src,
            Step::Dst => &mut self.dst,
            Step::AirlineName => &mut self.airline_name,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pnr.is_empty()
            && self.flight_id.is_empty()
            && self.src.is_empty()
            && self.dst.is_empty()
            && self.airline_name.is_empty()
    }

    /// Names of the fields that carry a value, for logging without the values.
    pub fn filled_fields(&self) -> Vec<&'static str> {
        [
            ("pnr", &self.pnr),
            ("flight_id", &self.flight_id),
            ("src", &self.src),
            ("dst", &self.dst),
            ("airline_name", &self.airline_name),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// What the wizard wants shown or done after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutput {
    Prompt(String),
    Cancelled(&'static str),
    NothingToSearch(&'static str),
    Search(SeatQuery),
    /// Input arrived while no flow was running.
    Inactive,
}

/// Seat availability wizard. A flow is active while it has a current step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatFlow {
    step: Option<Step>,
    data: SeatQuery,
}

impl SeatFlow {
    /// A fresh, active flow waiting for the first answer. Any previous flow is discarded.
    pub fn start() -> (SeatFlow, FlowOutput) {
        let flow = SeatFlow {
            step: Some(Step::FIRST),
            data: SeatQuery::default(),
        };
        let prompt = format!("{} {}", INTRO_MESSAGE, Step::FIRST.prompt());

        (flow, FlowOutput::Prompt(prompt))
    }

    pub fn is_active(&self) -> bool {
        self.step.is_some()
    }

    pub fn step(&self) -> Option<Step> {
        self.step
    }

    pub fn data(&self) -> &SeatQuery {
        &self.data
    }

    pub fn advance(self, input: &str) -> (SeatFlow, FlowOutput) {
        let Some(step) = self.step else {
            return (self, FlowOutput::Inactive);
        };

        let answer = input.trim();
        let command = answer.to_lowercase();

        if command == "exit" {
            return (SeatFlow::default(), FlowOutput::Cancelled(CANCELLED_MESSAGE));
        }

        let mut data = self.data;
        if command != "skip" {
            *data.field_mut(step) = step.normalize(answer);
        }

        match step.next() {
            Some(next) => (
                SeatFlow {
                    step: Some(next),
                    data,
                },
                FlowOutput::Prompt(next.prompt().to_string()),
            ),
            None if data.is_empty() => (
                SeatFlow::default(),
                FlowOutput::NothingToSearch(NOTHING_TO_SEARCH_MESSAGE),
            ),
            None => (SeatFlow::default(), FlowOutput::Search(data)),
        }
    }
}
