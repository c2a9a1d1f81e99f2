use serde::Serialize;

mod response;

pub use response::{AllReceptionTextsResponse, ReceptionStatusTextResponse};

/// Hour at which reception opens
const OPENING_HOUR: u32 = 4;
/// Hour during which reception winds down and then closes
const CLOSING_HOUR: u32 = 23;
/// Last minute of the closing hour that is still accepted
const LAST_ACCEPTED_MINUTE: u32 = 15;

/// The status information returned to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionInfo {
    /// The display label for the current status
    pub status: &'static str,
    /// The display text for the relevant accepting window
    pub hours: &'static str,
    /// Whether new customers are currently accepted
    pub is_accepting: bool,
}

/// Reception status of the support desk at a given time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceptionStatus {
    /// Between 04:00 and 23:00 inclusive
    Accepting,
    /// Between 23:01 and 23:15 inclusive
    NearEnd,
    /// Any other time
    Closed,
}

impl ReceptionStatus {
    /// Classify a wall-clock time
    ///
    /// The accepting window runs from 04:00 up to and including 23:15. Any
    /// minute past 23:00 inside that window is reported as near-end. Callers
    /// are expected to pass `hour` in 0..24 and `minute` in 0..60; other
    /// values still map to some status but carry no meaning.
    pub fn at(hour: u32, minute: u32) -> Self {
        let within_hours = (OPENING_HOUR..CLOSING_HOUR).contains(&hour)
            || (hour == CLOSING_HOUR && minute <= LAST_ACCEPTED_MINUTE);
        let near_end = hour == CLOSING_HOUR && minute > 0;
        match (within_hours, near_end) {
            (true, true) => Self::NearEnd,
            (true, false) => Self::Accepting,
            (false, _) => Self::Closed,
        }
    }

    /// The fixed status record for this status
    pub fn info(self) -> ReceptionInfo {
        match self {
            Self::Accepting => ReceptionInfo {
                status: "受付中",
                hours: "(4:00~23:15)",
                is_accepting: true,
            },
            Self::NearEnd => ReceptionInfo {
                status: "まもなく終了",
                hours: "(0:00~23:15)",
                is_accepting: true,
            },
            Self::Closed => ReceptionInfo {
                status: "受付時間外",
                hours: "0:00から受付再開",
                is_accepting: false,
            },
        }
    }

    /// A stable identifier used in logs and metric labels
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepting => "accepting",
            Self::NearEnd => "near_end",
            Self::Closed => "closed",
        }
    }
}
