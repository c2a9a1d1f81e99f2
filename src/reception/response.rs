use serde::Serialize;

use super::{ReceptionInfo, ReceptionStatus};

const NEW_PHONE_AND_DEVICE_CHANGE_ITEMS: [&str; 2] =
    ["新しい電話番号、機種変更", "SIM再発行・タイプ変更"];

const CARRIER_SWITCH_ITEMS: [&str; 2] = ["⚫︎⚫︎⚫︎⚫︎・△△△△△から乗り換え", "他社から乗り換え"];

/// A fixed group of service offerings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub items: [&'static str; 2],
    pub is_available: bool,
}

/// The categories shown alongside the reception status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Categories {
    pub new_phone_and_device_change: Category,
    pub carrier_switch: Category,
}

/// The response body for the reception status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionStatusTextResponse {
    pub categories: Categories,
    pub reception_info: ReceptionInfo,
}

impl ReceptionStatusTextResponse {
    /// Embed the reception information into the static category template
    pub fn assemble(reception_info: ReceptionInfo) -> Self {
        let is_available = reception_info.is_accepting;
        Self {
            categories: Categories {
                new_phone_and_device_change: Category {
                    items: NEW_PHONE_AND_DEVICE_CHANGE_ITEMS,
                    is_available,
                },
                carrier_switch: Category {
                    items: CARRIER_SWITCH_ITEMS,
                    is_available,
                },
            },
            reception_info,
        }
    }
}

/// Every status record, keyed by status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceptionStatuses {
    pub accepting: ReceptionInfo,
    pub near_end: ReceptionInfo,
    pub closed: ReceptionInfo,
}

/// The response body listing all reception status texts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllReceptionTextsResponse {
    pub reception_statuses: ReceptionStatuses,
}

impl AllReceptionTextsResponse {
    pub fn new() -> Self {
        Self {
            reception_statuses: ReceptionStatuses {
                accepting: ReceptionStatus::Accepting.info(),
                near_end: ReceptionStatus::NearEnd.info(),
                closed: ReceptionStatus::Closed.info(),
            },
        }
    }
}

impl Default for AllReceptionTextsResponse {
    fn default() -> Self {
        Self::new()
    }
}
