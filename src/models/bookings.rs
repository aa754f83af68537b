use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::ambulance::{RefId, RefItem};

pub const DROP_LOCATION_DEFAULT: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalChoice {
    pub id: RefId,
    pub name: String,
}

/// The in-progress booking selection before it is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub ambulance_type: Option<RefItem>,
    pub category: Option<RefItem>,
    pub equipment_ids: BTreeSet<RefId>,
    pub pickup_location: Option<RefItem>,
    pub hospital: Option<HospitalChoice>,
    pub date: NaiveDate,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            ambulance_type: None,
            category: None,
            equipment_ids: BTreeSet::new(),
            pickup_location: None,
            hospital: None,
            date: Local::now().date_naive(),
        }
    }
}

impl BookingDraft {
    /// Type, category and pickup are the three selections required before
    /// the confirmation step.
    pub fn is_confirmable(&self) -> bool {
        self.ambulance_type.is_some() && self.category.is_some() && self.pickup_location.is_some()
    }
}

mod booking_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Body posted to the booking endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub ambulance_type: Option<String>,
    pub category: Option<String>,
    pub equipment: Vec<RefId>,
    pub pickup_location: Option<String>,
    pub drop_location: String,
    pub hospital_location: Option<String>,
    pub hospital_id: Option<RefId>,
    #[serde(with = "booking_date")]
    pub date: NaiveDate,
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl BookingPayload {
    pub fn with_payment(mut self, payment_id: String, payment_method: String) -> Self {
        self.payment_id = Some(payment_id);
        self.payment_method = Some(payment_method);
        self
    }
}
