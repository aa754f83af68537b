use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, sync::LazyLock};

/// Identifier of a remote reference record. The mock backends hand these out
/// as either JSON numbers or strings, so both are normalised to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RefId(pub String);

impl RefId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RefId {
    fn from(value: &str) -> Self {
        RefId(value.to_string())
    }
}

impl From<u64> for RefId {
    fn from(value: u64) -> Self {
        RefId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RefId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RefId(s),
            Raw::Int(n) => RefId(n.to_string()),
            Raw::Float(n) => RefId(n.to_string()),
        })
    }
}

/// A `{id, name}` entry of one of the booking dropdowns
/// (ambulance types, categories, pickup locations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefItem {
    pub id: RefId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: RefId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(deserialize_with = "de_number")]
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmbulanceService {
    pub id: RefId,
    pub service_name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub category: String,
    #[serde(default)]
    pub available: bool,
    #[serde(deserialize_with = "de_number")]
    pub distance: f64,
    #[serde(default, deserialize_with = "de_number")]
    pub rating: f64,
    #[serde(default)]
    pub phone: String,
}

impl AmbulanceService {
    /// Value of the availability facet for this record.
    pub fn availability(&self) -> &'static str {
        if self.available {
            "available"
        } else {
            "busy"
        }
    }
}

/// Reference dataset served by the booking endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReference {
    #[serde(default)]
    pub ambulance_types: Vec<RefItem>,
    #[serde(default)]
    pub categories: Vec<RefItem>,
    #[serde(default)]
    pub locations: Vec<RefItem>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub ambulance_services: Vec<AmbulanceService>,
}

impl BookingReference {
    pub fn ambulance_type(&self, id: &RefId) -> Option<&RefItem> {
        self.ambulance_types.iter().find(|item| &item.id == id)
    }

    pub fn category(&self, id: &RefId) -> Option<&RefItem> {
        self.categories.iter().find(|item| &item.id == id)
    }

    pub fn location(&self, id: &RefId) -> Option<&RefItem> {
        self.locations.iter().find(|item| &item.id == id)
    }

    pub fn equipment_item(&self, id: &RefId) -> Option<&Equipment> {
        self.equipment.iter().find(|item| &item.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: RefId,
    pub hospital_name: String,
}

static LEADING_FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid float pattern")
});

/// Reads the numeric prefix of a string the way a lenient form field would:
/// `"2.5 km"` is `2.5`, `"far"` is `NaN`.
pub fn parse_leading_float(raw: &str) -> f64 {
    LEADING_FLOAT
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(f64::NAN)
}

fn de_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => parse_leading_float(&s),
        Raw::Null(()) => f64::NAN,
    })
}
