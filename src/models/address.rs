use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    #[default]
    Home,
    Work,
    Other,
}

/// Structured pickup address filled in from the map or by hand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    #[serde(rename = "type", default)]
    pub address_type: AddressType,
    #[serde(default)]
    pub flat_no: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub landmark: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

// Hubli city centre.
pub const DEFAULT_MAP_CENTER: GeoPoint = GeoPoint {
    lat: 15.3647,
    lng: 75.124,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: GeoPoint,
    pub marker: Option<GeoPoint>,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_MAP_CENTER,
            marker: None,
        }
    }
}

/// A forward-geocoding candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSuggestion {
    pub display_name: String,
    pub point: GeoPoint,
}

/// What the device reported when asked for its position.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DeviceFix {
    Position { lat: f64, lng: f64 },
    Failure { error: String },
}
