use log::warn;
use serde::Serialize;

use crate::{
    error::UpstreamError,
    models::{
        address::{AddressForm, DeviceFix, GeoPoint, MapView, PlaceSuggestion},
        notice::Notice,
    },
    services::request_tracker::RequestTracker,
};

/// Place-name lookups only go out once the query is longer than this.
pub const MIN_PLACE_QUERY_CHARS: usize = 2;

pub fn should_query_places(query: &str) -> bool {
    query.trim().chars().count() > MIN_PLACE_QUERY_CHARS
}

/// State of the pickup address popup: the form, the map and the last
/// accepted place suggestions.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPicker {
    pub form: AddressForm,
    pub map: MapView,
    pub popup_open: bool,
    pub suggestions: Vec<PlaceSuggestion>,
    #[serde(skip)]
    pub place_requests: RequestTracker,
    #[serde(skip)]
    pub geocode_requests: RequestTracker,
}

impl AddressPicker {
    /// Map click: drop the marker where the user clicked.
    pub fn place_marker(&mut self, point: GeoPoint) -> u64 {
        self.popup_open = true;
        self.map.marker = Some(point);
        self.geocode_requests.issue()
    }

    /// Overwrite the locality with a reverse-geocoded address. Failures are
    /// logged only and leave the form as it was.
    pub fn apply_reverse_geocode(&mut self, ticket: u64, result: Result<String, UpstreamError>) {
        if !self.geocode_requests.is_current(ticket) {
            return;
        }
        match result {
            Ok(display_name) => self.form.locality = display_name,
            Err(e) => warn!("Reverse geocoding failed: {}", e),
        }
    }

    pub fn apply_place_suggestions(&mut self, ticket: u64, suggestions: &[PlaceSuggestion]) -> bool {
        if !self.place_requests.is_current(ticket) {
            return false;
        }
        self.suggestions = suggestions.to_vec();
        true
    }

    /// Picking a suggestion moves the map, the marker and the locality
    /// together.
    pub fn select_place(&mut self, place: &PlaceSuggestion) {
        // Anything still in flight for an older position is now stale.
        self.geocode_requests.issue();
        self.popup_open = true;
        self.map.center = place.point;
        self.map.marker = Some(place.point);
        self.form.locality = place.display_name.clone();
        self.suggestions.clear();
    }

    /// Apply what the device reported. On success returns the position and a
    /// ticket for the follow-up reverse geocode.
    pub fn apply_device_fix(&mut self, fix: DeviceFix) -> Result<(GeoPoint, u64), Notice> {
        match fix {
            DeviceFix::Position { lat, lng } => {
                let point = GeoPoint { lat, lng };
                self.popup_open = true;
                self.map.center = point;
                self.map.marker = Some(point);
                Ok((point, self.geocode_requests.issue()))
            }
            DeviceFix::Failure { error } => Err(Notice::error(format!(
                "Unable to retrieve your location: {}",
                error
            ))),
        }
    }

    /// Manual edits win over any reverse geocode still in flight.
    pub fn edit(&mut self, form: AddressForm) {
        self.geocode_requests.issue();
        self.popup_open = true;
        self.form = form;
    }

    /// Name and phone are required. Nothing is persisted; a valid form just
    /// closes the popup.
    pub fn save(&mut self) -> Notice {
        if self.form.name.trim().is_empty() || self.form.phone.trim().is_empty() {
            return Notice::error("Please enter name and phone number");
        }
        self.popup_open = false;
        Notice::success("Address saved successfully")
    }
}
