//! Two-step booking wizard driven by a pure reducer.
//!
//! All changes to the draft go through [`reduce`]. The most recent actions
//! are kept in the state's transition log and every action is counted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use crate::{
    error::ApiError,
    models::{
        ambulance::{BookingReference, Equipment, Hospital, RefId, RefItem},
        bookings::{BookingDraft, BookingPayload, HospitalChoice, DROP_LOCATION_DEFAULT},
        filters::{ActiveFilters, FilterFacet},
    },
    services::filter_service::FilterService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    #[default]
    Details,
    Confirm,
}

impl WizardStep {
    pub fn index(self) -> u8 {
        match self {
            WizardStep::Details => 0,
            WizardStep::Confirm => 1,
        }
    }
}

/// Per-action in-flight flags. Each one only blocks a repeat of its own action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiFlags {
    pub submitting: bool,
    pub search_loading: bool,
    pub locating: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardAction {
    SelectType { item: RefItem },
    SelectCategory { item: RefItem },
    SelectPickup { item: RefItem },
    SelectHospital { hospital: HospitalChoice },
    ToggleEquipment { id: RefId },
    SetDate { date: NaiveDate },
    ToggleFilter { facet: FilterFacet, value: String },
    ClearFilter { facet: FilterFacet },
    Advance,
    Retreat,
    Reset,
}

/// Wizard command as sent by a client, carrying ids rather than resolved
/// reference objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WizardCommand {
    SelectType { id: RefId },
    SelectCategory { id: RefId },
    SelectPickup { id: RefId },
    SelectHospital { id: RefId },
    ToggleEquipment { id: RefId },
    SetDate { date: NaiveDate },
    Advance,
    Retreat,
    Reset,
}

impl WizardCommand {
    /// Attach the full reference object for every id-carrying command.
    pub fn resolve(
        self,
        reference: &BookingReference,
        hospitals: &[Hospital],
    ) -> Result<WizardAction, ApiError> {
        let unknown = |kind: &'static str, id: RefId| ApiError::UnknownReference { kind, id };

        Ok(match self {
            WizardCommand::SelectType { id } => WizardAction::SelectType {
                item: reference
                    .ambulance_type(&id)
                    .cloned()
                    .ok_or_else(|| unknown("ambulance type", id))?,
            },
            WizardCommand::SelectCategory { id } => WizardAction::SelectCategory {
                item: reference
                    .category(&id)
                    .cloned()
                    .ok_or_else(|| unknown("category", id))?,
            },
            WizardCommand::SelectPickup { id } => WizardAction::SelectPickup {
                item: reference
                    .location(&id)
                    .cloned()
                    .ok_or_else(|| unknown("pickup location", id))?,
            },
            WizardCommand::SelectHospital { id } => {
                let hospital = hospitals
                    .iter()
                    .find(|h| h.id == id)
                    .ok_or_else(|| unknown("hospital", id))?;
                WizardAction::SelectHospital {
                    hospital: HospitalChoice {
                        id: hospital.id.clone(),
                        name: hospital.hospital_name.clone(),
                    },
                }
            }
            WizardCommand::ToggleEquipment { id } => {
                if reference.equipment_item(&id).is_none() {
                    return Err(unknown("equipment", id));
                }
                WizardAction::ToggleEquipment { id }
            }
            WizardCommand::SetDate { date } => WizardAction::SetDate { date },
            WizardCommand::Advance => WizardAction::Advance,
            WizardCommand::Retreat => WizardAction::Retreat,
            WizardCommand::Reset => WizardAction::Reset,
        })
    }
}

pub const MAX_LOGGED_ACTIONS: usize = 64;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub step: WizardStep,
    pub draft: BookingDraft,
    pub filters: ActiveFilters,
    pub ui: UiFlags,
    /// The last [`MAX_LOGGED_ACTIONS`] actions, oldest first.
    pub log: VecDeque<WizardAction>,
    pub transitions: u64,
}

impl WizardState {
    /// Next is offered only once type, category and pickup are chosen.
    pub fn can_advance(&self) -> bool {
        self.step == WizardStep::Details && self.draft.is_confirmable()
    }

    pub fn dispatch(&mut self, action: WizardAction) {
        *self = reduce(self, &action);
    }
}

/// Apply one action. Selections are ignored once the draft is on the
/// confirmation step, and an `Advance` without the required selections is
/// a no-op.
pub fn reduce(state: &WizardState, action: &WizardAction) -> WizardState {
    let mut next = state.clone();
    next.transitions += 1;
    if next.log.len() == MAX_LOGGED_ACTIONS {
        next.log.pop_front();
    }
    next.log.push_back(action.clone());

    let editable = state.step == WizardStep::Details;

    match action {
        WizardAction::SelectType { item } if editable => {
            next.draft.ambulance_type = Some(item.clone());
        }
        WizardAction::SelectCategory { item } if editable => {
            next.draft.category = Some(item.clone());
        }
        WizardAction::SelectPickup { item } if editable => {
            next.draft.pickup_location = Some(item.clone());
        }
        WizardAction::SelectHospital { hospital } if editable => {
            next.draft.hospital = Some(hospital.clone());
        }
        WizardAction::ToggleEquipment { id } if editable => {
            if !next.draft.equipment_ids.remove(id) {
                next.draft.equipment_ids.insert(id.clone());
            }
        }
        WizardAction::SetDate { date } if editable => {
            next.draft.date = *date;
        }
        WizardAction::ToggleFilter { facet, value } => {
            FilterService::toggle(&mut next.filters, *facet, value);
        }
        WizardAction::ClearFilter { facet } => {
            FilterService::clear(&mut next.filters, *facet);
        }
        WizardAction::Advance => {
            if state.can_advance() {
                next.step = WizardStep::Confirm;
            }
        }
        WizardAction::Retreat => {
            next.step = WizardStep::Details;
        }
        WizardAction::Reset => {
            next.step = WizardStep::Details;
            next.draft = BookingDraft::default();
        }
        _ => {}
    }

    next
}

/// Sum of catalog prices for the selected equipment. Ids missing from the
/// catalog contribute nothing; no catalog means a total of 0.
pub fn compute_equipment_total(selected: &BTreeSet<RefId>, catalog: Option<&[Equipment]>) -> f64 {
    let Some(catalog) = catalog else {
        return 0.0;
    };
    catalog
        .iter()
        .filter(|item| selected.contains(&item.id))
        .map(|item| item.price)
        .sum()
}

pub fn build_booking_payload(draft: &BookingDraft, catalog: Option<&[Equipment]>) -> BookingPayload {
    BookingPayload {
        ambulance_type: draft.ambulance_type.as_ref().map(|item| item.name.clone()),
        category: draft.category.as_ref().map(|item| item.name.clone()),
        equipment: draft.equipment_ids.iter().cloned().collect(),
        pickup_location: draft.pickup_location.as_ref().map(|item| item.name.clone()),
        drop_location: DROP_LOCATION_DEFAULT.to_string(),
        hospital_location: draft.hospital.as_ref().map(|h| h.name.clone()),
        hospital_id: draft.hospital.as_ref().map(|h| h.id.clone()),
        date: draft.date,
        total_amount: compute_equipment_total(&draft.equipment_ids, catalog),
        payment_id: None,
        payment_method: None,
    }
}
