use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        ambulance::{AmbulanceService, BookingReference, Equipment, Hospital, RefItem},
        bookings::BookingDraft,
        filters::ActiveFilters,
    },
    services::{
        address_picker::AddressPicker,
        payment::overlay::PaymentOverlay,
        reference_service::ReferenceData,
        wizard::{compute_equipment_total, UiFlags, WizardState},
    },
};

/// One mounted instance of the emergency booking workflow.
#[derive(Debug)]
pub struct EmergencySession {
    pub id: Uuid,
    pub wizard: WizardState,
    pub reference: Option<BookingReference>,
    pub hospitals: Vec<Hospital>,
    pub payment: PaymentOverlay,
    pub picker: AddressPicker,
    pub search_results: Vec<AmbulanceService>,
    pub created_at: DateTime<Utc>,
}

impl EmergencySession {
    pub fn new(data: ReferenceData) -> Self {
        Self {
            id: Uuid::new_v4(),
            wizard: WizardState::default(),
            reference: data.reference,
            hospitals: data.hospitals,
            payment: PaymentOverlay::default(),
            picker: AddressPicker::default(),
            search_results: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn catalog(&self) -> Option<&[Equipment]> {
        self.reference.as_ref().map(|r| r.equipment.as_slice())
    }

    pub fn ambulances(&self) -> &[AmbulanceService] {
        self.reference
            .as_ref()
            .map(|r| r.ambulance_services.as_slice())
            .unwrap_or_default()
    }

    pub fn equipment_total(&self) -> f64 {
        compute_equipment_total(&self.wizard.draft.equipment_ids, self.catalog())
    }

    pub fn view(&self) -> SessionView {
        let options = self.reference.as_ref();

        SessionView {
            id: self.id,
            step: self.wizard.step.index(),
            can_advance: self.wizard.can_advance(),
            draft: self.wizard.draft.clone(),
            equipment_total: self.equipment_total(),
            filters: self.wizard.filters.clone(),
            ui: self.wizard.ui.clone(),
            payment_open: self.payment.is_open(),
            address: self.picker.clone(),
            ambulance_types: options.map(|r| r.ambulance_types.clone()).unwrap_or_default(),
            categories: options.map(|r| r.categories.clone()).unwrap_or_default(),
            locations: options.map(|r| r.locations.clone()).unwrap_or_default(),
            equipment: options.map(|r| r.equipment.clone()).unwrap_or_default(),
            hospitals: self.hospitals.clone(),
            search_results: self.search_results.clone(),
            transitions: self.wizard.transitions,
            created_at: self.created_at,
        }
    }
}

/// Snapshot of a session as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub step: u8,
    pub can_advance: bool,
    pub draft: BookingDraft,
    pub equipment_total: f64,
    pub filters: ActiveFilters,
    pub ui: UiFlags,
    pub payment_open: bool,
    pub address: AddressPicker,
    pub ambulance_types: Vec<RefItem>,
    pub categories: Vec<RefItem>,
    pub locations: Vec<RefItem>,
    pub equipment: Vec<Equipment>,
    pub hospitals: Vec<Hospital>,
    pub search_results: Vec<AmbulanceService>,
    pub transitions: u64,
    pub created_at: DateTime<Utc>,
}

pub type SessionHandle = Arc<Mutex<EmergencySession>>;

struct SessionEntry {
    handle: SessionHandle,
    last_touched: Instant,
}

/// Live sessions keyed by id. Every lookup refreshes the session's idle
/// clock; sessions idle for longer than the TTL are evicted by
/// [`SessionStore::evict_idle`].
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionEntry>,
}

impl SessionStore {
    pub fn insert(&self, session: EmergencySession) -> SessionHandle {
        let id = session.id;
        let handle = Arc::new(Mutex::new(session));
        self.sessions.insert(
            id,
            SessionEntry {
                handle: handle.clone(),
                last_touched: Instant::now(),
            },
        );
        handle
    }

    pub fn get(&self, id: Uuid) -> Result<SessionHandle, ApiError> {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or(ApiError::SessionNotFound(id))?;
        entry.last_touched = Instant::now();
        Ok(entry.handle.clone())
    }

    pub fn remove(&self, id: Uuid) -> Result<(), ApiError> {
        self.sessions
            .remove(&id)
            .map(|_| ())
            .ok_or(ApiError::SessionNotFound(id))
    }

    /// Drop every session untouched for longer than `ttl` as of `now`.
    /// Returns how many were removed.
    pub fn evict_idle_at(&self, now: Instant, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.saturating_duration_since(entry.last_touched) <= ttl);
        before.saturating_sub(self.sessions.len())
    }

    pub fn evict_idle(&self, ttl: Duration) -> usize {
        self.evict_idle_at(Instant::now(), ttl)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
