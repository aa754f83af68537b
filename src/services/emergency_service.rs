//! Session-level operations of the emergency booking workflow.
//!
//! Session locks are held only while state is read or written; outbound
//! calls run unlocked so other actions of the same session stay usable.
//! Each in-flight action is guarded by its own flag in [`UiFlags`]. Work
//! that sets a flag runs in a spawned task, so the flag is cleared even when
//! the caller goes away mid-request.
//!
//! [`UiFlags`]: crate::services::wizard::UiFlags

use log::{error, info};
use std::{sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::ApiError,
    models::{
        address::{AddressForm, DeviceFix, GeoPoint, PlaceSuggestion},
        bookings::BookingPayload,
        filters::{FilterFacet, FilterToggle},
        notice::{Envelope, Notice},
        search::{SearchResponse, SuggestionResponse},
    },
    services::{
        address_picker::{should_query_places, AddressPicker},
        geocoding_service::Geocoder,
        payment::{
            interface::{generate_payment_id, PaymentFailure, PaymentRequest, PaymentSuccess},
            overlay::PaymentOverlay,
        },
        reference_service::{load_reference_data, BookingBackend},
        search_service::SearchService,
        session_store::{EmergencySession, SessionHandle, SessionStore, SessionView},
        wizard::{build_booking_payload, WizardAction, WizardCommand, WizardStep},
    },
};

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSuggestionResponse {
    pub query: String,
    pub suggestions: Vec<PlaceSuggestion>,
    /// False when a newer lookup superseded this one.
    pub applied: bool,
}

pub struct EmergencyService {
    store: SessionStore,
    backend: Arc<dyn BookingBackend>,
    geocoder: Arc<dyn Geocoder>,
    search: SearchService,
    session_ttl: Duration,
}

impl EmergencyService {
    pub fn new(
        config: &AppConfig,
        backend: Arc<dyn BookingBackend>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            store: SessionStore::default(),
            backend,
            geocoder,
            search: SearchService::new(config.search_latency),
            session_ttl: config.session_ttl,
        }
    }

    /// Discard sessions idle for longer than the configured TTL.
    pub fn evict_idle_sessions(&self) -> usize {
        let evicted = self.store.evict_idle(self.session_ttl);
        if evicted > 0 {
            info!("Evicted {} idle emergency booking sessions", evicted);
        }
        evicted
    }

    /// Run [`Self::evict_idle_sessions`] every `every` until the runtime
    /// shuts down.
    pub fn start_idle_sweep(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                self.evict_idle_sessions();
            }
        })
    }

    fn session(&self, id: Uuid) -> Result<SessionHandle, ApiError> {
        self.store.get(id)
    }

    pub fn active_sessions(&self) -> usize {
        self.store.len()
    }

    /// Mount: load reference data and start a fresh draft.
    pub async fn open_session(&self) -> Envelope<SessionView> {
        let data = load_reference_data(self.backend.as_ref()).await;
        let notices = data.notices.clone();
        let handle = self.store.insert(EmergencySession::new(data));
        let session = handle.lock().await;
        info!("Opened emergency booking session {}", session.id);
        Envelope::new(session.view(), notices)
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView, ApiError> {
        let handle = self.session(id)?;
        let session = handle.lock().await;
        Ok(session.view())
    }

    /// Unmount: the draft is discarded.
    pub fn close_session(&self, id: Uuid) -> Result<(), ApiError> {
        self.store.remove(id)?;
        info!("Closed emergency booking session {}", id);
        Ok(())
    }

    pub async fn dispatch(&self, id: Uuid, command: WizardCommand) -> Result<SessionView, ApiError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        // The draft is frozen while a payment or a submission owns it.
        if session.payment.is_open() {
            return Err(ApiError::InFlight("payment"));
        }
        if session.wizard.ui.submitting {
            return Err(ApiError::InFlight("booking submission"));
        }
        let action = {
            let empty = Default::default();
            let reference = session.reference.as_ref().unwrap_or(&empty);
            command.resolve(reference, &session.hospitals)?
        };
        session.wizard.dispatch(action);
        Ok(session.view())
    }

    pub async fn toggle_filter(&self, id: Uuid, toggle: FilterToggle) -> Result<SessionView, ApiError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        session.wizard.dispatch(WizardAction::ToggleFilter {
            facet: toggle.facet,
            value: toggle.value,
        });
        Ok(session.view())
    }

    pub async fn clear_filter(&self, id: Uuid, facet: &str) -> Result<SessionView, ApiError> {
        let facet =
            FilterFacet::parse(facet).ok_or_else(|| ApiError::UnknownFacet(facet.to_string()))?;
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        session.wizard.dispatch(WizardAction::ClearFilter { facet });
        Ok(session.view())
    }

    /// Post the booking and report the outcome. Success resets the draft to
    /// step 0; failure leaves it untouched. Runs to completion even if the
    /// caller is dropped, so `submitting` is always cleared.
    async fn post_booking(
        &self,
        handle: &SessionHandle,
        payload: BookingPayload,
        success_message: &'static str,
    ) -> Result<Envelope<SessionView>, ApiError> {
        let backend = self.backend.clone();
        let handle = handle.clone();

        let task = tokio::spawn(async move {
            let result = backend.create_booking(&payload).await;

            let mut session = handle.lock().await;
            session.wizard.ui.submitting = false;
            let notice = match result {
                Ok(_) => {
                    info!("Booking created for session {}", session.id);
                    session.wizard.dispatch(WizardAction::Reset);
                    session.payment = PaymentOverlay::Closed;
                    Notice::success(success_message)
                }
                Err(e) => {
                    error!("Failed to create booking for session {}: {}", session.id, e);
                    Notice::error("Failed to book ambulance. Please try again.")
                }
            };
            Envelope::new(session.view(), vec![notice])
        });

        Ok(task.await?)
    }

    pub async fn submit_booking(&self, id: Uuid) -> Result<Envelope<SessionView>, ApiError> {
        let handle = self.session(id)?;
        let payload = {
            let mut session = handle.lock().await;
            if session.wizard.ui.submitting {
                return Err(ApiError::InFlight("booking submission"));
            }
            // The open payment window owns this draft until it settles.
            if session.payment.is_open() {
                return Err(ApiError::InFlight("payment"));
            }
            if session.wizard.step != WizardStep::Confirm {
                return Err(ApiError::NotConfirmable);
            }
            session.wizard.ui.submitting = true;
            build_booking_payload(&session.wizard.draft, session.catalog())
        };

        self.post_booking(&handle, payload, "Ambulance booked successfully!")
            .await
    }

    /// Open the payment overlay for the confirmed draft.
    pub async fn pay_now(&self, id: Uuid) -> Result<PaymentRequest, ApiError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        if session.wizard.step != WizardStep::Confirm {
            return Err(ApiError::NotConfirmable);
        }
        if session.payment.is_open() {
            return Err(ApiError::InFlight("payment"));
        }
        if session.wizard.ui.submitting {
            return Err(ApiError::InFlight("booking submission"));
        }

        let booking_details = build_booking_payload(&session.wizard.draft, session.catalog());
        let request = PaymentRequest {
            is_open: true,
            amount: booking_details.total_amount,
            booking_id: Uuid::new_v4(),
            booking_details,
        };
        session.payment.open(request.clone());
        info!(
            "Payment opened for session {} with amount {}",
            session.id, request.amount
        );
        Ok(request)
    }

    pub async fn payment_succeeded(
        &self,
        id: Uuid,
        outcome: PaymentSuccess,
    ) -> Result<Envelope<SessionView>, ApiError> {
        let handle = self.session(id)?;
        let payload = {
            let mut session = handle.lock().await;
            if session.wizard.ui.submitting {
                return Err(ApiError::InFlight("booking submission"));
            }
            let request = session.payment.settle()?;
            session.wizard.ui.submitting = true;
            let payment_id = outcome
                .provider_payment_id()
                .unwrap_or_else(generate_payment_id);
            request.booking_details.with_payment(payment_id, outcome.method)
        };

        self.post_booking(&handle, payload, "Payment successful! Ambulance booked.")
            .await
    }

    pub async fn payment_failed(
        &self,
        id: Uuid,
        failure: PaymentFailure,
    ) -> Result<Envelope<SessionView>, ApiError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        session.payment.settle()?;
        let reason = if failure.reason.trim().is_empty() {
            "unknown error".to_string()
        } else {
            failure.reason
        };
        Ok(Envelope::new(
            session.view(),
            vec![Notice::error(format!("Payment failed: {}", reason))],
        ))
    }

    pub async fn search(&self, id: Uuid, query: &str) -> Result<Envelope<SearchResponse>, ApiError> {
        let handle = self.session(id)?;
        let (records, filters) = {
            let mut session = handle.lock().await;
            if session.wizard.ui.search_loading {
                return Err(ApiError::InFlight("search"));
            }
            session.wizard.ui.search_loading = true;
            (session.ambulances().to_vec(), session.wizard.filters.clone())
        };

        let search = self.search.clone();
        let text = query.to_string();
        let task = tokio::spawn(async move {
            let results = search.search_ambulances(&records, &text, &filters).await;

            let mut session = handle.lock().await;
            session.wizard.ui.search_loading = false;
            session.search_results = results.clone();
            results
        });
        let results = task.await?;

        let notices = if results.is_empty() {
            vec![Notice::info("No ambulances found matching your search")]
        } else {
            Vec::new()
        };
        Ok(Envelope::new(
            SearchResponse {
                query: query.to_string(),
                results,
            },
            notices,
        ))
    }

    pub async fn suggestions(&self, id: Uuid, query: &str) -> Result<SuggestionResponse, ApiError> {
        let handle = self.session(id)?;
        let session = handle.lock().await;
        Ok(SuggestionResponse {
            query: query.to_string(),
            suggestions: SearchService::generate_suggestions(session.ambulances(), query),
        })
    }

    async fn reverse_geocode(&self, handle: &SessionHandle, point: GeoPoint, ticket: u64) {
        let result = self.geocoder.reverse(point).await;
        let mut session = handle.lock().await;
        session.picker.apply_reverse_geocode(ticket, result);
    }

    pub async fn map_click(&self, id: Uuid, point: GeoPoint) -> Result<AddressPicker, ApiError> {
        let handle = self.session(id)?;
        let ticket = handle.lock().await.picker.place_marker(point);
        self.reverse_geocode(&handle, point, ticket).await;
        let session = handle.lock().await;
        Ok(session.picker.clone())
    }

    pub async fn place_suggestions(
        &self,
        id: Uuid,
        query: &str,
    ) -> Result<Envelope<PlaceSuggestionResponse>, ApiError> {
        let handle = self.session(id)?;
        if !should_query_places(query) {
            return Ok(Envelope::quiet(PlaceSuggestionResponse {
                query: query.to_string(),
                suggestions: Vec::new(),
                applied: false,
            }));
        }

        let ticket = handle.lock().await.picker.place_requests.issue();
        let result = self.geocoder.search(query.trim()).await;

        let mut session = handle.lock().await;
        match result {
            Ok(suggestions) => {
                let applied = session.picker.apply_place_suggestions(ticket, &suggestions);
                Ok(Envelope::quiet(PlaceSuggestionResponse {
                    query: query.to_string(),
                    suggestions,
                    applied,
                }))
            }
            Err(e) => {
                error!("Location search failed for '{}': {}", query, e);
                Ok(Envelope::new(
                    PlaceSuggestionResponse {
                        query: query.to_string(),
                        suggestions: Vec::new(),
                        applied: false,
                    },
                    vec![Notice::error("Failed to search location")],
                ))
            }
        }
    }

    pub async fn select_place(
        &self,
        id: Uuid,
        place: PlaceSuggestion,
    ) -> Result<AddressPicker, ApiError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        session.picker.select_place(&place);
        Ok(session.picker.clone())
    }

    pub async fn current_location(
        &self,
        id: Uuid,
        fix: DeviceFix,
    ) -> Result<Envelope<AddressPicker>, ApiError> {
        let handle = self.session(id)?;
        let (point, ticket) = {
            let mut session = handle.lock().await;
            if session.wizard.ui.locating {
                return Err(ApiError::InFlight("location lookup"));
            }
            match session.picker.apply_device_fix(fix) {
                Ok(located) => {
                    session.wizard.ui.locating = true;
                    located
                }
                Err(notice) => {
                    return Ok(Envelope::new(session.picker.clone(), vec![notice]));
                }
            }
        };

        let geocoder = self.geocoder.clone();
        let task = tokio::spawn(async move {
            let result = geocoder.reverse(point).await;

            let mut session = handle.lock().await;
            session.wizard.ui.locating = false;
            session.picker.apply_reverse_geocode(ticket, result);
            session.picker.clone()
        });

        Ok(Envelope::quiet(task.await?))
    }

    pub async fn update_address(&self, id: Uuid, form: AddressForm) -> Result<AddressPicker, ApiError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        session.picker.edit(form);
        Ok(session.picker.clone())
    }

    pub async fn save_address(&self, id: Uuid) -> Result<Envelope<AddressPicker>, ApiError> {
        let handle = self.session(id)?;
        let mut session = handle.lock().await;
        let notice = session.picker.save();
        Ok(Envelope::new(session.picker.clone(), vec![notice]))
    }
}
