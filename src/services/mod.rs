pub mod address_picker;
pub mod alias_service;
pub mod emergency_service;
pub mod filter_service;
pub mod geocoding_service;
pub mod payment;
pub mod reference_service;
pub mod request_tracker;
pub mod search_service;
pub mod session_store;
pub mod wizard;
