pub mod address;
pub mod ambulance;
pub mod bookings;
pub mod filters;
pub mod notice;
pub mod search;
