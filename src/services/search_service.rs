use log::debug;
use std::{cmp::Ordering, collections::HashSet, time::Duration};

use crate::{
    models::{
        ambulance::AmbulanceService,
        filters::ActiveFilters,
        search::{Suggestion, SuggestionKind},
    },
    services::{alias_service, filter_service::FilterService},
};

pub const MAX_SUGGESTIONS: usize = 8;

pub const SERVICE_TYPE_VOCABULARY: [&str; 5] = ["BLS", "ALS", "ICU", "Emergency", "Non-Emergency"];

/// Lowercased query together with its alias-expanded location variants.
struct PreparedQuery {
    text: String,
    raw: String,
    location_variants: Vec<String>,
}

impl PreparedQuery {
    fn new(query: &str) -> Self {
        let raw = query.trim().to_string();
        Self {
            text: raw.to_lowercase(),
            location_variants: alias_service::expand_query(&raw),
            raw,
        }
    }

    fn matches_location(&self, location: &str) -> bool {
        let location = location.to_lowercase();
        self.location_variants
            .iter()
            .any(|variant| location.contains(variant.as_str()))
    }

    fn matches_record(&self, record: &AmbulanceService) -> bool {
        record.service_name.to_lowercase().contains(&self.text)
            || self.matches_location(&record.location)
            || record.service_type.to_lowercase().contains(&self.text)
            || record.category.to_lowercase().contains(&self.text)
    }
}

fn by_distance(a: &AmbulanceService, b: &AmbulanceService) -> Ordering {
    match (a.distance.is_nan(), b.distance.is_nan()) {
        (false, false) => a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

#[derive(Debug, Clone)]
pub struct SearchService {
    latency: Duration,
}

impl SearchService {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Typeahead hints for `query`: matching ambulances, matching locations
    /// with their record counts, and matching service-type keywords.
    pub fn generate_suggestions(records: &[AmbulanceService], query: &str) -> Vec<Suggestion> {
        let prepared = PreparedQuery::new(query);
        if prepared.text.is_empty() {
            return Vec::new();
        }

        let mut candidates = Vec::new();

        for record in records.iter().filter(|r| prepared.matches_record(r)) {
            candidates.push(Suggestion {
                kind: SuggestionKind::Ambulance,
                value: record.service_name.clone(),
                ambulance_id: Some(record.id.clone()),
                count: None,
            });
        }

        let mut locations: Vec<(String, usize)> = Vec::new();
        for record in records.iter().filter(|r| prepared.matches_location(&r.location)) {
            match locations.iter_mut().find(|(name, _)| *name == record.location) {
                Some((_, count)) => *count += 1,
                None => locations.push((record.location.clone(), 1)),
            }
        }
        candidates.extend(locations.into_iter().map(|(value, count)| Suggestion {
            kind: SuggestionKind::Location,
            value,
            ambulance_id: None,
            count: Some(count),
        }));

        for keyword in SERVICE_TYPE_VOCABULARY {
            if !keyword.to_lowercase().contains(&prepared.text) {
                continue;
            }
            let count = records
                .iter()
                .filter(|r| r.service_type.eq_ignore_ascii_case(keyword))
                .count();
            if count > 0 {
                candidates.push(Suggestion {
                    kind: SuggestionKind::ServiceType,
                    value: keyword.to_string(),
                    ambulance_id: None,
                    count: Some(count),
                });
            }
        }

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|s| seen.insert((s.kind, s.value.clone())))
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Match, filter and order records without the simulated latency.
    pub fn rank(
        records: &[AmbulanceService],
        query: &str,
        filters: &ActiveFilters,
    ) -> Vec<AmbulanceService> {
        let prepared = PreparedQuery::new(query);

        let matched: Vec<AmbulanceService> = records
            .iter()
            .filter(|record| {
                prepared.text.is_empty()
                    || prepared.matches_record(record)
                    || record.phone.contains(&prepared.raw)
            })
            .cloned()
            .collect();

        let mut results = FilterService::apply(filters, matched);
        results.sort_by(by_distance);
        results
    }

    pub async fn search_ambulances(
        &self,
        records: &[AmbulanceService],
        query: &str,
        filters: &ActiveFilters,
    ) -> Vec<AmbulanceService> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let results = Self::rank(records, query, filters);
        debug!("Search '{}' matched {} ambulances", query, results.len());
        results
    }
}
