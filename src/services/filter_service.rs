use crate::models::{
    ambulance::AmbulanceService,
    filters::{ActiveFilters, FilterFacet},
};

pub struct FilterService;

impl FilterService {
    /// Add `value` to the facet selection, or remove it if already selected.
    pub fn toggle(filters: &mut ActiveFilters, facet: FilterFacet, value: &str) {
        let selection = filters.0.entry(facet).or_default();
        if !selection.remove(value) {
            selection.insert(value.to_string());
        }
    }

    pub fn clear(filters: &mut ActiveFilters, facet: FilterFacet) {
        if let Some(selection) = filters.0.get_mut(&facet) {
            selection.clear();
        }
    }

    fn attribute(record: &AmbulanceService, facet: FilterFacet) -> &str {
        match facet {
            FilterFacet::AmbulanceType => record.service_type.as_str(),
            FilterFacet::Category => record.category.as_str(),
            FilterFacet::Availability => record.availability(),
        }
    }

    /// AND across facets, OR within one facet's selection.
    pub fn passes(filters: &ActiveFilters, record: &AmbulanceService) -> bool {
        [
            FilterFacet::AmbulanceType,
            FilterFacet::Category,
            FilterFacet::Availability,
        ]
        .into_iter()
        .all(|facet| match filters.selected(facet) {
            Some(selection) => {
                let value = Self::attribute(record, facet);
                selection.iter().any(|option| option.eq_ignore_ascii_case(value))
            }
            None => true,
        })
    }

    pub fn apply(filters: &ActiveFilters, records: Vec<AmbulanceService>) -> Vec<AmbulanceService> {
        if filters.is_unconstrained() {
            return records;
        }
        records
            .into_iter()
            .filter(|record| Self::passes(filters, record))
            .collect()
    }
}
