use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterFacet {
    AmbulanceType,
    Category,
    Availability,
}

impl FilterFacet {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ambulanceType" => Some(FilterFacet::AmbulanceType),
            "category" => Some(FilterFacet::Category),
            "availability" => Some(FilterFacet::Availability),
            _ => None,
        }
    }
}

/// Selected options per facet. A facet that is absent or empty imposes no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveFilters(pub BTreeMap<FilterFacet, BTreeSet<String>>);

impl ActiveFilters {
    pub fn selected(&self, facet: FilterFacet) -> Option<&BTreeSet<String>> {
        self.0.get(&facet).filter(|values| !values.is_empty())
    }

    pub fn is_unconstrained(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterToggle {
    pub facet: FilterFacet,
    pub value: String,
}
