//! Grouping of POIs into a main POI plus its secondary stops.
//!
//! Secondaries are matched to mains by exact, case-sensitive name. When two
//! mains share a name, the first one in input order collects the
//! secondaries. Secondaries whose main is missing become groups of their own.

use std::collections::{BTreeMap, HashMap};

use crate::model::{Poi, PoiKind};

/// A main POI and the secondary POIs that travel with it.
#[derive(Debug, Clone)]
pub struct PoiGroup<'a> {
    pub main: &'a Poi,
    pub secondaries: Vec<&'a Poi>,
    pub total_hours: f64,
}

impl<'a> PoiGroup<'a> {
    fn new(main: &'a Poi) -> Self {
        Self {
            main,
            secondaries: Vec::new(),
            total_hours: main.activity_hours(),
        }
    }

    fn attach(&mut self, secondary: &'a Poi) {
        self.total_hours += secondary.activity_hours();
        self.secondaries.push(secondary);
    }

    /// Main first, then secondaries in their original relative order.
    pub fn members(&self) -> impl Iterator<Item = &'a Poi> + '_ {
        std::iter::once(self.main).chain(self.secondaries.iter().copied())
    }

    pub fn len(&self) -> usize {
        1 + self.secondaries.len()
    }
}

/// POI groups split by whether the user pinned them to a day.
#[derive(Debug, Clone, Default)]
pub struct Grouping<'a> {
    /// Keyed by the raw 1-based pinned day; range checking is the caller's job.
    pub pinned: BTreeMap<i32, Vec<PoiGroup<'a>>>,
    pub unpinned: Vec<PoiGroup<'a>>,
}

/// Builds groups in anchor order: each main (or orphaned secondary) opens a
/// group at its own position, and matched secondaries join their main.
pub fn build_groups<'a, I>(pois: I) -> Vec<PoiGroup<'a>>
where
    I: IntoIterator<Item = &'a Poi>,
{
    let pois: Vec<&'a Poi> = pois.into_iter().collect();

    let mut main_by_name: HashMap<&str, usize> = HashMap::new();
    for (index, poi) in pois.iter().enumerate() {
        if poi.kind == PoiKind::Main {
            main_by_name.entry(poi.name.as_str()).or_insert(index);
        }
    }

    let mut groups: Vec<PoiGroup<'a>> = Vec::new();
    let mut group_of_main: HashMap<usize, usize> = HashMap::new();
    let mut attached: Vec<(usize, &'a Poi)> = Vec::new();

    for (index, poi) in pois.iter().enumerate() {
        match poi.kind {
            PoiKind::Main => {
                group_of_main.insert(index, groups.len());
                groups.push(PoiGroup::new(poi));
            }
            PoiKind::Secondary => match poi.main_name().and_then(|name| main_by_name.get(name)) {
                Some(&main_index) => attached.push((main_index, poi)),
                None => groups.push(PoiGroup::new(poi)),
            },
        }
    }

    for (main_index, secondary) in attached {
        if let Some(&group_index) = group_of_main.get(&main_index) {
            groups[group_index].attach(secondary);
        }
    }

    groups
}

/// Groups the full POI list and separates pinned groups from the rest.
///
/// A group is pinned when its main POI is; secondaries inherit the pin.
pub fn group_pois(pois: &[Poi]) -> Grouping<'_> {
    let mut grouping = Grouping::default();

    for group in build_groups(pois) {
        match group.main.pinned_day {
            Some(day) => grouping.pinned.entry(day).or_default().push(group),
            None => grouping.unpinned.push(group),
        }
    }

    tracing::debug!(
        pinned_days = grouping.pinned.len(),
        unpinned = grouping.unpinned.len(),
        "Grouped POIs"
    );
    grouping
}
