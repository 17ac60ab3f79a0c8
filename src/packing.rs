//! Geographic clustering and bin-packing of POI groups into day slots.
//!
//! Groups whose main POIs lie within the cluster radius of each other are
//! linked (single-link, transitively). Clusters are then packed into day
//! slots first-fit in descending size, overflowing onto the emptiest slot
//! when nothing fits. Nothing is ever dropped.

use rayon::prelude::*;

use crate::config::SchedulerConfig;
use crate::grouping::PoiGroup;
use crate::haversine::distance_km;
use crate::model::Poi;

/// Tunables for the packer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackingOptions {
    pub day_capacity_hours: f64,
    pub cluster_radius_km: f64,
    pub full_day_threshold_hours: f64,
}

impl Default for PackingOptions {
    fn default() -> Self {
        Self {
            day_capacity_hours: 8.0,
            cluster_radius_km: 20.0,
            full_day_threshold_hours: 6.0,
        }
    }
}

impl From<&SchedulerConfig> for PackingOptions {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            day_capacity_hours: config.day_capacity_hours,
            cluster_radius_km: config.cluster_radius_km,
            full_day_threshold_hours: config.full_day_threshold_hours,
        }
    }
}

/// A calendar day that can receive visits.
#[derive(Debug, Clone)]
pub struct DaySlot<'a> {
    /// 0-based day of the trip.
    pub day_index: usize,
    pub groups: Vec<PoiGroup<'a>>,
    /// Hours already committed: forced travel, pinned groups, packed groups.
    pub load_hours: f64,
    pub capacity_hours: f64,
}

impl<'a> DaySlot<'a> {
    pub fn new(day_index: usize, capacity_hours: f64) -> Self {
        Self {
            day_index,
            groups: Vec::new(),
            load_hours: 0.0,
            capacity_hours,
        }
    }

    /// Reserve hours that are not visits, e.g. the drive home.
    pub fn reserve(&mut self, hours: f64) {
        self.load_hours += hours;
    }

    pub fn assign(&mut self, group: PoiGroup<'a>) {
        self.load_hours += group.total_hours;
        self.groups.push(group);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every POI in the slot, group by group.
    pub fn pois(&self) -> impl Iterator<Item = &'a Poi> + '_ {
        self.groups.iter().flat_map(|group| group.members())
    }

    pub fn remaining_hours(&self) -> f64 {
        self.capacity_hours - self.load_hours
    }

    /// Hours of visits alone, without reserved travel.
    pub fn visit_hours(&self) -> f64 {
        self.groups.iter().map(|group| group.total_hours).sum()
    }
}

/// Groups considered close enough to visit on the same day.
#[derive(Debug, Clone)]
pub struct Cluster<'a> {
    pub groups: Vec<PoiGroup<'a>>,
    pub total_hours: f64,
}

impl<'a> Cluster<'a> {
    fn from_groups(groups: Vec<PoiGroup<'a>>) -> Self {
        let total_hours = groups.iter().map(|group| group.total_hours).sum();
        Self { groups, total_hours }
    }
}

/// Single-link clustering over main-POI coordinates.
///
/// Clusters come out ordered by their first group's input position, members
/// in input order. Groups without coordinates stay on their own.
pub fn cluster_groups<'a>(groups: Vec<PoiGroup<'a>>, radius_km: f64) -> Vec<Cluster<'a>> {
    let n = groups.len();
    let coords: Vec<_> = groups.iter().map(|group| group.main.coordinates).collect();

    let neighbours: Vec<Vec<usize>> = (0..n)
        .into_par_iter()
        .map(|i| {
            (0..n)
                .filter(|&j| j != i && distance_km(coords[i], coords[j]) <= radius_km)
                .collect()
        })
        .collect();

    let mut component = vec![usize::MAX; n];
    let mut components: Vec<Vec<usize>> = Vec::new();
    for start in 0..n {
        if component[start] != usize::MAX {
            continue;
        }
        let id = components.len();
        component[start] = id;
        let mut members = vec![start];
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for &next in &neighbours[current] {
                if component[next] == usize::MAX {
                    component[next] = id;
                    members.push(next);
                    stack.push(next);
                }
            }
        }
        members.sort_unstable();
        components.push(members);
    }

    let mut slots: Vec<Option<PoiGroup<'a>>> = groups.into_iter().map(Some).collect();
    components
        .into_iter()
        .map(|members| {
            Cluster::from_groups(
                members
                    .into_iter()
                    .filter_map(|index| slots[index].take())
                    .collect(),
            )
        })
        .collect()
}

/// Cuts a cluster that cannot fit in one day into consecutive chunks that do.
/// A single group larger than a day stays whole.
fn split_oversized<'a>(cluster: Cluster<'a>, capacity_hours: f64) -> Vec<Cluster<'a>> {
    if cluster.total_hours <= capacity_hours {
        return vec![cluster];
    }

    let mut chunks = Vec::new();
    let mut current: Vec<PoiGroup<'a>> = Vec::new();
    let mut current_hours = 0.0;
    for group in cluster.groups {
        if !current.is_empty() && current_hours + group.total_hours > capacity_hours {
            chunks.push(Cluster::from_groups(std::mem::take(&mut current)));
            current_hours = 0.0;
        }
        current_hours += group.total_hours;
        current.push(group);
    }
    if !current.is_empty() {
        chunks.push(Cluster::from_groups(current));
    }
    chunks
}

/// Slot with the most remaining capacity; ties go to the earlier slot.
fn roomiest<'s, 'a>(slots: impl Iterator<Item = (usize, &'s DaySlot<'a>)>) -> Option<usize>
where
    'a: 's,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, slot) in slots {
        let remaining = slot.remaining_hours();
        if best.is_none_or(|(_, best_remaining)| remaining > best_remaining) {
            best = Some((index, remaining));
        }
    }
    best.map(|(index, _)| index)
}

/// Slot with the fewest visit hours, ignoring reserved travel; ties go to
/// the earlier slot.
fn least_visited<'s, 'a>(slots: impl Iterator<Item = (usize, &'s DaySlot<'a>)>) -> Option<usize>
where
    'a: 's,
{
    let mut best: Option<(usize, f64)> = None;
    for (index, slot) in slots {
        let visits = slot.visit_hours();
        if best.is_none_or(|(_, best_visits)| visits < best_visits) {
            best = Some((index, visits));
        }
    }
    best.map(|(index, _)| index)
}

/// Packs unpinned groups into the given slots, which may already hold
/// reserved hours and pinned groups.
///
/// Full-day groups go first, each to the emptiest slot that holds no visits
/// yet, and that slot takes nothing else while any other slot is left. The
/// remaining groups are clustered, oversized clusters split, and the
/// clusters placed largest first into the first slot with room. A cluster
/// that fits nowhere goes to the slot with the fewest visit hours.
///
/// Returns the groups that could not be placed, which only happens when
/// `slots` is empty.
pub fn pack_groups<'a>(
    groups: Vec<PoiGroup<'a>>,
    slots: &mut [DaySlot<'a>],
    options: &PackingOptions,
) -> Vec<PoiGroup<'a>> {
    if groups.is_empty() {
        return groups;
    }
    if slots.is_empty() {
        tracing::warn!(groups = groups.len(), "No day slots to pack into");
        return groups;
    }

    let (full_day, partial): (Vec<_>, Vec<_>) = groups
        .into_iter()
        .partition(|group| group.total_hours >= options.full_day_threshold_hours);

    let mut closed = vec![false; slots.len()];
    for group in full_day {
        let target = roomiest(slots.iter().enumerate().filter(|(_, slot)| slot.is_empty()))
            .or_else(|| roomiest(slots.iter().enumerate().filter(|(index, _)| !closed[*index])))
            .or_else(|| roomiest(slots.iter().enumerate()));
        if let Some(index) = target {
            tracing::debug!(
                poi = %group.main.name,
                day = slots[index].day_index + 1,
                "Placed full-day group"
            );
            slots[index].assign(group);
            closed[index] = true;
        }
    }

    let all_closed = closed.iter().all(|&is_closed| is_closed);
    let usable: Vec<usize> = (0..slots.len())
        .filter(|&index| all_closed || !closed[index])
        .collect();

    let mut clusters: Vec<Cluster<'a>> = cluster_groups(partial, options.cluster_radius_km)
        .into_iter()
        .flat_map(|cluster| split_oversized(cluster, options.day_capacity_hours))
        .collect();
    // Stable: equal clusters keep input order.
    clusters.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));

    for cluster in clusters {
        let target = usable
            .iter()
            .copied()
            .find(|&index| slots[index].remaining_hours() >= cluster.total_hours)
            .or_else(|| {
                let index = least_visited(usable.iter().map(|&index| (index, &slots[index])));
                if let Some(index) = index {
                    tracing::warn!(
                        hours = cluster.total_hours,
                        day = slots[index].day_index + 1,
                        visit_hours = slots[index].visit_hours(),
                        "No day has room for cluster, overflowing"
                    );
                }
                index
            });

        if let Some(index) = target {
            for group in cluster.groups {
                slots[index].assign(group);
            }
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::build_groups;
    use crate::model::DurationClass;

    // Florence and Siena are ~50 km apart; the Uffizi and Duomo ~1 km.
    fn florence_pois() -> Vec<Poi> {
        vec![
            Poi::main("uffizi", "Uffizi").at(43.7678, 11.2553),
            Poi::main("siena", "Piazza del Campo").at(43.3184, 11.3316),
            Poi::main("duomo", "Duomo").at(43.7731, 11.2560),
            Poi::main("unknown", "Somewhere"),
        ]
    }

    fn slot_ids<'a>(slot: &DaySlot<'a>) -> Vec<&'a str> {
        slot.pois().map(|poi| poi.id.as_str()).collect()
    }

    #[test]
    fn test_clusters_nearby_groups() {
        let pois = florence_pois();
        let clusters = cluster_groups(build_groups(&pois), 20.0);

        let members: Vec<Vec<&str>> = clusters
            .iter()
            .map(|cluster| cluster.groups.iter().map(|g| g.main.id.as_str()).collect())
            .collect();
        assert_eq!(members, vec![vec!["uffizi", "duomo"], vec!["siena"], vec!["unknown"]]);
        assert_eq!(clusters[0].total_hours, 7.0);
    }

    #[test]
    fn test_clustering_is_transitive() {
        // Each hop is ~15 km, ends ~30 km apart.
        let pois = vec![
            Poi::main("a", "A").at(43.0, 11.0),
            Poi::main("c", "C").at(43.27, 11.0),
            Poi::main("b", "B").at(43.135, 11.0),
        ];
        let clusters = cluster_groups(build_groups(&pois), 20.0);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].groups.len(), 3);
    }

    #[test]
    fn test_missing_coordinates_never_cluster() {
        let pois = vec![Poi::main("a", "A"), Poi::main("b", "B")];
        let clusters = cluster_groups(build_groups(&pois), 1_000_000.0);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_split_oversized_cluster() {
        let pois: Vec<Poi> = (0..5)
            .map(|i| Poi::main(format!("p{}", i), format!("P{}", i)).at(43.77, 11.25))
            .collect();
        let clusters = cluster_groups(build_groups(&pois), 20.0);
        assert_eq!(clusters.len(), 1);

        let chunks = split_oversized(clusters.into_iter().next().unwrap(), 8.0);
        let sizes: Vec<f64> = chunks.iter().map(|c| c.total_hours).collect();
        assert_eq!(sizes, vec![7.0, 7.0, 3.5]);
    }

    #[test]
    fn test_first_fit_in_slot_order() {
        let pois = vec![
            Poi::main("a", "A").at(43.0, 11.0),
            Poi::main("b", "B").at(44.0, 11.0).with_duration(DurationClass::Quick),
        ];
        let mut slots = vec![DaySlot::new(1, 8.0), DaySlot::new(2, 8.0)];

        pack_groups(build_groups(&pois), &mut slots, &PackingOptions::default());

        assert_eq!(slot_ids(&slots[0]), vec!["a", "b"]);
        assert!(slots[1].is_empty());
    }

    #[test]
    fn test_respects_reserved_hours() {
        let pois = vec![Poi::main("a", "A").at(43.0, 11.0)];
        let mut slots = vec![DaySlot::new(0, 8.0), DaySlot::new(1, 8.0)];
        slots[0].reserve(5.0);

        pack_groups(build_groups(&pois), &mut slots, &PackingOptions::default());

        assert!(slots[0].is_empty());
        assert_eq!(slot_ids(&slots[1]), vec!["a"]);
    }

    #[test]
    fn test_full_day_groups_get_own_day() {
        let pois = vec![
            Poi::main("q", "Quick").at(43.0, 11.0).with_duration(DurationClass::Quick),
            Poi::main("zoo", "Zoo").at(43.0, 11.0).with_duration(DurationClass::FullDay),
            Poi::main("park", "Park").at(43.0, 11.0).with_duration(DurationClass::FullDay),
        ];
        let mut slots = vec![DaySlot::new(1, 8.0), DaySlot::new(2, 8.0), DaySlot::new(3, 8.0)];

        pack_groups(build_groups(&pois), &mut slots, &PackingOptions::default());

        assert_eq!(slot_ids(&slots[0]), vec!["zoo"]);
        assert_eq!(slot_ids(&slots[1]), vec!["park"]);
        assert_eq!(slot_ids(&slots[2]), vec!["q"]);
    }

    #[test]
    fn test_full_day_group_of_secondaries_keeps_its_day() {
        // 3.5 + 1.5 + 1.5 = 6.5 hours, so the leftover 1.5 hours stay unused.
        let pois = vec![
            Poi::main("m", "Museum").at(43.77, 11.25),
            Poi::secondary("s1", "Cafe", "Museum").at(43.77, 11.25).with_duration(DurationClass::Quick),
            Poi::secondary("s2", "Shop", "Museum").at(43.77, 11.25).with_duration(DurationClass::Quick),
            Poi::main("q", "Quick").at(41.90, 12.50).with_duration(DurationClass::Quick),
        ];
        let mut slots = vec![DaySlot::new(1, 8.0), DaySlot::new(2, 8.0), DaySlot::new(3, 8.0)];

        let unplaced = pack_groups(build_groups(&pois), &mut slots, &PackingOptions::default());

        assert!(unplaced.is_empty());
        assert_eq!(slot_ids(&slots[0]), vec!["m", "s1", "s2"]);
        assert_eq!(slot_ids(&slots[1]), vec!["q"]);
        assert!(slots[2].is_empty());
    }

    #[test]
    fn test_full_day_slots_reopen_when_all_are_closed() {
        let pois = vec![
            Poi::main("zoo", "Zoo").at(43.0, 11.0).with_duration(DurationClass::FullDay),
            Poi::main("q", "Quick").at(45.0, 11.0).with_duration(DurationClass::Quick),
        ];
        let mut slots = vec![DaySlot::new(1, 8.0)];

        pack_groups(build_groups(&pois), &mut slots, &PackingOptions::default());

        assert_eq!(slot_ids(&slots[0]), vec!["zoo", "q"]);
    }

    #[test]
    fn test_overflow_overloads_single_slot() {
        let pois = vec![
            Poi::main("a", "A").at(43.0, 11.0),
            Poi::main("b", "B").at(45.0, 11.0),
            Poi::main("c", "C").at(47.0, 11.0),
        ];
        let mut slots = vec![DaySlot::new(0, 8.0)];
        slots[0].reserve(3.0);

        pack_groups(build_groups(&pois), &mut slots, &PackingOptions::default());

        assert_eq!(slots[0].pois().count(), 3);
        assert!(slots[0].remaining_hours() < 0.0);
    }

    #[test]
    fn test_overflow_goes_to_fewest_visit_hours() {
        // Four far-apart half-day visits. Slot 0 loses 4 hours to travel.
        let pois = vec![
            Poi::main("a", "A").at(41.0, 11.0),
            Poi::main("b", "B").at(42.0, 11.0),
            Poi::main("c", "C").at(43.0, 11.0),
            Poi::main("d", "D").at(44.0, 11.0),
        ];
        let mut slots = vec![DaySlot::new(0, 8.0), DaySlot::new(1, 8.0)];
        slots[0].reserve(4.0);

        pack_groups(build_groups(&pois), &mut slots, &PackingOptions::default());

        // Slot 1 has more room left, but slot 0 has fewer visit hours.
        assert_eq!(slot_ids(&slots[0]), vec!["a", "d"]);
        assert_eq!(slot_ids(&slots[1]), vec!["b", "c"]);
        assert_eq!(slots[0].visit_hours(), 7.0);
        assert_eq!(slots[1].visit_hours(), 7.0);
    }

    #[test]
    fn test_larger_clusters_placed_first() {
        let pois = vec![
            Poi::main("small", "Small").at(45.0, 11.0).with_duration(DurationClass::Quick),
            Poi::main("big1", "Big 1").at(43.0, 11.0),
            Poi::main("big2", "Big 2").at(43.01, 11.0),
        ];
        let mut slots = vec![DaySlot::new(1, 8.0), DaySlot::new(2, 8.0)];

        pack_groups(build_groups(&pois), &mut slots, &PackingOptions::default());

        assert_eq!(slot_ids(&slots[0]), vec!["big1", "big2"]);
        assert_eq!(slot_ids(&slots[1]), vec!["small"]);
    }

    #[test]
    fn test_no_slots_returns_groups_unplaced() {
        let pois = vec![Poi::main("a", "A")];
        let mut slots: Vec<DaySlot<'_>> = Vec::new();

        let unplaced = pack_groups(build_groups(&pois), &mut slots, &PackingOptions::default());

        assert_eq!(unplaced.len(), 1);
        assert_eq!(unplaced[0].main.id, "a");
    }
}
