//! Visit order within a day.
//!
//! Nearest-neighbour walk over group representatives (the main POI of each
//! group), so secondaries always follow right after their main.

use crate::grouping::PoiGroup;
use crate::haversine::distance_km;
use crate::model::Poi;

/// Reorders one day's POIs to reduce backtracking.
///
/// The walk starts at the first group with coordinates and repeatedly moves
/// to the closest unvisited group. Groups without coordinates are appended
/// at the end in their original order.
pub fn order_day<'a>(groups: &[PoiGroup<'a>]) -> Vec<&'a Poi> {
    let (located, unlocated): (Vec<&PoiGroup<'a>>, Vec<&PoiGroup<'a>>) = groups
        .iter()
        .partition(|group| group.main.coordinates.is_some());

    let mut ordered: Vec<&'a Poi> = Vec::with_capacity(groups.iter().map(PoiGroup::len).sum());
    let mut remaining = located;

    if !remaining.is_empty() {
        let mut current = remaining.remove(0);
        loop {
            let next = remaining
                .iter()
                .enumerate()
                .map(|(index, group)| {
                    (index, distance_km(current.main.coordinates, group.main.coordinates))
                })
                // Strictly closer wins, so ties keep input order.
                .fold(None, |best: Option<(usize, f64)>, (index, distance)| match best {
                    Some((_, best_distance)) if best_distance <= distance => best,
                    _ => Some((index, distance)),
                });

            ordered.extend(current.members());
            match next {
                Some((index, _)) => current = remaining.remove(index),
                None => break,
            }
        }
    }

    for group in unlocated {
        ordered.extend(group.members());
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::build_groups;
    use crate::model::DurationClass;

    fn ordered_ids(pois: &[Poi]) -> Vec<&str> {
        order_day(&build_groups(pois)).iter().map(|poi| poi.id.as_str()).collect()
    }

    #[test]
    fn test_nearest_neighbour_order() {
        // West to east along a line; input is shuffled.
        let pois = vec![
            Poi::main("a", "A").at(43.0, 11.00),
            Poi::main("c", "C").at(43.0, 11.20),
            Poi::main("b", "B").at(43.0, 11.05),
            Poi::main("d", "D").at(43.0, 11.30),
        ];

        assert_eq!(ordered_ids(&pois), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_secondaries_stay_adjacent_to_main() {
        let pois = vec![
            Poi::main("uffizi", "Uffizi").at(43.7678, 11.2553),
            Poi::main("pitti", "Palazzo Pitti").at(43.7652, 11.2500),
            Poi::secondary("gilli", "Caffe Gilli", "Uffizi")
                .at(43.7717, 11.2541)
                .with_duration(DurationClass::Quick),
            Poi::main("duomo", "Duomo").at(43.7731, 11.2560),
            Poi::secondary("boboli", "Boboli Gardens", "Palazzo Pitti").at(43.7625, 11.2486),
        ];

        let ordered = ordered_ids(&pois);

        assert_eq!(ordered.len(), 5);
        let uffizi = ordered.iter().position(|id| *id == "uffizi").unwrap();
        assert_eq!(ordered[uffizi + 1], "gilli");
        let pitti = ordered.iter().position(|id| *id == "pitti").unwrap();
        assert_eq!(ordered[pitti + 1], "boboli");
        assert_eq!(ordered[0], "uffizi");
    }

    #[test]
    fn test_unlocated_groups_go_last_in_input_order() {
        let pois = vec![
            Poi::main("x", "X"),
            Poi::main("a", "A").at(43.0, 11.0),
            Poi::main("y", "Y"),
            Poi::main("b", "B").at(43.0, 11.1),
        ];

        assert_eq!(ordered_ids(&pois), vec!["a", "b", "x", "y"]);
    }

    #[test]
    fn test_equidistant_ties_keep_input_order() {
        let pois = vec![
            Poi::main("centre", "Centre").at(43.0, 11.0),
            Poi::main("east", "East").at(43.0, 11.1),
            Poi::main("west", "West").at(43.0, 10.9),
        ];

        assert_eq!(ordered_ids(&pois), vec!["centre", "east", "west"]);
    }

    #[test]
    fn test_single_and_empty_days() {
        let pois = vec![Poi::main("a", "A")];
        assert_eq!(ordered_ids(&pois), vec!["a"]);
        assert!(ordered_ids(&[]).is_empty());
    }
}
