//! Pick resolution: picked elements → one motion mode.
//!
//! Resolution is total: every combination of picked elements maps to a
//! mode, falling back to rigid-body motion when the pick is ambiguous.
//! Only an empty pick yields no mode.

use std::collections::BTreeSet;

use crate::shapes::rect::{edge_mode, shared_corner, shared_edge};
use crate::shapes::{ElementRole, MotionMode};

/// Motion mode of a line for the given picked elements.
pub fn resolve_line_pick(picked: &[ElementRole]) -> Option<MotionMode> {
    let endpoints: BTreeSet<usize> = picked
        .iter()
        .filter_map(|role| match role {
            ElementRole::Endpoint(i) if *i < 2 => Some(*i),
            _ => None,
        })
        .collect();
    let link = picked.contains(&ElementRole::Link);

    match endpoints.len() {
        1 => endpoints.first().map(|i| MotionMode::Edge(*i)),
        0 if link => Some(MotionMode::Whole),
        0 => None,
        _ => Some(MotionMode::Whole),
    }
}

/// Motion mode of a rectangle for the given picked elements.
pub fn resolve_rect_pick(picked: &[ElementRole]) -> Option<MotionMode> {
    if picked.contains(&ElementRole::Center) {
        return Some(MotionMode::Center);
    }

    let corners: Vec<usize> = indices(picked, |role| match role {
        ElementRole::Corner(i) if *i < 4 => Some(*i),
        _ => None,
    });
    match corners.as_slice() {
        [k] => return Some(MotionMode::Corner(*k)),
        [a, b] => {
            return Some(shared_edge(*a, *b).map_or(MotionMode::Center, edge_mode));
        }
        [] => {}
        _ => return Some(MotionMode::Center),
    }

    let edges: Vec<usize> = indices(picked, |role| match role {
        ElementRole::Edge(j) if *j < 4 => Some(*j),
        _ => None,
    });
    match edges.as_slice() {
        [] => None,
        [j] => Some(edge_mode(*j)),
        [a, b] => Some(shared_corner(*a, *b).map_or(MotionMode::Center, MotionMode::Corner)),
        _ => Some(MotionMode::Center),
    }
}

fn indices(picked: &[ElementRole], f: impl Fn(&ElementRole) -> Option<usize>) -> Vec<usize> {
    let set: BTreeSet<usize> = picked.iter().filter_map(f).collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::rect::is_horizontal;

    fn all_subsets(roles: &[ElementRole]) -> Vec<Vec<ElementRole>> {
        (0..(1u32 << roles.len()))
            .map(|mask| {
                roles
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, r)| *r)
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_line_pick_is_total() {
        let roles = [ElementRole::Endpoint(0), ElementRole::Endpoint(1), ElementRole::Link];
        for subset in all_subsets(&roles) {
            let mode = resolve_line_pick(&subset);
            assert_eq!(mode.is_none(), subset.is_empty(), "{subset:?}");
            if let Some(mode) = mode {
                assert!(matches!(mode, MotionMode::Whole | MotionMode::Edge(_)));
            }
        }
    }

    #[test]
    fn test_line_pick_rules() {
        assert_eq!(resolve_line_pick(&[ElementRole::Link]), Some(MotionMode::Whole));
        assert_eq!(
            resolve_line_pick(&[ElementRole::Endpoint(1), ElementRole::Link]),
            Some(MotionMode::Edge(1))
        );
        assert_eq!(
            resolve_line_pick(&[ElementRole::Endpoint(0), ElementRole::Endpoint(1)]),
            Some(MotionMode::Whole)
        );
    }

    #[test]
    fn test_rect_pick_is_total() {
        let mut roles: Vec<ElementRole> = (0..4).map(ElementRole::Corner).collect();
        roles.extend((0..4).map(ElementRole::Edge));
        roles.push(ElementRole::Center);
        for subset in all_subsets(&roles) {
            let mode = resolve_rect_pick(&subset);
            assert_eq!(mode.is_none(), subset.is_empty(), "{subset:?}");
            match mode {
                Some(MotionMode::HorzEdge { edge }) => assert!(is_horizontal(edge)),
                Some(MotionMode::VertEdge { edge }) => assert!(!is_horizontal(edge)),
                Some(MotionMode::Corner(k)) => assert!(k < 4),
                Some(MotionMode::Center) | None => {}
                Some(other) => panic!("line mode {other:?} for a rectangle"),
            }
        }
    }

    #[test]
    fn test_rect_pick_rules() {
        use ElementRole::*;
        assert_eq!(resolve_rect_pick(&[Corner(2), Edge(1), Edge(2)]), Some(MotionMode::Corner(2)));
        assert_eq!(resolve_rect_pick(&[Corner(1), Corner(2)]), Some(MotionMode::VertEdge { edge: 1 }));
        assert_eq!(resolve_rect_pick(&[Corner(3), Corner(0)]), Some(MotionMode::VertEdge { edge: 3 }));
        assert_eq!(resolve_rect_pick(&[Corner(0), Corner(2)]), Some(MotionMode::Center));
        assert_eq!(resolve_rect_pick(&[Corner(0), Corner(1), Corner(2)]), Some(MotionMode::Center));
        assert_eq!(resolve_rect_pick(&[Edge(0)]), Some(MotionMode::HorzEdge { edge: 0 }));
        assert_eq!(resolve_rect_pick(&[Edge(3), Edge(0)]), Some(MotionMode::Corner(0)));
        assert_eq!(resolve_rect_pick(&[Edge(0), Edge(2)]), Some(MotionMode::Center));
        assert_eq!(resolve_rect_pick(&[Corner(1), Center]), Some(MotionMode::Center));
        assert_eq!(resolve_rect_pick(&[]), None);
    }
}
