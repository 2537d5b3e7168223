//! Initial placement by breadth-first layering.

use super::physics::Physics;
use crate::model::{Node, Vec2};
use std::collections::VecDeque;

/// Place every node on a BFS layer grid and clear its kinematic state.
///
/// The first node roots the first component at the origin. Nodes it cannot
/// reach root their own components, each starting one column to the right of
/// everything placed so far, so no node keeps an undefined position.
pub fn seed_positions(nodes: &mut [Node], physics: &Physics) {
    for node in nodes.iter_mut() {
        node.speed = Vec2::ZERO;
        node.force = Vec2::ZERO;
    }

    let mut seeded = vec![false; nodes.len()];
    let mut origin_x = 0.0;
    for root in 0..nodes.len() {
        if seeded[root] {
            continue;
        }
        let max_x = seed_component(nodes, root, origin_x, &mut seeded, physics);
        origin_x = max_x + physics.x_spacing;
    }
}

/// Returns the largest x coordinate assigned in the component.
fn seed_component(
    nodes: &mut [Node],
    root: usize,
    origin_x: f64,
    seeded: &mut [bool],
    physics: &Physics,
) -> f64 {
    nodes[root].pos = Vec2::new(origin_x, 0.0);
    seeded[root] = true;
    let mut max_x = origin_x;

    // `None` separates layers.
    let mut queue: VecDeque<Option<usize>> = VecDeque::from([Some(root), None]);
    let (mut layer, mut position) = (1.0, 0.0);

    while queue.len() > 1 {
        let Some(current) = queue.pop_front().flatten() else {
            queue.push_back(None);
            layer += 1.0;
            position = 0.0;
            continue;
        };

        for k in 0..nodes[current].links.len() {
            let next = nodes[current].links[k];
            if seeded[next] {
                continue;
            }
            let x = origin_x + position * physics.x_spacing;
            nodes[next].pos = Vec2::new(x, layer * physics.y_spacing);
            seeded[next] = true;
            max_x = max_x.max(x);
            position += 1.0;
            queue.push_back(Some(next));
        }
    }

    max_x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(links: &[&[usize]]) -> Vec<Node> {
        links
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let mut node = Node::new(i as u64);
                node.links = l.to_vec();
                node.pos = Vec2::new(-1.0, -1.0);
                node.speed = Vec2::new(3.0, 3.0);
                node
            })
            .collect()
    }

    #[test]
    fn test_bfs_layers() {
        let physics = Physics::default();
        let mut nodes = chain(&[&[1, 2], &[0, 3], &[0], &[1]]);
        seed_positions(&mut nodes, &physics);

        assert_eq!(nodes[0].pos, Vec2::new(0.0, 0.0));
        assert_eq!(nodes[1].pos, Vec2::new(0.0, 7000.0));
        assert_eq!(nodes[2].pos, Vec2::new(600.0, 7000.0));
        assert_eq!(nodes[3].pos, Vec2::new(0.0, 14000.0));
        assert!(nodes.iter().all(|n| n.speed == Vec2::ZERO));
    }

    #[test]
    fn test_unreachable_nodes_get_distinct_positions() {
        let physics = Physics::default();
        let mut nodes = chain(&[&[1], &[0], &[], &[4], &[3]]);
        seed_positions(&mut nodes, &physics);

        for (i, a) in nodes.iter().enumerate() {
            assert!(a.pos.is_finite());
            for b in nodes.iter().skip(i + 1) {
                assert!(a.distance(b) > physics.epsilon, "{:?} overlaps {:?}", a.pos, b.pos);
            }
        }
        assert_eq!(nodes[2].pos, Vec2::new(600.0, 0.0));
        assert_eq!(nodes[3].pos, Vec2::new(1200.0, 0.0));
        assert_eq!(nodes[4].pos, Vec2::new(1200.0, 7000.0));
    }
}
