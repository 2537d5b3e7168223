use super::graph::Graph;
use crate::model::Vec2;
use rand::Rng;

/// Progress of a batch convergence run, reported after every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub step: usize,
    pub max_steps: usize,
    /// Sum of squared node speeds after the step.
    pub movement: f64,
}

impl Progress {
    /// Percentage estimate, whichever of movement decay and step budget is further along.
    pub fn percent(&self) -> u32 {
        let settled = (1.0 - self.movement / 1000.0).max(0.0);
        let by_movement = (settled * settled * 100.0).floor();
        let by_steps = (self.step as f64 * 100.0 / self.max_steps.max(1) as f64).floor();
        by_movement.max(by_steps).min(100.0) as u32
    }
}

impl Graph {
    /// Advance the simulation by one step and return the movement.
    ///
    /// Forces are accumulated for all nodes from the current positions before
    /// any node is moved.
    pub fn step(&mut self) -> f64 {
        let physics = &self.physics;
        let nodes = &self.modules;
        let rng = &mut self.rng;
        let mut forces = vec![Vec2::ZERO; nodes.len()];

        for (i, node) in nodes.iter().enumerate() {
            let force = &mut forces[i];

            for (j, other) in nodes.iter().enumerate() {
                if i == j {
                    continue;
                }
                let distance = node.distance(other);
                if distance < physics.epsilon {
                    *force += jitter(rng) * (physics.force_hit * physics.min_distance);
                    continue;
                }
                let away = other.vector_to(node, 1.0 / distance);
                if distance < physics.min_distance {
                    *force += away * (physics.force_hit * (physics.min_distance - distance));
                }
                let repulsion = physics.force_inter * physics.min_distance * physics.min_distance
                    / distance
                    / distance
                    * self.maps.detraction(i, j);
                *force += away * repulsion;
            }

            for (k, &j) in node.links.iter().enumerate() {
                if i == j {
                    continue;
                }
                let other = &nodes[j];
                let distance = node.distance(other);
                let asynchronous = node.async_link(other) || other.async_link(node);
                let strongness = self.maps.strongness(i, k);
                let link_distance = physics.link_distance(asynchronous, strongness);
                if distance < physics.epsilon {
                    *force += jitter(rng) * (physics.force_link * link_distance * strongness);
                } else {
                    *force += node.vector_to(other, 1.0 / distance)
                        * (physics.force_link * (distance - link_distance) * strongness);
                }
            }
        }

        let damping = self.physics.damping;
        self.modules
            .iter_mut()
            .zip(forces)
            .map(|(node, force)| {
                node.apply_force(force, 1.0);
                node.integrate(damping)
            })
            .sum()
    }

    /// Step until the layout settles or `max_steps` is exhausted.
    ///
    /// Runs at least `min_steps` steps (bounded by `max_steps`); a budget of
    /// zero runs nothing. Returns the number of steps taken.
    pub fn converge<F>(&mut self, max_steps: usize, mut on_progress: F) -> usize
    where
        F: FnMut(Progress),
    {
        if max_steps == 0 {
            return 0;
        }

        let mut step = 0;
        loop {
            step += 1;
            let movement = self.step();
            on_progress(Progress {
                step,
                max_steps,
                movement,
            });

            let unsettled =
                step < self.physics.min_steps || movement > self.physics.movement_threshold;
            if !unsettled || step >= max_steps {
                return step;
            }
        }
    }
}

fn jitter<R: Rng>(rng: &mut R) -> Vec2 {
    Vec2::new(0.5 - rng.r#gen::<f64>(), 0.5 - rng.r#gen::<f64>())
}
