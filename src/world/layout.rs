// Layout solver
//
// Randomized multi-restart local search. Each trial seeds one node at the
// origin, walks the connection graph placing every neighbour on the
// separation circle around an already placed node, scatters whatever the
// walk did not reach, and scores the result. The best trial is kept.
//
// Scores: a position is worth the distance to its nearest other node,
// capped at the separation target; every crossing pair of connections
// costs a fixed penalty. Positions outside the viewport margin are worth
// `OUT_OF_BOUNDS_SCORE` and are never accepted, so a degenerate viewport
// leaves nodes at their unplaced sentinel after a bounded amount of work.

use super::config::{OUT_OF_BOUNDS_SCORE, UNPLACED_POSITION};
use super::{NodeId, Point, World};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Slack when comparing a score against the separation target
const SCORE_EPSILON: f64 = 1e-6;

/// One pending neighbour walk in the propagation worklist
struct Frame {
    center: NodeId,
    neighbors: Vec<NodeId>,
    next: usize,
}

impl World {
    /// Recompute every node position
    pub fn layout_all(&mut self) {
        if self.nodes.is_empty() {
            return;
        }

        let mut best_score = f64::NEG_INFINITY;
        let mut best_positions = self.snapshot_positions();

        for trial in 0..self.config.trials {
            for node in &mut self.nodes {
                node.position = Point::new(UNPLACED_POSITION, UNPLACED_POSITION);
            }

            let seed = self.pick_seed();
            self.set_node_position(seed, Point::new(0.0, 0.0));

            let mut unsorted: Vec<NodeId> = self.nodes.iter().map(|n| n.id).collect();
            self.propagate_layout(seed, &mut unsorted);

            // Disconnected components each get a random anchor
            while let Some(&next) = unsorted.first() {
                if let Some(position) = self.best_random_position() {
                    self.set_node_position(next, position);
                }
                self.propagate_layout(next, &mut unsorted);
            }

            let score = self.score_overall();
            if score > best_score {
                debug!(trial, score, "New best layout");
                best_score = score;
                best_positions = self.snapshot_positions();
            }
        }

        self.restore_positions(&best_positions);
        debug!(
            nodes = self.nodes.len(),
            connections = self.connections.len(),
            score = best_score,
            "Layout complete"
        );
    }

    /// Score a candidate position
    ///
    /// Distance to the nearest node other than `ignore`, capped at the
    /// separation target, or `OUT_OF_BOUNDS_SCORE` outside the margin.
    pub fn score_position(&self, point: Point, ignore: Option<NodeId>) -> f64 {
        if !self.in_bounds(point) {
            return OUT_OF_BOUNDS_SCORE;
        }

        let closest = self
            .nodes
            .iter()
            .filter(|n| Some(n.id) != ignore)
            .map(|n| n.position.distance_to(point))
            .fold(f64::INFINITY, f64::min);

        closest.min(self.config.separation)
    }

    /// Score the current layout as a whole
    pub fn score_overall(&self) -> f64 {
        let mut score: f64 = self
            .nodes
            .iter()
            .map(|n| self.score_position(n.position, Some(n.id)))
            .sum();

        for (i, first) in self.connections.iter().enumerate() {
            for second in &self.connections[i + 1..] {
                if self.intersects(first, second) {
                    score -= self.config.crossing_penalty;
                }
            }
        }

        score
    }

    /// Whether `point` lies inside the viewport minus the scaled margin
    pub fn in_bounds(&self, point: Point) -> bool {
        let half_w = self.viewport.width / 2.0;
        let half_h = self.viewport.height / 2.0;
        let margin = &self.config.margin;
        let s = self.scale;

        point.x >= -half_w + margin.left * s
            && point.x < half_w - margin.right * s
            && point.y >= -half_h + margin.top * s
            && point.y < half_h - margin.bottom * s
    }

    /// Home zone if present, then the fallback, else any node
    fn pick_seed(&mut self) -> NodeId {
        for name in &self.config.home_zones {
            if let Some(node) = self.nodes.iter().find(|n| &n.zone.name == name) {
                return node.id;
            }
        }
        let idx = self.rng.gen_range(0..self.nodes.len());
        self.nodes[idx].id
    }

    /// Place everything reachable from `seed` that is still in `unsorted`
    ///
    /// Depth-first like a recursive walk (each placed neighbour is expanded
    /// before its siblings) but driven by an explicit stack. Removal from
    /// `unsorted` marks a node as placed, which bounds the walk on cycles.
    fn propagate_layout(&mut self, seed: NodeId, unsorted: &mut Vec<NodeId>) {
        unsorted.retain(|id| *id != seed);

        let mut stack = vec![Frame {
            center: seed,
            neighbors: self.neighbors_of(seed),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(&neighbor) = frame.neighbors.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let center = frame.center;

            if !unsorted.contains(&neighbor) {
                continue;
            }

            // A ring that falls entirely outside the margin falls back to
            // the uniform sampler
            let position = self
                .best_position_around(center)
                .or_else(|| self.best_random_position());
            if let Some(position) = position {
                self.set_node_position(neighbor, position);
            }
            unsorted.retain(|id| *id != neighbor);

            stack.push(Frame {
                center: neighbor,
                neighbors: self.neighbors_of(neighbor),
                next: 0,
            });
        }
    }

    /// Best in-bounds spot on the separation circle around `center`
    ///
    /// Integer-degree angles are tried in shuffled order; the first spot
    /// that meets the separation target wins.
    fn best_position_around(&mut self, center: NodeId) -> Option<Point> {
        let origin = self.position_of(center);
        let separation = self.config.separation;

        self.angles.shuffle(&mut self.rng);

        let mut best = None;
        let mut best_score = OUT_OF_BOUNDS_SCORE;
        for i in 0..self.angles.len() {
            let candidate = origin.on_circle(separation, f64::from(self.angles[i]));
            let score = self.score_position(candidate, None);

            if score > best_score {
                best_score = score;
                best = Some(candidate);
            }
            if score >= separation - SCORE_EPSILON {
                break;
            }
        }
        best
    }

    /// Best of up to `random_samples` uniform spots across the viewport
    fn best_random_position(&mut self) -> Option<Point> {
        let half_w = self.viewport.width / 2.0;
        let half_h = self.viewport.height / 2.0;
        let separation = self.config.separation;

        let mut best = None;
        let mut best_score = OUT_OF_BOUNDS_SCORE;
        for _ in 0..self.config.random_samples {
            let x = (self.rng.gen::<f64>() * 2.0 - 1.0) * half_w;
            let y = (self.rng.gen::<f64>() * 2.0 - 1.0) * half_h;
            let candidate = Point::new(x, y);
            let score = self.score_position(candidate, None);

            if score > best_score {
                best_score = score;
                best = Some(candidate);
            }
            if score >= separation - SCORE_EPSILON {
                break;
            }
        }
        best
    }

    fn snapshot_positions(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    fn restore_positions(&mut self, positions: &[Point]) {
        for (node, position) in self.nodes.iter_mut().zip(positions) {
            node.position = *position;
        }
    }
}
