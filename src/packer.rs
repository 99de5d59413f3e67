//! Proportional-area circle packing.
//!
//! Every item becomes a circle whose area encodes its value. Circles are placed
//! largest first, each one tangent to an already placed circle, by a
//! depth-first search that backtracks when a branch cannot be completed. When
//! no full arrangement exists the smallest item is dropped and the search is
//! retried, up to [`PackConfig::max_drop_tries`] times.
//!
//! ```
//! use bubblepack::{CirclePacker, Item, PackConfig};
//!
//! let items = vec![Item::new("A", 10.0), Item::new("B", 5.0), Item::new("C", 1.0)];
//! let packer = CirclePacker::new(PackConfig::default())?;
//! let outcome = packer.pack(&items, 200.0, 200.0)?;
//! assert!(outcome.is_complete());
//! assert_eq!(outcome.circles().len(), 3);
//! # Ok::<(), bubblepack::PackError>(())
//! ```

use crate::config::{CandidateSort, FirstPosition, PackConfig};
use crate::error::PackError;
use crate::geometry::{Circle, overlap_within};
use crate::models::{Item, PlacedCircle};
use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::f64::consts::{PI, TAU};

/// Result of a packing run.
#[derive(Debug, Clone, PartialEq)]
pub enum PackOutcome {
    /// Every item was placed.
    Placed(Vec<PlacedCircle>),
    /// Some of the smallest items had to be dropped, in drop order.
    PartiallyPlaced {
        circles: Vec<PlacedCircle>,
        dropped: Vec<String>,
    },
    /// No arrangement was found even after the allowed drops.
    Failed { dropped: Vec<String> },
}

impl PackOutcome {
    /// Placed circles in input order; empty for [`PackOutcome::Failed`].
    pub fn circles(&self) -> &[PlacedCircle] {
        match self {
            PackOutcome::Placed(circles) | PackOutcome::PartiallyPlaced { circles, .. } => circles,
            PackOutcome::Failed { .. } => &[],
        }
    }

    pub fn into_circles(self) -> Vec<PlacedCircle> {
        match self {
            PackOutcome::Placed(circles) | PackOutcome::PartiallyPlaced { circles, .. } => circles,
            PackOutcome::Failed { .. } => Vec::new(),
        }
    }

    /// Ids of dropped items, in the order they were dropped.
    pub fn dropped(&self) -> &[String] {
        match self {
            PackOutcome::Placed(_) => &[],
            PackOutcome::PartiallyPlaced { dropped, .. } | PackOutcome::Failed { dropped } => {
                dropped
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, PackOutcome::Placed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PackOutcome::Failed { .. })
    }
}

/// An item with its final size, before placement.
#[derive(Debug)]
struct Node<'a> {
    input: usize,
    item: &'a Item,
    radius: f64,
    area: f64,
    clamped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Coordinates rounded to two decimals, for de-duplication.
    fn key(&self) -> (i64, i64) {
        ((self.x * 100.0).round() as i64, (self.y * 100.0).round() as i64)
    }
}

/// Candidates for one search level and the index of the next one to try.
struct Frame {
    candidates: Vec<Point>,
    next: usize,
}

impl Frame {
    fn new(candidates: Vec<Point>) -> Self {
        Self {
            candidates,
            next: 0,
        }
    }

    fn next_candidate(&mut self) -> Option<Point> {
        let p = self.candidates.get(self.next).copied();
        self.next += 1;
        p
    }
}

enum Search {
    Found(Vec<Circle>),
    Exhausted,
    OutOfBudget,
}

#[derive(Debug, Clone)]
pub struct CirclePacker {
    config: PackConfig,
}

impl Default for CirclePacker {
    fn default() -> Self {
        Self {
            config: PackConfig::default(),
        }
    }
}

impl CirclePacker {
    pub fn new(config: PackConfig) -> Result<Self, PackError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Place `items` on a `width` x `height` canvas.
    ///
    /// Returns an error only for malformed input (no items, a non-positive
    /// canvas, a non-positive value, or a repeated id). A search that cannot
    /// place everything is reported through the [`PackOutcome`] variant.
    pub fn pack(
        &self,
        items: &[Item],
        width: f64,
        height: f64,
    ) -> Result<PackOutcome, PackError> {
        validate_input(items, width, height)?;

        let mut nodes = self.size_nodes(items, width, height);
        // Stable: equal areas keep input order.
        nodes.sort_by(|a, b| b.area.total_cmp(&a.area));

        let mut rng = match self.config.candidate_sort {
            CandidateSort::Random => Some(match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            }),
            _ => None,
        };

        let mut dropped: Vec<String> = Vec::new();
        loop {
            let (search, steps) = self.search(&nodes, width, height, rng.as_mut());
            match search {
                Search::Found(placed) => {
                    debug!(
                        "placed {} circles after {} candidate checks ({} dropped)",
                        placed.len(),
                        steps,
                        dropped.len()
                    );
                    let circles = assemble(&nodes, &placed);
                    return Ok(if dropped.is_empty() {
                        PackOutcome::Placed(circles)
                    } else {
                        PackOutcome::PartiallyPlaced { circles, dropped }
                    });
                }
                Search::Exhausted => {
                    debug!("search over {} items exhausted after {} checks", nodes.len(), steps)
                }
                Search::OutOfBudget => {
                    warn!("search over {} items stopped after {} checks", nodes.len(), steps)
                }
            }

            if dropped.len() >= self.config.max_drop_tries {
                break;
            }
            let Some(smallest) = nodes.pop() else { break };
            warn!(
                "dropping smallest item {:?} (radius {:.2}) and retrying",
                smallest.item.id, smallest.radius
            );
            dropped.push(smallest.item.id.clone());
            if nodes.is_empty() {
                break;
            }
        }

        warn!("no arrangement found; {} items dropped, nothing placed", dropped.len());
        Ok(PackOutcome::Failed { dropped })
    }

    fn size_nodes<'a>(&self, items: &'a [Item], width: f64, height: f64) -> Vec<Node<'a>> {
        let total: f64 = items.iter().map(|i| i.value).sum();
        let area_per_unit = width * height * self.config.fill_ratio / total;
        let min_r = self.config.min_radius;
        let max_r = self.config.effective_max_radius(width, height);
        items
            .iter()
            .enumerate()
            .map(|(input, item)| {
                let raw = (item.value * area_per_unit / PI).sqrt();
                let radius = raw.clamp(min_r, max_r);
                Node {
                    input,
                    item,
                    radius,
                    area: PI * radius * radius,
                    clamped: radius != raw,
                }
            })
            .collect()
    }

    /// Depth-first search over candidate positions. `placed[i]` holds the
    /// circle chosen for `nodes[i]`; `frames[i]` holds the remaining
    /// alternatives for that level.
    fn search(
        &self,
        nodes: &[Node],
        width: f64,
        height: f64,
        mut rng: Option<&mut StdRng>,
    ) -> (Search, u64) {
        let Some(first) = nodes.first() else {
            return (Search::Found(Vec::new()), 0);
        };
        let budget = self.config.max_steps.unwrap_or(u64::MAX);
        let mut steps = 0u64;
        let mut placed: Vec<Circle> = Vec::with_capacity(nodes.len());
        let mut frames = vec![Frame::new(self.candidates(
            first.radius,
            &placed,
            width,
            height,
            rng.as_deref_mut(),
        ))];

        while let Some(frame) = frames.last_mut() {
            let node = &nodes[placed.len()];
            let mut accepted = None;
            while let Some(p) = frame.next_candidate() {
                steps += 1;
                if steps > budget {
                    return (Search::OutOfBudget, steps - 1);
                }
                let circle = Circle::new(p.x, p.y, node.radius);
                if placed
                    .iter()
                    .all(|other| overlap_within(&circle, other, self.config.overlap_max))
                {
                    accepted = Some(circle);
                    break;
                }
            }

            match accepted {
                Some(circle) => {
                    placed.push(circle);
                    if placed.len() == nodes.len() {
                        return (Search::Found(placed), steps);
                    }
                    let next = &nodes[placed.len()];
                    frames.push(Frame::new(self.candidates(
                        next.radius,
                        &placed,
                        width,
                        height,
                        rng.as_deref_mut(),
                    )));
                }
                None => {
                    // Backtrack: this level is out of options, so the parent's choice goes too.
                    frames.pop();
                    placed.pop();
                }
            }
        }
        (Search::Exhausted, steps)
    }

    fn candidates(
        &self,
        radius: f64,
        placed: &[Circle],
        width: f64,
        height: f64,
        rng: Option<&mut StdRng>,
    ) -> Vec<Point> {
        let mut out = Vec::new();
        if placed.is_empty() {
            for pos in &self.config.first_positions {
                let p = match pos {
                    FirstPosition::TopLeft => Point {
                        x: radius,
                        y: radius,
                    },
                    FirstPosition::Center => Point {
                        x: width / 2.0,
                        y: height / 2.0,
                    },
                };
                if Circle::new(p.x, p.y, radius).inside(width, height) && !out.contains(&p) {
                    out.push(p);
                }
            }
            return out;
        }

        let mut seen = HashSet::new();
        for anchor in placed {
            let dist = anchor.r + radius + self.config.dist_padding;
            for k in 0..self.config.angle_steps() {
                let angle = k as f64 * self.config.angle_step;
                if angle >= TAU {
                    break;
                }
                let p = Point {
                    x: anchor.x + dist * angle.cos(),
                    y: anchor.y + dist * angle.sin(),
                };
                if Circle::new(p.x, p.y, radius).inside(width, height) && seen.insert(p.key()) {
                    out.push(p);
                }
            }
        }
        sort_candidates(&mut out, self.config.candidate_sort, width, height, rng);
        out
    }
}

fn sort_candidates(
    points: &mut [Point],
    order: CandidateSort,
    width: f64,
    height: f64,
    rng: Option<&mut StdRng>,
) {
    match order {
        CandidateSort::TopLeft => {
            points.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        }
        CandidateSort::Center => {
            let (cx, cy) = (width / 2.0, height / 2.0);
            let dist2 = |p: &Point| (p.x - cx).powi(2) + (p.y - cy).powi(2);
            points.sort_by(|a, b| {
                dist2(a)
                    .total_cmp(&dist2(b))
                    .then(a.y.total_cmp(&b.y))
                    .then(a.x.total_cmp(&b.x))
            });
        }
        CandidateSort::Random => {
            if let Some(rng) = rng {
                points.shuffle(rng);
            }
        }
    }
}

fn validate_input(items: &[Item], width: f64, height: f64) -> Result<(), PackError> {
    if items.is_empty() {
        return Err(PackError::EmptyInput);
    }
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(PackError::InvalidCanvas { width, height });
    }
    let mut ids = HashSet::with_capacity(items.len());
    for item in items {
        if !(item.value.is_finite() && item.value > 0.0) {
            return Err(PackError::InvalidValue {
                id: item.id.clone(),
                value: item.value,
            });
        }
        if !ids.insert(item.id.as_str()) {
            return Err(PackError::DuplicateId(item.id.clone()));
        }
    }
    Ok(())
}

/// Pair sorted nodes with their circles and restore input order.
fn assemble(nodes: &[Node], placed: &[Circle]) -> Vec<PlacedCircle> {
    let mut out: Vec<(usize, PlacedCircle)> = nodes
        .iter()
        .zip(placed)
        .enumerate()
        .map(|(order, (node, c))| {
            (
                node.input,
                PlacedCircle {
                    id: node.item.id.clone(),
                    value: node.item.value,
                    x: c.x,
                    y: c.y,
                    radius: node.radius,
                    area: node.area,
                    order,
                    clamped: node.clamped,
                    color: node.item.color.clone(),
                    icon: node.item.icon.clone(),
                },
            )
        })
        .collect();
    out.sort_by_key(|(input, _)| *input);
    out.into_iter().map(|(_, c)| c).collect()
}

/// Pack with the default configuration and return only the placed circles.
pub fn pack(items: &[Item], width: f64, height: f64) -> Result<Vec<PlacedCircle>, PackError> {
    Ok(CirclePacker::default().pack(items, width, height)?.into_circles())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_are_filtered_and_deduplicated() {
        let packer = CirclePacker::default();
        // r == w/2 == h/2: top-left and center coincide.
        let seeds = packer.candidates(50.0, &[], 100.0, 100.0, None);
        assert_eq!(seeds, vec![Point { x: 50.0, y: 50.0 }]);
        // Too large for the canvas: no seeds at all.
        assert!(packer.candidates(60.0, &[], 100.0, 100.0, None).is_empty());
    }

    #[test]
    fn tangency_candidates_stay_inside_and_are_row_major() {
        let packer = CirclePacker::default();
        let anchor = [Circle::new(100.0, 100.0, 20.0)];
        let pts = packer.candidates(10.0, &anchor, 200.0, 200.0, None);
        assert_eq!(pts.len(), 48);
        for p in &pts {
            assert!(Circle::new(p.x, p.y, 10.0).inside(200.0, 200.0));
            let d = (p.x - 100.0).hypot(p.y - 100.0);
            assert!((d - 30.3).abs() < 1e-9);
        }
        for w in pts.windows(2) {
            assert!(w[0].y < w[1].y || (w[0].y == w[1].y && w[0].x <= w[1].x));
        }
    }

    #[test]
    fn overlapping_rings_share_no_candidates() {
        let packer = CirclePacker::default();
        // Anchors 30.3 apart, each with a 30.3 tangency ring: the rings cross at
        // 60 degrees from the first anchor and 120 degrees from the second, which
        // are both on the 7.5 degree grid.
        let anchors = [
            Circle::new(200.0, 200.0, 20.0),
            Circle::new(230.3, 200.0, 20.0),
        ];
        let per_anchor: usize = anchors
            .iter()
            .map(|a| packer.candidates(10.0, &[*a], 400.0, 400.0, None).len())
            .sum();
        assert_eq!(per_anchor, 96);

        let pts = packer.candidates(10.0, &anchors, 400.0, 400.0, None);
        let keys: HashSet<(i64, i64)> = pts.iter().map(Point::key).collect();
        assert_eq!(keys.len(), pts.len(), "duplicate candidates survived");
        assert!(pts.len() < per_anchor);
        assert_eq!(pts.len(), 94);
    }

    #[test]
    fn center_sort_prefers_points_near_the_middle() {
        let mut pts = vec![
            Point { x: 0.0, y: 0.0 },
            Point { x: 48.0, y: 52.0 },
            Point { x: 90.0, y: 10.0 },
        ];
        sort_candidates(&mut pts, CandidateSort::Center, 100.0, 100.0, None);
        assert_eq!(pts[0], Point { x: 48.0, y: 52.0 });
    }

    #[test]
    fn rejects_malformed_input() {
        let packer = CirclePacker::default();
        assert_eq!(packer.pack(&[], 10.0, 10.0), Err(PackError::EmptyInput));
        let items = vec![Item::new("a", 1.0)];
        assert!(matches!(
            packer.pack(&items, 0.0, 10.0),
            Err(PackError::InvalidCanvas { .. })
        ));
        let items = vec![Item::new("a", 1.0), Item::new("a", 2.0)];
        assert_eq!(
            packer.pack(&items, 10.0, 10.0),
            Err(PackError::DuplicateId("a".into()))
        );
        let items = vec![Item::new("z", 0.0)];
        assert!(matches!(
            packer.pack(&items, 10.0, 10.0),
            Err(PackError::InvalidValue { .. })
        ));
    }
}
