// src/geometry/merge.rs
//! Cluster platforms at the same height whose x-intervals touch into groups.

use super::core::{MergeStrategy, Platform, PlatformGroup};

/// Tolerances for grouping.
#[derive(Clone, Copy, Debug)]
pub struct MergeParams {
    pub y_epsilon: f32,
    pub x_gap_epsilon: f32,
    pub strategy: MergeStrategy,
}

/// Group `platforms`; group member indices refer to the input slice.
pub fn merge_platforms(platforms: &[Platform], params: MergeParams) -> Vec<PlatformGroup> {
    match params.strategy {
        MergeStrategy::Greedy => merge_greedy(platforms, params),
        MergeStrategy::Connected => merge_connected(platforms, params),
    }
}

#[inline]
fn x_touch(a_min: f32, a_max: f32, b_min: f32, b_max: f32, gap: f32) -> bool {
    b_min <= a_max + gap && b_max >= a_min - gap
}

/// Visit order shared by both strategies: top_y ascending, then min_x ascending.
fn sorted_order(platforms: &[Platform]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..platforms.len()).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (&platforms[a], &platforms[b]);
        pa.top_y
            .total_cmp(&pb.top_y)
            .then(pa.min_x.total_cmp(&pb.min_x))
            .then(a.cmp(&b))
    });
    order
}

/// First-match greedy pass. Height is compared against each group's first
/// member, so with the ascending sort every member stays within `y_epsilon`.
/// Not monotonic in the epsilons: widening one can increase the group count.
/// Use `Connected` where that matters.
fn merge_greedy(platforms: &[Platform], params: MergeParams) -> Vec<PlatformGroup> {
    let mut groups: Vec<PlatformGroup> = Vec::new();
    let mut anchors: Vec<f32> = Vec::new();

    for idx in sorted_order(platforms) {
        let p = &platforms[idx];
        let hit = groups.iter().zip(&anchors).position(|(g, &anchor_y)| {
            (anchor_y - p.top_y).abs() <= params.y_epsilon
                && x_touch(g.min_x, g.max_x, p.min_x, p.max_x, params.x_gap_epsilon)
        });
        match hit {
            Some(gi) => groups[gi].absorb(idx, p),
            None => {
                groups.push(PlatformGroup::from_platform(idx, p));
                anchors.push(p.top_y);
            }
        }
    }
    groups
}

// ---------- Order-independent variant ----------

struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect(), rank: vec![0; n] }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Connected components over the pairwise adjacency test.
/// Groups come out in the order their first sorted member is visited.
fn merge_connected(platforms: &[Platform], params: MergeParams) -> Vec<PlatformGroup> {
    let n = platforms.len();
    let mut sets = DisjointSet::new(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let (a, b) = (&platforms[i], &platforms[j]);
            if (a.top_y - b.top_y).abs() <= params.y_epsilon
                && x_touch(a.min_x, a.max_x, b.min_x, b.max_x, params.x_gap_epsilon)
            {
                sets.union(i, j);
            }
        }
    }

    let mut groups: Vec<PlatformGroup> = Vec::new();
    let mut root_to_group: Vec<Option<usize>> = vec![None; n];
    for idx in sorted_order(platforms) {
        let root = sets.find(idx);
        let p = &platforms[idx];
        match root_to_group[root] {
            Some(gi) => groups[gi].absorb(idx, p),
            None => {
                root_to_group[root] = Some(groups.len());
                groups.push(PlatformGroup::from_platform(idx, p));
            }
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::prelude::Vec2;

    fn flat(min_x: f32, max_x: f32, y: f32) -> Platform {
        Platform {
            points: vec![Vec2::new(min_x, y), Vec2::new(max_x, y)],
            min_x,
            max_x,
            top_y: y,
            thickness: 0.1,
            one_way: true,
            source: 0,
        }
    }

    fn params(y: f32, x: f32, strategy: MergeStrategy) -> MergeParams {
        MergeParams { y_epsilon: y, x_gap_epsilon: x, strategy }
    }

    const STRATEGIES: [MergeStrategy; 2] = [MergeStrategy::Greedy, MergeStrategy::Connected];

    #[test]
    fn gap_below_epsilon_merges() {
        let plats = vec![flat(-2.0, -0.05, 1.0), flat(0.05, 2.0, 1.0)];
        for s in STRATEGIES {
            let merged = merge_platforms(&plats, params(0.1, 0.15, s));
            assert_eq!(merged.len(), 1, "{s:?}");
            assert_eq!((merged[0].min_x, merged[0].max_x), (-2.0, 2.0));

            let split = merge_platforms(&plats, params(0.1, 0.05, s));
            assert_eq!(split.len(), 2, "{s:?}");
        }
    }

    #[test]
    fn different_heights_stay_apart() {
        let plats = vec![flat(0.0, 2.0, 0.0), flat(1.0, 3.0, 1.0)];
        for s in STRATEGIES {
            assert_eq!(merge_platforms(&plats, params(0.2, 0.5, s)).len(), 2);
        }
    }

    #[test]
    fn greedy_members_stay_within_height_band() {
        // Staircase: each step within epsilon of the previous, but not of the first.
        let plats = vec![flat(0.0, 1.0, 0.0), flat(0.5, 1.5, 0.1), flat(1.0, 2.0, 0.2)];
        let groups = merge_platforms(&plats, params(0.15, 0.1, MergeStrategy::Greedy));
        for g in &groups {
            for &m in &g.members {
                assert!((g.top_y - plats[m].top_y).abs() <= 0.15 + 1e-6);
            }
        }
        assert_eq!(groups.len(), 2);

        // The connected variant chains them together.
        let groups = merge_platforms(&plats, params(0.15, 0.1, MergeStrategy::Connected));
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn connected_ignores_input_order() {
        let a = vec![flat(0.0, 1.0, 0.0), flat(3.0, 4.0, 0.0), flat(0.9, 3.1, 0.05)];
        let b = vec![a[2].clone(), a[1].clone(), a[0].clone()];
        let p = params(0.1, 0.0, MergeStrategy::Connected);
        assert_eq!(merge_platforms(&a, p).len(), merge_platforms(&b, p).len());
        assert_eq!(merge_platforms(&a, p).len(), 1);
    }

    #[test]
    fn connected_coarser_epsilons_never_add_groups() {
        let plats = vec![
            flat(-4.0, -3.0, 0.0),
            flat(-2.9, -1.5, 0.02),
            flat(-1.2, 0.0, 0.0),
            flat(0.4, 1.0, 0.3),
            flat(1.3, 2.5, 0.31),
            flat(3.0, 4.0, 1.0),
        ];
        let s = MergeStrategy::Connected;
        let mut prev = usize::MAX;
        for step in 0..12 {
            let eps = step as f32 * 0.05;
            let n = merge_platforms(&plats, params(eps, eps, s)).len();
            assert!(n <= plats.len());
            assert!(n <= prev, "eps {eps} gave {n} > {prev}");
            prev = n;
        }
    }

    /// First-match grouping depends on which group a platform meets first, so a
    /// wider gap can pull a bridging platform away and split what used to join.
    #[test]
    fn greedy_can_split_when_gap_grows() {
        let plats = vec![
            flat(0.5, 2.0, 0.25),
            flat(2.25, 3.75, 0.0),
            flat(1.75, 3.0, 0.5),
            flat(0.0, 1.0, 0.5),
        ];
        let tight = params(0.25, 0.0, MergeStrategy::Greedy);
        let loose = params(0.25, 0.5, MergeStrategy::Greedy);
        assert_eq!(merge_platforms(&plats, tight).len(), 2);
        assert_eq!(merge_platforms(&plats, loose).len(), 3);

        // Same input, connected components: coarser only ever merges.
        let tight = params(0.25, 0.0, MergeStrategy::Connected);
        let loose = params(0.25, 0.5, MergeStrategy::Connected);
        assert_eq!(merge_platforms(&plats, tight).len(), 2);
        assert_eq!(merge_platforms(&plats, loose).len(), 1);
    }
}
