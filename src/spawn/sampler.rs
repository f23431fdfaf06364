// src/spawn/sampler.rs
//! Slot-biased sampling of a point on a platform surface.

use bevy::prelude::*;
use rand::Rng;

use crate::geometry::core::Platform;

/// Base position along the platform for the n-th object placed on it.
/// Slots 0..=2 are fixed (middle, left third, right third); later slots are random.
#[inline]
pub fn slot_fraction(slot: usize, rng: &mut impl Rng) -> f32 {
    match slot {
        0 => 0.5,
        1 => 0.33,
        2 => 0.66,
        _ => rng.random::<f32>(),
    }
}

/// Pick a surface point for `slot`, jittered by up to `jitter` local units along x.
pub fn sample_on_platform(platform: &Platform, slot: usize, jitter: f32, rng: &mut impl Rng) -> Vec2 {
    let width = platform.width();
    let mut t = slot_fraction(slot, rng);
    if width > 0.0 && jitter > 0.0 {
        let j = jitter / width;
        t += rng.random_range(-j..=j);
    }
    let t = t.clamp(0.0, 1.0);

    let x = platform.min_x + t * width;
    let y = platform.surface_y_at(x).unwrap_or(platform.top_y);
    Vec2::new(x, y)
}

/// Re-project `x` onto the platform surface, clamped to its span.
#[inline]
pub fn point_on_surface(platform: &Platform, x: f32) -> Vec2 {
    let x = x.clamp(platform.min_x, platform.max_x);
    Vec2::new(x, platform.surface_y_at(x).unwrap_or(platform.top_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn::core::PlanSeed;

    fn ramp() -> Platform {
        Platform {
            points: vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0)],
            min_x: 0.0,
            max_x: 10.0,
            top_y: 5.0,
            thickness: 0.1,
            one_way: true,
            source: 0,
        }
    }

    #[test]
    fn fixed_slots_without_jitter() {
        let mut rng = PlanSeed(1).rng();
        let p = ramp();
        assert_eq!(sample_on_platform(&p, 0, 0.0, &mut rng), Vec2::new(5.0, 2.5));
        let s1 = sample_on_platform(&p, 1, 0.0, &mut rng);
        assert!((s1.x - 3.3).abs() < 1e-4 && (s1.y - 1.65).abs() < 1e-4);
        let s2 = sample_on_platform(&p, 2, 0.0, &mut rng);
        assert!((s2.x - 6.6).abs() < 1e-4);
    }

    #[test]
    fn jittered_samples_stay_on_platform() {
        let mut rng = PlanSeed(99).rng();
        let p = ramp();
        for slot in 0..40 {
            let s = sample_on_platform(&p, slot, 3.0, &mut rng);
            assert!(p.contains_x(s.x));
            assert!((s.y - s.x * 0.5).abs() < 1e-4);
        }
    }
}
