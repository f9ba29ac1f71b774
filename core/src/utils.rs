use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Coordinate;

pub fn clamp(n: f64, min: f64, max: f64) -> f64 {
    min.max(n.min(max))
}

/// Unbiased Fisher–Yates shuffle, in place.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Shuffled copy of `items`, the input is left untouched.
pub fn shuffle_array<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffle(&mut shuffled, rng);
    shuffled
}

/// Point reached after `elapsed` out of `duration` along the straight path `from -> to`.
pub fn interpolate(from: Coordinate, to: Coordinate, duration: f64, elapsed: f64) -> Coordinate {
    let k = if duration > 0.0 { elapsed / duration } else { 1.0 };
    if k.is_nan() {
        return to;
    }
    from.lerp(to, k)
}

/// Human readable distance, `short` switches to kilometers above 1 km.
pub fn format_distance(meters: f64, short: bool) -> String {
    if short && meters > 1000.0 {
        return format!("{:.1} km", meters / 1000.0);
    }
    format!("{} m", ((meters / 10.0).round() * 10.0) as i64)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GREEN: Self = Self(0, 128, 0);
    pub const ORANGE: Self = Self(255, 165, 0);
    pub const RED: Self = Self(255, 0, 0);
}

impl core::fmt::Display for Rgb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

const DISTANCE_GRADIENT: [Rgb; 3] = [Rgb::GREEN, Rgb::ORANGE, Rgb::RED];

/// Distance below which an error is drawn fully green.
const GREEN_UNTIL_M: f64 = 250.0;
/// Extra distance over which the gradient reaches red.
const RED_SPAN_M: f64 = 3000.0;

/// Color hint for an error distance, green for close guesses and red for far ones.
pub fn color_for_distance(meters: f64) -> Rgb {
    let t = (meters - GREEN_UNTIL_M) / RED_SPAN_M;
    let channel = |pick: fn(Rgb) -> u8| {
        let values = DISTANCE_GRADIENT.map(|color| f64::from(pick(color)));
        clamp(basis_spline(&values, t).round(), 0.0, 255.0) as u8
    };
    Rgb(channel(|c| c.0), channel(|c| c.1), channel(|c| c.2))
}

/// Uniform cubic B-spline through `values`, `t` in `[0, 1]`.
fn basis_spline(values: &[f64], t: f64) -> f64 {
    let n = values.len() - 1;
    let (t, i) = if t.is_nan() || t <= 0.0 {
        (0.0, 0)
    } else if t >= 1.0 {
        (1.0, n - 1)
    } else {
        (t, (t * n as f64).floor() as usize)
    };

    let v1 = values[i];
    let v2 = values[i + 1];
    let v0 = if i > 0 { values[i - 1] } else { 2.0 * v1 - v2 };
    let v3 = if i < n - 1 { values[i + 2] } else { 2.0 * v2 - v1 };

    let t1 = (t - i as f64 / n as f64) * n as f64;
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}
