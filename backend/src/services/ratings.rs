//! Rating statistics derived from a song's rating histogram.

use crate::api::{RatingHistogram, RatingStats, SongId};

/// Compute min, max and count-weighted average rating.
///
/// Only values with a non-zero count take part. A song nobody has rated yet
/// gets `None` for all three statistics.
pub fn rating_stats(id: SongId, histogram: &RatingHistogram) -> RatingStats {
    let mut min_rating = None;
    let mut max_rating = None;
    let mut weighted_sum = 0.0_f64;
    let mut total = 0_u64;

    for (value, count) in histogram.recorded() {
        let value = value.value();
        min_rating = Some(min_rating.map_or(value, |min: u8| min.min(value)));
        max_rating = Some(max_rating.map_or(value, |max: u8| max.max(value)));
        weighted_sum += f64::from(value) * count as f64;
        total += count;
    }

    let avg_rating = (total > 0).then(|| weighted_sum / total as f64);

    RatingStats {
        id,
        min_rating,
        max_rating,
        avg_rating,
    }
}
