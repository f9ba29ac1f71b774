use rand::Rng;

use crate::*;

/// Start/guess partition of an area's points for one game.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSelection {
    pub start_points: Vec<GamePoint>,
    pub guessing_points: Vec<GamePoint>,
}

/// Shuffles `points` and splits them into `start_count` start points and the points to guess.
///
/// When `remembered_ids` names at least `start_count` existing points, the first `start_count` of
/// them become the start points, in remembered order. Unknown ids are dropped.
pub fn select_points<R: Rng + ?Sized>(
    points: &[Point],
    start_count: usize,
    remembered_ids: Option<&[String]>,
    rng: &mut R,
) -> Result<PointSelection> {
    if points.len() <= start_count {
        return Err(GameError::InsufficientPoints {
            available: points.len(),
            required: start_count,
        });
    }
    crate::area::check_unique_ids(points)?;

    let shuffled = shuffle_array(points, rng);

    let remembered = remembered_ids
        .map(|ids| resolve_remembered(points, ids))
        .filter(|found| found.len() >= start_count);

    let (start, guessing): (Vec<Point>, Vec<Point>) = match remembered {
        Some(mut found) => {
            found.truncate(start_count);
            log::debug!("reusing remembered start points: {:?}", found);
            let guessing = shuffled
                .into_iter()
                .filter(|point| !found.iter().any(|&id| id == point.id))
                .collect();
            let start = found
                .iter()
                .filter_map(|&id| points.iter().find(|point| point.id == id).cloned())
                .collect();
            (start, guessing)
        }
        None => {
            let mut shuffled = shuffled;
            let guessing = shuffled.split_off(start_count);
            (shuffled, guessing)
        }
    };

    Ok(PointSelection {
        start_points: start.into_iter().map(GamePoint::start).collect(),
        guessing_points: guessing.into_iter().map(GamePoint::guess).collect(),
    })
}

/// Remembered ids still present in `points`, deduplicated, in remembered order.
fn resolve_remembered<'a>(points: &[Point], ids: &'a [String]) -> Vec<&'a str> {
    let mut found: Vec<&str> = Vec::with_capacity(ids.len());
    for id in ids {
        if found.contains(&id.as_str()) {
            continue;
        }
        if points.iter().any(|point| &point.id == id) {
            found.push(id);
        } else {
            log::debug!("remembered point {:?} is not part of this area anymore", id);
        }
    }
    found
}
