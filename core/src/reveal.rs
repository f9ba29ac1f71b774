use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

use crate::*;

/// Bounds of the per-point reveal animation; the duration grows with the error distance.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DurationBounds {
    pub min_ms: f64,
    pub max_ms: f64,
}

impl DurationBounds {
    pub const fn new(min_ms: f64, max_ms: f64) -> Self {
        Self { min_ms, max_ms }
    }

    /// One millisecond per meter of error, clamped.
    pub fn duration_for(&self, distance_m: f64) -> f64 {
        clamp(distance_m, self.min_ms, self.max_ms)
    }
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self::new(500.0, 1500.0)
    }
}

/// One-way "jump to the result" flag shared between the reveal and the UI.
#[derive(Clone, Debug, Default)]
pub struct SkipSignal(Rc<Cell<bool>>);

impl SkipSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent, the flag cannot be cleared.
    pub fn skip(&self) {
        if !self.0.replace(true) {
            log::debug!("skipping remaining reveal animations");
        }
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// Receives reveal progress for rendering.
pub trait RevealObserver {
    /// Called on every animation frame with the moving position and the distance covered so far.
    fn on_progress(
        &mut self,
        index: usize,
        point: &GamePoint,
        position: Coordinate,
        distance: f64,
        color: Rgb,
    );

    /// Called once per point with its settled distance.
    fn on_point_done(&mut self, index: usize, point: &GamePoint, distance: f64);
}

impl<O: RevealObserver + ?Sized> RevealObserver for &mut O {
    fn on_progress(
        &mut self,
        index: usize,
        point: &GamePoint,
        position: Coordinate,
        distance: f64,
        color: Rgb,
    ) {
        (**self).on_progress(index, point, position, distance, color)
    }

    fn on_point_done(&mut self, index: usize, point: &GamePoint, distance: f64) {
        (**self).on_point_done(index, point, distance)
    }
}

/// Observer that ignores everything.
impl RevealObserver for () {
    fn on_progress(&mut self, _: usize, _: &GamePoint, _: Coordinate, _: f64, _: Rgb) {}

    fn on_point_done(&mut self, _: usize, _: &GamePoint, _: f64) {}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointScore {
    pub point_id: String,
    pub distance: f64,
    pub points: Option<u32>,
}

/// Final result of a game. Lower distances are better.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub per_point: Vec<PointScore>,
    pub total_distance: f64,
    pub total_points: Option<u32>,
}

impl ScoreReport {
    pub fn from_distances(
        distances: impl IntoIterator<Item = (String, f64)>,
        policy: &(impl ScorePolicy + ?Sized),
    ) -> Self {
        let per_point: Vec<PointScore> = distances
            .into_iter()
            .map(|(point_id, distance)| PointScore {
                points: policy.points_for(distance),
                point_id,
                distance,
            })
            .collect();
        let total_distance = per_point.iter().map(|score| score.distance).sum();
        let total_points = per_point
            .iter()
            .map(|score| score.points)
            .sum::<Option<u32>>();
        Self {
            per_point,
            total_distance,
            total_points,
        }
    }

    pub fn formatted_total(&self) -> String {
        format_distance(self.total_distance, false)
    }
}

/// Reveals guessed points one after the other and sums their errors.
#[derive(Clone, Debug)]
pub struct RevealEngine<G> {
    geodesy: G,
    durations: DurationBounds,
    animate: bool,
}

impl<G: Geodesy> RevealEngine<G> {
    pub fn new(geodesy: G, durations: DurationBounds, animate: bool) -> Self {
        Self {
            geodesy,
            durations,
            animate,
        }
    }

    /// Reveals `points` in order, waiting for each animation before starting the next.
    ///
    /// Once `skip` is set, the points not yet started settle instantly. Every point still counts
    /// with its full distance, so the result does not depend on skipping.
    pub async fn reveal<S, O>(
        &self,
        points: &[GamePoint],
        scheduler: &mut S,
        skip: &SkipSignal,
        policy: &(impl ScorePolicy + ?Sized),
        mut observer: O,
    ) -> Result<ScoreReport>
    where
        S: FrameScheduler + ?Sized,
        O: RevealObserver,
    {
        let mut distances = Vec::with_capacity(points.len());

        for (index, point) in points.iter().enumerate() {
            let (Some(guess), Some(full_distance)) =
                (point.user_position, point.error_distance(&self.geodesy))
            else {
                return Err(GameError::UnplacedPoint(point.id().to_string()));
            };
            let truth = point.position();

            let duration = if self.animate && !skip.is_set() {
                self.durations.duration_for(full_distance)
            } else {
                0.0
            };
            log::trace!(
                "revealing {:?}: {:.0} m over {:.0} ms",
                point.id(),
                full_distance,
                duration
            );

            animate(guess, truth, duration, scheduler, |current, is_final| {
                let distance = if is_final {
                    full_distance
                } else {
                    self.geodesy.distance(guess, current)
                };
                observer.on_progress(
                    index,
                    point,
                    current,
                    distance,
                    color_for_distance(distance),
                );
            })
            .await;

            observer.on_point_done(index, point, full_distance);
            distances.push((point.id().to_string(), full_distance));
        }

        let report = ScoreReport::from_distances(distances, policy);
        log::debug!("reveal finished, total {:.0} m", report.total_distance);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    #[derive(Debug, PartialEq)]
    enum Seen {
        Progress(usize, bool),
        Done(usize, f64),
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Seen>,
        last_progress: Vec<f64>,
        skip_after_first: Option<SkipSignal>,
    }

    impl RevealObserver for Recorder {
        fn on_progress(
            &mut self,
            index: usize,
            _: &GamePoint,
            _: Coordinate,
            distance: f64,
            _: Rgb,
        ) {
            self.seen.push(Seen::Progress(index, false));
            if self.last_progress.len() <= index {
                self.last_progress.resize(index + 1, 0.0);
            }
            self.last_progress[index] = distance;
        }

        fn on_point_done(&mut self, index: usize, _: &GamePoint, distance: f64) {
            self.seen.push(Seen::Done(index, distance));
            if let Some(skip) = &self.skip_after_first {
                skip.skip();
            }
        }
    }

    fn placed(id: &str, truth: [f64; 2], guess: [f64; 2]) -> GamePoint {
        let mut point = GamePoint::guess(Point {
            id: id.into(),
            name: id.into(),
            picto: String::new(),
            position: truth.into(),
        });
        point.user_position = Some(guess.into());
        point
    }

    fn paris_guesses() -> Vec<GamePoint> {
        vec![
            placed("a", [48.85, 2.35], [48.86, 2.35]),
            placed("b", [48.80, 2.30], [48.80, 2.30]),
        ]
    }

    fn run(
        points: &[GamePoint],
        skip: &SkipSignal,
        recorder: &mut Recorder,
    ) -> (Result<ScoreReport>, SteppedScheduler) {
        let engine = RevealEngine::new(Haversine, DurationBounds::default(), true);
        let mut scheduler = SteppedScheduler::default();
        let report = engine
            .reveal(points, &mut scheduler, skip, &DistanceOnly, recorder)
            .now_or_never()
            .expect("stepped scheduler never suspends");
        (report, scheduler)
    }

    #[test]
    fn skipping_does_not_change_the_total() {
        let points = paris_guesses();

        let mut animated = Recorder::default();
        let (full, _) = run(&points, &SkipSignal::new(), &mut animated);

        let skip = SkipSignal::new();
        skip.skip();
        let mut skipped = Recorder::default();
        let (fast, scheduler) = run(&points, &skip, &mut skipped);

        let full = full.unwrap();
        let fast = fast.unwrap();
        assert_eq!(full.total_distance, fast.total_distance);
        assert!((full.total_distance - 1111.95).abs() < 0.5);
        assert_eq!(full.per_point[1].distance, 0.0);
        assert!(animated.seen.len() > skipped.seen.len());
        assert_eq!(skipped.seen.len(), 4);
        assert_eq!(scheduler.frames(), 0);
    }

    #[test]
    fn points_are_revealed_one_after_the_other() {
        let mut recorder = Recorder::default();
        let (report, _) = run(&paris_guesses(), &SkipSignal::new(), &mut recorder);
        report.unwrap();

        let first_done = recorder
            .seen
            .iter()
            .position(|seen| matches!(seen, Seen::Done(0, _)))
            .unwrap();
        let second_progress = recorder
            .seen
            .iter()
            .position(|seen| matches!(seen, Seen::Progress(1, _)))
            .unwrap();
        assert!(first_done < second_progress);
        assert!(matches!(recorder.seen.last(), Some(Seen::Done(1, _))));
    }

    #[test]
    fn last_progress_matches_settled_distance() {
        let mut recorder = Recorder::default();
        let (report, _) = run(&paris_guesses(), &SkipSignal::new(), &mut recorder);
        let report = report.unwrap();

        assert_eq!(recorder.last_progress[0], report.per_point[0].distance);
        assert_eq!(recorder.last_progress[1], 0.0);
    }

    #[test]
    fn skip_mid_reveal_only_affects_later_points() {
        let points = vec![
            placed("a", [48.85, 2.35], [48.86, 2.35]),
            placed("b", [48.85, 2.35], [48.87, 2.35]),
            placed("c", [48.85, 2.35], [48.85, 2.36]),
        ];
        let skip = SkipSignal::new();
        let mut recorder = Recorder {
            skip_after_first: Some(skip.clone()),
            ..Default::default()
        };

        let (report, _) = run(&points, &skip, &mut recorder);
        let report = report.unwrap();

        let progress_of = |index| {
            recorder
                .seen
                .iter()
                .filter(|seen| matches!(seen, Seen::Progress(i, _) if *i == index))
                .count()
        };
        assert!(progress_of(0) > 1);
        assert_eq!(progress_of(1), 1);
        assert_eq!(progress_of(2), 1);
        let expected: f64 = points
            .iter()
            .map(|point| point.error_distance(&Haversine).unwrap())
            .sum();
        assert_eq!(report.total_distance, expected);
    }

    #[test]
    fn animation_time_is_bounded() {
        let points = vec![
            placed("near", [48.85, 2.35], [48.85, 2.35]),
            placed("far", [48.85, 2.35], [45.0, 5.0]),
        ];
        let mut recorder = Recorder::default();

        let (_, scheduler) = run(&points, &SkipSignal::new(), &mut recorder);

        // 500 ms for the exact guess, capped at 1500 ms for the far one, plus frame rounding
        assert!(scheduler.now() >= 2000.0);
        assert!(scheduler.now() < 2000.0 + 3.0 * 16.0);
    }

    #[test]
    fn unplaced_points_cannot_be_revealed() {
        let mut points = paris_guesses();
        points[1].user_position = None;
        let mut recorder = Recorder::default();

        let (report, _) = run(&points, &SkipSignal::new(), &mut recorder);

        assert_eq!(report, Err(GameError::UnplacedPoint("b".into())));
    }

    #[test]
    fn skip_signal_is_sticky_and_shared() {
        let skip = SkipSignal::new();
        let ui_handle = skip.clone();

        ui_handle.skip();
        ui_handle.skip();

        assert!(skip.is_set());
    }

    #[test]
    fn durations_scale_with_distance_within_bounds() {
        let bounds = DurationBounds::new(500.0, 3000.0);

        assert_eq!(bounds.duration_for(0.0), 500.0);
        assert_eq!(bounds.duration_for(1200.0), 1200.0);
        assert_eq!(bounds.duration_for(50_000.0), 3000.0);
    }
}
