use core::future::Future;

use crate::*;

/// Source of display refresh ticks and timers, supplied by the environment.
pub trait FrameScheduler {
    /// Resolves on the next display refresh with its timestamp in milliseconds.
    fn next_frame(&mut self) -> impl Future<Output = f64>;

    /// Resolves after `ms` milliseconds.
    fn sleep(&mut self, ms: u32) -> impl Future<Output = ()>;
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn next_frame(&mut self) -> impl Future<Output = f64> {
        (**self).next_frame()
    }

    fn sleep(&mut self, ms: u32) -> impl Future<Output = ()> {
        (**self).sleep(ms)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame {
    pub point: Coordinate,
    pub is_final: bool,
}

/// Linear move from `from` to `to`, driven by frame timestamps.
///
/// Progress depends on the time elapsed since the first frame, not on the number of frames, and
/// the final frame is produced exactly once.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    from: Coordinate,
    to: Coordinate,
    duration_ms: f64,
    started_at: Option<f64>,
    finished: bool,
}

impl Animation {
    pub fn new(from: Coordinate, to: Coordinate, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            duration_ms,
            started_at: None,
            finished: false,
        }
    }

    /// Animations without a positive duration settle on the first frame.
    pub fn is_instant(&self) -> bool {
        !(self.duration_ms > 0.0)
    }

    /// Frame for the refresh at `timestamp`, `None` once the final frame was produced.
    pub fn frame_at(&mut self, timestamp: f64) -> Option<Frame> {
        if self.finished {
            return None;
        }
        if self.is_instant() {
            return Some(self.finish());
        }

        let started_at = *self.started_at.get_or_insert(timestamp);
        let elapsed = timestamp - started_at;

        if elapsed.is_nan() || elapsed >= self.duration_ms {
            Some(self.finish())
        } else {
            Some(Frame {
                point: interpolate(self.from, self.to, self.duration_ms, elapsed),
                is_final: false,
            })
        }
    }

    fn finish(&mut self) -> Frame {
        self.finished = true;
        Frame {
            point: self.to,
            is_final: true,
        }
    }
}

/// Moves a point from `from` to `to` over `duration_ms`, calling `on_frame` on every refresh.
///
/// A non-positive duration calls `on_frame(to, true)` once before the first suspension point.
pub async fn animate<S, F>(
    from: Coordinate,
    to: Coordinate,
    duration_ms: f64,
    scheduler: &mut S,
    mut on_frame: F,
) where
    S: FrameScheduler + ?Sized,
    F: FnMut(Coordinate, bool),
{
    let mut animation = Animation::new(from, to, duration_ms);
    if animation.is_instant() {
        on_frame(to, true);
        return;
    }

    loop {
        let timestamp = scheduler.next_frame().await;
        match animation.frame_at(timestamp) {
            Some(Frame { point, is_final }) => {
                on_frame(point, is_final);
                if is_final {
                    break;
                }
            }
            None => break,
        }
    }
}

/// Deterministic scheduler advancing a virtual clock by a fixed step per frame.
///
/// Every future it returns is immediately ready, which makes it usable for headless runs.
#[derive(Clone, Debug, PartialEq)]
pub struct SteppedScheduler {
    now: f64,
    frame_ms: f64,
    frames: u64,
}

impl SteppedScheduler {
    pub fn new(frame_ms: f64) -> Self {
        Self {
            now: 0.0,
            frame_ms,
            frames: 0,
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for SteppedScheduler {
    /// Roughly a 60 Hz display.
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl FrameScheduler for SteppedScheduler {
    fn next_frame(&mut self) -> impl Future<Output = f64> {
        if self.frames > 0 {
            self.now += self.frame_ms;
        }
        self.frames += 1;
        core::future::ready(self.now)
    }

    fn sleep(&mut self, ms: u32) -> impl Future<Output = ()> {
        self.now += f64::from(ms);
        core::future::ready(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;

    const FROM: Coordinate = Coordinate::new(48.85, 2.35);
    const TO: Coordinate = Coordinate::new(48.86, 2.36);

    fn run(duration_ms: f64, frame_ms: f64) -> (Vec<(Coordinate, bool)>, SteppedScheduler) {
        let mut scheduler = SteppedScheduler::new(frame_ms);
        let mut frames = Vec::new();
        animate(FROM, TO, duration_ms, &mut scheduler, |point, is_final| {
            frames.push((point, is_final))
        })
        .now_or_never()
        .expect("stepped scheduler never suspends");
        (frames, scheduler)
    }

    #[test]
    fn zero_duration_settles_without_waiting_for_a_frame() {
        let mut scheduler = SteppedScheduler::default();
        let mut frames = Vec::new();

        let mut future = Box::pin(animate(FROM, TO, 0.0, &mut scheduler, |point, is_final| {
            frames.push((point, is_final))
        }));
        assert!((&mut future).now_or_never().is_some());
        drop(future);

        assert_eq!(frames, [(TO, true)]);
        assert_eq!(scheduler.frames(), 0);
    }

    #[test]
    fn animation_moves_away_from_start_and_ends_on_target() {
        let (frames, _) = run(1000.0, 16.0);

        assert!(frames.len() > 10);
        assert_eq!(frames.first(), Some(&(FROM, false)));
        assert_eq!(frames.last(), Some(&(TO, true)));
        assert_eq!(frames.iter().filter(|(_, is_final)| *is_final).count(), 1);

        let distances: Vec<f64> = frames
            .iter()
            .map(|&(point, _)| Haversine.distance(FROM, point))
            .collect();
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
        let full = Haversine.distance(FROM, TO);
        assert!(distances.iter().all(|&distance| distance <= full + 1e-6));
    }

    #[test]
    fn duration_does_not_depend_on_frame_rate() {
        let (fast, fast_clock) = run(500.0, 5.0);
        let (slow, slow_clock) = run(500.0, 50.0);

        assert!(fast.len() > slow.len());
        assert_eq!(fast_clock.now(), 500.0);
        assert_eq!(slow_clock.now(), 500.0);
    }

    #[test]
    fn frame_at_interpolates_on_elapsed_time() {
        let mut animation =
            Animation::new(Coordinate::new(0.0, 0.0), Coordinate::new(10.0, 0.0), 100.0);

        assert_eq!(animation.frame_at(1000.0).unwrap().point, Coordinate::new(0.0, 0.0));
        assert_eq!(animation.frame_at(1025.0).unwrap().point, Coordinate::new(2.5, 0.0));
        let last = animation.frame_at(1300.0).unwrap();
        assert!(last.is_final);
        assert_eq!(last.point, Coordinate::new(10.0, 0.0));
        assert_eq!(animation.frame_at(1400.0), None);
    }

    #[test]
    fn negative_and_nan_durations_are_instant() {
        assert!(Animation::new(FROM, TO, -5.0).is_instant());
        assert!(Animation::new(FROM, TO, f64::NAN).is_instant());
        let mut animation = Animation::new(FROM, TO, -5.0);
        assert_eq!(animation.frame_at(0.0), Some(Frame { point: TO, is_final: true }));
    }
}
