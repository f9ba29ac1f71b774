use futures_channel::oneshot;
use geoplace_core::FrameScheduler;
use gloo::render::request_animation_frame;
use gloo::timers::future::TimeoutFuture;
use std::future::Future;

/// [`FrameScheduler`] on top of `requestAnimationFrame` and `setTimeout`.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct BrowserScheduler;

impl FrameScheduler for BrowserScheduler {
    /// Dropping the future cancels the frame request; a cancelled request resolves to an infinite
    /// timestamp, which ends any running animation.
    fn next_frame(&mut self) -> impl Future<Output = f64> {
        let (sender, receiver) = oneshot::channel();
        let handle = request_animation_frame(move |timestamp| {
            let _ = sender.send(timestamp);
        });

        async move {
            let timestamp = receiver.await.unwrap_or(f64::INFINITY);
            drop(handle);
            timestamp
        }
    }

    fn sleep(&mut self, ms: u32) -> impl Future<Output = ()> {
        TimeoutFuture::new(ms)
    }
}
