//! Trailing-edge debounce.
//!
//! A [`Debouncer`] owns a background task with a single timer. Every pushed
//! value restarts the timer; the latest value is forwarded to the output
//! channel once the input has been quiet for the configured period.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::trace;

#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    quiet: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the timer task. Must be called inside a tokio runtime.
    pub fn spawn(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(quiet, input_rx, output_tx));
        (Self { input: input_tx, quiet }, output_rx)
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&self, value: T) {
        // Only fails once the task is gone, in which case nobody is listening.
        let _ = self.input.send(value);
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }
}

async fn run<T>(quiet: Duration, mut input: mpsc::UnboundedReceiver<T>, output: mpsc::UnboundedSender<T>) {
    while let Some(mut pending) = input.recv().await {
        loop {
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => {
                        trace!("debounce timer restarted");
                        pending = value;
                    }
                    // Owner dropped: the pending value is cancelled with it.
                    None => return,
                },
                _ = tokio::time::sleep(quiet) => {
                    if output.send(pending).is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, timeout, Instant};

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_final_value() {
        let (debouncer, mut out) = Debouncer::spawn(Duration::from_millis(1000));
        let start = Instant::now();

        for text in ["d", "du", "dun", "dune"] {
            debouncer.push(text.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let value = out.recv().await.unwrap();
        assert_eq!(value, "dune");
        // Last push happened at 300ms, so the timer fires at 1300ms.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1300), "fired early: {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1400), "fired late: {:?}", elapsed);

        assert!(timeout(Duration::from_secs(5), out.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_separately() {
        let (debouncer, mut out) = Debouncer::spawn(Duration::from_millis(200));

        debouncer.push(1u32);
        assert_eq!(out.recv().await, Some(1));

        debouncer.push(2);
        debouncer.push(3);
        assert_eq!(out.recv().await, Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_emitted_before_quiet_period() {
        let (debouncer, mut out) = Debouncer::spawn(Duration::from_millis(500));
        debouncer.push("x");
        tokio::task::yield_now().await;
        advance(Duration::from_millis(499)).await;
        assert!(out.try_recv().is_err());
        assert_eq!(out.recv().await, Some("x"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_value() {
        let (debouncer, mut out) = Debouncer::spawn(Duration::from_millis(500));
        debouncer.push("x");
        drop(debouncer);
        assert_eq!(out.recv().await, None);
    }
}
