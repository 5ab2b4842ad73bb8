//! Input debouncing for the candidate search box.
//!
//! Values pushed in quick succession collapse into the last one. A value is emitted
//! only after `delay` passes with no newer push, so a slow response for an early
//! keystroke can never overwrite the results for the final query.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Sending half of a debounced stream. Settled values arrive on the receiver returned
/// by [`Debouncer::spawn`].
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Starts the debouncing task on the current tokio runtime.
    ///
    /// When every `Debouncer` handle is dropped, a still-pending value is flushed and
    /// the task exits.
    pub fn spawn(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel::<T>();
        let (output_tx, output_rx) = mpsc::unbounded_channel::<T>();

        tokio::spawn(async move {
            while let Some(mut pending) = input_rx.recv().await {
                loop {
                    tokio::select! {
                        next = input_rx.recv() => match next {
                            Some(value) => pending = value,
                            None => {
                                let _ = output_tx.send(pending);
                                return;
                            }
                        },
                        _ = tokio::time::sleep(delay) => {
                            if output_tx.send(pending).is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        });

        (Self { tx: input_tx }, output_rx)
    }

    /// Records a new value and restarts the quiet window.
    pub fn push(&self, value: T) {
        if self.tx.send(value).is_err() {
            debug!("Debounce task has stopped; dropping input");
        }
    }
}
