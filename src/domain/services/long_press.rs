#[cfg(test)]
#[path = "long_press_test.rs"]
mod tests;

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::domain::models::Event;

pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);

struct ArmedPress {
    press: u64,
    message_id: String,
    token: CancellationToken,
}

/// Fires `Event::LongPress` when a press is held for the threshold. At most
/// one press is armed at a time.
///
/// A fired event can still be queued after the press ends, so callers apply
/// it only when [`LongPress::accept`] confirms it belongs to the held press.
pub struct LongPress {
    threshold: Duration,
    presses: u64,
    armed: Option<ArmedPress>,
}

impl Default for LongPress {
    fn default() -> LongPress {
        return LongPress::new(LONG_PRESS_THRESHOLD);
    }
}

impl LongPress {
    pub fn new(threshold: Duration) -> LongPress {
        return LongPress {
            threshold,
            presses: 0,
            armed: None,
        };
    }

    pub fn arm(&mut self, message_id: &str, tx: &mpsc::UnboundedSender<Event>) {
        self.cancel();
        self.presses += 1;

        let token = CancellationToken::new();
        let child = token.clone();
        let threshold = self.threshold;
        let press = self.presses;
        let fired_id = message_id.to_string();
        let tx = tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {}
                _ = time::sleep(threshold) => {
                    if tx.send(Event::LongPress(press, fired_id)).is_err() {
                        tracing::debug!("Long press fired after the chat view closed");
                    }
                }
            }
        });

        self.armed = Some(ArmedPress {
            press,
            message_id: message_id.to_string(),
            token,
        });
    }

    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.token.cancel();
        }
    }

    pub fn is_armed(&self) -> bool {
        return self
            .armed
            .as_ref()
            .map(|e| return !e.token.is_cancelled())
            .unwrap_or(false);
    }

    /// Consumes a fired event. Returns true only when it belongs to the press
    /// that is still held, which then ends.
    pub fn accept(&mut self, press: u64, message_id: &str) -> bool {
        let held = self
            .armed
            .as_ref()
            .map(|e| return e.press == press && e.message_id == message_id)
            .unwrap_or(false);

        if held {
            self.cancel();
        }

        return held;
    }
}

impl Drop for LongPress {
    fn drop(&mut self) {
        self.cancel();
    }
}
