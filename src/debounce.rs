use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Forward only the values that stay unchanged for `delay`.
///
/// Every new value restarts the timer and replaces the pending one, so a
/// burst of keystrokes yields a single value once typing pauses. When the
/// input closes, a pending value is flushed immediately and the output closes.
pub fn debounce(mut input: mpsc::Receiver<String>, delay: Duration) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut pending: Option<String> = None;
        loop {
            let Some(value) = pending.take() else {
                match input.recv().await {
                    Some(value) => pending = Some(value),
                    None => break,
                }
                continue;
            };

            tokio::select! {
                next = input.recv() => match next {
                    Some(newer) => pending = Some(newer),
                    None => {
                        let _ = tx.send(value).await;
                        break;
                    }
                },
                _ = tokio::time::sleep(delay) => {
                    if tx.send(value).await.is_err() {
                        break;
                    }
                }
            }
        }
        debug!("Debounced input closed");
    });

    rx
}
