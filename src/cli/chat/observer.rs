//! Background observers that log changes to conversation fields.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Spawn a task that logs every change published on `rx`.
///
/// `describe` turns the new value into a one-line summary. The task ends
/// when the owning state is dropped and yields the number of changes it
/// observed. Changes published faster than the task runs are coalesced.
pub fn watch_field<V, F>(
    name: &'static str,
    mut rx: watch::Receiver<V>,
    describe: F,
) -> JoinHandle<usize>
where
    V: Send + Sync + 'static,
    F: Fn(&V) -> String + Send + 'static,
{
    tokio::spawn(async move {
        let mut seen = 0;
        while rx.changed().await.is_ok() {
            let summary = describe(&rx.borrow_and_update());
            seen += 1;
            info!(field = name, "{}", summary);
        }
        debug!(field = name, seen, "Observer stopped");
        seen
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Reactive;

    #[tokio::test]
    async fn test_observer_counts_change_and_stops() {
        let value = Reactive::new(0u32);
        let handle = watch_field("count", value.subscribe(), |v| v.to_string());

        value.set(1);
        drop(value);

        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_observer_stops_without_changes() {
        let value = Reactive::new(String::new());
        let handle = watch_field("text", value.subscribe(), |v| v.clone());

        drop(value);

        assert_eq!(handle.await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_observer_sees_each_yielded_change() {
        let value = Reactive::new(false);
        let handle = watch_field("flag", value.subscribe(), |v| v.to_string());

        for _ in 0..3 {
            let current = *value.get();
            value.set(!current);
            tokio::task::yield_now().await;
        }
        drop(value);

        let seen = handle.await.unwrap();
        assert!((1..=3).contains(&seen));
    }
}
