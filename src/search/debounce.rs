//! Settle a stream of rapidly changing values.

use std::time::Duration;
use tokio::sync::watch;

/// Forward values from `input` once they have stopped changing for `delay`.
///
/// The returned receiver starts with the current input value. Intermediate
/// values superseded within `delay` are never emitted, and a settled value
/// equal to the last emitted one does not notify. When `input` closes, the
/// pending value (if any) is flushed and the output closes.
pub fn debounce<T>(mut input: watch::Receiver<T>, delay: Duration) -> watch::Receiver<T>
where
  T: Clone + PartialEq + Send + Sync + 'static,
{
  let (tx, rx) = watch::channel(input.borrow_and_update().clone());

  tokio::spawn(async move {
    let mut open = true;

    while open && input.changed().await.is_ok() {
      // Wait for a quiet period, restarting it on every change
      loop {
        tokio::select! {
          changed = input.changed() => {
            if changed.is_err() {
              open = false;
              break;
            }
          }
          () = tokio::time::sleep(delay) => break,
        }
      }

      let settled = input.borrow_and_update().clone();
      tx.send_if_modified(|current| {
        if *current == settled {
          false
        } else {
          *current = settled;
          true
        }
      });

      if tx.is_closed() {
        break;
      }
    }
  });

  rx
}

#[cfg(test)]
mod tests {
  use super::*;
  use tokio::time::Instant;

  #[tokio::test(start_paused = true)]
  async fn test_only_settled_value_is_emitted() {
    let (tx, rx) = watch::channel(String::new());
    let mut settled = debounce(rx, Duration::from_millis(500));

    let start = Instant::now();
    for term in ["p", "pi", "pik"] {
      tx.send(term.to_string()).unwrap();
      tokio::time::sleep(Duration::from_millis(100)).await;
    }

    settled.changed().await.unwrap();
    assert_eq!(*settled.borrow_and_update(), "pik");
    assert!(start.elapsed() >= Duration::from_millis(700));
  }

  #[tokio::test(start_paused = true)]
  async fn test_each_settled_value_is_emitted() {
    let (tx, rx) = watch::channel(String::new());
    let mut settled = debounce(rx, Duration::from_millis(200));

    tx.send("pika".to_string()).unwrap();
    settled.changed().await.unwrap();
    assert_eq!(*settled.borrow_and_update(), "pika");

    tx.send("25".to_string()).unwrap();
    settled.changed().await.unwrap();
    assert_eq!(*settled.borrow_and_update(), "25");
  }

  #[tokio::test(start_paused = true)]
  async fn test_returning_to_same_value_does_not_notify() {
    let (tx, rx) = watch::channel("pik".to_string());
    let mut settled = debounce(rx, Duration::from_millis(200));

    tx.send("pika".to_string()).unwrap();
    tx.send("pik".to_string()).unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(!settled.has_changed().unwrap());
    assert_eq!(*settled.borrow(), "pik");
  }

  #[tokio::test(start_paused = true)]
  async fn test_pending_value_flushed_on_close() {
    let (tx, rx) = watch::channel(String::new());
    let mut settled = debounce(rx, Duration::from_secs(5));

    tx.send("raichu".to_string()).unwrap();
    drop(tx);

    settled.changed().await.unwrap();
    assert_eq!(*settled.borrow_and_update(), "raichu");
    assert!(settled.changed().await.is_err());
  }
}
