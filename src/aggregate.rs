//! Fan-out/fan-in primitives for multi-tab operations.
//!
//! Two deliberately distinct shapes:
//!
//! - [`gather`] — scatter/gather over independent async units. All units
//!   are issued at once, the join barrier waits for every unit to
//!   settle, and a failed unit never aborts the batch. Results come
//!   back in input order regardless of completion order, which is what
//!   lets handlers sort tabs once up front and still emit canonically
//!   ordered output.
//! - [`chain`] — strict sequential left-fold for order-dependent
//!   batches. Step *i+1* is not issued until step *i* has settled.
//!
//! Handlers must pick the primitive that matches the operation; the tab
//! move batch is the only chain user, everything else is a gather.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;

use futures_util::future::join_all;

use crate::error::Result;

// ============================================================================
// Gather
// ============================================================================

/// Runs independent async units concurrently and joins on all of them.
///
/// Every unit settles before this returns; there is no cancellation and
/// no timeout. Unit failures are returned in place, never propagated,
/// so callers decide per-unit whether to omit or substitute.
///
/// The output order matches the input order.
pub async fn gather<F, T>(units: Vec<F>) -> Vec<Result<T>>
where
    F: Future<Output = Result<T>>,
{
    join_all(units).await
}

// ============================================================================
// Chain
// ============================================================================

/// Runs a step per item, strictly one after another.
///
/// The next step is only issued once the previous one has settled.
/// A failed step stops the chain: with order-dependent batches the
/// remaining items were computed against state that no longer exists.
///
/// Returns the first error, if any. An empty batch performs no steps.
pub async fn chain<T, F, Fut>(items: impl IntoIterator<Item = T>, mut step: F) -> Result<()>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    for item in items {
        step(item).await?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use crate::error::Error;

    #[tokio::test]
    async fn test_gather_preserves_input_order() {
        // Later units finish first; output must still follow input order.
        let units: Vec<_> = (0u32..4)
            .map(|i| async move {
                for _ in 0..(4 - i) {
                    tokio::task::yield_now().await;
                }
                Ok(i)
            })
            .collect();

        let results = gather(units).await;
        let values: Vec<u32> = results.into_iter().map(|r| r.expect("ok")).collect();
        assert_eq!(values, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_gather_isolates_failures() {
        let units: Vec<_> = (0u32..3)
            .map(|i| async move {
                if i == 1 {
                    Err(Error::script("tab exploded"))
                } else {
                    Ok(i)
                }
            })
            .collect();

        let results = gather(units).await;
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[tokio::test]
    async fn test_gather_empty() {
        let results = gather(Vec::<std::future::Ready<Result<()>>>::new()).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_chain_runs_in_order_without_overlap() {
        let in_flight = Arc::new(AtomicBool::new(false));
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let result = chain(0u32..5, |i| {
            let in_flight = Arc::clone(&in_flight);
            let order = Arc::clone(&order);
            async move {
                assert!(
                    !in_flight.swap(true, Ordering::SeqCst),
                    "step {i} issued while a previous step was pending"
                );
                tokio::task::yield_now().await;
                order.lock().push(i);
                in_flight.store(false, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_chain_stops_at_first_failure() {
        let executed = Arc::new(AtomicUsize::new(0));

        let result = chain(0u32..5, |i| {
            let executed = Arc::clone(&executed);
            async move {
                executed.fetch_add(1, Ordering::SeqCst);
                if i == 2 {
                    Err(Error::api("tabs.move", "gone"))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(executed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_chain_empty_performs_no_steps() {
        let executed = Arc::new(AtomicUsize::new(0));

        let result = chain(std::iter::empty::<u32>(), |_| {
            let executed = Arc::clone(&executed);
            async move {
                executed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(executed.load(Ordering::SeqCst), 0);
    }
}
