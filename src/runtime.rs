//! Run async work from synchronous callers.

use crate::error::SyncBridgeError;
use std::future::Future;
use tokio::runtime::{Builder, Handle, RuntimeFlavor};

/// Drive `future` to completion on behalf of a synchronous caller
///
/// Without a runtime on the current thread, a current-thread runtime is
/// built for this one call and dropped before returning. Inside a
/// multi-thread runtime the worker is handed over with `block_in_place`
/// and the existing runtime drives the future. A current-thread runtime
/// cannot be blocked on, so that case is an error.
pub fn run_sync<F: Future>(future: F) -> Result<F::Output, SyncBridgeError> {
    match Handle::try_current() {
        Ok(handle) => match handle.runtime_flavor() {
            RuntimeFlavor::CurrentThread => Err(SyncBridgeError::CurrentThreadRuntime),
            _ => Ok(tokio::task::block_in_place(|| handle.block_on(future))),
        },
        Err(_) => {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(SyncBridgeError::Build)?;
            let output = runtime.block_on(future);
            drop(runtime);
            Ok(output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_run_sync_without_runtime() {
        let value = run_sync(async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            21 * 2
        })
        .unwrap();
        assert_eq!(value, 42);
        assert!(Handle::try_current().is_err());
    }

    #[test]
    fn test_run_sync_supports_spawned_tasks() {
        let value = run_sync(async { tokio::spawn(async { "done" }).await.unwrap() }).unwrap();
        assert_eq!(value, "done");
    }

    #[test]
    fn test_run_sync_repeated_calls() {
        for n in 0..3 {
            assert_eq!(run_sync(async move { n }).unwrap(), n);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_sync_inside_multi_thread_runtime() {
        let value = run_sync(async {
            tokio::time::sleep(Duration::from_millis(1)).await;
            "bridged"
        })
        .unwrap();
        assert_eq!(value, "bridged");
    }

    #[tokio::test]
    async fn test_run_sync_inside_current_thread_runtime() {
        let err = run_sync(async { 1 }).unwrap_err();
        assert!(matches!(err, SyncBridgeError::CurrentThreadRuntime));
    }
}
