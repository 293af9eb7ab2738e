//! Phase-barriered fan-out.
//!
//! Every assembly phase spawns all of its items into one [`JoinSet`] and
//! drains it before returning, so the next phase never observes a
//! half-finished predecessor. A semaphore bounds how many items run at once.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::log::Logger;
use crate::log_warn;

/// Runs `task` for every item concurrently and waits for all of them.
///
/// Items are independent: there is no ordering between them and a failing
/// item never stops its siblings. Tasks report their own failures through the
/// logger; a panicking task is logged here and otherwise ignored.
///
/// Returns the wall-clock time the phase took, in milliseconds.
pub(crate) async fn fan_out<I, F, Fut>(
    phase: &str,
    items: I,
    max_concurrency: usize,
    logger: &Arc<dyn Logger>,
    task: F,
) -> u128
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for item in items {
        let semaphore = Arc::clone(&semaphore);
        let work = task(item);
        tasks.spawn(async move {
            // Never closed; a failed acquire only happens on shutdown.
            let _permit = semaphore.acquire_owned().await.ok();
            work.await;
        });
    }

    while let Some(result) = tasks.join_next().await {
        if let Err(join_err) = result {
            log_warn!(logger, "{} task panicked: {}", phase, join_err);
        }
    }

    start.elapsed().as_millis()
}
