use crate::Scope;
use std::collections::VecDeque;
use std::sync::Arc;
use std::task::{Context, Waker};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

/// Buffer slots reserved up front; larger buffers grow on demand.
const PREALLOCATED_SLOTS: usize = 4096;

/// A caller waiting for one identifier.
pub(crate) type Request = oneshot::Sender<String>;

/// How full the ready buffer is, which decides the events the distributor
/// listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Occupancy {
    /// Nothing to hand out: only accept a candidate.
    Empty,
    /// Room to grow and something to hand out: race requests, candidates and
    /// the maintenance tick.
    Partial,
    /// No room left: only serve a request. The generator is held back.
    Full,
}

impl Occupancy {
    pub(crate) const fn of(len: usize, capacity: usize) -> Self {
        if len == 0 {
            Self::Empty
        } else if len >= capacity {
            Self::Full
        } else {
            Self::Partial
        }
    }
}

/// Hands the oldest buffered identifier to `request`.
///
/// If the caller stopped waiting the identifier goes back to the head of the
/// buffer; it stays registered, so it is still safe to hand out later.
fn deliver(buffer: &mut VecDeque<String>, request: Request) {
    if let Some(id) = buffer.pop_front() {
        if let Err(id) = request.send(id) {
            buffer.push_front(id);
        }
    }
}

/// Runs maintenance if a tick came due while the distributor was not
/// listening for it.
///
/// Only the partial state awaits the ticker, so a buffer that alternates
/// between empty and full (e.g. a single slot) would otherwise never purge.
fn catch_up(ticker: &mut Interval, scope: &Scope) {
    let mut cx = Context::from_waker(Waker::noop());
    if ticker.poll_tick(&mut cx).is_ready() {
        scope.maintain();
    }
}

/// Distributor task: the single owner of a broker's ready buffer.
///
/// Each iteration handles exactly one event, chosen according to the
/// buffer's [`Occupancy`]. In the partial state the ready events are picked
/// at random, without priority. The maintenance tick fires every
/// `scope.registry().window()`, purges the registry and resets the prefix
/// length; missed ticks are skipped rather than replayed. A tick that comes
/// due in the empty or full state runs after that state's event.
///
/// Stops on cancellation, or once every request sender or the generator is
/// gone.
pub(crate) async fn distributor_loop(
    capacity: usize,
    scope: Arc<Scope>,
    mut requests: mpsc::Receiver<Request>,
    mut candidates: mpsc::Receiver<String>,
    shutdown_token: CancellationToken,
) {
    #[cfg(feature = "tracing")]
    tracing::trace!(capacity, "Distributor started");

    let period = scope.registry().window();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut buffer: VecDeque<String> = VecDeque::with_capacity(capacity.min(PREALLOCATED_SLOTS));

    loop {
        match Occupancy::of(buffer.len(), capacity) {
            Occupancy::Empty => {
                tokio::select! {
                    () = shutdown_token.cancelled() => break,
                    candidate = candidates.recv() => match candidate {
                        Some(id) => buffer.push_back(id),
                        None => break,
                    },
                }
                catch_up(&mut ticker, &scope);
            }
            Occupancy::Full => {
                tokio::select! {
                    () = shutdown_token.cancelled() => break,
                    request = requests.recv() => match request {
                        Some(request) => deliver(&mut buffer, request),
                        None => break,
                    },
                }
                catch_up(&mut ticker, &scope);
            }
            Occupancy::Partial => tokio::select! {
                () = shutdown_token.cancelled() => break,
                request = requests.recv() => match request {
                    Some(request) => deliver(&mut buffer, request),
                    None => break,
                },
                candidate = candidates.recv() => match candidate {
                    Some(id) => buffer.push_back(id),
                    None => break,
                },
                _ = ticker.tick() => scope.maintain(),
            },
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(undelivered = buffer.len(), "Distributor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use tokio::task::JoinHandle;

    struct Harness {
        candidates: mpsc::Sender<String>,
        requests: mpsc::Sender<Request>,
        shutdown_token: CancellationToken,
        handle: JoinHandle<()>,
    }

    impl Harness {
        fn spawn(capacity: usize, scope: Arc<Scope>) -> Self {
            let (candidates, candidate_rx) = mpsc::channel(1);
            let (requests, request_rx) = mpsc::channel(capacity);
            let shutdown_token = CancellationToken::new();
            let handle = tokio::spawn(distributor_loop(
                capacity,
                scope,
                request_rx,
                candidate_rx,
                shutdown_token.clone(),
            ));
            Self {
                candidates,
                requests,
                shutdown_token,
                handle,
            }
        }

        async fn request(&self) -> String {
            let (tx, rx) = oneshot::channel();
            self.requests.send(tx).await.unwrap();
            rx.await.unwrap()
        }
    }

    #[test]
    fn occupancy_regimes() {
        assert_eq!(Occupancy::of(0, 3), Occupancy::Empty);
        assert_eq!(Occupancy::of(1, 3), Occupancy::Partial);
        assert_eq!(Occupancy::of(2, 3), Occupancy::Partial);
        assert_eq!(Occupancy::of(3, 3), Occupancy::Full);
        // A single slot is never partial.
        assert_eq!(Occupancy::of(0, 1), Occupancy::Empty);
        assert_eq!(Occupancy::of(1, 1), Occupancy::Full);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn delivers_in_fifo_order() {
        let harness = Harness::spawn(4, Arc::new(Scope::new()));
        for id in ["a", "b", "c"] {
            harness.candidates.send(id.to_owned()).await.unwrap();
        }
        assert_eq!(harness.request().await, "a");
        assert_eq!(harness.request().await, "b");
        assert_eq!(harness.request().await, "c");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn full_buffer_holds_back_the_producer() {
        let harness = Harness::spawn(2, Arc::new(Scope::new()));
        // Two fill the buffer, one parks in the channel slot.
        for id in ["a", "b", "c"] {
            harness.candidates.send(id.to_owned()).await.unwrap();
        }
        let blocked = tokio::time::timeout(
            Duration::from_millis(100),
            harness.candidates.send("d".to_owned()),
        )
        .await;
        assert!(blocked.is_err(), "producer should wait on a full buffer");

        assert_eq!(harness.request().await, "a");
        harness.candidates.send("d".to_owned()).await.unwrap();
        assert_eq!(harness.request().await, "b");
        assert_eq!(harness.request().await, "c");
        assert_eq!(harness.request().await, "d");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn empty_buffer_makes_requests_wait() {
        let harness = Harness::spawn(2, Arc::new(Scope::new()));
        let (tx, mut rx) = oneshot::channel();
        harness.requests.send(tx).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());

        harness.candidates.send("a".to_owned()).await.unwrap();
        assert_eq!(rx.await.unwrap(), "a");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn abandoned_request_keeps_the_identifier() {
        let harness = Harness::spawn(4, Arc::new(Scope::new()));
        harness.candidates.send("a".to_owned()).await.unwrap();
        harness.candidates.send("b".to_owned()).await.unwrap();

        let (tx, rx) = oneshot::channel();
        drop(rx);
        harness.requests.send(tx).await.unwrap();

        assert_eq!(harness.request().await, "a");
        assert_eq!(harness.request().await, "b");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn maintenance_tick_runs_in_partial_state() {
        let scope = Arc::new(Scope::with_window(Duration::from_millis(20)));
        scope.registry().insert("stale");
        scope.length().grow();
        scope.length().grow();

        let harness = Harness::spawn(4, Arc::clone(&scope));
        harness.candidates.send("a".to_owned()).await.unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!scope.registry().contains("stale"));
        assert_eq!(scope.length().current(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn single_slot_buffer_still_runs_maintenance() {
        let scope = Arc::new(Scope::with_window(Duration::from_millis(20)));
        scope.registry().insert("stale");
        scope.length().grow();

        let harness = Harness::spawn(1, Arc::clone(&scope));
        harness.candidates.send("a".to_owned()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(harness.request().await, "a");

        // The tick came due while the buffer sat full; it runs right after
        // the request is served, before the next candidate is taken.
        harness.candidates.send("b".to_owned()).await.unwrap();
        assert_eq!(harness.request().await, "b");
        assert!(!scope.registry().contains("stale"));
        assert_eq!(scope.length().current(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stops_on_cancellation() {
        let harness = Harness::spawn(2, Arc::new(Scope::new()));
        harness.shutdown_token.cancel();
        tokio::time::timeout(Duration::from_secs(1), harness.handle)
            .await
            .expect("distributor did not stop")
            .unwrap();
    }
}
