//! The public broker: configuration, task start-up and the `next`/`many`
//! surface.
//!
//! Each broker runs two Tokio tasks:
//!
//! - a **generator** ([`generator_loop`]) that keeps building candidates,
//!   claims them in the scope's [`Registry`](crate::Registry) and hands them
//!   over, and
//! - a **distributor** ([`distributor_loop`]) that owns the bounded FIFO of
//!   ready identifiers, answers callers and drives the maintenance tick.
//!
//! Callers never touch the buffer directly: [`Broker::next`] sends a request
//! carrying a oneshot reply channel and waits for the distributor to answer.

mod distributor;
mod generator;

use crate::{
    CandidateBuilder, Error, MonotonicClock, RandSource, Result, Scope, ThreadRandom, TimeSource,
    mutex::{Mutex, lock},
};
use distributor::{Request, distributor_loop};
use generator::generator_loop;
pub use generator::MAX_RETRIES;
use std::sync::Arc;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

/// Upper bound on callers queued ahead of the distributor; further callers
/// wait to enqueue.
const MAX_QUEUED_REQUESTS: usize = 1024;

/// Hands out short, unique identifiers from a pre-computed buffer.
///
/// A broker is a cheap handle: clones share the same buffer and background
/// tasks, and any number of tasks may call [`Broker::next`] concurrently.
/// Identifiers are delivered in the order they were generated, but when
/// several callers wait at once there is no telling which caller gets which
/// identifier.
///
/// Two brokers never hand out the same identifier within the uniqueness
/// window as long as they share a [`Scope`] (the default), or carry
/// different instance identifiers.
///
/// # Example
///
/// ```
/// # #[tokio::main(flavor = "multi_thread")]
/// # async fn main() -> shortid::Result<()> {
/// use shortid::Broker;
///
/// let broker = Broker::builder().capacity(16).instance_id(42).build()?;
/// let id = broker.next().await;
/// assert!(!id.is_empty());
///
/// let batch = broker.many(3).await;
/// assert_eq!(batch.len(), 3);
/// # broker.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Broker {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    capacity: usize,
    instance_id: Option<String>,
    scope: Arc<Scope>,
    requests: mpsc::Sender<Request>,
    shutdown_token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}

impl Broker {
    /// Creates a broker holding up to `capacity` ready identifiers.
    ///
    /// `instance_ids` holds at most one instance identifier; an empty slice
    /// selects shortest mode. A `capacity` of zero is treated as one. The
    /// broker uses the process-wide [`Scope::global`].
    ///
    /// # Errors
    ///
    /// - [`Error::MultipleInstanceIdentifiers`] if more than one identifier
    ///   is given.
    /// - [`Error::ReservedDigitInInstanceIdentifier`] if the identifier's
    ///   decimal form contains `0`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn new(capacity: usize, instance_ids: &[u64]) -> Result<Self> {
        instance_ids
            .iter()
            .fold(Self::builder().capacity(capacity), |builder, &id| {
                builder.instance_id(id)
            })
            .build()
    }

    /// Starts configuring a broker.
    pub fn builder() -> BrokerBuilder {
        BrokerBuilder::default()
    }

    fn spawn<T, R>(
        capacity: usize,
        instance_id: Option<String>,
        scope: Arc<Scope>,
        time: T,
        rand: R,
    ) -> Self
    where
        T: TimeSource + Send + 'static,
        R: RandSource + Send + 'static,
    {
        let shutdown_token = CancellationToken::new();
        let (requests, request_rx) = mpsc::channel(capacity.min(MAX_QUEUED_REQUESTS));
        // A single slot: the closest tokio gets to a rendezvous, so the
        // generator stalls as soon as the buffer is full.
        let (candidate_tx, candidate_rx) = mpsc::channel(1);

        let builder = CandidateBuilder::new(instance_id.clone(), time, rand);
        let generator = tokio::spawn(generator_loop(
            builder,
            Arc::clone(&scope),
            candidate_tx,
            shutdown_token.clone(),
        ));
        let distributor = tokio::spawn(distributor_loop(
            capacity,
            Arc::clone(&scope),
            request_rx,
            candidate_rx,
            shutdown_token.clone(),
        ));

        #[cfg(feature = "tracing")]
        tracing::debug!(
            capacity,
            instance_id = instance_id.as_deref(),
            "Broker started"
        );

        Self {
            inner: Arc::new(Inner {
                capacity,
                instance_id,
                scope,
                requests,
                shutdown_token,
                tasks: Mutex::new(vec![generator, distributor]),
            }),
        }
    }

    /// Waits for the next identifier.
    ///
    /// # Panics
    ///
    /// Panics if the broker was shut down. Use [`Broker::try_next`] where a
    /// stopped broker is an expected condition.
    pub async fn next(&self) -> String {
        match self.try_next().await {
            Ok(id) => id,
            Err(e) => panic!("cannot take an identifier: {e}"),
        }
    }

    /// Waits for the next identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stopped`] once [`Broker::shutdown`] has been called.
    pub async fn try_next(&self) -> Result<String> {
        if self.inner.shutdown_token.is_cancelled() {
            return Err(Error::Stopped);
        }

        let (tx, rx) = oneshot::channel();
        self.inner
            .requests
            .send(tx)
            .await
            .map_err(|_| Error::Stopped)?;
        rx.await.map_err(|_| Error::Stopped)
    }

    /// Takes `n` identifiers one after the other.
    ///
    /// This is not atomic: concurrent callers on the same broker may be
    /// served in between.
    ///
    /// # Panics
    ///
    /// Panics if the broker was shut down.
    pub async fn many(&self, n: usize) -> Vec<String> {
        let mut ids = Vec::with_capacity(n);
        for _ in 0..n {
            ids.push(self.next().await);
        }
        ids
    }

    /// Takes `n` identifiers one after the other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stopped`] once [`Broker::shutdown`] has been called;
    /// identifiers already taken are discarded.
    pub async fn try_many(&self, n: usize) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(n);
        for _ in 0..n {
            ids.push(self.try_next().await?);
        }
        Ok(ids)
    }

    /// Stops the generator and distributor and waits for both to finish.
    ///
    /// Waiting callers receive [`Error::Stopped`]. Buffered identifiers are
    /// dropped; they stay in the registry until they expire. Calling this
    /// more than once is harmless.
    pub async fn shutdown(&self) {
        self.inner.shutdown_token.cancel();

        let tasks = core::mem::take(&mut *lock(&self.inner.tasks));
        for task in tasks {
            if let Err(_e) = task.await {
                #[cfg(feature = "tracing")]
                tracing::error!("Broker task failed: {_e}");
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Broker stopped");
    }

    /// Maximum number of ready identifiers held by this broker.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// The instance identifier embedded in every identifier, if any.
    pub fn instance_id(&self) -> Option<&str> {
        self.inner.instance_id.as_deref()
    }

    /// `true` if the broker runs without an instance identifier.
    pub fn is_shortest(&self) -> bool {
        self.inner.instance_id.is_none()
    }

    /// The scope this broker deduplicates against.
    pub fn scope(&self) -> &Arc<Scope> {
        &self.inner.scope
    }
}

/// Configures and starts a [`Broker`].
#[derive(Debug, Default)]
#[must_use]
pub struct BrokerBuilder {
    capacity: usize,
    instance_ids: Vec<u64>,
    scope: Option<Arc<Scope>>,
}

impl BrokerBuilder {
    /// Maximum number of ready identifiers. Zero is treated as one.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Embeds `id` in every identifier so that brokers in different
    /// processes never collide. At most one may be set; its decimal form
    /// must not contain `0`.
    pub fn instance_id(mut self, id: u64) -> Self {
        self.instance_ids.push(id);
        self
    }

    /// Deduplicates against `scope` instead of [`Scope::global`].
    pub fn scope(mut self, scope: Arc<Scope>) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Validates the configuration and starts the broker's tasks.
    ///
    /// # Errors
    ///
    /// See [`Broker::new`].
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn build(self) -> Result<Broker> {
        self.build_with(MonotonicClock::new(), ThreadRandom)
    }

    /// Like [`BrokerBuilder::build`], with a custom clock and random source.
    ///
    /// # Errors
    ///
    /// See [`Broker::new`].
    pub fn build_with<T, R>(self, time: T, rand: R) -> Result<Broker>
    where
        T: TimeSource + Send + 'static,
        R: RandSource + Send + 'static,
    {
        let instance_id = match self.instance_ids.as_slice() {
            [] => None,
            [id] => Some(validate_instance_id(*id)?),
            ids => {
                return Err(Error::MultipleInstanceIdentifiers { count: ids.len() });
            }
        };
        let capacity = self.capacity.max(1);
        let scope = self.scope.unwrap_or_else(Scope::global);

        Ok(Broker::spawn(capacity, instance_id, scope, time, rand))
    }
}

/// Renders `id` in decimal, rejecting the reserved separator digit.
fn validate_instance_id(id: u64) -> Result<String> {
    let digits = id.to_string();
    if digits.contains('0') {
        return Err(Error::ReservedDigitInInstanceIdentifier { id });
    }
    Ok(digits)
}
