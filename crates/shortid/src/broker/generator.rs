use crate::{CandidateBuilder, RandSource, Scope, TimeSource};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Collisions tolerated at the current length before it is grown.
pub const MAX_RETRIES: usize = 3;

/// Builds candidates until one is claimed in the scope's registry.
///
/// Every collision bumps a local retry counter; once it exceeds
/// [`MAX_RETRIES`] the shared prefix length grows by one digit and the
/// counter starts over. The returned identifier is already registered.
pub(crate) fn unique_id<T, R>(builder: &CandidateBuilder<T, R>, scope: &Scope) -> String
where
    T: TimeSource,
    R: RandSource,
{
    let mut retries = 0;
    loop {
        let id = builder.build(scope.length().current());
        if scope.registry().try_insert(&id) {
            return id;
        }

        retries += 1;
        if retries > MAX_RETRIES {
            let _length = scope.length().grow();
            retries = 0;

            #[cfg(feature = "tracing")]
            tracing::debug!(length = _length, "collision pressure, growing prefix");
        }
    }
}

/// Generator task: produces unique identifiers for one broker and hands them
/// to its distributor.
///
/// The handoff waits while the distributor's buffer is saturated, which is
/// what bounds the work done ahead of demand. Stops on cancellation or when
/// the distributor is gone.
pub(crate) async fn generator_loop<T, R>(
    builder: CandidateBuilder<T, R>,
    scope: Arc<Scope>,
    candidates: mpsc::Sender<String>,
    shutdown_token: CancellationToken,
) where
    T: TimeSource,
    R: RandSource,
{
    #[cfg(feature = "tracing")]
    tracing::trace!("Generator started");

    loop {
        let id = unique_id(&builder, &scope);
        tokio::select! {
            biased;
            () = shutdown_token.cancelled() => break,
            sent = candidates.send(id) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Generator stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTime;
    impl TimeSource for FixedTime {
        fn current_secs(&self) -> u64 {
            1_700_000_000
        }
    }

    struct FixedRand;
    impl RandSource for FixedRand {
        fn nonzero_digit(&self) -> u8 {
            4
        }
    }

    #[test]
    fn first_candidate_is_accepted_at_minimum_length() {
        let scope = Scope::new();
        let builder = CandidateBuilder::new(None, FixedTime, FixedRand);
        let id = unique_id(&builder, &scope);
        assert_eq!(id, builder.build(1));
        assert!(scope.registry().contains(&id));
        assert_eq!(scope.length().current(), 1);
    }

    #[test]
    fn repeated_collisions_grow_the_shared_length() {
        let scope = Scope::new();
        let builder = CandidateBuilder::new(None, FixedTime, FixedRand);

        for expected_length in 1..=5 {
            let id = unique_id(&builder, &scope);
            assert_eq!(id, builder.build(expected_length));
        }
        assert_eq!(scope.length().current(), 5);
        assert_eq!(scope.registry().len(), 5);
    }

    #[test]
    fn reset_length_is_picked_up_by_the_next_candidate() {
        let scope = Scope::new();
        let builder = CandidateBuilder::new(Some("7".to_owned()), FixedTime, FixedRand);
        unique_id(&builder, &scope);
        unique_id(&builder, &scope);
        assert_eq!(scope.length().current(), 2);

        scope.registry().purge_at(std::time::Instant::now() + scope.registry().window());
        scope.length().reset();

        assert_eq!(unique_id(&builder, &scope), builder.build(1));
    }
}
