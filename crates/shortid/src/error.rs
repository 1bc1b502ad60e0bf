/// A result type defaulting to the crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors a [`Broker`](crate::Broker) can report.
///
/// Construction is the only fallible step while a broker is running: the
/// generator absorbs collisions by growing the identifier length instead of
/// surfacing them. [`Error::Stopped`] can only be observed after
/// [`Broker::shutdown`](crate::Broker::shutdown).
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// More than one instance identifier was supplied.
    #[error("multiple instance identifiers")]
    MultipleInstanceIdentifiers {
        /// How many identifiers were given.
        count: usize,
    },

    /// The decimal form of the instance identifier contains `0`, which is
    /// reserved as the field separator inside candidates.
    #[error("instance identifier contains reserved digit")]
    ReservedDigitInInstanceIdentifier {
        /// The rejected identifier.
        id: u64,
    },

    /// The broker was shut down and no longer serves identifiers.
    #[error("broker stopped")]
    Stopped,
}
