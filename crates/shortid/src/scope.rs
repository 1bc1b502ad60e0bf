use crate::{LengthController, Registry};
use core::time::Duration;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Arc<Scope>> = OnceLock::new();

/// The shortest uniqueness window a scope accepts.
pub const MIN_WINDOW: Duration = Duration::from_millis(1);

/// The state shared by a group of brokers: one uniqueness [`Registry`] and
/// one [`LengthController`].
///
/// Brokers attached to the same scope never hand out the same identifier
/// within the uniqueness window, whatever their instance identifiers, and
/// they all react to each other's collision pressure. Brokers built without
/// an explicit scope share [`Scope::global`], which makes that guarantee
/// process-wide. Build a dedicated scope to isolate a group of brokers, e.g.
/// in tests.
#[derive(Debug, Default)]
pub struct Scope {
    registry: Registry,
    length: LengthController,
}

impl Scope {
    /// Creates an isolated scope with the default uniqueness window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an isolated scope with a custom uniqueness window.
    ///
    /// The window is both the registry expiry and the maintenance tick
    /// period of every distributor using this scope. Windows shorter than
    /// [`MIN_WINDOW`] are raised to it.
    pub fn with_window(window: Duration) -> Self {
        Self {
            registry: Registry::new(window.max(MIN_WINDOW)),
            length: LengthController::new(),
        }
    }

    /// The process-wide scope used by brokers built without one.
    pub fn global() -> Arc<Self> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    pub const fn length(&self) -> &LengthController {
        &self.length
    }

    /// Runs one maintenance tick: drops expired registry entries and resets
    /// the prefix length.
    pub(crate) fn maintain(&self) {
        let _purged = self.registry.purge();
        self.length.reset();

        #[cfg(feature = "tracing")]
        tracing::trace!(purged = _purged, "maintenance tick");
    }
}
