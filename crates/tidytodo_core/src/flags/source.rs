//! Flag source with default fallback.
//!
//! State machine: uninitialized -> initialized. Initialization always
//! completes, even when the fetch fails.

use super::provider::{FetchError, RemoteConfigProvider};
use crate::model::flags::{FeatureFlags, FlagName, FlagValue};
use crate::reactive::{SnapshotSubject, SubscriptionId};
use log::{info, warn};

pub struct FlagSource<P: RemoteConfigProvider> {
    provider: P,
    subject: SnapshotSubject<FeatureFlags>,
    initialized: bool,
}

impl<P: RemoteConfigProvider> FlagSource<P> {
    /// Creates an uninitialized source that already holds the defaults.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            subject: SnapshotSubject::new(FeatureFlags::default()),
            initialized: false,
        }
    }

    /// Performs the first fetch. Repeated calls are no-ops.
    pub fn initialize(&mut self) {
        if self.initialized {
            info!("event=flags_init module=flags status=skipped reason=already_initialized");
            return;
        }
        self.load("flags_init");
        self.initialized = true;
    }

    /// Fetches again; a failure reverts the snapshot to defaults.
    pub fn refresh(&mut self) {
        self.load("flags_refresh");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn snapshot(&self) -> FeatureFlags {
        self.subject.value()
    }

    /// Subscribes to flag snapshots; the current one is delivered immediately.
    pub fn watch(&self, listener: impl FnMut(&FeatureFlags) + 'static) -> SubscriptionId {
        self.subject.subscribe(listener)
    }

    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        self.subject.unsubscribe(id)
    }

    pub fn flag(&self, name: FlagName) -> FlagValue {
        self.subject.with_value(|flags| flags.get(name))
    }

    /// Looks a flag up by its remote key. Unknown keys yield `None`.
    pub fn get_flag(&self, key: &str) -> Option<FlagValue> {
        FlagName::from_key(key).map(|name| self.flag(name))
    }

    /// One fetch round trip, coerced into a full snapshot.
    pub fn fetch_flags(&mut self) -> Result<FeatureFlags, FetchError> {
        let raw = self.provider.fetch()?;
        Ok(FeatureFlags::from_raw(&raw))
    }

    fn load(&mut self, event: &str) {
        let flags = match self.fetch_flags() {
            Ok(flags) => {
                info!(
                    "event={} module=flags status=ok categories_enabled={} enable_notifications={} maintenance_mode={} max_todos_per_user={}",
                    event,
                    flags.categories_enabled,
                    flags.enable_notifications,
                    flags.maintenance_mode,
                    flags.max_todos_per_user
                );
                flags
            }
            Err(err) => {
                warn!(
                    "event={} module=flags status=fallback error_code=remote_fetch_failed error={}",
                    event, err
                );
                FeatureFlags::default()
            }
        };
        self.subject.publish(flags);
    }
}
