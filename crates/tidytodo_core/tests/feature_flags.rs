use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use tidytodo_core::{
    FeatureFlags, FetchError, FlagName, FlagSource, FlagValue, HttpRemoteConfigProvider,
    RawFlagValues, RemoteConfigProvider, RemoteConfigSettings,
};

/// Replays scripted fetch outcomes and counts calls.
struct ScriptedProvider {
    outcomes: VecDeque<Result<RawFlagValues, FetchError>>,
    calls: Rc<Cell<usize>>,
}

impl ScriptedProvider {
    fn new(outcomes: Vec<Result<RawFlagValues, FetchError>>) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let provider = Self {
            outcomes: outcomes.into(),
            calls: Rc::clone(&calls),
        };
        (provider, calls)
    }
}

impl RemoteConfigProvider for ScriptedProvider {
    fn fetch(&mut self) -> Result<RawFlagValues, FetchError> {
        self.calls.set(self.calls.get() + 1);
        self.outcomes
            .pop_front()
            .unwrap_or(Err(FetchError::InvalidPayload("script exhausted".to_string())))
    }
}

fn raw(pairs: &[(&str, &str)]) -> RawFlagValues {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn defaults_are_available_before_initialize() {
    let (provider, calls) = ScriptedProvider::new(vec![]);
    let source = FlagSource::new(provider);

    assert!(!source.is_initialized());
    assert_eq!(source.snapshot(), FeatureFlags::default());
    assert_eq!(calls.get(), 0);
}

#[test]
fn failed_initialize_emits_exactly_the_defaults() {
    let (provider, _) = ScriptedProvider::new(vec![Err(FetchError::NotConfigured)]);
    let mut source = FlagSource::new(provider);
    let seen: Rc<RefCell<Vec<FeatureFlags>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    source.watch(move |flags: &FeatureFlags| sink.borrow_mut().push(*flags));

    source.initialize();

    assert!(source.is_initialized());
    let expected = FeatureFlags {
        categories_enabled: true,
        enable_notifications: true,
        maintenance_mode: false,
        max_todos_per_user: 100,
    };
    assert_eq!(*seen.borrow(), vec![expected, expected]);
}

#[test]
fn initialize_fetches_once() {
    let (provider, calls) = ScriptedProvider::new(vec![
        Ok(raw(&[("maintenanceMode", "true")])),
        Ok(raw(&[("maintenanceMode", "false")])),
    ]);
    let mut source = FlagSource::new(provider);

    source.initialize();
    source.initialize();

    assert_eq!(calls.get(), 1);
    assert!(source.snapshot().maintenance_mode);
}

#[test]
fn remote_values_are_coerced_and_missing_ones_defaulted() {
    let (provider, _) = ScriptedProvider::new(vec![Ok(raw(&[
        ("categoriesEnabled", "false"),
        ("maxTodosPerUser", "25"),
        ("unrelatedKey", "whatever"),
    ]))]);
    let mut source = FlagSource::new(provider);
    source.initialize();

    let flags = source.snapshot();
    assert!(!flags.categories_enabled);
    assert!(flags.enable_notifications);
    assert!(!flags.maintenance_mode);
    assert_eq!(flags.max_todos_per_user, 25);
    assert_eq!(source.flag(FlagName::MaxTodosPerUser), FlagValue::Int(25));
}

#[test]
fn unparsable_integer_falls_back_to_default() {
    let (provider, _) = ScriptedProvider::new(vec![Ok(raw(&[("maxTodosPerUser", "lots")]))]);
    let mut source = FlagSource::new(provider);
    source.initialize();

    assert_eq!(source.snapshot().max_todos_per_user, 100);
}

#[test]
fn refresh_failure_reverts_to_defaults() {
    let (provider, calls) = ScriptedProvider::new(vec![
        Ok(raw(&[("maintenanceMode", "true"), ("maxTodosPerUser", "5")])),
        Err(FetchError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }),
    ]);
    let mut source = FlagSource::new(provider);
    source.initialize();
    assert!(source.snapshot().maintenance_mode);

    source.refresh();

    assert_eq!(calls.get(), 2);
    assert_eq!(source.snapshot(), FeatureFlags::default());
}

#[test]
fn get_flag_by_key() {
    let (provider, _) = ScriptedProvider::new(vec![Ok(raw(&[("enableNotifications", "0")]))]);
    let mut source = FlagSource::new(provider);
    source.initialize();

    assert_eq!(
        source.get_flag("enableNotifications"),
        Some(FlagValue::Bool(false))
    );
    assert_eq!(
        source.get_flag("categoriesEnabled").and_then(FlagValue::as_bool),
        Some(true)
    );
    assert_eq!(source.get_flag("darkMode"), None);
}

#[test]
fn fetch_flags_surfaces_errors_without_touching_snapshot() {
    let (provider, _) = ScriptedProvider::new(vec![
        Ok(raw(&[("maintenanceMode", "1")])),
        Err(FetchError::NotConfigured),
    ]);
    let mut source = FlagSource::new(provider);
    source.initialize();

    let err = source.fetch_flags().unwrap_err();

    assert!(matches!(err, FetchError::NotConfigured));
    assert!(source.snapshot().maintenance_mode);
}

#[test]
fn unconfigured_http_provider_falls_back_without_network() {
    let provider = HttpRemoteConfigProvider::new(RemoteConfigSettings::default()).unwrap();
    let mut source = FlagSource::new(provider);

    source.initialize();

    assert!(source.is_initialized());
    assert_eq!(source.snapshot(), FeatureFlags::default());
}

#[test]
fn boxed_providers_work_behind_trait_objects() {
    let (provider, calls) = ScriptedProvider::new(vec![Ok(raw(&[("maxTodosPerUser", "7")]))]);
    let boxed: Box<dyn RemoteConfigProvider> = Box::new(provider);
    let mut source = FlagSource::new(boxed);

    source.initialize();

    assert_eq!(calls.get(), 1);
    assert_eq!(source.snapshot().max_todos_per_user, 7);
}
