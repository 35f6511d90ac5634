//! Integration tests for configuration resolution and result invariants.

use infrapulse_core::{
    Config, ConfigResolver, DashboardOutcome, EnvSnapshot, ProviderKind, ProviderResult,
    Resolution,
};

#[test]
fn test_empty_environment_configures_nothing() {
    let env = EnvSnapshot::from_pairs(Vec::<(String, String)>::new());
    let config = Config::from_env(&env).unwrap();

    for kind in ProviderKind::all() {
        assert!(
            !config.resolution(*kind).is_configured(),
            "{kind} should not be configured"
        );
    }

    let results: Vec<ProviderResult<()>> = ProviderKind::all()
        .iter()
        .map(|k| ProviderResult::not_configured(config.resolution(*k).remediation(*k)))
        .collect();
    assert_eq!(
        DashboardOutcome::from_results(&results),
        DashboardOutcome::NoProvidersConfigured
    );
}

#[test]
fn test_remediation_names_variables() {
    let env = EnvSnapshot::from_pairs([("SENTRY_AUTH_TOKEN", "tok")]);
    let resolver = ConfigResolver::new(&env);

    let resolution = resolver.resolve(ProviderKind::Sentry);
    match &resolution {
        Resolution::NotConfigured { required } => {
            assert!(required.contains(&"SENTRY_ORG"));
        }
        Resolution::Configured(_) => panic!("Sentry needs an org slug"),
    }
    assert!(resolution.remediation(ProviderKind::Sentry).contains("SENTRY_ORG"));
}
