// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, env var values, environment selection, and parameter merging.

use edgeship::config::*;
use edgeship::error::Error;
use std::fs;
use std::time::Duration;

const TWO_ENVS: &str = r#"
app: docs
environments:
  staging:
    bucket: docs-staging
    distribution: E1STAGING
  production:
    bucket: docs-production
    distribution: E1PROD
    region: eu-west-1
    keep: 5
"#;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
app: docs
environments:
  production:
    bucket: docs-production
    distribution: E1PROD
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.app, "docs");
        assert_eq!(config.environments.len(), 1);
        assert_eq!(config.environments.first().name, "production");
    }

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_yaml(TWO_ENVS).unwrap();
        assert_eq!(config.build_dir.to_str(), Some("dist"));
        assert_eq!(config.region, DEFAULT_REGION);
        assert_eq!(config.package_manifest.to_str(), Some(DEFAULT_MANIFEST));
        assert_eq!(config.upload_concurrency, 8);
        assert_eq!(config.retention.keep, 2);
        assert_eq!(config.stack.name, DEFAULT_STACK_NAME);
        assert_eq!(config.stack.template.to_str(), Some(DEFAULT_TEMPLATE_PATH));
        assert_eq!(config.stack.poll_interval, Duration::from_secs(5));
        assert!(config.stack.termination_protection);
        assert!(config.profile.is_none());
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
app: docs
build_dir: build
region: eu-central-1
profile: deploy
package_manifest: web/package.json
upload_concurrency: 16
retention:
  keep: 4
default_environment: staging
stack:
  name: "site-{env}"
  template: cfn/site.yaml
  poll_interval: 2s
  termination_protection: false
  parameters:
    price_class: PriceClass_All
    extra:
      LogBucket: docs-logs
environments:
  staging:
    bucket: docs-staging
    distribution: E1STAGING
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.build_dir.to_str(), Some("build"));
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.profile, Some(EnvValue::Literal("deploy".to_string())));
        assert_eq!(config.upload_concurrency, 16);
        assert_eq!(config.retention.keep, 4);
        assert_eq!(config.stack.poll_interval, Duration::from_secs(2));
        assert!(!config.stack.termination_protection);
        assert_eq!(
            config.stack.parameters.price_class.as_deref(),
            Some("PriceClass_All")
        );
    }

    #[test]
    fn environments_are_ordered_by_name() {
        let config = Config::from_yaml(TWO_ENVS).unwrap();
        assert_eq!(config.environment_names(), vec!["production", "staging"]);
    }
}

mod validation {
    use super::*;

    #[test]
    fn invalid_app_name_returns_error() {
        let yaml = r#"
app: Docs_Site
environments:
  prod:
    bucket: docs
    distribution: E1
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("app name"));
    }

    #[test]
    fn empty_environments_returns_error() {
        let yaml = "app: docs\nenvironments: {}\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("at least one environment"));
    }

    #[test]
    fn unknown_field_returns_error() {
        let yaml = format!("{TWO_ENVS}servers: []\n");
        assert!(Config::from_yaml(&yaml).is_err());
    }

    #[test]
    fn zero_concurrency_returns_error() {
        let yaml = format!("{TWO_ENVS}upload_concurrency: 0\n");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn undefined_default_environment_returns_error() {
        let yaml = format!("{TWO_ENVS}default_environment: qa\n");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("qa"));
    }

    #[test]
    fn invalid_bucket_is_reported_with_environment() {
        let yaml = r#"
app: docs
environments:
  prod:
    bucket: Docs_Bucket
    distribution: E1
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let env = config.environment(None).unwrap();
        let err = config.bucket(env).unwrap_err();
        assert!(err.to_string().contains("environment prod"));
    }

    #[test]
    fn blank_distribution_is_rejected() {
        let yaml = r#"
app: docs
environments:
  prod:
    bucket: docs-prod
    distribution: "  "
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let env = config.environment(None).unwrap();
        assert!(matches!(config.target(env), Err(Error::InvalidConfig(_))));
    }
}

mod environment_selection {
    use super::*;

    #[test]
    fn explicit_name_wins() {
        let config = Config::from_yaml(TWO_ENVS).unwrap();
        assert_eq!(config.environment(Some("production")).unwrap().name, "production");
    }

    #[test]
    fn unknown_name_lists_available() {
        let config = Config::from_yaml(TWO_ENVS).unwrap();
        let err = config.environment(Some("qa")).unwrap_err();
        match err {
            Error::UnknownEnvironment { name, available } => {
                assert_eq!(name, "qa");
                assert_eq!(available, "production, staging");
            }
            other => panic!("expected UnknownEnvironment, got {other:?}"),
        }
    }

    #[test]
    fn several_environments_without_default_require_a_choice() {
        let config = Config::from_yaml(TWO_ENVS).unwrap();
        assert!(matches!(
            config.environment(None),
            Err(Error::EnvironmentRequired(_))
        ));
    }

    #[test]
    fn default_environment_is_used() {
        let yaml = format!("{TWO_ENVS}default_environment: staging\n");
        let config = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.environment(None).unwrap().name, "staging");
    }
}

mod merging {
    use super::*;

    #[test]
    fn environment_overrides_region_and_retention() {
        let config = Config::from_yaml(TWO_ENVS).unwrap();
        let prod = config.environment(Some("production")).unwrap();
        let staging = config.environment(Some("staging")).unwrap();

        assert_eq!(config.region_for(prod), "eu-west-1");
        assert_eq!(config.region_for(staging), DEFAULT_REGION);
        assert_eq!(config.retention_keep(prod), 5);
        assert_eq!(config.retention_keep(staging), 2);
    }

    #[test]
    fn context_carries_resolved_target() {
        let config = Config::from_yaml(TWO_ENVS).unwrap();
        let prod = config.environment(Some("production")).unwrap();
        let version = edgeship::types::Version::new("1.4.0").unwrap();

        let ctx = config.context(prod, version).unwrap();
        assert_eq!(ctx.app, "docs");
        assert_eq!(ctx.environment, "production");
        assert_eq!(ctx.target.bucket.as_str(), "docs-production");
        assert_eq!(ctx.target.distribution.as_str(), "E1PROD");
        assert_eq!(ctx.target.region, "eu-west-1");
        assert_eq!(ctx.retention_keep, 5);
        assert_eq!(ctx.cutover_attempts, 3);
    }

    #[test]
    fn stack_name_uses_template() {
        let config = Config::from_yaml(TWO_ENVS).unwrap();
        let staging = config.environment(Some("staging")).unwrap();
        assert_eq!(config.stack_name(staging).unwrap().as_str(), "docs-staging");
    }

    #[test]
    fn stack_parameters_merge_field_by_field() {
        let yaml = r#"
app: docs
stack:
  parameters:
    domain_name: docs.example.com
    price_class: PriceClass_200
    extra:
      LogBucket: docs-logs
      WafArn: shared
environments:
  prod:
    bucket: docs-prod
    distribution: E1
    parameters:
      price_class: PriceClass_All
      extra:
        WafArn: prod-only
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let prod = config.environment(None).unwrap();
        let params = config.stack_parameters(prod).unwrap();

        assert_eq!(params.environment, "prod");
        assert_eq!(params.bucket_name.as_str(), "docs-prod");
        assert_eq!(params.domain_name.as_deref(), Some("docs.example.com"));
        assert_eq!(params.price_class, "PriceClass_All");
        assert_eq!(params.extra["LogBucket"], "docs-logs");
        assert_eq!(params.extra["WafArn"], "prod-only");
        assert!(params.certificate_arn.is_none());
    }
}

mod env_values {
    use super::*;

    const FROM_ENV: &str = r#"
app: docs
environments:
  prod:
    bucket: docs-prod
    distribution:
      env: EDGESHIP_TEST_DISTRIBUTION
"#;

    #[test]
    fn reads_environment_variable() {
        temp_env::with_var("EDGESHIP_TEST_DISTRIBUTION", Some("E9FROMENV"), || {
            let config = Config::from_yaml(FROM_ENV).unwrap();
            let env = config.environment(None).unwrap();
            let target = config.target(env).unwrap();
            assert_eq!(target.distribution.as_str(), "E9FROMENV");
        });
    }

    #[test]
    fn missing_variable_returns_error() {
        temp_env::with_var_unset("EDGESHIP_TEST_DISTRIBUTION", || {
            let config = Config::from_yaml(FROM_ENV).unwrap();
            let env = config.environment(None).unwrap();
            let err = config.target(env).unwrap_err();
            assert!(matches!(err, Error::MissingEnvVar(ref v) if v == "EDGESHIP_TEST_DISTRIBUTION"));
        });
    }

    #[test]
    fn empty_variable_falls_back_to_default() {
        let value = EnvValue::FromEnv {
            env: "EDGESHIP_TEST_PROFILE".to_string(),
            default: Some("fallback".to_string()),
        };
        temp_env::with_var("EDGESHIP_TEST_PROFILE", Some(""), || {
            assert_eq!(value.resolve().unwrap(), "fallback");
        });
        temp_env::with_var("EDGESHIP_TEST_PROFILE", Some("ci"), || {
            assert_eq!(value.resolve().unwrap(), "ci");
        });
    }
}

mod files {
    use super::*;

    #[test]
    fn init_writes_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("docs"), false).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.app, "docs");
        assert_eq!(config.default_environment.as_deref(), Some("staging"));
        assert_eq!(config.environment_names(), vec!["production", "staging"]);
    }

    #[test]
    fn init_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), None, false).unwrap();

        let err = init_config(dir.path(), None, false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        init_config(dir.path(), None, true).unwrap();
    }

    #[test]
    fn discover_finds_alternate_names_and_sets_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".edgeship")).unwrap();
        fs::write(dir.path().join(".edgeship/config.yml"), TWO_ENVS).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.manifest_path(), dir.path().join("package.json"));
        assert_eq!(config.template_path(), dir.path().join("infra/site.yml"));
    }

    #[test]
    fn discover_without_config_returns_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }

    #[test]
    fn yaml_extension_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("edgeship.yaml"), TWO_ENVS).unwrap();
        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn package_version_is_read_from_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("package.json");
        fs::write(&manifest, r#"{"name":"docs","version":"2.3.1"}"#).unwrap();

        let version = read_package_version(&manifest).unwrap();
        assert_eq!(version.as_str(), "2.3.1");
    }
}
