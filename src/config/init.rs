// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates edgeship.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, app: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let app = app.unwrap_or("my-site");
    let yaml = generate_template_yaml(app);

    // Parse what we are about to write so a bad app name fails here.
    super::Config::from_yaml(&yaml).map_err(|e| Error::InvalidConfig(e.to_string()))?;

    std::fs::write(&config_path, yaml)?;
    Ok(())
}

fn generate_template_yaml(app: &str) -> String {
    format!(
        r#"app: {app}
build_dir: dist
region: us-east-1
# profile: default
default_environment: staging

retention:
  keep: 2

stack:
  name: "{{app}}-{{env}}"
  template: infra/site.yml
  poll_interval: 5s
  # parameters:
  #   domain_name: www.example.com
  #   certificate_arn: arn:aws:acm:us-east-1:123456789012:certificate/...
  #   price_class: PriceClass_100

environments:
  staging:
    bucket: {app}-staging
    distribution:
      env: STAGING_DISTRIBUTION_ID
  production:
    bucket: {app}-production
    distribution:
      env: PRODUCTION_DISTRIBUTION_ID
    keep: 3
"#
    )
}
