// ABOUTME: Explicit template parameter schema for the site stack.
// ABOUTME: Named required/optional fields with defaults, validated before submission.

use std::collections::BTreeMap;

use super::StackError;
use crate::provider::StackParameter;
use crate::types::BucketName;

/// CloudFront price classes accepted by the template.
pub const PRICE_CLASSES: [&str; 3] = ["PriceClass_100", "PriceClass_200", "PriceClass_All"];

const DEFAULT_PRICE_CLASS: &str = "PriceClass_100";

/// Parameters every site stack template receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackParameters {
    /// Required: environment name, e.g. `staging`.
    pub environment: String,
    /// Required: bucket holding the versioned artifacts.
    pub bucket_name: BucketName,
    /// Optional custom domain alias for the distribution.
    pub domain_name: Option<String>,
    /// Optional ACM certificate ARN; requires `domain_name`.
    pub certificate_arn: Option<String>,
    pub price_class: String,
    /// Template-specific parameters passed through verbatim.
    pub extra: BTreeMap<String, String>,
}

impl StackParameters {
    const NAMED: [&'static str; 5] = [
        "Environment",
        "BucketName",
        "DomainName",
        "CertificateArn",
        "PriceClass",
    ];

    pub fn new(environment: impl Into<String>, bucket_name: BucketName) -> Self {
        Self {
            environment: environment.into(),
            bucket_name,
            domain_name: None,
            certificate_arn: None,
            price_class: DEFAULT_PRICE_CLASS.to_string(),
            extra: BTreeMap::new(),
        }
    }

    /// Check the schema rules that the provider would otherwise reject late.
    pub fn validate(&self) -> Result<(), StackError> {
        let invalid = |msg: String| Err(StackError::InvalidParameters(msg));

        if self.environment.trim().is_empty() {
            return invalid("Environment is required".to_string());
        }

        if !PRICE_CLASSES.contains(&self.price_class.as_str()) {
            return invalid(format!(
                "PriceClass must be one of {}, got {}",
                PRICE_CLASSES.join(", "),
                self.price_class
            ));
        }

        if let Some(arn) = &self.certificate_arn {
            if self.domain_name.is_none() {
                return invalid("CertificateArn requires DomainName".to_string());
            }
            // CloudFront only accepts certificates issued in us-east-1.
            if !arn.starts_with("arn:aws:acm:us-east-1:") {
                return invalid(format!(
                    "CertificateArn must be an ACM certificate in us-east-1, got {}",
                    arn
                ));
            }
        }

        for key in self.extra.keys() {
            if Self::NAMED.contains(&key.as_str()) {
                return invalid(format!("{} must be set through its named field", key));
            }
            if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
                return invalid(format!("parameter name must be alphanumeric: {:?}", key));
            }
        }

        Ok(())
    }

    /// Provider parameters in a stable order. Unset optional fields are omitted
    /// so the template's own defaults apply.
    pub fn to_parameters(&self) -> Vec<StackParameter> {
        let mut params = vec![
            StackParameter::new("Environment", &self.environment),
            StackParameter::new("BucketName", self.bucket_name.as_str()),
            StackParameter::new("PriceClass", &self.price_class),
        ];

        if let Some(domain) = &self.domain_name {
            params.push(StackParameter::new("DomainName", domain));
        }
        if let Some(arn) = &self.certificate_arn {
            params.push(StackParameter::new("CertificateArn", arn));
        }

        params.extend(
            self.extra
                .iter()
                .map(|(k, v)| StackParameter::new(k, v)),
        );
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StackParameters {
        StackParameters::new("staging", BucketName::new("my-app-staging").unwrap())
    }

    #[test]
    fn defaults_are_valid() {
        let params = params();
        assert_eq!(params.price_class, "PriceClass_100");
        assert!(params.validate().is_ok());
    }

    #[test]
    fn certificate_without_domain_is_rejected() {
        let mut params = params();
        params.certificate_arn = Some("arn:aws:acm:us-east-1:123:certificate/abc".to_string());
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("DomainName"));
    }

    #[test]
    fn certificate_outside_us_east_1_is_rejected() {
        let mut params = params();
        params.domain_name = Some("app.example.com".to_string());
        params.certificate_arn = Some("arn:aws:acm:eu-west-1:123:certificate/abc".to_string());
        assert!(params.validate().is_err());
    }

    #[test]
    fn extra_cannot_shadow_named_parameters() {
        let mut params = params();
        params
            .extra
            .insert("BucketName".to_string(), "other".to_string());
        assert!(params.validate().is_err());
    }

    #[test]
    fn unset_optionals_are_omitted() {
        let keys: Vec<_> = params()
            .to_parameters()
            .into_iter()
            .map(|p| p.key)
            .collect();
        assert_eq!(keys, ["Environment", "BucketName", "PriceClass"]);
    }
}
