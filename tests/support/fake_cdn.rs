// ABOUTME: In-memory CDN with ETag-style concurrency tokens.
// ABOUTME: Can simulate concurrent edits, failing invalidations, and multi-origin configs.

use async_trait::async_trait;
use edgeship::provider::{
    CdnError, CdnOps, ConcurrencyToken, DistributionSummary, OriginRouting, OriginTarget, Tagged,
};
use edgeship::types::{DistributionId, InvalidationId};
use parking_lot::Mutex;

/// Distribution config reduced to what the cutover touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleConfig {
    pub origins: Vec<OriginTarget>,
    pub default_target: Option<String>,
    pub default_root_object: String,
    /// Stands in for every field the cutover must leave alone.
    pub comment: String,
}

impl SimpleConfig {
    pub fn single(origin: OriginTarget) -> Self {
        Self {
            default_target: Some(origin.id.clone()),
            origins: vec![origin],
            default_root_object: String::new(),
            comment: "managed by stack".to_string(),
        }
    }
}

impl OriginRouting for SimpleConfig {
    fn origin_targets(&self) -> Vec<OriginTarget> {
        self.origins.clone()
    }

    fn set_default_root_object(&mut self, object: &str) {
        self.default_root_object = object.to_string();
    }

    fn replace_single_origin(&mut self, origin: &OriginTarget) {
        self.origins = vec![origin.clone()];
        self.default_target = Some(origin.id.clone());
    }
}

pub struct FakeCdn {
    config: Mutex<SimpleConfig>,
    etag: Mutex<u64>,
    /// Updates that will see a concurrent edit first.
    conflicts: Mutex<u32>,
    fail_invalidation: Mutex<bool>,
    invalidations: Mutex<Vec<Vec<String>>>,
    updates: Mutex<u32>,
    config_fetches: Mutex<u32>,
}

impl FakeCdn {
    pub fn new(config: SimpleConfig) -> Self {
        Self {
            config: Mutex::new(config),
            etag: Mutex::new(1),
            conflicts: Mutex::new(0),
            fail_invalidation: Mutex::new(false),
            invalidations: Mutex::new(Vec::new()),
            updates: Mutex::new(0),
            config_fetches: Mutex::new(0),
        }
    }

    /// Distribution currently serving `/v{version}` from `bucket`.
    pub fn serving(bucket: &str, version: &str) -> Self {
        Self::new(SimpleConfig::single(OriginTarget {
            id: format!("{bucket}-v{version}"),
            domain_name: format!("{bucket}.s3.us-east-1.amazonaws.com"),
            origin_path: format!("/v{version}"),
        }))
    }

    pub fn conflict_times(&self, times: u32) {
        *self.conflicts.lock() = times;
    }

    pub fn fail_invalidations(&self) {
        *self.fail_invalidation.lock() = true;
    }

    pub fn config(&self) -> SimpleConfig {
        self.config.lock().clone()
    }

    pub fn invalidations(&self) -> Vec<Vec<String>> {
        self.invalidations.lock().clone()
    }

    pub fn update_count(&self) -> u32 {
        *self.updates.lock()
    }

    pub fn config_fetches(&self) -> u32 {
        *self.config_fetches.lock()
    }

    fn token(&self) -> ConcurrencyToken {
        ConcurrencyToken::new(format!("E{}", *self.etag.lock()))
    }
}

#[async_trait]
impl CdnOps for FakeCdn {
    type Config = SimpleConfig;

    async fn get_distribution_config(
        &self,
        _id: &DistributionId,
    ) -> Result<Tagged<SimpleConfig>, CdnError> {
        *self.config_fetches.lock() += 1;
        Ok(Tagged {
            config: self.config(),
            token: self.token(),
        })
    }

    async fn update_distribution(
        &self,
        _id: &DistributionId,
        config: SimpleConfig,
        token: &ConcurrencyToken,
    ) -> Result<ConcurrencyToken, CdnError> {
        {
            let mut conflicts = self.conflicts.lock();
            if *conflicts > 0 {
                // Someone else edited the distribution after our fetch.
                *conflicts -= 1;
                *self.etag.lock() += 1;
                self.config.lock().comment = "edited concurrently".to_string();
            }
        }

        if *token != self.token() {
            return Err(CdnError::PreconditionFailed(format!(
                "If-Match {} does not match",
                token
            )));
        }

        *self.updates.lock() += 1;
        *self.config.lock() = config;
        *self.etag.lock() += 1;
        Ok(self.token())
    }

    async fn create_invalidation(
        &self,
        _id: &DistributionId,
        paths: &[String],
    ) -> Result<InvalidationId, CdnError> {
        if *self.fail_invalidation.lock() {
            return Err(CdnError::Unavailable("TooManyInvalidationsInProgress".to_string()));
        }
        let mut invalidations = self.invalidations.lock();
        invalidations.push(paths.to_vec());
        Ok(InvalidationId::new(format!("I{}", invalidations.len())))
    }

    async fn get_distribution(&self, id: &DistributionId) -> Result<DistributionSummary, CdnError> {
        Ok(DistributionSummary {
            id: id.clone(),
            domain_name: "d111111abcdef8.cloudfront.net".to_string(),
            aliases: vec![],
            status: "Deployed".to_string(),
            origins: self.config().origins,
        })
    }
}
