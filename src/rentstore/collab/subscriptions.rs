use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Basic,
    Standard,
    Premium,
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionTier::Basic => f.write_str("basic"),
            SubscriptionTier::Standard => f.write_str("standard"),
            SubscriptionTier::Premium => f.write_str("premium"),
        }
    }
}

/// How many copies each tier may hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub basic: u32,
    pub standard: u32,
    pub premium: u32,
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            basic: 1,
            standard: 3,
            premium: 5,
        }
    }
}

impl TierLimits {
    pub fn get(&self, tier: SubscriptionTier) -> u32 {
        match tier {
            SubscriptionTier::Basic => self.basic,
            SubscriptionTier::Standard => self.standard,
            SubscriptionTier::Premium => self.premium,
        }
    }
}

pub trait SubscriptionService {
    /// Maximum number of simultaneous rentals for a tier.
    fn limit_for(&self, tier: SubscriptionTier) -> u32;

    /// The renter's tier, `None` when they have no subscription.
    fn subscriber(&self, renter_id: &str) -> Result<Option<SubscriptionTier>, StoreError>;

    fn is_valid_subscriber(&self, renter_id: &str) -> Result<bool, StoreError> {
        Ok(self.subscriber(renter_id)?.is_some())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SubscriptionRecord {
    tier: SubscriptionTier,
}

/// Subscribers kept in a JSON object keyed by renter id:
///
/// ```json
/// { "bigi": { "tier": "premium" }, "anna": { "tier": "basic" } }
/// ```
pub struct JsonSubscriptions {
    path: PathBuf,
    limits: TierLimits,
}

impl JsonSubscriptions {
    pub fn new(path: PathBuf, limits: TierLimits) -> Self {
        Self { path, limits }
    }

    fn load(&self) -> Result<HashMap<String, SubscriptionRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Register or change a subscriber.
    pub fn set(&self, renter_id: &str, tier: SubscriptionTier) -> Result<(), StoreError> {
        let mut all = self.load()?;
        all.insert(renter_id.to_string(), SubscriptionRecord { tier });
        super::write_json_atomic(&self.path, &all)
    }
}

impl SubscriptionService for JsonSubscriptions {
    fn limit_for(&self, tier: SubscriptionTier) -> u32 {
        self.limits.get(tier)
    }

    fn subscriber(&self, renter_id: &str) -> Result<Option<SubscriptionTier>, StoreError> {
        Ok(self.load()?.get(renter_id).map(|rec| rec.tier))
    }
}

/// Fixed subscriber list for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSubscriptions {
    subscribers: HashMap<String, SubscriptionTier>,
    limits: TierLimits,
}

impl StaticSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subscriber(mut self, renter_id: &str, tier: SubscriptionTier) -> Self {
        self.subscribers.insert(renter_id.to_string(), tier);
        self
    }

    pub fn with_limits(mut self, limits: TierLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl SubscriptionService for StaticSubscriptions {
    fn limit_for(&self, tier: SubscriptionTier) -> u32 {
        self.limits.get(tier)
    }

    fn subscriber(&self, renter_id: &str) -> Result<Option<SubscriptionTier>, StoreError> {
        Ok(self.subscribers.get(renter_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn json_subscriptions_read_tiers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subscriptions.json");
        fs::write(&path, r#"{"bigi": {"tier": "premium"}, "anna": {"tier": "basic"}}"#).unwrap();

        let subs = JsonSubscriptions::new(path, TierLimits::default());
        assert_eq!(subs.subscriber("bigi").unwrap(), Some(SubscriptionTier::Premium));
        assert!(subs.is_valid_subscriber("anna").unwrap());
        assert!(!subs.is_valid_subscriber("zed").unwrap());
        assert_eq!(subs.limit_for(SubscriptionTier::Premium), 5);
    }

    #[test]
    fn missing_file_means_no_subscribers() {
        let dir = TempDir::new().unwrap();
        let subs = JsonSubscriptions::new(dir.path().join("none.json"), TierLimits::default());
        assert_eq!(subs.subscriber("bigi").unwrap(), None);
    }

    #[test]
    fn set_persists_subscriber() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subscriptions.json");
        let subs = JsonSubscriptions::new(path.clone(), TierLimits::default());
        subs.set("anna", SubscriptionTier::Standard).unwrap();

        let reread = JsonSubscriptions::new(path, TierLimits::default());
        assert_eq!(reread.subscriber("anna").unwrap(), Some(SubscriptionTier::Standard));
    }

    #[test]
    fn custom_limits() {
        let subs = StaticSubscriptions::new().with_limits(TierLimits {
            basic: 2,
            standard: 4,
            premium: 8,
        });
        assert_eq!(subs.limit_for(SubscriptionTier::Basic), 2);
    }
}
