//! Shared fixtures for handler tests.

use std::sync::Arc;
use std::time::Duration;

use crate::adapters::memory::InMemoryStore;
use crate::adapters::pricing::StaticPriceTable;
use crate::adapters::provisioner::SimulatedProvisioner;
use crate::application::services::{CostEstimator, Notifier, ProvisioningDispatcher};
use crate::domain::budget::Budget;
use crate::domain::catalog::{ServiceCatalog, ServiceConfig, ServiceKind, ServiceType};
use crate::domain::directory::{Account, Group, Manager};
use crate::domain::foundation::{
    AuthError, CommandMetadata, GroupId, Money, Role, UnitPrice, Username,
};
use crate::ports::{AccountRepository, BudgetRepository, GroupRepository, PasswordHasher};

pub const MANAGER: &str = "morgan";
pub const MEMBER: &str = "alice";

pub fn username(name: &str) -> Username {
    Username::new(name).unwrap()
}

pub fn as_user(name: &str) -> CommandMetadata {
    CommandMetadata::new(username(name), Role::User).with_source("test")
}

pub fn as_manager(name: &str) -> CommandMetadata {
    CommandMetadata::new(username(name), Role::Manager).with_source("test")
}

pub fn as_admin() -> CommandMetadata {
    CommandMetadata::new(username("root"), Role::Admin).with_source("test")
}

/// An `m5.large`-sized EC2 request.
pub fn ec2(name: &str) -> ServiceConfig {
    ServiceConfig::Ec2 {
        instance_name: name.to_string(),
        instance_type: "m5.large".to_string(),
        ami_id: "ami-0abc".to_string(),
        key_name: None,
        subnet_id: None,
        security_group_id: None,
    }
}

pub fn vpc(name: &str) -> ServiceConfig {
    ServiceConfig::Vpc {
        name: name.to_string(),
        cidr_block: "10.0.0.0/16".to_string(),
        region: "us-east-1".to_string(),
    }
}

/// Store, simulated cloud and a price table where EC2 costs $0.10/hour,
/// i.e. $216.00 per estimate.
pub struct World {
    pub store: Arc<InMemoryStore>,
    pub cloud: Arc<SimulatedProvisioner>,
    pub group_id: GroupId,
}

impl World {
    /// Manager `morgan` owning group `research` with member `alice` and
    /// the given budget.
    pub async fn with_budget(total: Money) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let manager = username(MANAGER);
        store
            .save_manager(
                &Manager::new(manager.clone(), 3).unwrap(),
                &Account::new(manager.clone(), "hash".to_string(), Role::Manager),
            )
            .await
            .unwrap();
        store
            .save_account(&Account::new(username(MEMBER), "hash".to_string(), Role::User))
            .await
            .unwrap();

        let group = Group::new(manager, "research").unwrap();
        GroupRepository::create(store.as_ref(), &group, 3)
            .await
            .unwrap();
        store.add_member(group.id(), &username(MEMBER)).await.unwrap();
        store
            .allocate(&Budget::allocate(*group.id(), total))
            .await
            .unwrap();

        Self {
            store,
            cloud: Arc::new(SimulatedProvisioner::new()),
            group_id: *group.id(),
        }
    }

    pub fn estimator(&self) -> Arc<CostEstimator> {
        let prices = StaticPriceTable::empty().with_price(
            ServiceKind::of(ServiceType::Ec2),
            UnitPrice::from_micros(100_000),
        );
        Arc::new(CostEstimator::new(
            Arc::new(ServiceCatalog::standard()),
            Arc::new(prices),
        ))
    }

    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.store.clone(), self.store.clone())
    }

    pub fn dispatcher(&self) -> Arc<ProvisioningDispatcher> {
        Arc::new(ProvisioningDispatcher::new(
            self.cloud.clone(),
            Duration::from_secs(1),
        ))
    }
}

/// Reversible stand-in for argon2, fast enough for handler tests.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}
