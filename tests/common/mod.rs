//! Shared harness: the full router over the in-memory store and the
//! simulated cloud, driven with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use cloud_steward::adapters::auth::JwtAuthenticator;
use cloud_steward::adapters::http::{app_router, ApiContext};
use cloud_steward::adapters::memory::InMemoryStore;
use cloud_steward::adapters::pricing::StaticPriceTable;
use cloud_steward::adapters::provisioner::SimulatedProvisioner;
use cloud_steward::application::handlers::accounts::BootstrapAdminHandler;
use cloud_steward::config::ServerConfig;
use cloud_steward::domain::budget::BudgetAlertPolicy;
use cloud_steward::domain::catalog::{ServiceCatalog, ServiceKind, ServiceType};
use cloud_steward::domain::foundation::{AuthError, UnitPrice, Username};
use cloud_steward::ports::PasswordHasher;

pub const ADMIN: &str = "root";
pub const MANAGER: &str = "morgan";
pub const MEMBER: &str = "alice";
pub const PASSWORD: &str = "correct-horse";

/// Reversible stand-in for argon2 so account setup stays fast.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub cloud: Arc<SimulatedProvisioner>,
}

impl TestApp {
    /// EC2 priced at $0.10/hour, i.e. $216.00 per estimate. Everything
    /// else is unpriced. Administrator `root` exists.
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let cloud = Arc::new(SimulatedProvisioner::new());
        let hasher: Arc<dyn PasswordHasher> = Arc::new(PlainHasher);
        let authenticator = Arc::new(JwtAuthenticator::new(
            &SecretString::new("integration-test-signing-key-0123456789".to_string()),
            "cloud-steward",
            3600,
        ));
        let prices = StaticPriceTable::empty().with_price(
            ServiceKind::of(ServiceType::Ec2),
            UnitPrice::from_micros(100_000),
        );

        let context = ApiContext {
            accounts: store.clone(),
            groups: store.clone(),
            budgets: store.clone(),
            sessions: store.clone(),
            records: store.clone(),
            committer: store.clone(),
            notification_sink: store.clone(),
            notification_reader: store.clone(),
            provisioner: cloud.clone(),
            pricing: Arc::new(prices),
            catalog: Arc::new(ServiceCatalog::standard()),
            token_issuer: authenticator.clone(),
            token_validator: authenticator,
            hasher: hasher.clone(),
            dispatch_timeout: Duration::from_secs(2),
            alert_policy: BudgetAlertPolicy::default(),
        };

        BootstrapAdminHandler::new(store.clone(), hasher)
            .handle(
                Username::new(ADMIN).unwrap(),
                &SecretString::new(PASSWORD.to_string()),
            )
            .await
            .unwrap();

        Self {
            router: app_router(&context, &ServerConfig::default()),
            store,
            cloud,
        }
    }

    /// Sends a request and returns the status and JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn login(&self, username: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }
}

/// A manager with one group, one member, and a budget.
pub struct Seeded {
    pub app: TestApp,
    pub admin: String,
    pub manager: String,
    pub member: String,
    pub group_id: String,
}

impl Seeded {
    pub async fn with_budget_cents(total_cents: u64) -> Self {
        let app = TestApp::new().await;
        let admin = app.login(ADMIN).await;

        let (status, _) = app
            .send(
                Method::POST,
                "/api/admin/managers",
                Some(&admin),
                Some(json!({ "username": MANAGER, "password": PASSWORD, "group_limit": 2 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let manager = app.login(MANAGER).await;

        let (status, _) = app
            .send(
                Method::POST,
                "/api/users",
                Some(&manager),
                Some(json!({ "username": MEMBER, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let member = app.login(MEMBER).await;

        let (status, group) = app
            .send(
                Method::POST,
                "/api/groups",
                Some(&manager),
                Some(json!({ "name": "research" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let group_id = group["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .send(
                Method::POST,
                &format!("/api/groups/{}/members", group_id),
                Some(&manager),
                Some(json!({ "username": MEMBER })),
            )
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app
            .send(
                Method::POST,
                &format!("/api/groups/{}/budget", group_id),
                Some(&manager),
                Some(json!({ "total_cents": total_cents })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        Self {
            app,
            admin,
            manager,
            member,
            group_id,
        }
    }

    /// Opens an AWS session for the member and selects `config`.
    pub async fn configured_session(&self, config: Value) -> String {
        let (status, session) = self
            .app
            .send(
                Method::POST,
                "/api/sessions",
                Some(&self.member),
                Some(json!({ "provider": "aws" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = session["id"].as_str().unwrap().to_string();

        let (status, body) = self
            .app
            .send(
                Method::PUT,
                &format!("/api/sessions/{}/service", id),
                Some(&self.member),
                Some(config),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "select failed: {}", body);
        id
    }
}

pub fn ec2(name: &str) -> Value {
    json!({
        "service_type": "ec2",
        "instance_name": name,
        "instance_type": "m5.large",
        "ami_id": "ami-0abc"
    })
}

pub fn vpc(name: &str) -> Value {
    json!({
        "service_type": "vpc",
        "name": name,
        "cidr_block": "10.0.0.0/16",
        "region": "us-east-1"
    })
}
