//! Assembles the REST API from the per-area routers.
//!
//! ```text
//! /health                      liveness, public
//! /api/auth/login              public
//! /api/admin/...               admin
//! /api/users, /api/groups/...  manager
//! /api/sessions/...            user
//! /api/services/..., /api/catalog/...  any authenticated role
//! /api/notifications           manager
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware::from_fn_with_state, routing::get, Json, Router};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::accounts::{account_routes, AccountHandlers};
use super::catalog::{catalog_routes, CatalogHandlers};
use super::groups::{group_routes, GroupHandlers};
use super::middleware::auth_middleware;
use super::notifications::{notification_routes, NotificationHandlers};
use super::services::{service_routes, ServiceHandlers};
use super::sessions::{session_routes, SessionHandlers};
use crate::application::handlers::accounts::{
    CreateManagerHandler, CreateUserHandler, DeleteManagerHandler, DeleteUserHandler,
    LoginHandler,
};
use crate::application::handlers::budget::{
    AllocateBudgetHandler, GetBudgetHandler, ReviseBudgetHandler,
};
use crate::application::handlers::catalog::ListCatalogHandler;
use crate::application::handlers::directory::{
    AddMemberHandler, CreateGroupHandler, DeleteGroupHandler, GetMembershipHandler,
    ListGroupsHandler, RemoveMemberHandler,
};
use crate::application::handlers::notifications::ListNotificationsHandler;
use crate::application::handlers::provisioning::{
    AbandonSessionHandler, EvaluateCostHandler, FinalizeSessionHandler, GetSessionHandler,
    ProvisionSessionHandler, SelectServiceHandler, StartSessionHandler,
};
use crate::application::handlers::services::{
    DeleteServiceHandler, ListServicesHandler, UsageReportHandler,
};
use crate::application::{CostEstimator, Notifier, ProvisioningDispatcher};
use crate::config::ServerConfig;
use crate::domain::budget::BudgetAlertPolicy;
use crate::domain::catalog::ServiceCatalog;
use crate::ports::{
    AccountRepository, BudgetRepository, FinalizeCommitter, GroupRepository, NotificationReader,
    NotificationSink, PasswordHasher, PricingOracle, Provisioner, ServiceRecordRepository,
    SessionRepository, TokenIssuer, TokenValidator,
};

/// Every port the API needs, already bound to adapters.
#[derive(Clone)]
pub struct ApiContext {
    pub accounts: Arc<dyn AccountRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub budgets: Arc<dyn BudgetRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub records: Arc<dyn ServiceRecordRepository>,
    pub committer: Arc<dyn FinalizeCommitter>,
    pub notification_sink: Arc<dyn NotificationSink>,
    pub notification_reader: Arc<dyn NotificationReader>,
    pub provisioner: Arc<dyn Provisioner>,
    pub pricing: Arc<dyn PricingOracle>,
    pub catalog: Arc<ServiceCatalog>,
    pub token_issuer: Arc<dyn TokenIssuer>,
    pub token_validator: Arc<dyn TokenValidator>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub dispatch_timeout: Duration,
    pub alert_policy: BudgetAlertPolicy,
}

impl ApiContext {
    fn account_handlers(&self) -> AccountHandlers {
        AccountHandlers::new(
            Arc::new(LoginHandler::new(
                self.accounts.clone(),
                self.hasher.clone(),
                self.token_issuer.clone(),
            )),
            Arc::new(CreateManagerHandler::new(self.accounts.clone(), self.hasher.clone())),
            Arc::new(DeleteManagerHandler::new(self.accounts.clone())),
            Arc::new(CreateUserHandler::new(self.accounts.clone(), self.hasher.clone())),
            Arc::new(DeleteUserHandler::new(self.accounts.clone())),
        )
    }

    fn group_handlers(&self) -> GroupHandlers {
        GroupHandlers {
            create_group: Arc::new(CreateGroupHandler::new(self.accounts.clone(), self.groups.clone())),
            list_groups: Arc::new(ListGroupsHandler::new(self.groups.clone(), self.budgets.clone())),
            delete_group: Arc::new(DeleteGroupHandler::new(self.groups.clone(), self.records.clone())),
            add_member: Arc::new(AddMemberHandler::new(self.accounts.clone(), self.groups.clone())),
            remove_member: Arc::new(RemoveMemberHandler::new(self.groups.clone())),
            get_membership: Arc::new(GetMembershipHandler::new(self.groups.clone())),
            allocate_budget: Arc::new(AllocateBudgetHandler::new(self.groups.clone(), self.budgets.clone())),
            revise_budget: Arc::new(ReviseBudgetHandler::new(self.groups.clone(), self.budgets.clone())),
            get_budget: Arc::new(GetBudgetHandler::new(self.groups.clone(), self.budgets.clone())),
        }
    }

    fn notifier(&self) -> Notifier {
        Notifier::new(self.notification_sink.clone(), self.groups.clone())
    }

    fn dispatcher(&self) -> Arc<ProvisioningDispatcher> {
        Arc::new(ProvisioningDispatcher::new(
            self.provisioner.clone(),
            self.dispatch_timeout,
        ))
    }

    fn session_handlers(&self, dispatcher: Arc<ProvisioningDispatcher>) -> SessionHandlers {
        let estimator = Arc::new(CostEstimator::new(self.catalog.clone(), self.pricing.clone()));
        let finalize = Arc::new(FinalizeSessionHandler::new(
            self.sessions.clone(),
            self.records.clone(),
            self.committer.clone(),
            self.notifier(),
            self.alert_policy,
        ));
        SessionHandlers {
            start_session: Arc::new(StartSessionHandler::new(self.groups.clone(), self.sessions.clone())),
            get_session: Arc::new(GetSessionHandler::new(self.sessions.clone())),
            select_service: Arc::new(SelectServiceHandler::new(self.sessions.clone())),
            evaluate_cost: Arc::new(EvaluateCostHandler::new(
                self.sessions.clone(),
                self.budgets.clone(),
                estimator,
                self.notifier(),
            )),
            provision_session: Arc::new(ProvisionSessionHandler::new(
                self.sessions.clone(),
                dispatcher,
                finalize.clone(),
            )),
            finalize_session: finalize,
            abandon_session: Arc::new(AbandonSessionHandler::new(self.sessions.clone())),
        }
    }

    fn service_handlers(&self, dispatcher: Arc<ProvisioningDispatcher>) -> ServiceHandlers {
        ServiceHandlers {
            list_services: Arc::new(ListServicesHandler::new(self.records.clone(), self.groups.clone())),
            usage_report: Arc::new(UsageReportHandler::new(self.records.clone(), self.groups.clone())),
            delete_service: Arc::new(DeleteServiceHandler::new(
                self.records.clone(),
                self.groups.clone(),
                dispatcher,
                self.notifier(),
            )),
        }
    }

    /// Builds the `/api` router without server-level layers.
    pub fn api_routes(&self) -> Router {
        let dispatcher = self.dispatcher();
        Router::new()
            .merge(account_routes(self.account_handlers()))
            .merge(group_routes(self.group_handlers()))
            .merge(session_routes(self.session_handlers(dispatcher.clone())))
            .merge(service_routes(self.service_handlers(dispatcher)))
            .merge(catalog_routes(CatalogHandlers {
                list_catalog: Arc::new(ListCatalogHandler::new(
                    self.catalog.clone(),
                    self.pricing.clone(),
                )),
            }))
            .merge(notification_routes(NotificationHandlers {
                list_notifications: Arc::new(ListNotificationsHandler::new(
                    self.notification_reader.clone(),
                )),
            }))
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.cors_origins_list();
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    }
    let origins: Vec<http::HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// The complete application: `/health`, `/api/...`, authentication,
/// tracing, CORS and the request timeout.
pub fn app_router(context: &ApiContext, server: &ServerConfig) -> Router {
    Router::new()
        .nest("/api", context.api_routes())
        .route("/health", get(health))
        .layer(from_fn_with_state(
            context.token_validator.clone(),
            auth_middleware,
        ))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}
