//! First-start bootstrap of the baseline group, administrator, catalog and roles
//!
//! Seeding is best-effort: every step is idempotent, a failing step is logged
//! and recorded in the [`SeedReport`], and later steps still run. Each step
//! looks up what it depends on by its well-known name, so a step whose
//! prerequisite failed is reported as skipped rather than aborting the run.

pub mod defaults;

use crate::{
    error::Result,
    models::*,
    service::AuthzService,
};
use auth_identity::{CredentialHasher, NewUser};
use defaults::*;
use serde::Serialize;
use std::fmt;
use tokio::sync::OnceCell;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStep {
    RootGroup,
    AdminUser,
    AdminGroupMembership,
    OperationCatalog,
    DefaultRoles,
    AdminBundle,
}

impl fmt::Display for SeedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SeedStep::RootGroup => "root_group",
            SeedStep::AdminUser => "admin_user",
            SeedStep::AdminGroupMembership => "admin_group_membership",
            SeedStep::OperationCatalog => "operation_catalog",
            SeedStep::DefaultRoles => "default_roles",
            SeedStep::AdminBundle => "admin_bundle",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    /// A prerequisite record was missing
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: SeedStep,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Outcome of one bootstrap run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub steps: Vec<StepReport>,
}

impl SeedReport {
    pub fn is_complete(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Completed)
    }

    pub fn status_of(&self, step: SeedStep) -> Option<&StepStatus> {
        self.steps.iter().find(|s| s.step == step).map(|s| &s.status)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps
            .iter()
            .filter(|s| !matches!(s.status, StepStatus::Completed))
    }

    fn record(&mut self, step: SeedStep, outcome: Result<StepStatus>) {
        let status = match outcome {
            Ok(status) => status,
            Err(e) => StepStatus::Failed(e.to_string()),
        };
        match &status {
            StepStatus::Completed => info!(%step, "Seed step completed"),
            StepStatus::Skipped(reason) => warn!(%step, reason = %reason, "Seed step skipped"),
            StepStatus::Failed(error) => warn!(%step, error = %error, "Seed step failed"),
        }
        self.steps.push(StepReport { step, status });
    }
}

/// Runs the seed at most once per instance; later calls return the first report.
pub struct SeedBootstrapper {
    service: AuthzService,
    hasher: CredentialHasher,
    report: OnceCell<SeedReport>,
}

impl SeedBootstrapper {
    pub fn new(service: AuthzService, hasher: CredentialHasher) -> Self {
        Self {
            service,
            hasher,
            report: OnceCell::new(),
        }
    }

    pub async fn run(&self) -> &SeedReport {
        self.report.get_or_init(|| self.seed()).await
    }

    async fn seed(&self) -> SeedReport {
        info!("Seeding baseline authorization records");
        let mut report = SeedReport::default();

        report.record(SeedStep::RootGroup, self.ensure_root_group().await);
        report.record(SeedStep::AdminUser, self.ensure_admin_user().await);
        report.record(SeedStep::AdminGroupMembership, self.ensure_admin_membership().await);
        report.record(SeedStep::OperationCatalog, self.register_default_catalog().await);
        report.record(SeedStep::DefaultRoles, self.ensure_default_roles().await);
        report.record(SeedStep::AdminBundle, self.ensure_admin_bundle().await);

        if report.is_complete() {
            info!("Seeding finished");
        } else {
            warn!(incomplete = report.failures().count(), "Seeding finished with incomplete steps");
        }
        report
    }

    // =============================================================================
    // Steps
    // =============================================================================

    async fn ensure_root_group(&self) -> Result<StepStatus> {
        self.service
            .groups()
            .create_group(ROOT_GROUP, ROOT_PARENT_ID, ROOT_GROUP_LEVEL, ROOT_GROUP_DESCRIPTION)
            .await?;
        Ok(StepStatus::Completed)
    }

    /// The password is hashed only when the account has to be created.
    async fn ensure_admin_user(&self) -> Result<StepStatus> {
        let store = self.service.store();
        if store.find_user_by_name(ADMIN_USER).await?.is_some() {
            return Ok(StepStatus::Completed);
        }

        let password_hash = self.hasher.hash_password(ADMIN_DEFAULT_PASSWORD)?;
        let user = store
            .insert_user_if_absent(NewUser {
                username: ADMIN_USER.to_string(),
                display_name: ADMIN_USER.to_string(),
                token: self.hasher.generate_token(),
                password_hash,
            })
            .await?;
        info!(user_id = user.id, username = ADMIN_USER, "Administrator account created");
        Ok(StepStatus::Completed)
    }

    async fn ensure_admin_membership(&self) -> Result<StepStatus> {
        let Some(group) = self.root_group().await? else {
            return Ok(missing("root group"));
        };
        let Some(admin) = self.service.store().find_user_by_name(ADMIN_USER).await? else {
            return Ok(missing("administrator user"));
        };

        self.service.groups().add_member(group.id, admin.id).await?;
        Ok(StepStatus::Completed)
    }

    /// Registers the wildcard and every default pair; one bad pair does not
    /// stop the rest.
    async fn register_default_catalog(&self) -> Result<StepStatus> {
        let catalog = self.service.catalog();
        let mut failed = Vec::new();

        if let Err(e) = catalog.wildcard().await {
            warn!(error = %e, "Failed to register the wildcard operation");
            failed.push(format!("{}:{}", WILDCARD, WILDCARD));
        }
        for (resource_type, operation_name) in DEFAULT_OPERATIONS {
            if let Err(e) = catalog.register(resource_type, operation_name).await {
                warn!(resource_type, operation_name, error = %e, "Failed to register operation");
                failed.push(format!("{}:{}", resource_type, operation_name));
            }
        }

        if failed.is_empty() {
            Ok(StepStatus::Completed)
        } else {
            Ok(StepStatus::Failed(format!("unregistered operations: {}", failed.join(", "))))
        }
    }

    /// Creates the three default roles. Roles that already exist keep their
    /// current operation sets.
    async fn ensure_default_roles(&self) -> Result<StepStatus> {
        let Some(group) = self.root_group().await? else {
            return Ok(missing("root group"));
        };
        let catalog = self.service.catalog();
        let mut failed = Vec::new();

        let admin_ops = catalog.lookup(WILDCARD, WILDCARD).await.map(|id| vec![id]);
        let dev_admin_ops = catalog
            .lookup_by_categories(&to_strings(DEV_ADMIN_CATEGORIES))
            .await
            .map(ids);
        let member_ops = catalog
            .lookup_by_names(&to_strings(MEMBER_OPERATIONS))
            .await
            .map(ids);

        let definitions = [
            (ADMIN_ROLE, "Super administrator", admin_ops),
            (MEMBER_ROLE, "Ordinary member", member_ops),
            (DEV_ADMIN_ROLE, "Project administrator", dev_admin_ops),
        ];

        for (name, description, operations) in definitions {
            let created = match operations {
                Ok(operations) => {
                    self.service
                        .roles()
                        .create_role(group.id, name, description, operations)
                        .await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = created {
                warn!(role = name, error = %e, "Failed to create default role");
                failed.push(name);
            }
        }

        if failed.is_empty() {
            Ok(StepStatus::Completed)
        } else {
            Ok(StepStatus::Failed(format!("roles not created: {}", failed.join(", "))))
        }
    }

    async fn ensure_admin_bundle(&self) -> Result<StepStatus> {
        let Some(group) = self.root_group().await? else {
            return Ok(missing("root group"));
        };
        let Some(role) = self.service.roles().find(group.id, ADMIN_ROLE).await? else {
            return Ok(missing("admin role"));
        };

        self.service
            .bundles()
            .bundle(group.id, role.id, &[ADMIN_USER.to_string()])
            .await?;
        Ok(StepStatus::Completed)
    }

    async fn root_group(&self) -> Result<Option<Group>> {
        self.service.groups().find(ROOT_GROUP, ROOT_PARENT_ID).await
    }
}

fn missing(what: &str) -> StepStatus {
    StepStatus::Skipped(format!("{} is missing", what))
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn ids(operations: Vec<Operation>) -> Vec<i64> {
    operations.into_iter().map(|op| op.id).collect()
}
