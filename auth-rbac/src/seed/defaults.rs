//! Baseline records created on first start.
//!
//! These values are part of the external contract: deployments and clients
//! refer to them by name, so they must not change.

/// Root group name
pub const ROOT_GROUP: &str = "system";

/// Level recorded on the root group
pub const ROOT_GROUP_LEVEL: &str = "system";

pub const ROOT_GROUP_DESCRIPTION: &str = "System user group";

pub const ADMIN_USER: &str = "admin";

/// Password hashed into the administrator account when it is first created
pub const ADMIN_DEFAULT_PASSWORD: &str = "123456";

/// Superuser role, holding only the wildcard operation
pub const ADMIN_ROLE: &str = "admin";

/// Project administration role
pub const DEV_ADMIN_ROLE: &str = "devAdmin";

/// Ordinary member role
pub const MEMBER_ROLE: &str = "developer";

/// Every operation in these resource types goes to [`DEV_ADMIN_ROLE`]
pub const DEV_ADMIN_CATEGORIES: &[&str] = &["pipeline", "repository", "project", "publish", "auth"];

/// Operation names granted to [`MEMBER_ROLE`]
pub const MEMBER_OPERATIONS: &[&str] = &[
    "GetCurrentUser",
    // project
    "ProjectList",
    "CreateProject",
    "UpdateProject",
    "GetprojectMemberByConstraint",
    "GetProject",
    "CreateProjectApp",
    "UpdateProjectApp",
    "GetProjectApps",
    "GetProjectApp",
    "GetAppsByPagination",
    "GetProjectAppsByPagination",
    "GetAllApps",
    "GetArrange",
    "SetArrange",
    "GetAppBranches",
    "GetGitProjectsByRepoID",
    "SyncAppBranches",
    "DeleteProjectApp",
    "GetProjectEnvs",
    "GetIntegrateSettings",
    "GetProjectEnvsByPagination",
    "CreateProjectEnv",
    "UpdateProjectEnv",
    "GetCompileEnvs",
    "GetIntegrateClusters",
    "GetProjectPipelinesByPagination",
    // pipeline
    "ProjectPipelineInfo",
    "PipelineCreate",
    "PipelineUpdate",
    "PipelineDelete",
    "FlowStepList",
    // publish
    "GetProjectPipelines",
    "PublishList",
    "CreatePublishOrder",
    "GetPublish",
    "GetJenkinsConfig",
    "ClosePublish",
    "DeletePublish",
    "GetCanAddedApps",
    "AddPublishApp",
    "DeletePublishApp",
    "GetOpertaionLogByPagination",
    "GetBackTo",
    "TriggerBackTo",
    "GetNextStage",
    "TriggerNextStage",
    "GetStepInfo",
    "RunStep",
    "RunStepCallback",
    // app service
    "GetProjectAppServices",
    "GetAppServiceInspect",
    "GetAppServiceLog",
    "GetAppServiceEvent",
    "AppServiceRestart",
    "AppServiceScale",
    "AppServiceTerminal",
];

/// Default operation catalog as (resource type, operation name).
///
/// Covers every name in [`MEMBER_OPERATIONS`] plus the administrative
/// operations only the admin roles receive. The wildcard pair is registered
/// separately.
pub const DEFAULT_OPERATIONS: &[(&str, &str)] = &[
    ("user", "GetCurrentUser"),
    // project
    ("project", "ProjectList"),
    ("project", "CreateProject"),
    ("project", "UpdateProject"),
    ("project", "DeleteProject"),
    ("project", "GetprojectMemberByConstraint"),
    ("project", "AddProjectMember"),
    ("project", "DeleteProjectMember"),
    ("project", "GetProject"),
    ("project", "CreateProjectApp"),
    ("project", "UpdateProjectApp"),
    ("project", "GetProjectApps"),
    ("project", "GetProjectApp"),
    ("project", "GetProjectAppsByPagination"),
    ("project", "GetArrange"),
    ("project", "SetArrange"),
    ("project", "GetAppBranches"),
    ("project", "SyncAppBranches"),
    ("project", "DeleteProjectApp"),
    ("project", "GetProjectEnvs"),
    ("project", "GetProjectEnvsByPagination"),
    ("project", "CreateProjectEnv"),
    ("project", "UpdateProjectEnv"),
    ("project", "DeleteProjectEnv"),
    ("project", "GetCompileEnvs"),
    ("project", "GetProjectPipelinesByPagination"),
    // repository
    ("repository", "GetAllApps"),
    ("repository", "GetAppsByPagination"),
    ("repository", "GetGitProjectsByRepoID"),
    ("repository", "CreateRepository"),
    ("repository", "DeleteRepository"),
    // integrate
    ("integrate", "GetIntegrateSettings"),
    ("integrate", "GetIntegrateClusters"),
    ("integrate", "CreateIntegrateSetting"),
    ("integrate", "UpdateIntegrateSetting"),
    ("integrate", "DeleteIntegrateSetting"),
    // pipeline
    ("pipeline", "ProjectPipelineInfo"),
    ("pipeline", "PipelineCreate"),
    ("pipeline", "PipelineUpdate"),
    ("pipeline", "PipelineDelete"),
    ("pipeline", "FlowStepList"),
    ("pipeline", "FlowStepCreate"),
    ("pipeline", "FlowStepDelete"),
    // publish
    ("publish", "GetProjectPipelines"),
    ("publish", "PublishList"),
    ("publish", "CreatePublishOrder"),
    ("publish", "GetPublish"),
    ("publish", "GetJenkinsConfig"),
    ("publish", "ClosePublish"),
    ("publish", "DeletePublish"),
    ("publish", "GetCanAddedApps"),
    ("publish", "AddPublishApp"),
    ("publish", "DeletePublishApp"),
    ("publish", "GetOpertaionLogByPagination"),
    ("publish", "GetBackTo"),
    ("publish", "TriggerBackTo"),
    ("publish", "GetNextStage"),
    ("publish", "TriggerNextStage"),
    ("publish", "GetStepInfo"),
    ("publish", "RunStep"),
    ("publish", "RunStepCallback"),
    // app service
    ("app-service", "GetProjectAppServices"),
    ("app-service", "GetAppServiceInspect"),
    ("app-service", "GetAppServiceLog"),
    ("app-service", "GetAppServiceEvent"),
    ("app-service", "AppServiceRestart"),
    ("app-service", "AppServiceScale"),
    ("app-service", "AppServiceTerminal"),
    // auth
    ("auth", "UserList"),
    ("auth", "CreateUser"),
    ("auth", "UpdateUser"),
    ("auth", "DeleteUser"),
    ("auth", "GroupRoleList"),
    ("auth", "CreateGroupRole"),
    ("auth", "UpdateGroupRole"),
    ("auth", "DeleteGroupRole"),
    ("auth", "GroupRoleBundling"),
    ("auth", "GroupRoleUnbundling"),
    ("auth", "ResourceOperationList"),
];
