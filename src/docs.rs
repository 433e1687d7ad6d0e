use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::dashboard::model::{
    BillingCard, ClassPlacement, ExamCard, ExamReservation, GuideCard, HomeworkCard, NoticeCard,
    PlacementCard, ProgressCard, StudentDashboard,
};
use crate::modules::events::model::{FlowEvent, TriggerEventDto, TriggerEventResponse};
use crate::modules::flows::model::{FlowDefinition, FlowRecord, Step};
use crate::modules::progress::model::{
    EnrollmentProgress, InitFlowDto, InitFlowResponse, ProgressDetailResponse, ProgressStatus,
    ProgressSummary,
};
use crate::modules::rbac::model::{
    AdminRole, Branch, InitResponse, Permission, SetBranchesDto, SetBranchesResponse,
    SetPermissionDto, SetPermissionResponse,
};
use crate::modules::students::model::{Student, StudentListParams, StudentListResponse};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::events::controller::trigger_flow_event,
        crate::modules::flows::controller::get_flow,
        crate::modules::flows::controller::init_flows,
        crate::modules::progress::controller::get_student_progress,
        crate::modules::progress::controller::init_student_flow,
        crate::modules::dashboard::controller::get_student_dashboard,
        crate::modules::students::controller::list_students,
        crate::modules::rbac::controller::init_rbac,
        crate::modules::rbac::controller::set_admin_branches,
        crate::modules::rbac::controller::set_admin_permission,
    ),
    components(
        schemas(
            Branch,
            AdminRole,
            Permission,
            SetBranchesDto,
            SetBranchesResponse,
            SetPermissionDto,
            SetPermissionResponse,
            InitResponse,
            FlowRecord,
            Step,
            FlowDefinition,
            EnrollmentProgress,
            ProgressStatus,
            ProgressSummary,
            InitFlowDto,
            InitFlowResponse,
            ProgressDetailResponse,
            FlowEvent,
            TriggerEventDto,
            TriggerEventResponse,
            Student,
            StudentListParams,
            StudentListResponse,
            StudentDashboard,
            ProgressCard,
            ExamCard,
            ExamReservation,
            PlacementCard,
            ClassPlacement,
            BillingCard,
            HomeworkCard,
            NoticeCard,
            GuideCard,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Enrollment", description = "Enrollment flow progress and event processing"),
        (name = "Flows", description = "Flow catalog definitions"),
        (name = "Students", description = "Branch-filtered student listings"),
        (name = "Dashboard", description = "Per-student dashboard aggregation"),
        (name = "Admin", description = "Bootstrap and permission management endpoints")
    ),
    info(
        title = "Frage EDU API",
        version = "0.1.0",
        description = "Enrollment flow state machine and branch-scoped access control for a school administration backend.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
