use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::rbac::model::{AdminRole, Branch};
use crate::modules::rbac::{resolver, service as rbac_service};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

use super::model::{Student, StudentListParams, StudentListResponse};

#[instrument(skip(db))]
pub async fn get_student(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
    sqlx::query_as::<_, Student>(
        r#"SELECT id, name, branch, household_token, program_type, status, created_at, updated_at
        FROM students WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found("Student not found"))
}

/// Lists students visible to the given admin.
///
/// The access filter is applied before the caller-supplied branch filter: a
/// requested branch outside the allowed set deterministically returns an
/// empty page, never an error and never a widened query.
#[instrument(skip(db, params))]
pub async fn list_students(
    db: &PgPool,
    admin_id: Uuid,
    role: AdminRole,
    params: StudentListParams,
) -> Result<StudentListResponse, AppError> {
    let allowed_branches = rbac_service::get_allowed_branches(db, admin_id, role).await?;
    let user_permissions = rbac_service::effective_permissions(db, admin_id, role).await?;

    let limit = params.pagination.limit();
    let page = params.pagination.page();
    let offset = params.pagination.offset();

    let scope = resolver::narrow_scope(&allowed_branches, params.branch_filter);

    let Some(branches) = scope else {
        // Requested branch is outside the allowed set.
        return Ok(StudentListResponse {
            data: vec![],
            meta: PaginationMeta {
                total: 0,
                limit,
                page,
                has_more: false,
            },
            allowed_branches,
            user_permissions,
        });
    };

    let branch_strings: Vec<String> = branches.iter().map(|b| b.as_str().to_string()).collect();
    let search_pattern = params
        .search
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(|s| format!("%{}%", s.trim()));

    let (students, total) = match &search_pattern {
        Some(pattern) => {
            let students = sqlx::query_as::<_, Student>(
                r#"SELECT id, name, branch, household_token, program_type, status, created_at, updated_at
                FROM students
                WHERE branch = ANY($1) AND name ILIKE $2
                ORDER BY created_at DESC
                LIMIT $3 OFFSET $4"#,
            )
            .bind(&branch_strings)
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

            let total: i64 = sqlx::query_scalar(
                r#"SELECT COUNT(*) FROM students WHERE branch = ANY($1) AND name ILIKE $2"#,
            )
            .bind(&branch_strings)
            .bind(pattern)
            .fetch_one(db)
            .await?;

            (students, total)
        }
        None => {
            let students = sqlx::query_as::<_, Student>(
                r#"SELECT id, name, branch, household_token, program_type, status, created_at, updated_at
                FROM students
                WHERE branch = ANY($1)
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3"#,
            )
            .bind(&branch_strings)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await?;

            let total: i64 =
                sqlx::query_scalar(r#"SELECT COUNT(*) FROM students WHERE branch = ANY($1)"#)
                    .bind(&branch_strings)
                    .fetch_one(db)
                    .await?;

            (students, total)
        }
    };

    let has_more = offset + (students.len() as i64) < total;

    Ok(StudentListResponse {
        data: students,
        meta: PaginationMeta {
            total,
            limit,
            page,
            has_more,
        },
        allowed_branches,
        user_permissions,
    })
}

/// Branch access check used before any admin mutation of a student.
#[instrument(skip(db))]
pub async fn ensure_branch_access(
    db: &PgPool,
    admin_id: Uuid,
    role: AdminRole,
    student: &Student,
) -> Result<(), AppError> {
    let branch: Branch = student.branch.parse()?;

    if !rbac_service::can_access_branch(db, admin_id, role, branch).await? {
        return Err(AppError::forbidden(format!(
            "Access denied for branch: {}",
            student.branch
        )));
    }

    Ok(())
}
