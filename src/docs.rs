// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::approve_user,
        handlers::users::activate_user,
        handlers::users::deactivate_user,
        handlers::users::delete_user,

        // --- Platform ---
        handlers::tenancy::create_tenant,
        handlers::tenancy::list_tenants,
        handlers::tenancy::activate_tenant,
        handlers::tenancy::deactivate_tenant,
        handlers::tenancy::create_tenant_admin,

        // --- Catalog ---
        handlers::catalog::list_items,
        handlers::catalog::create_item,
        handlers::catalog::deactivate_item,

        // --- Submissions ---
        handlers::submissions::create_submission,
        handlers::submissions::list_submissions,
        handlers::submissions::get_submission,
        handlers::submissions::decide_submission,
        handlers::submissions::archive_submission,

        // --- Checklists ---
        handlers::checklists::create_checklist,
        handlers::checklists::list_checklists,
        handlers::checklists::get_checklist,
        handlers::checklists::finalize_checklist,
        handlers::checklists::reopen_checklist,
        handlers::checklists::toggle_checklist_item,

        // --- Quick Lists ---
        handlers::quick_lists::create_quick_list,
        handlers::quick_lists::list_quick_lists,
        handlers::quick_lists::get_quick_list,
        handlers::quick_lists::add_quick_list_item,
        handlers::quick_lists::discard_quick_list_item,
        handlers::quick_lists::submit_quick_list,
        handlers::quick_lists::approve_quick_list,
        handlers::quick_lists::reject_quick_list,
        handlers::quick_lists::archive_quick_list,

        // --- POP ---
        handlers::pop::create_template,
        handlers::pop::list_templates,
        handlers::pop::get_template,
        handlers::pop::deactivate_template,
        handlers::pop::start_execution,
        handlers::pop::list_executions,
        handlers::pop::get_execution,
        handlers::pop::complete_execution,
        handlers::pop::cancel_execution,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_notification_read,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::SessionUser,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::CreateUserPayload,
            models::auth::AuthResponse,

            // --- Tenancy ---
            models::tenancy::Tenant,
            models::tenancy::CreateTenantPayload,
            models::tenancy::CreateTenantAdminPayload,

            // --- Catalog ---
            models::catalog::Item,
            models::catalog::CreateItemPayload,

            // --- Submissions ---
            models::submissions::SubmissionStatus,
            models::submissions::OrderStatus,
            models::submissions::Submission,
            models::submissions::Order,
            models::submissions::SubmissionDetail,
            models::submissions::OrderPayload,
            models::submissions::CreateSubmissionPayload,
            models::submissions::DecideSubmissionPayload,

            // --- Checklists ---
            models::checklists::ChecklistStatus,
            models::checklists::Checklist,
            models::checklists::ChecklistItem,
            models::checklists::ChecklistDetail,
            models::checklists::CreateChecklistPayload,

            // --- Quick Lists ---
            models::quick_lists::QuickListStatus,
            models::quick_lists::QuickList,
            models::quick_lists::QuickListItem,
            models::quick_lists::QuickListDetail,
            models::quick_lists::QuickListItemPayload,
            models::quick_lists::CreateQuickListPayload,

            // --- POP ---
            models::pop::PopType,
            models::pop::PopExecutionStatus,
            models::pop::PopTemplate,
            models::pop::PopExecution,
            models::pop::CreatePopTemplatePayload,

            // --- Notifications ---
            models::notifications::Notification,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Gestão da Equipe do Restaurante"),
        (name = "Platform", description = "Gestão de Restaurantes (SUPER_ADMIN)"),
        (name = "Catalog", description = "Catálogo de Itens"),
        (name = "Submissions", description = "Submissões de Pedidos e Aprovação"),
        (name = "Checklists", description = "Conferência dos Pedidos Aprovados"),
        (name = "Quick Lists", description = "Listas Rápidas de Compra"),
        (name = "POP", description = "Procedimentos Operacionais Padrão"),
        (name = "Notifications", description = "Avisos ao Usuário")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_protected_routes_with_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/checklists/{id}/items/{item_id}/toggle"));
        assert!(doc.paths.paths.contains_key("/api/quick-lists/{id}/submit"));
        let schemes = doc.components.expect("components").security_schemes;
        assert!(schemes.contains_key("api_jwt"));
    }
}
