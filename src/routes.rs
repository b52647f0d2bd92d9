// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Monta o router completo. Perfis e restaurante são checados por rota
/// pelo extrator `Access<P>`; aqui só entra a autenticação.
pub fn router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/users/me", get(handlers::auth::get_me))
        .route("/notifications", get(handlers::notifications::list_notifications))
        .route("/notifications/{id}/read", post(handlers::notifications::mark_notification_read))
        .route(
            "/admin/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/admin/users/{id}", delete(handlers::users::delete_user))
        .route("/admin/users/{id}/approve", post(handlers::users::approve_user))
        .route("/admin/users/{id}/activate", post(handlers::users::activate_user))
        .route("/admin/users/{id}/deactivate", post(handlers::users::deactivate_user));

    let platform_routes = Router::new()
        .route(
            "/platform/restaurants",
            get(handlers::tenancy::list_tenants).post(handlers::tenancy::create_tenant),
        )
        .route("/platform/restaurants/{id}/activate", post(handlers::tenancy::activate_tenant))
        .route("/platform/restaurants/{id}/deactivate", post(handlers::tenancy::deactivate_tenant))
        .route("/platform/restaurants/{id}/admins", post(handlers::tenancy::create_tenant_admin));

    let inventory_routes = Router::new()
        .route(
            "/items",
            get(handlers::catalog::list_items).post(handlers::catalog::create_item),
        )
        .route("/items/{id}/deactivate", post(handlers::catalog::deactivate_item))
        .route(
            "/submissions",
            get(handlers::submissions::list_submissions).post(handlers::submissions::create_submission),
        )
        .route("/submissions/{id}", get(handlers::submissions::get_submission))
        .route("/submissions/{id}/decision", post(handlers::submissions::decide_submission))
        .route("/submissions/{id}/archive", post(handlers::submissions::archive_submission))
        .route(
            "/checklists",
            get(handlers::checklists::list_checklists).post(handlers::checklists::create_checklist),
        )
        .route("/checklists/{id}", get(handlers::checklists::get_checklist))
        .route("/checklists/{id}/finalize", post(handlers::checklists::finalize_checklist))
        .route("/checklists/{id}/reopen", post(handlers::checklists::reopen_checklist))
        .route(
            "/checklists/{id}/items/{item_id}/toggle",
            post(handlers::checklists::toggle_checklist_item),
        );

    let quick_list_routes = Router::new()
        .route(
            "/quick-lists",
            get(handlers::quick_lists::list_quick_lists).post(handlers::quick_lists::create_quick_list),
        )
        .route("/quick-lists/{id}", get(handlers::quick_lists::get_quick_list))
        .route("/quick-lists/{id}/items", post(handlers::quick_lists::add_quick_list_item))
        .route(
            "/quick-lists/{id}/items/{item_id}/discard",
            post(handlers::quick_lists::discard_quick_list_item),
        )
        .route("/quick-lists/{id}/submit", post(handlers::quick_lists::submit_quick_list))
        .route("/quick-lists/{id}/approve", post(handlers::quick_lists::approve_quick_list))
        .route("/quick-lists/{id}/reject", post(handlers::quick_lists::reject_quick_list))
        .route("/quick-lists/{id}/archive", post(handlers::quick_lists::archive_quick_list));

    let pop_routes = Router::new()
        .route(
            "/pop/templates",
            get(handlers::pop::list_templates).post(handlers::pop::create_template),
        )
        .route("/pop/templates/{id}", get(handlers::pop::get_template))
        .route("/pop/templates/{id}/deactivate", post(handlers::pop::deactivate_template))
        .route("/pop/templates/{id}/executions", post(handlers::pop::start_execution))
        .route("/pop/executions", get(handlers::pop::list_executions))
        .route("/pop/executions/{id}", get(handlers::pop::get_execution))
        .route("/pop/executions/{id}/complete", post(handlers::pop::complete_execution))
        .route("/pop/executions/{id}/cancel", post(handlers::pop::cancel_execution));

    // Tudo abaixo exige Bearer token válido
    let protected_routes = Router::new()
        .merge(user_routes)
        .merge(platform_routes)
        .merge(inventory_routes)
        .merge(quick_list_routes)
        .merge(pop_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // A interface web roda em outra origem
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", ApiDoc::openapi()))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        config::Config,
        db::Repositories,
        models::submissions::SubmissionStatus,
    };

    const ROOT_EMAIL: &str = "root@plataforma.com";
    const PASSWORD: &str = "segredo123";

    struct TestApp {
        app: Router,
        repositories: Repositories,
        root_token: String,
    }

    async fn test_app() -> TestApp {
        let repositories = Repositories::in_memory();
        let state = AppState::from_repositories(repositories.clone(), &Config::for_tests());
        state.auth_service.bootstrap_super_admin(ROOT_EMAIL, PASSWORD).await.unwrap();

        let app = router(state);
        let root_token = login(&app, ROOT_EMAIL).await;
        TestApp { app, repositories, root_token }
    }

    async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, json)
    }

    async fn login(app: &Router, login: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "login": login, "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "login falhou: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Cria um restaurante com o primeiro ADMIN e devolve (id, token do admin).
    async fn restaurant(t: &TestApp, slug: &str) -> (String, String) {
        let (status, tenant) = send(
            &t.app,
            Method::POST,
            "/api/platform/restaurants",
            Some(&t.root_token),
            Some(json!({ "name": format!("Restaurante {slug}") })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let tenant_id = tenant["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &t.app,
            Method::POST,
            &format!("/api/platform/restaurants/{tenant_id}/admins"),
            Some(&t.root_token),
            Some(json!({
                "name": "Gerente",
                "email": format!("gerente@{slug}.com"),
                "username": format!("gerente_{slug}"),
                "password": PASSWORD,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let token = login(&t.app, &format!("gerente_{slug}")).await;
        (tenant_id, token)
    }

    async fn register(t: &TestApp, tenant_id: &str, username: &str) -> (StatusCode, Value) {
        send(
            &t.app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Colaborador",
                "email": format!("{username}@x.com"),
                "username": username,
                "password": PASSWORD,
                "restauranteId": tenant_id,
            })),
        )
        .await
    }

    /// Colaborador cadastrado, aprovado pelo admin e logado.
    async fn collaborator(t: &TestApp, tenant_id: &str, admin_token: &str, username: &str) -> String {
        let (status, user) = register(t, tenant_id, username).await;
        assert_eq!(status, StatusCode::CREATED);
        let user_id = user["id"].as_str().unwrap();

        let (status, _) = send(
            &t.app,
            Method::POST,
            &format!("/api/admin/users/{user_id}/approve"),
            Some(admin_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        login(&t.app, username).await
    }

    async fn item(t: &TestApp, admin_token: &str, name: &str) -> String {
        let (status, item) = send(
            &t.app,
            Method::POST,
            "/api/items",
            Some(admin_token),
            Some(json!({ "name": name, "unit": "kg" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        item["id"].as_str().unwrap().to_string()
    }

    /// Submissão com A×3 e B×5 aprovada integralmente pelo admin.
    async fn approved_submission(t: &TestApp, admin_token: &str, collab_token: &str) -> (String, String, String) {
        let item_a = item(t, admin_token, "Arroz").await;
        let item_b = item(t, admin_token, "Feijão").await;

        let (status, submission) = send(
            &t.app,
            Method::POST,
            "/api/submissions",
            Some(collab_token),
            Some(json!({
                "orders": [
                    { "itemId": item_a, "qtdPedida": 3.0 },
                    { "itemId": item_b, "qtdPedida": 5.0 },
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(submission["status"], "PENDENTE");
        let submission_id = submission["id"].as_str().unwrap().to_string();
        let order_ids: Vec<Value> = submission["orders"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["id"].clone())
            .collect();

        let (status, decided) = send(
            &t.app,
            Method::POST,
            &format!("/api/submissions/{submission_id}/decision"),
            Some(admin_token),
            Some(json!({ "approvedOrderIds": order_ids })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(decided["status"], "APROVADO");

        (submission_id, item_a, item_b)
    }

    #[tokio::test]
    async fn health_and_docs_are_public() {
        let t = test_app().await;
        let (status, _) = send(&t.app, Method::GET, "/api/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&t.app, Method::GET, "/api/items", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Token de autenticação inválido ou ausente.");
    }

    #[tokio::test]
    async fn approved_submission_yields_checklist_with_approved_orders() {
        let t = test_app().await;
        let (tenant_id, admin) = restaurant(&t, "centro").await;
        let collab = collaborator(&t, &tenant_id, &admin, "ana").await;
        let (submission_id, item_a, item_b) = approved_submission(&t, &admin, &collab).await;

        let (status, checklist) = send(
            &t.app,
            Method::POST,
            "/api/checklists",
            Some(&admin),
            Some(json!({ "submissaoId": submission_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(checklist["status"], "ABERTO");
        assert_eq!(checklist["submissaoId"], submission_id.as_str());

        let items = checklist["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i["checked"] == false));
        let qty_of = |item_id: &str| {
            items
                .iter()
                .find(|i| i["itemId"] == item_id)
                .map(|i| i["qtdPedida"].as_f64().unwrap())
        };
        assert_eq!(qty_of(&item_a), Some(3.0));
        assert_eq!(qty_of(&item_b), Some(5.0));

        // Autor avisado da avaliação
        let (_, notifications) = send(&t.app, Method::GET, "/api/notifications", Some(&collab), None).await;
        assert_eq!(notifications.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn other_restaurant_gets_not_found() {
        let t = test_app().await;
        let (tenant_id, admin) = restaurant(&t, "centro").await;
        let (_, other_admin) = restaurant(&t, "bairro").await;
        let collab = collaborator(&t, &tenant_id, &admin, "ana").await;
        let (submission_id, _, _) = approved_submission(&t, &admin, &collab).await;

        let (_, checklist) = send(
            &t.app,
            Method::POST,
            "/api/checklists",
            Some(&admin),
            Some(json!({ "submissaoId": submission_id })),
        )
        .await;
        let checklist_id = checklist["id"].as_str().unwrap();

        let (status, body) = send(
            &t.app,
            Method::GET,
            &format!("/api/checklists/{checklist_id}"),
            Some(&other_admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Recurso não encontrado.");

        let (status, _) = send(
            &t.app,
            Method::GET,
            &format!("/api/submissions/{submission_id}"),
            Some(&other_admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Do outro restaurante também não se cria checklist
        let (status, _) = send(
            &t.app,
            Method::POST,
            "/api/checklists",
            Some(&other_admin),
            Some(json!({ "submissaoId": submission_id })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn second_checklist_conflicts_and_toggle_is_reversible() {
        let t = test_app().await;
        let (tenant_id, admin) = restaurant(&t, "centro").await;
        let collab = collaborator(&t, &tenant_id, &admin, "ana").await;
        let (submission_id, _, _) = approved_submission(&t, &admin, &collab).await;

        let payload = json!({ "submissaoId": submission_id });
        let (_, checklist) = send(&t.app, Method::POST, "/api/checklists", Some(&admin), Some(payload.clone())).await;
        let (status, _) = send(&t.app, Method::POST, "/api/checklists", Some(&admin), Some(payload)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let checklist_id = checklist["id"].as_str().unwrap();
        let item_id = checklist["items"][0]["id"].as_str().unwrap();
        let toggle = format!("/api/checklists/{checklist_id}/items/{item_id}/toggle");

        let (_, first) = send(&t.app, Method::POST, &toggle, Some(&admin), None).await;
        assert_eq!(first["checked"], true);
        let (_, second) = send(&t.app, Method::POST, &toggle, Some(&admin), None).await;
        assert_eq!(second["checked"], false);

        let (_, list) = send(&t.app, Method::GET, "/api/checklists", Some(&admin), None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn quick_list_rejected_cannot_be_resubmitted() {
        let t = test_app().await;
        let (tenant_id, admin) = restaurant(&t, "centro").await;
        let collab = collaborator(&t, &tenant_id, &admin, "ana").await;

        let (status, list) = send(
            &t.app,
            Method::POST,
            "/api/quick-lists",
            Some(&collab),
            Some(json!({
                "name": "Feira",
                "items": [{ "description": "Tomate", "quantity": 2.0 }]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(list["status"], "RASCUNHO");
        let id = list["id"].as_str().unwrap();

        let (status, _) = send(&t.app, Method::POST, &format!("/api/quick-lists/{id}/submit"), Some(&collab), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&t.app, Method::POST, &format!("/api/quick-lists/{id}/reject"), Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            send(&t.app, Method::POST, &format!("/api/quick-lists/{id}/submit"), Some(&collab), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Não é possível enviar a lista rápida com status REJEITADO.");

        let (_, current) = send(&t.app, Method::GET, &format!("/api/quick-lists/{id}"), Some(&collab), None).await;
        assert_eq!(current["status"], "REJEITADO");
    }

    #[tokio::test]
    async fn collaborator_on_admin_route_is_forbidden_without_side_effects() {
        let t = test_app().await;
        let (tenant_id, admin) = restaurant(&t, "centro").await;
        let collab = collaborator(&t, &tenant_id, &admin, "ana").await;
        let (submission_id, _, _) = approved_submission(&t, &admin, &collab).await;

        let (status, body) = send(
            &t.app,
            Method::POST,
            &format!("/api/submissions/{submission_id}/archive"),
            Some(&collab),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Seu perfil não tem permissão para realizar esta ação.");

        let (status, _) = send(
            &t.app,
            Method::POST,
            "/api/checklists",
            Some(&collab),
            Some(json!({ "submissaoId": submission_id })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let id = submission_id.parse().unwrap();
        let unchanged = t.repositories.submissions.find_by_id(id, None).await.unwrap().unwrap();
        assert_eq!(unchanged.submission.status, SubmissionStatus::Aprovado);
        assert!(t.repositories.checklists.find_by_submission(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unapproved_login_gets_no_token() {
        let t = test_app().await;
        let (tenant_id, _) = restaurant(&t, "centro").await;
        let (status, _) = register(&t, &tenant_id, "novato").await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &t.app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "login": "novato", "password": PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.get("token").is_none());

        let (status, _) = register(&t, &tenant_id, "novato").await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn accept_language_switches_messages() {
        let t = test_app().await;
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/items")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .body(Body::empty())
            .unwrap();
        let response = t.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Missing or invalid authentication token.");
    }
}
