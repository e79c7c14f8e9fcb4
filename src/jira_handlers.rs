//! HTTP handlers for the Jira bridge.
//!
//! Route-style endpoints live under `/api/jira` and return plain JSON
//! bodies. The MCP JSON-RPC endpoint is `POST /` on the same listener.

use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use crate::errors::{require, JiraError};
use crate::mcp::{MCPServer, SERVER_NAME};
use crate::service::IssueService;
use crate::views::{summaries, TicketDetail, TransitionList};

/// Page size for list endpoints when `?limit=` is absent
pub const HTTP_DEFAULT_LIMIT: u32 = 10;

/// App state for Jira handlers
#[derive(Clone)]
pub struct JiraAppState {
    pub service: Arc<IssueService>,
    pub mcp_server: Arc<MCPServer>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u32>,
}

impl LimitParams {
    fn page_size(&self) -> Option<u32> {
        Some(self.limit.unwrap_or(HTTP_DEFAULT_LIMIT))
    }
}

#[derive(Debug, Deserialize)]
pub struct JqlParams {
    #[serde(default)]
    pub jql: String,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TextParams {
    #[serde(default)]
    pub text: String,
    pub limit: Option<u32>,
}

/// Request payload for a status change
///
/// `status` stays untyped so that a null or non-string value reaches
/// `require` and is reported like a missing one.
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    #[serde(default)]
    pub status: Option<Value>,
}

impl StatusChangeRequest {
    fn status(&self) -> &str {
        self.status.as_ref().and_then(Value::as_str).unwrap_or("")
    }
}

// Caller mistakes are 400, everything else 500
fn error_response(context: &str, e: JiraError) -> HttpResponse {
    error!("{}: {}", context, e);

    let body = json!({
        "error": context,
        "details": e.to_string()
    });
    if e.is_client_error() {
        HttpResponse::BadRequest().json(body)
    } else {
        HttpResponse::InternalServerError().json(body)
    }
}

/// GET /api/jira/tickets/recent - Tickets updated in the last 7 days
pub async fn get_recent_tickets_handler(
    query: web::Query<LimitParams>,
    data: web::Data<JiraAppState>,
) -> Result<HttpResponse> {
    info!("Getting recent tickets");

    match data.service.get_recently_updated_tickets(query.page_size()).await {
        Ok(tickets) => Ok(HttpResponse::Ok().json(summaries(&tickets))),
        Err(e) => Ok(error_response("Failed to get recent tickets", e)),
    }
}

/// GET /api/jira/tickets/assigned - Tickets assigned to the current user
pub async fn get_assigned_tickets_handler(
    query: web::Query<LimitParams>,
    data: web::Data<JiraAppState>,
) -> Result<HttpResponse> {
    info!("Getting assigned tickets");

    match data.service.get_my_assigned_tickets(query.page_size()).await {
        Ok(tickets) => Ok(HttpResponse::Ok().json(summaries(&tickets))),
        Err(e) => Ok(error_response("Failed to get assigned tickets", e)),
    }
}

/// GET /api/jira/tickets/project/{project_key}
pub async fn get_project_tickets_handler(
    path: web::Path<String>,
    query: web::Query<LimitParams>,
    data: web::Data<JiraAppState>,
) -> Result<HttpResponse> {
    let project_key = path.into_inner();

    match data
        .service
        .get_tickets_by_project(&project_key, query.page_size())
        .await
    {
        Ok(tickets) => Ok(HttpResponse::Ok().json(summaries(&tickets))),
        Err(e) => Ok(error_response(
            &format!("Failed to get tickets for project {}", project_key),
            e,
        )),
    }
}

/// GET /api/jira/tickets/search?jql=...
pub async fn search_tickets_handler(
    query: web::Query<JqlParams>,
    data: web::Data<JiraAppState>,
) -> Result<HttpResponse> {
    let limit = Some(query.limit.unwrap_or(HTTP_DEFAULT_LIMIT));

    match data.service.search_tickets(&query.jql, limit).await {
        Ok(tickets) => Ok(HttpResponse::Ok().json(summaries(&tickets))),
        Err(e) => Ok(error_response("Failed to search tickets", e)),
    }
}

/// GET /api/jira/tickets/search/text?text=...
pub async fn search_tickets_by_text_handler(
    query: web::Query<TextParams>,
    data: web::Data<JiraAppState>,
) -> Result<HttpResponse> {
    let limit = Some(query.limit.unwrap_or(HTTP_DEFAULT_LIMIT));

    match data.service.search_tickets_by_text(&query.text, limit).await {
        Ok(tickets) => Ok(HttpResponse::Ok().json(summaries(&tickets))),
        Err(e) => Ok(error_response("Failed to search tickets by text", e)),
    }
}

/// GET /api/jira/ticket/{ticket_key}
pub async fn get_ticket_handler(
    path: web::Path<String>,
    data: web::Data<JiraAppState>,
) -> Result<HttpResponse> {
    let ticket_key = path.into_inner();
    info!("Getting ticket: {}", ticket_key);

    match data.service.get_ticket(&ticket_key).await {
        Ok(ticket) => Ok(HttpResponse::Ok().json(TicketDetail::from(&ticket))),
        Err(e) => Ok(error_response(
            &format!("Failed to get ticket {}", ticket_key),
            e,
        )),
    }
}

/// GET /api/jira/ticket/{ticket_key}/transitions
pub async fn get_ticket_transitions_handler(
    path: web::Path<String>,
    data: web::Data<JiraAppState>,
) -> Result<HttpResponse> {
    let ticket_key = path.into_inner();
    info!("Getting transitions for ticket: {}", ticket_key);

    match data.service.get_transitions(&ticket_key).await {
        Ok(transitions) => Ok(HttpResponse::Ok().json(TransitionList { transitions })),
        Err(e) => Ok(error_response(
            &format!("Failed to get transitions for {}", ticket_key),
            e,
        )),
    }
}

/// POST /api/jira/ticket/{ticket_key}/status - Move a ticket to another status
pub async fn change_ticket_status_handler(
    path: web::Path<String>,
    req: web::Json<StatusChangeRequest>,
    data: web::Data<JiraAppState>,
) -> Result<HttpResponse> {
    let ticket_key = path.into_inner();
    let context = format!("Failed to change status of {}", ticket_key);

    let status = req.status();
    if let Err(e) = require(status, "status") {
        return Ok(error_response(&context, e));
    }

    match data.service.change_status(&ticket_key, status).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(outcome)),
        Err(e) => Ok(error_response(&context, e)),
    }
}

/// POST / - MCP JSON-RPC endpoint
///
/// Notifications get `202 Accepted` with an empty body; every request,
/// including unparseable ones, gets a JSON-RPC envelope with status 200.
pub async fn mcp_rpc_handler(
    body: web::Bytes,
    data: web::Data<JiraAppState>,
) -> Result<HttpResponse> {
    match data.mcp_server.handle_raw(&body).await {
        Some(reply) => Ok(HttpResponse::Ok().json(reply)),
        None => Ok(HttpResponse::Accepted().finish()),
    }
}

/// GET /health
pub async fn health_handler() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": SERVER_NAME
    })))
}

/// Register every bridge route on an actix app
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/jira")
            .route("/tickets/recent", web::get().to(get_recent_tickets_handler))
            .route("/tickets/assigned", web::get().to(get_assigned_tickets_handler))
            .route(
                "/tickets/project/{project_key}",
                web::get().to(get_project_tickets_handler),
            )
            .route("/tickets/search", web::get().to(search_tickets_handler))
            .route(
                "/tickets/search/text",
                web::get().to(search_tickets_by_text_handler),
            )
            .route("/ticket/{ticket_key}", web::get().to(get_ticket_handler))
            .route(
                "/ticket/{ticket_key}/transitions",
                web::get().to(get_ticket_transitions_handler),
            )
            .route(
                "/ticket/{ticket_key}/status",
                web::post().to(change_ticket_status_handler),
            ),
    )
    .route("/health", web::get().to(health_handler))
    .route("/", web::post().to(mcp_rpc_handler));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::tests::FakeTracker;
    use actix_web::{http::StatusCode, test, App};

    fn state(tracker: Arc<FakeTracker>) -> JiraAppState {
        let service = Arc::new(IssueService::new(tracker));
        let mcp_server = Arc::new(MCPServer::new(service.clone()).unwrap());
        JiraAppState {
            service,
            mcp_server,
        }
    }

    macro_rules! app {
        ($tracker:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(state($tracker)))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_recent_tickets_default_limit() {
        let tracker = Arc::new(FakeTracker::new());
        let app = app!(tracker.clone());

        let req = test::TestRequest::get()
            .uri("/api/jira/tickets/recent")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["key"], "PROJ-1");
        assert_eq!(body[0]["status"], "To Do");
        assert_eq!(
            tracker.calls(),
            vec!["search updated >= -7d ORDER BY updated DESC 10"]
        );
    }

    #[actix_web::test]
    async fn test_project_and_text_search_pass_limit() {
        let tracker = Arc::new(FakeTracker::new());
        let app = app!(tracker.clone());

        let req = test::TestRequest::get()
            .uri("/api/jira/tickets/project/PROJ?limit=3")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/jira/tickets/search/text?text=login%20bug")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        assert_eq!(
            tracker.calls(),
            vec![
                "search project = PROJ ORDER BY updated DESC 3",
                "search text ~ \"login bug\" ORDER BY updated DESC 10",
            ]
        );
    }

    #[actix_web::test]
    async fn test_search_without_jql_is_bad_request() {
        let tracker = Arc::new(FakeTracker::new());
        let app = app!(tracker.clone());

        let req = test::TestRequest::get()
            .uri("/api/jira/tickets/search")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["details"], "jql_query is required");
        assert!(tracker.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_get_ticket_detail_and_upstream_failure() {
        let app = app!(Arc::new(FakeTracker::new()));

        let req = test::TestRequest::get()
            .uri("/api/jira/ticket/PROJ-1")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["key"], "PROJ-1");
        assert_eq!(body["assignee"]["emailAddress"], "ada@example.com");
        assert_eq!(body["issuetype"], Value::Null);

        let req = test::TestRequest::get()
            .uri("/api/jira/ticket/NOPE-1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Failed to get ticket NOPE-1");
    }

    #[actix_web::test]
    async fn test_transitions_endpoint() {
        let app = app!(Arc::new(FakeTracker::new()));

        let req = test::TestRequest::get()
            .uri("/api/jira/ticket/PROJ-1/transitions")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["transitions"].as_array().unwrap().len(), 3);
        assert_eq!(body["transitions"][2]["name"], "Resolve");
    }

    #[actix_web::test]
    async fn test_change_status() {
        let tracker = Arc::new(FakeTracker::new());
        let app = app!(tracker.clone());

        let req = test::TestRequest::post()
            .uri("/api/jira/ticket/PROJ-1/status")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["details"], "status is required");

        let req = test::TestRequest::post()
            .uri("/api/jira/ticket/PROJ-1/status")
            .set_json(json!({"status": "Done"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/jira/ticket/PROJ-1/status")
            .set_json(json!({"status": "In Progress"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["ticket"]["status"], "In Progress");

        assert_eq!(
            tracker.calls(),
            vec![
                "get_transitions PROJ-1",
                "get_transitions PROJ-1",
                "transition PROJ-1 11",
                "get_issue PROJ-1",
            ]
        );
    }

    #[actix_web::test]
    async fn test_change_status_null_or_non_string_status() {
        let tracker = Arc::new(FakeTracker::new());
        let app = app!(tracker.clone());

        for payload in [json!({"status": null}), json!({"status": 42})] {
            let req = test::TestRequest::post()
                .uri("/api/jira/ticket/PROJ-1/status")
                .set_json(payload)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Failed to change status of PROJ-1");
            assert_eq!(body["details"], "status is required");
        }
        assert!(tracker.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_health() {
        let app = app!(Arc::new(FakeTracker::new()));
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"status": "healthy", "service": "jira-bridge"}));
    }

    #[actix_web::test]
    async fn test_rpc_endpoint() {
        let app = app!(Arc::new(FakeTracker::new()));

        let req = test::TestRequest::post()
            .uri("/")
            .set_json(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 8);

        let req = test::TestRequest::post()
            .uri("/")
            .set_json(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);

        let req = test::TestRequest::post()
            .uri("/")
            .set_payload("{oops")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], Value::Null);
        assert_eq!(body["error"]["code"], -32700);
    }
}
