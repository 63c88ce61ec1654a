//! End-to-end tests driving the router against an in-memory SQLite database

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // For `oneshot` method
use workdesk_api::{ApiServer, ApiServerConfig};
use workdesk_db::{connect, migrate};

const PASSWORD: &str = "secret-pass";

async fn create_test_app() -> Router {
    let db = connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    migrate(&db).await.expect("Failed to run migrations");

    let config = ApiServerConfig::new("127.0.0.1:0".parse().unwrap(), "test-secret");
    ApiServer::new(config, db).build_router()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);
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

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!("Non-JSON body: {}", String::from_utf8_lossy(&bytes))
        })
    };
    (status, value)
}

async fn register(app: &Router, email: &str, role: &str, code: Option<&str>) -> i64 {
    let mut body = json!({
        "name": "Test",
        "surname": "User",
        "role": role,
        "email": email,
        "password": PASSWORD,
    });
    if let Some(code) = code {
        body["code"] = json!(code);
    }

    let (status, user) = send(app, Method::POST, "/registration", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {}", user);
    user["id"].as_i64().unwrap()
}

async fn login(app: &Router, email: &str) -> String {
    let (status, session) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", session);
    session["token"].as_str().unwrap().to_string()
}

/// Admin with a fresh company, plus one employee who joined by code
struct Org {
    company_id: i64,
    admin: String,
    employee_id: i64,
    employee: String,
}

async fn setup_org(app: &Router, prefix: &str, code: &str) -> Org {
    let admin_email = format!("{}-admin@example.com", prefix);
    register(app, &admin_email, "admin", None).await;
    let admin = login(app, &admin_email).await;

    let (status, company) = send(
        app,
        Method::POST,
        "/companies",
        Some(&admin),
        Some(json!({
            "name": format!("{} corp", prefix),
            "company_code": code,
            "admin_code": "XYZ123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "company failed: {}", company);
    assert!(company.get("admin_code").is_none());

    let employee_email = format!("{}-employee@example.com", prefix);
    let employee_id = register(app, &employee_email, "employee", Some(code)).await;
    let employee = login(app, &employee_email).await;

    Org {
        company_id: company["id"].as_i64().unwrap(),
        admin,
        employee_id,
        employee,
    }
}

async fn me(app: &Router, token: &str) -> Value {
    let (status, user) = send(app, Method::GET, "/users/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    user
}

#[tokio::test]
async fn test_health_is_public() {
    let app = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = create_test_app().await;
    let id = register(&app, "Ann@Example.com", "employee", None).await;

    let request = Request::builder()
        .uri("/auth/login")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": "ann@example.com", "password": PASSWORD }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("session_token="));
    assert!(cookie.contains("HttpOnly"));

    // The cookie alone authenticates
    let session = cookie.split(';').next().unwrap().to_string();
    let request = Request::builder()
        .uri("/users/me")
        .header(header::COOKIE, session)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let user: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(user["id"].as_i64(), Some(id));
    assert_eq!(user["email"], "ann@example.com");
    assert_eq!(user["company_role"], "employee");
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn test_protected_route_requires_session() {
    let app = create_test_app().await;

    let (status, body) = send(&app, Method::GET, "/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "MISSING_AUTH");

    let (status, _) = send(&app, Method::GET, "/meeting", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_email_and_bad_password() {
    let app = create_test_app().await;
    register(&app, "dup@example.com", "employee", None).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/registration",
        None,
        Some(json!({
            "name": "Other",
            "surname": "User",
            "role": "manager",
            "email": "DUP@example.com",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "dup@example.com", "password": "wrong-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_company_code_is_rejected() {
    let app = create_test_app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/registration",
        None,
        Some(json!({
            "name": "Lost",
            "surname": "User",
            "role": "employee",
            "code": "NOPE",
            "email": "lost@example.com",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_company_delete_detaches_members() {
    let app = create_test_app().await;
    let org = setup_org(&app, "acme", "AC01").await;

    let (status, users) = send(
        &app,
        Method::GET,
        &format!("/companies/{}/users", org.company_id),
        Some(&org.employee),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);

    let (status, dep) = send(
        &app,
        Method::POST,
        &format!("/companies/{}/departments", org.company_id),
        Some(&org.admin),
        Some(json!({ "name": "Sales", "head_user_id": org.employee_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(me(&app, &org.employee).await["department_id"], dep["id"]);

    // Employees cannot delete the company
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/companies/{}", org.company_id),
        Some(&org.employee),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/companies/{}", org.company_id),
        Some(&org.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let employee = me(&app, &org.employee).await;
    assert!(employee["company_id"].is_null());
    assert!(employee["department_id"].is_null());
    assert!(me(&app, &org.admin).await["company_id"].is_null());
}

#[tokio::test]
async fn test_department_head_swap_and_delete() {
    let app = create_test_app().await;
    let org = setup_org(&app, "globex", "GL01").await;
    let second_id = register(&app, "second@example.com", "employee", Some("GL01")).await;
    let second = login(&app, "second@example.com").await;

    let deps_uri = format!("/companies/{}/departments", org.company_id);
    let (_, dep) = send(
        &app,
        Method::POST,
        &deps_uri,
        Some(&org.admin),
        Some(json!({ "name": "Research", "head_user_id": org.employee_id })),
    )
    .await;
    let dep_uri = format!("{}/{}", deps_uri, dep["id"]);

    // The head cannot be removed from the department directly
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/users/{}/department", org.employee_id),
        Some(&org.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &dep_uri,
        Some(&org.admin),
        Some(json!({ "head_user_id": second_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["head_user_id"].as_i64(), Some(second_id));
    assert!(me(&app, &org.employee).await["department_id"].is_null());
    assert_eq!(me(&app, &second).await["department_id"], dep["id"]);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("{}/members/{}", dep_uri, org.employee_id),
        Some(&org.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &dep_uri, Some(&org.admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert!(me(&app, &org.employee).await["department_id"].is_null());
    assert!(me(&app, &second).await["department_id"].is_null());

    let (_, deps) = send(&app, Method::GET, &deps_uri, Some(&org.admin), None).await;
    assert!(deps.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_company_is_forbidden() {
    let app = create_test_app().await;
    let acme = setup_org(&app, "acme", "AC01").await;
    let globex = setup_org(&app, "globex", "GL01").await;

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/companies/{}/departments", acme.company_id),
        Some(&globex.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A department cannot be headed by an outsider
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/companies/{}/departments", acme.company_id),
        Some(&acme.admin),
        Some(json!({ "name": "Ops", "head_user_id": globex.employee_id })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        "/companies/tasks",
        Some(&acme.admin),
        Some(json!({
            "target_id": globex.employee_id,
            "start_date": "2030-03-01",
            "end_date": "2030-03-15",
            "title": "Cross company",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_task_lifecycle_and_rating() {
    let app = create_test_app().await;
    let org = setup_org(&app, "initech", "IN01").await;

    let (status, task) = send(
        &app,
        Method::POST,
        "/companies/tasks",
        Some(&org.admin),
        Some(json!({
            "target_id": org.employee_id,
            "start_date": "2030-03-01",
            "end_date": "2030-03-15",
            "title": "Write report",
            "description": "Quarterly numbers",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(task["status"], "todo");
    let task_uri = format!("/companies/tasks/{}", task["id"]);

    let (_, tasks) = send(&app, Method::GET, "/users/me/tasks", Some(&org.employee), None).await;
    assert_eq!(tasks.as_array().unwrap().len(), 1);

    let (_, owned) = send(&app, Method::GET, "/users/me/tasks/owned", Some(&org.admin), None).await;
    assert_eq!(owned.as_array().unwrap().len(), 1);

    let scores = json!({ "score_date": 4, "score_quality": 5, "score_complete": 3 });
    let ratings_uri = format!("{}/ratings", task_uri);

    // Not done yet
    let (status, _) = send(
        &app,
        Method::POST,
        &ratings_uri,
        Some(&org.admin),
        Some(scores.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Only the assignee moves the status
    let (status, _) = send(
        &app,
        Method::PATCH,
        &format!("{}/status", task_uri),
        Some(&org.admin),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, done) = send(
        &app,
        Method::PATCH,
        &format!("{}/status", task_uri),
        Some(&org.employee),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "done");

    // Employees cannot rate
    let (status, _) = send(
        &app,
        Method::POST,
        &ratings_uri,
        Some(&org.employee),
        Some(scores.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        Method::POST,
        &ratings_uri,
        Some(&org.admin),
        Some(json!({ "score_date": 6, "score_quality": 5, "score_complete": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, rating) = send(&app, Method::POST, &ratings_uri, Some(&org.admin), Some(scores)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(rating["owner_id"].as_i64(), Some(org.employee_id));

    let (_, ratings) = send(&app, Method::GET, "/users/me/ratings", Some(&org.employee), None).await;
    assert_eq!(ratings.as_array().unwrap().len(), 1);

    let (status, average) = send(
        &app,
        Method::GET,
        "/users/me/ratings/average",
        Some(&org.employee),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(average["avg_date"].as_f64(), Some(4.0));
    assert_eq!(average["avg_quality"].as_f64(), Some(5.0));
    assert_eq!(average["avg_complete"].as_f64(), Some(3.0));

    // Comments
    let (status, comment) = send(
        &app,
        Method::POST,
        &format!("{}/comments", task_uri),
        Some(&org.employee),
        Some(json!({ "description": "Done, see attachment" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, comments) = send(
        &app,
        Method::GET,
        &format!("{}/comments", task_uri),
        Some(&org.admin),
        None,
    )
    .await;
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["id"], comment["id"]);

    // Deleting the task removes its calendar entry
    let (_, month) = send(
        &app,
        Method::GET,
        "/calendar/my/month?year=2030&month=3",
        Some(&org.employee),
        None,
    )
    .await;
    assert_eq!(month.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &task_uri, Some(&org.admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, month) = send(
        &app,
        Method::GET,
        "/calendar/my/month?year=2030&month=3",
        Some(&org.employee),
        None,
    )
    .await;
    assert!(month.as_array().unwrap().is_empty());

    let (status, _) = send(&app, Method::GET, &task_uri, Some(&org.admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_meeting_participants_and_calendar() {
    let app = create_test_app().await;
    let org = setup_org(&app, "umbrella", "UM01").await;

    let new_meeting = json!({
        "title": "Kickoff",
        "meeting_date": "2030-03-01",
        "meeting_time": "10:00:00",
    });

    // Employees cannot schedule meetings
    let (status, _) = send(
        &app,
        Method::POST,
        "/meeting",
        Some(&org.employee),
        Some(new_meeting.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, meeting) = send(&app, Method::POST, "/meeting", Some(&org.admin), Some(new_meeting.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let participants_uri = format!("/meeting/{}/participants/{}", meeting["id"], org.employee_id);

    let (status, entry) = send(&app, Method::POST, &participants_uri, Some(&org.admin), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["type_event"], "meeting");

    let (status, _) = send(&app, Method::POST, &participants_uri, Some(&org.admin), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // A second meeting in the same slot clashes too
    let (_, other) = send(&app, Method::POST, "/meeting", Some(&org.admin), Some(new_meeting)).await;
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/meeting/{}/participants/{}", other["id"], org.employee_id),
        Some(&org.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(
        &app,
        Method::POST,
        "/companies/tasks",
        Some(&org.admin),
        Some(json!({
            "target_id": org.employee_id,
            "start_date": "2030-02-20",
            "end_date": "2030-03-15",
            "title": "Prepare slides",
        })),
    )
    .await;

    let (status, month) = send(
        &app,
        Method::GET,
        "/calendar/my/month?year=2030&month=3",
        Some(&org.employee),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let month = month.as_array().unwrap();
    assert_eq!(month.len(), 2);
    assert_eq!(month[0]["event_date"], "2030-03-01");
    assert_eq!(month[0]["type_event"], "meeting");
    assert_eq!(month[1]["event_date"], "2030-03-15");
    assert_eq!(month[1]["type_event"], "task");

    let (status, _) = send(
        &app,
        Method::GET,
        "/calendar/my/month?year=2030&month=13",
        Some(&org.employee),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Moving the meeting moves the participant's entry
    let (status, moved) = send(
        &app,
        Method::PATCH,
        &format!("/meeting/{}", meeting["id"]),
        Some(&org.admin),
        Some(json!({ "meeting_date": "2030-04-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["meeting_date"], "2030-04-02");

    let (_, april) = send(
        &app,
        Method::GET,
        "/calendar/my/month?year=2030&month=4",
        Some(&org.employee),
        None,
    )
    .await;
    assert_eq!(april.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/meeting/{}", meeting["id"]),
        Some(&org.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, april) = send(
        &app,
        Method::GET,
        "/calendar/my/month?year=2030&month=4",
        Some(&org.employee),
        None,
    )
    .await;
    assert!(april.as_array().unwrap().is_empty());

    let (_, meetings) = send(&app, Method::GET, "/meeting", Some(&org.employee), None).await;
    assert_eq!(meetings.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_task_status_cannot_be_patched_by_non_assignee() {
    let app = create_test_app().await;
    let org = setup_org(&app, "hooli", "HO01").await;

    let (status, task) = send(
        &app,
        Method::POST,
        "/companies/tasks",
        Some(&org.admin),
        Some(json!({
            "target_id": org.employee_id,
            "start_date": "2030-03-01",
            "end_date": "2030-03-15",
            "title": "Fix the build",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_uri = format!("/companies/tasks/{}", task["id"]);

    // The owner may edit other fields but not the status
    let (status, _) = send(
        &app,
        Method::PATCH,
        &task_uri,
        Some(&org.admin),
        Some(json!({ "status": "done", "title": "Fix the build now" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, unchanged) = send(&app, Method::GET, &task_uri, Some(&org.admin), None).await;
    assert_eq!(unchanged["status"], "todo");
    assert_eq!(unchanged["title"], "Fix the build");

    // Still not rateable
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("{}/ratings", task_uri),
        Some(&org.admin),
        Some(json!({ "score_date": 4, "score_quality": 4, "score_complete": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, renamed) = send(
        &app,
        Method::PATCH,
        &task_uri,
        Some(&org.admin),
        Some(json!({ "title": "Fix the build now" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["title"], "Fix the build now");

    let (status, done) = send(
        &app,
        Method::PATCH,
        &task_uri,
        Some(&org.employee),
        Some(json!({ "status": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "done");
}

#[tokio::test]
async fn test_meeting_move_into_booked_slot_is_rejected() {
    let app = create_test_app().await;
    let org = setup_org(&app, "wonka", "WO01").await;

    let mut ids = Vec::new();
    for (title, at) in [("Planning", "10:00:00"), ("Retro", "09:00:00")] {
        let (status, meeting) = send(
            &app,
            Method::POST,
            "/meeting",
            Some(&org.admin),
            Some(json!({
                "title": title,
                "meeting_date": "2030-03-01",
                "meeting_time": at,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/meeting/{}/participants/{}", meeting["id"], org.employee_id),
            Some(&org.admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(meeting["id"].clone());
    }
    let retro_uri = format!("/meeting/{}", ids[1]);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &retro_uri,
        Some(&org.admin),
        Some(json!({ "meeting_time": "10:00:00", "title": "Moved retro" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Neither the meeting nor the calendar moved
    let (_, meetings) = send(&app, Method::GET, "/meeting", Some(&org.admin), None).await;
    let retro = meetings
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["id"] == ids[1])
        .unwrap();
    assert_eq!(retro["title"], "Retro");
    assert_eq!(retro["meeting_time"], "09:00:00");

    let (_, day) = send(
        &app,
        Method::GET,
        "/calendar/my/month?year=2030&month=3",
        Some(&org.employee),
        None,
    )
    .await;
    let day = day.as_array().unwrap();
    assert_eq!(day.len(), 2);
    assert_eq!(day[0]["title"], "Retro");
    assert_eq!(day[0]["event_time"], "09:00:00");
    assert_eq!(day[1]["title"], "Planning");

    // Nothing left to change once blanks are dropped
    for body in [json!({}), json!({ "title": "   " })] {
        let (status, _) = send(&app, Method::PATCH, &retro_uri, Some(&org.admin), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_month_orders_same_day_meetings_by_time() {
    let app = create_test_app().await;
    let org = setup_org(&app, "acme", "AC01").await;

    // Created out of order: afternoon first
    for (title, at) in [("Afternoon sync", "15:00:00"), ("Morning sync", "09:00:00")] {
        let (_, meeting) = send(
            &app,
            Method::POST,
            "/meeting",
            Some(&org.admin),
            Some(json!({
                "title": title,
                "meeting_date": "2030-05-20",
                "meeting_time": at,
            })),
        )
        .await;
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/meeting/{}/participants/{}", meeting["id"], org.employee_id),
            Some(&org.admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, month) = send(
        &app,
        Method::GET,
        "/calendar/my/month?year=2030&month=5",
        Some(&org.employee),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = month
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Morning sync", "Afternoon sync"]);
}

#[tokio::test]
async fn test_news_feed() {
    let app = create_test_app().await;
    let org = setup_org(&app, "hooli", "HO01").await;
    let news_uri = format!("/companies/{}/news", org.company_id);

    let (status, _) = send(
        &app,
        Method::POST,
        &news_uri,
        Some(&org.employee),
        Some(json!({ "title": "Hi", "description": "Not allowed" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, posted) = send(
        &app,
        Method::POST,
        &news_uri,
        Some(&org.admin),
        Some(json!({ "title": "Welcome", "description": "Office opens Monday" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, feed) = send(&app, Method::GET, &news_uri, Some(&org.employee), None).await;
    assert_eq!(feed.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("{}/{}", news_uri, posted["id"]),
        Some(&org.admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, feed) = send(&app, Method::GET, &news_uri, Some(&org.employee), None).await;
    assert!(feed.as_array().unwrap().is_empty());
}
