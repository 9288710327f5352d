//! Exchanges with a fake table service

use mockito::{Matcher, Server};
use serde_json::json;

use event_desk::client::Client;
use event_desk::event::EventStatus;
use event_desk::manager::{ManagerDraft, ManagerStatus};
use event_desk::task::TaskStatus;
use event_desk::traits::{DirectorySource, EventSource};
use event_desk::{EventId, Lifecycle, ManagerDirectory, ManagerId};

const API_KEY: &str = "anon-key";
const BEARER: &str = "Bearer anon-key";

fn pending_event() -> serde_json::Value {
    json!({
        "id": "1",
        "name": "Annual Tech Conference",
        "type": "corporate",
        "date": "2025-02-01",
        "time": "09:00:00",
        "venue": "Convention Center",
        "status": "pending",
        "description": null,
        "attendee_count": 150,
        "assigned_manager_id": "1"
    })
}

#[tokio::test]
async fn list_events() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::new_async().await;
    let mock = server.mock("GET", "/rest/v1/events")
        .match_query(Matcher::UrlEncoded("select".into(), "*".into()))
        .match_header("apikey", API_KEY)
        .match_header("authorization", BEARER)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([pending_event()]).to_string())
        .create_async().await;

    let client = Client::new(server.url(), API_KEY).unwrap();
    let events = client.list_events().await.unwrap();
    mock.assert_async().await;

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.id, EventId::from("1"));
    assert_eq!(event.status, EventStatus::Pending);
    assert_eq!(event.event_type.to_string(), "corporate");
    assert_eq!(event.time.map(|t| t.format("%H:%M").to_string()), Some("09:00".to_string()));
    assert_eq!(event.assigned_manager_id, Some(ManagerId::from("1")));
}

#[tokio::test]
async fn service_messages_are_kept() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::new_async().await;
    let _mock = server.mock("GET", "/rest/v1/events")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Invalid API key"}"#)
        .create_async().await;
    let _other = server.mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("Bad gateway")
        .create_async().await;

    let client = Client::new(server.url(), "wrong-key").unwrap();
    let err = client.list_events().await.unwrap_err();
    assert!(err.is_remote());
    assert_eq!(err.to_string(), "Invalid API key");

    let err = client.profiles(&[ManagerId::from("1")]).await.unwrap_err();
    assert!(err.is_remote());
    assert!(err.to_string().contains("502"));
}

#[tokio::test]
async fn accept_over_the_wire() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::new_async().await;
    let get = server.mock("GET", "/rest/v1/events")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([pending_event()]).to_string())
        .create_async().await;

    let mut accepted = pending_event();
    accepted["status"] = json!("in-progress");
    let patch = server.mock("PATCH", "/rest/v1/events")
        .match_query(Matcher::UrlEncoded("id".into(), "eq.1".into()))
        .match_header("prefer", "return=representation")
        .match_body(Matcher::PartialJson(json!({"status": "in-progress", "time": "09:00"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([accepted]).to_string())
        .create_async().await;

    let mut lifecycle = Lifecycle::new(Client::new(server.url(), API_KEY).unwrap());
    let id = EventId::from("1");
    let event = lifecycle.accept(&id).await.unwrap();
    get.assert_async().await;
    patch.assert_async().await;

    assert_eq!(event.status, EventStatus::InProgress);
    assert!(lifecycle.tasks().tasks_for(&id).is_empty() == false);
}

#[tokio::test]
async fn updating_a_vanished_event() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::new_async().await;
    let _get = server.mock("GET", "/rest/v1/events")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([pending_event()]).to_string())
        .create_async().await;
    // Someone else removed the row in the meantime
    let _patch = server.mock("PATCH", "/rest/v1/events")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async().await;

    let mut lifecycle = Lifecycle::new(Client::new(server.url(), API_KEY).unwrap());
    let err = lifecycle.decline(&EventId::from("1"), "Double booked").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn list_managers_over_the_wire() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::new_async().await;
    let roles = server.mock("GET", "/rest/v1/user_roles")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "user_id".into()),
            Matcher::UrlEncoded("role".into(), "eq.manager".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"user_id": "1"}, {"user_id": "2"}]"#)
        .create_async().await;
    let profiles = server.mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::UrlEncoded("user_id".into(), r#"in.("1","2")"#.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([
            {"user_id": "1", "full_name": "John Smith", "email": "john.smith@example.com", "mobile": null, "status": "active"},
            {"user_id": "2", "full_name": null, "email": "sarah.johnson@example.com", "status": "inactive"},
        ]).to_string())
        .create_async().await;
    let counts = server.mock("GET", "/rest/v1/events")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "assigned_manager_id".into()),
            Matcher::UrlEncoded("status".into(), "neq.deleted".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"assigned_manager_id": "1"}, {"assigned_manager_id": "1"}]"#)
        .create_async().await;

    let directory = ManagerDirectory::new(Client::new(server.url(), API_KEY).unwrap());
    let managers = directory.list().await.unwrap();
    roles.assert_async().await;
    profiles.assert_async().await;
    counts.assert_async().await;

    assert_eq!(managers.len(), 2);
    let john = managers.iter().find(|m| m.id == ManagerId::from("1")).unwrap();
    assert_eq!(john.display_name(), "John Smith");
    assert_eq!(john.assigned_events_count, 2);
    let sarah = managers.iter().find(|m| m.id == ManagerId::from("2")).unwrap();
    assert_eq!(sarah.display_name(), "sarah.johnson@example.com");
    assert_eq!(sarah.assigned_events_count, 0);
}

#[tokio::test]
async fn no_manager_means_a_single_read() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::new_async().await;
    let roles = server.mock("GET", "/rest/v1/user_roles")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async().await;
    let profiles = server.mock("GET", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async().await;

    let directory = ManagerDirectory::new(Client::new(server.url(), API_KEY).unwrap());
    assert!(directory.list().await.unwrap().is_empty());
    roles.assert_async().await;
    profiles.assert_async().await;
}

/// The reads a directory does before deleting manager "3", who has no event
async fn mock_manager_without_events(server: &mut mockito::ServerGuard) -> Vec<mockito::Mock> {
    vec![
        server.mock("GET", "/rest/v1/user_roles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"user_id": "3", "role": "manager"}]"#)
            .create_async().await,
        server.mock("GET", "/rest/v1/profiles")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"user_id": "3", "full_name": "Michael Brown", "email": "michael.brown@example.com", "status": "inactive"}]"#)
            .create_async().await,
        server.mock("GET", "/rest/v1/events")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async().await,
    ]
}

#[tokio::test]
async fn delete_manager_removes_the_role_first() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::new_async().await;
    let _reads = mock_manager_without_events(&mut server).await;
    let delete_role = server.mock("DELETE", "/rest/v1/user_roles")
        .match_query(Matcher::UrlEncoded("user_id".into(), "eq.3".into()))
        .with_status(204)
        .create_async().await;
    let delete_profile = server.mock("DELETE", "/rest/v1/profiles")
        .match_query(Matcher::UrlEncoded("user_id".into(), "eq.3".into()))
        .with_status(204)
        .create_async().await;
    let restore_role = server.mock("POST", "/rest/v1/user_roles")
        .expect(0)
        .create_async().await;

    let mut directory = ManagerDirectory::new(Client::new(server.url(), API_KEY).unwrap());
    directory.delete(&ManagerId::from("3")).await.unwrap();
    delete_role.assert_async().await;
    delete_profile.assert_async().await;
    restore_role.assert_async().await;
}

#[tokio::test]
async fn failed_profile_deletion_restores_the_role() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::new_async().await;
    let _reads = mock_manager_without_events(&mut server).await;
    let delete_role = server.mock("DELETE", "/rest/v1/user_roles")
        .match_query(Matcher::UrlEncoded("user_id".into(), "eq.3".into()))
        .with_status(204)
        .create_async().await;
    let _delete_profile = server.mock("DELETE", "/rest/v1/profiles")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "boom"}"#)
        .create_async().await;
    let restore_role = server.mock("POST", "/rest/v1/user_roles")
        .match_body(Matcher::Json(json!([{"user_id": "3", "role": "manager"}])))
        .with_status(201)
        .create_async().await;

    let mut directory = ManagerDirectory::new(Client::new(server.url(), API_KEY).unwrap());
    let err = directory.delete(&ManagerId::from("3")).await.unwrap_err();
    assert!(err.is_remote());
    assert_eq!(err.to_string(), "boom");
    delete_role.assert_async().await;
    restore_role.assert_async().await;
}

#[tokio::test]
async fn failed_role_grant_removes_the_new_profile() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::new_async().await;
    let insert_profile = server.mock("POST", "/rest/v1/profiles")
        .match_body(Matcher::PartialJson(json!({"full_name": "Bob Builder", "email": "bob@example.com"})))
        .with_status(201)
        .create_async().await;
    let _grant = server.mock("POST", "/rest/v1/user_roles")
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "boom"}"#)
        .create_async().await;
    let remove_profile = server.mock("DELETE", "/rest/v1/profiles")
        .match_query(Matcher::Regex("user_id=eq.".to_string()))
        .with_status(204)
        .create_async().await;

    let mut directory = ManagerDirectory::new(Client::new(server.url(), API_KEY).unwrap());
    let draft = ManagerDraft {
        full_name: "Bob Builder".to_string(),
        email: "bob@example.com".to_string(),
        mobile: None,
        status: ManagerStatus::Active,
    };
    let err = directory.create(draft).await.unwrap_err();
    assert!(err.is_remote());
    assert_eq!(err.to_string(), "boom");
    insert_profile.assert_async().await;
    remove_profile.assert_async().await;
}

#[tokio::test]
async fn tasks_are_stored_in_their_table() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut server = Server::new_async().await;
    let _get = server.mock("GET", "/rest/v1/events")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([pending_event()]).to_string())
        .create_async().await;
    let _patch = server.mock("PATCH", "/rest/v1/events")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([pending_event()]).to_string())
        .create_async().await;
    let load = server.mock("GET", "/rest/v1/tasks")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{
            "id": "t1",
            "event_id": "7",
            "name": "Print badges",
            "assigned_to": "Print Shop",
            "due_date": "2025-01-30",
            "status": "completed",
            "assignment": "accepted"
        }]).to_string())
        .create_async().await;
    let save = server.mock("POST", "/rest/v1/tasks")
        .match_header("prefer", Matcher::Regex("resolution=merge-duplicates".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""id":"t1""#.to_string()),
            Matcher::Regex("Setup venue decorations".to_string()),
        ]))
        .with_status(201)
        .create_async().await;

    let mut lifecycle = Lifecycle::load(Client::new(server.url(), API_KEY).unwrap()).await.unwrap();
    load.assert_async().await;
    let stored = lifecycle.tasks().tasks_for(&EventId::from("7"));
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status(), TaskStatus::Completed);

    lifecycle.accept(&EventId::from("1")).await.unwrap();
    lifecycle.save_tasks().await.unwrap();
    save.assert_async().await;
}
