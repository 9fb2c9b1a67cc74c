use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::context::Context;
use tfplug::resource::Resource;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};

use crate::support::{
    configure_provider, configured_resource, create_request, delete_request, mock_oauth,
    update_request,
};

const TYPE_NAME: &str = "zoom_phone_call_queue_policy_voice_mail";

fn access_member(user: &str, shared_id: Dynamic) -> Dynamic {
    Dynamic::object([
        ("access_user_id", Dynamic::from(user)),
        ("allow_download", Dynamic::Bool(true)),
        ("allow_delete", Dynamic::Bool(false)),
        ("allow_sharing", Dynamic::Bool(false)),
        ("shared_id", shared_id),
    ])
}

fn policy(members: Vec<Dynamic>) -> DynamicValue {
    DynamicValue::new(Dynamic::object([
        ("call_queue_id", Dynamic::from("cq1")),
        ("access_members", Dynamic::List(members)),
    ]))
}

#[tokio::test(flavor = "multi_thread")]
async fn create_adds_missing_access_members() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let empty = server
        .mock("GET", "/phone/call_queues/cq1")
        .with_body(r#"{"id":"cq1","policy":{"voicemail_access_members":[]}}"#)
        .expect(1)
        .create_async()
        .await;
    let add = server
        .mock("POST", "/phone/call_queues/cq1/policies/voice_mail")
        .match_body(Matcher::Json(json!({
            "voicemail_access_members": [{
                "access_user_id": "u1",
                "allow_download": true,
                "allow_delete": false,
                "allow_sharing": false
            }]
        })))
        .with_status(201)
        .create_async()
        .await;
    let after = server
        .mock("GET", "/phone/call_queues/cq1")
        .with_body(
            r#"{"id":"cq1","policy":{"voicemail_access_members":[
                {"access_user_id":"u1","allow_download":true,"allow_delete":false,"allow_sharing":false,"shared_id":"s1"}
            ]}}"#,
        )
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/phone/call_queues/cq1/policies/voice_mail")
        .expect(0)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let created = resource
        .create(
            Context::new(),
            create_request(TYPE_NAME, policy(vec![access_member("u1", Dynamic::Unknown)])),
        )
        .await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let members = created.new_state.value.attribute("access_members");
    assert_eq!(
        members,
        &Dynamic::List(vec![access_member("u1", Dynamic::from("s1"))])
    );

    empty.assert_async().await;
    add.assert_async().await;
    after.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn update_to_empty_list_only_removes() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    server
        .mock("GET", "/phone/call_queues/cq1")
        .with_body(
            r#"{"id":"cq1","policy":{"voicemail_access_members":[
                {"access_user_id":"u1","allow_download":true,"allow_delete":false,"allow_sharing":false,"shared_id":"s1"}
            ]}}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let remove = server
        .mock("DELETE", "/phone/call_queues/cq1/policies/voice_mail")
        .match_query(Matcher::UrlEncoded("shared_ids".into(), "s1".into()))
        .with_status(204)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/call_queues/cq1")
        .with_body(r#"{"id":"cq1","policy":{"voicemail_access_members":[]}}"#)
        .create_async()
        .await;
    let add = server
        .mock("POST", "/phone/call_queues/cq1/policies/voice_mail")
        .expect(0)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/phone/call_queues/cq1/policies/voice_mail")
        .expect(0)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let prior = policy(vec![access_member("u1", Dynamic::from("s1"))]);
    let updated = resource
        .update(Context::new(), update_request(TYPE_NAME, prior, policy(vec![])))
        .await;

    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(
        updated.new_state.value.attribute("access_members"),
        &Dynamic::List(vec![])
    );

    remove.assert_async().await;
    add.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_every_shared_entry() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    server
        .mock("GET", "/phone/call_queues/cq1")
        .with_body(
            r#"{"id":"cq1","policy":{"voicemail_access_members":[
                {"access_user_id":"u1","shared_id":"s1"},
                {"access_user_id":"u2","shared_id":"s2"}
            ]}}"#,
        )
        .create_async()
        .await;
    let remove = server
        .mock("DELETE", "/phone/call_queues/cq1/policies/voice_mail")
        .match_query(Matcher::Exact("shared_ids=s1&shared_ids=s2".into()))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let deleted = resource
        .delete(
            Context::new(),
            delete_request(TYPE_NAME, policy(vec![access_member("u1", Dynamic::from("s1"))])),
        )
        .await;

    assert!(deleted.diagnostics.is_empty());
    remove.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_of_missing_queue_is_a_no_op() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;
    server
        .mock("GET", "/phone/call_queues/cq1")
        .with_status(400)
        .with_body(r#"{"code":300,"message":"Call queue does not exist."}"#)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let mut prior = DynamicValue::null();
    let _ = prior.set_string(&AttributePath::new("call_queue_id"), "cq1".to_string());
    let deleted = resource
        .delete(Context::new(), delete_request(TYPE_NAME, prior))
        .await;

    assert!(deleted.diagnostics.is_empty());
}

fn shared_ids(range: std::ops::RangeInclusive<u32>) -> Vec<String> {
    range.map(|i| format!("s{}", i)).collect()
}

fn shared_ids_query(ids: &[String]) -> String {
    ids.iter()
        .map(|id| format!("shared_ids={}", id))
        .collect::<Vec<_>>()
        .join("&")
}

fn queue_with_members(ids: &[String]) -> String {
    let members: Vec<_> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| json!({"access_user_id": format!("u{}", i + 1), "shared_id": id}))
        .collect();
    json!({"id": "cq1", "policy": {"voicemail_access_members": members}}).to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_shared_entries_twenty_at_a_time() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let ids = shared_ids(1..=21);
    server
        .mock("GET", "/phone/call_queues/cq1")
        .with_body(queue_with_members(&ids))
        .create_async()
        .await;
    let first = server
        .mock("DELETE", "/phone/call_queues/cq1/policies/voice_mail")
        .match_query(Matcher::Exact(shared_ids_query(&ids[..20])))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("DELETE", "/phone/call_queues/cq1/policies/voice_mail")
        .match_query(Matcher::Exact(shared_ids_query(&ids[20..])))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let deleted = resource
        .delete(
            Context::new(),
            delete_request(TYPE_NAME, policy(vec![access_member("u1", Dynamic::from("s1"))])),
        )
        .await;

    assert!(deleted.diagnostics.is_empty(), "{:?}", deleted.diagnostics);
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn removal_of_absent_entries_continues_with_next_chunk() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let ids = shared_ids(1..=21);
    server
        .mock("GET", "/phone/call_queues/cq1")
        .with_body(queue_with_members(&ids))
        .create_async()
        .await;
    let absent = server
        .mock("DELETE", "/phone/call_queues/cq1/policies/voice_mail")
        .match_query(Matcher::Exact(shared_ids_query(&ids[..20])))
        .with_status(400)
        .with_body(r#"{"code":404,"message":"Shared voicemail entry does not exist."}"#)
        .expect(1)
        .create_async()
        .await;
    let rest = server
        .mock("DELETE", "/phone/call_queues/cq1/policies/voice_mail")
        .match_query(Matcher::Exact(shared_ids_query(&ids[20..])))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let deleted = resource
        .delete(
            Context::new(),
            delete_request(TYPE_NAME, policy(vec![access_member("u1", Dynamic::from("s1"))])),
        )
        .await;

    assert!(deleted.diagnostics.is_empty(), "{:?}", deleted.diagnostics);
    absent.assert_async().await;
    rest.assert_async().await;
}
