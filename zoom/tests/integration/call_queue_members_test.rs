use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::context::Context;
use tfplug::resource::Resource;
use tfplug::types::{Dynamic, DynamicValue};

use crate::support::{
    configure_provider, configured_resource, create_request, delete_request, mock_oauth,
    read_request, update_request,
};

const TYPE_NAME: &str = "zoom_phone_call_queue_members";

fn user(id: Option<&str>, email: Option<&str>) -> Dynamic {
    let text = |v: Option<&str>| v.map(Dynamic::from).unwrap_or(Dynamic::Null);
    Dynamic::object([
        ("id", text(id)),
        ("email", text(email)),
        ("name", Dynamic::Unknown),
        ("extension_id", Dynamic::Unknown),
        ("receive_call", Dynamic::Unknown),
    ])
}

fn plan(users: Vec<Dynamic>, common_areas: Dynamic) -> DynamicValue {
    DynamicValue::new(Dynamic::object([
        ("call_queue_id", Dynamic::from("cq1")),
        ("users", Dynamic::List(users)),
        ("common_areas", common_areas),
    ]))
}

fn list_len(state: &DynamicValue, name: &str) -> Option<usize> {
    state.value.attribute(name).as_list().map(|items| items.len())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_adds_only_unmatched_users_and_drops_extra_common_areas() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let before = server
        .mock("GET", "/phone/call_queues/cq1/members")
        .match_query(Matcher::UrlEncoded("page_size".into(), "300".into()))
        .with_body(
            json!({
                "call_queue_members": [
                    {"id": "u1", "name": "Ann", "level": "user", "receive_call": true, "extension_id": "e1"},
                    {"id": "ca9", "name": "Lobby", "level": "commonArea", "extension_id": "e9"}
                ],
                "next_page_token": ""
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/call_queues/cq1/members")
        .match_query(Matcher::Any)
        .with_body(
            json!({
                "call_queue_members": [
                    {"id": "u1", "name": "Ann", "level": "user", "receive_call": true, "extension_id": "e1"},
                    {"id": "u2", "name": "Bo", "level": "user", "receive_call": true, "extension_id": "e2"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/phone/users")
        .match_query(Matcher::Any)
        .with_body(
            json!({
                "users": [
                    {"id": "u1", "email": "ann@example.com", "extension_id": "e1"},
                    {"id": "u2", "email": "a@x.com", "extension_id": "e2"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let remove_area = server
        .mock("DELETE", "/phone/call_queues/cq1/members/ca9")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let remove_user = server
        .mock("DELETE", "/phone/call_queues/cq1/members/u1")
        .expect(0)
        .create_async()
        .await;
    let add = server
        .mock("POST", "/phone/call_queues/cq1/members")
        .match_body(Matcher::Json(json!({
            "members": {"users": [{"email": "a@x.com"}]}
        })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let planned = plan(
        vec![user(Some("u1"), None), user(None, Some("a@x.com"))],
        Dynamic::List(vec![]),
    );
    let created = resource
        .create(Context::new(), create_request(TYPE_NAME, planned))
        .await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(list_len(&created.new_state, "users"), Some(2));
    assert_eq!(list_len(&created.new_state, "common_areas"), Some(0));

    before.assert_async().await;
    remove_area.assert_async().await;
    remove_user.assert_async().await;
    add.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn user_without_id_or_email_fails_before_any_call() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;
    let listing = server
        .mock("GET", "/phone/call_queues/cq1/members")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let created = resource
        .create(
            Context::new(),
            create_request(TYPE_NAME, plan(vec![user(None, None)], Dynamic::Null)),
        )
        .await;

    assert_eq!(created.diagnostics.len(), 1);
    assert!(created.diagnostics[0]
        .detail
        .contains("either `id` or `email` must be specified on user"));
    listing.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn read_of_deleted_queue_drops_state_and_delete_tolerates_404() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;
    server
        .mock("GET", "/phone/call_queues/cq1/members")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"code":300,"message":"Call queue does not exist."}"#)
        .create_async()
        .await;
    let remove_all = server
        .mock("DELETE", "/phone/call_queues/cq1/members")
        .with_status(404)
        .with_body(r#"{"code":1001,"message":"Not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;
    let state = plan(vec![user(Some("u1"), None)], Dynamic::Null);

    let read = resource
        .read(Context::new(), read_request(TYPE_NAME, state.clone()))
        .await;
    assert!(read.diagnostics.is_empty(), "{:?}", read.diagnostics);
    assert!(read.new_state.is_none());

    let deleted = resource
        .delete(Context::new(), delete_request(TYPE_NAME, state))
        .await;
    assert!(deleted.diagnostics.is_empty(), "{:?}", deleted.diagnostics);
    remove_all.assert_async().await;
}

fn common_area(id: &str) -> Dynamic {
    Dynamic::object([
        ("id", Dynamic::from(id)),
        ("name", Dynamic::Unknown),
        ("extension_id", Dynamic::Unknown),
        ("receive_call", Dynamic::Unknown),
    ])
}

fn area_members(ids: &[String]) -> String {
    let members: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "level": "commonArea", "extension_id": format!("x-{}", id)}))
        .collect();
    json!({"call_queue_members": members}).to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn eleven_common_areas_are_added_in_chunks_of_ten() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let ids: Vec<String> = (1..=11).map(|i| format!("ca{}", i)).collect();
    server
        .mock("GET", "/phone/call_queues/cq1/members")
        .match_query(Matcher::Any)
        .with_body(area_members(&[]))
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/call_queues/cq1/members")
        .match_query(Matcher::Any)
        .with_body(area_members(&ids))
        .create_async()
        .await;
    let first = server
        .mock("POST", "/phone/call_queues/cq1/members")
        .match_body(Matcher::Json(json!({"members": {"common_area_ids": ids[..10].to_vec()}})))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/phone/call_queues/cq1/members")
        .match_body(Matcher::Json(json!({"members": {"common_area_ids": ["ca11"]}})))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let areas = Dynamic::List(ids.iter().map(|id| common_area(id)).collect());
    let created = resource
        .create(
            Context::new(),
            create_request(
                TYPE_NAME,
                DynamicValue::new(Dynamic::object([
                    ("call_queue_id", Dynamic::from("cq1")),
                    ("users", Dynamic::Null),
                    ("common_areas", areas),
                ])),
            ),
        )
        .await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(list_len(&created.new_state, "common_areas"), Some(11));
    assert_eq!(created.new_state.value.attribute("users"), &Dynamic::Null);

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn update_treats_already_removed_member_as_success() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let before = vec!["ca1".to_string(), "ca2".to_string()];
    let after = vec!["ca1".to_string()];
    server
        .mock("GET", "/phone/call_queues/cq1/members")
        .match_query(Matcher::Any)
        .with_body(area_members(&before))
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/call_queues/cq1/members")
        .match_query(Matcher::Any)
        .with_body(area_members(&after))
        .create_async()
        .await;
    let remove = server
        .mock("DELETE", "/phone/call_queues/cq1/members/ca2")
        .with_status(404)
        .with_body(r#"{"code":1001,"message":"Member not found"}"#)
        .expect(1)
        .create_async()
        .await;
    let add = server
        .mock("POST", "/phone/call_queues/cq1/members")
        .expect(0)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let state = |ids: &[&str]| {
        DynamicValue::new(Dynamic::object([
            ("call_queue_id", Dynamic::from("cq1")),
            ("users", Dynamic::Null),
            (
                "common_areas",
                Dynamic::List(ids.iter().map(|id| common_area(id)).collect()),
            ),
        ]))
    };
    let updated = resource
        .update(
            Context::new(),
            update_request(TYPE_NAME, state(&["ca1", "ca2"]), state(&["ca1"])),
        )
        .await;

    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(list_len(&updated.new_state, "common_areas"), Some(1));

    remove.assert_async().await;
    add.assert_async().await;
}
