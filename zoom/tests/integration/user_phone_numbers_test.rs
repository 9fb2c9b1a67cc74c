use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::context::Context;
use tfplug::resource::Resource;
use tfplug::types::{Dynamic, DynamicValue};

use crate::support::{
    configure_provider, configured_resource, create_request, delete_request, mock_oauth,
    read_request,
};

const TYPE_NAME: &str = "zoom_phone_user_phone_numbers";

fn numbers(entries: &[(Option<&str>, Option<&str>)]) -> DynamicValue {
    let text = |v: Option<&str>| v.map(Dynamic::from).unwrap_or(Dynamic::Null);
    let items = entries
        .iter()
        .map(|(id, number)| Dynamic::object([("id", text(*id)), ("number", text(*number))]))
        .collect();
    DynamicValue::new(Dynamic::object([
        ("user_id", Dynamic::from("u1")),
        ("phone_numbers", Dynamic::List(items)),
    ]))
}

#[tokio::test(flavor = "multi_thread")]
async fn create_swaps_numbers_by_id_and_number() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    server
        .mock("GET", "/phone/users/u1")
        .with_body(
            json!({"id": "u1", "phone_numbers": [
                {"id": "p1", "number": "+12055550199"},
                {"id": "p3", "number": "+12055550300"}
            ]})
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/users/u1")
        .with_body(
            json!({"id": "u1", "phone_numbers": [
                {"id": "p3", "number": "+12055550300"},
                {"id": "p2", "number": "+12055550100"}
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let unassign = server
        .mock("DELETE", "/phone/users/u1/phone_numbers/p1")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let assign = server
        .mock("POST", "/phone/users/u1/phone_numbers")
        .match_body(Matcher::Json(json!({
            "phone_numbers": [{"number": "+12055550100"}]
        })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    // p3 is kept by id even though the plan leaves its number unset
    let planned = numbers(&[(Some("p3"), None), (None, Some("+12055550100"))]);
    let created = resource
        .create(Context::new(), create_request(TYPE_NAME, planned))
        .await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let ids: Vec<_> = created
        .new_state
        .value
        .attribute("phone_numbers")
        .as_list()
        .unwrap_or_default()
        .iter()
        .filter_map(|n| n.attribute("id").as_str().map(str::to_string))
        .collect();
    assert_eq!(ids, vec!["p3", "p2"]);

    unassign.assert_async().await;
    assign.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_user_is_removed_from_state() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;
    server
        .mock("GET", "/phone/users/u1")
        .with_status(404)
        .with_body(r#"{"code":1001,"message":"User does not exist"}"#)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let read = resource
        .read(
            Context::new(),
            read_request(TYPE_NAME, numbers(&[(Some("p1"), None)])),
        )
        .await;

    assert!(read.diagnostics.is_empty(), "{:?}", read.diagnostics);
    assert!(read.new_state.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_unassigns_one_by_one_and_ignores_missing() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;
    server
        .mock("GET", "/phone/users/u1")
        .with_body(
            json!({"id": "u1", "phone_numbers": [
                {"id": "p1", "number": "+12055550199"},
                {"id": "p2", "number": "+12055550100"}
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let first = server
        .mock("DELETE", "/phone/users/u1/phone_numbers/p1")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("DELETE", "/phone/users/u1/phone_numbers/p2")
        .with_status(404)
        .with_body(r#"{"code":1001,"message":"Phone number not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let deleted = resource
        .delete(
            Context::new(),
            delete_request(TYPE_NAME, numbers(&[(Some("p1"), None), (Some("p2"), None)])),
        )
        .await;

    assert!(deleted.diagnostics.is_empty(), "{:?}", deleted.diagnostics);
    first.assert_async().await;
    second.assert_async().await;
}
