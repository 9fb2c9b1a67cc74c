use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::context::Context;
use tfplug::resource::Resource;
use tfplug::types::{Dynamic, DynamicValue};

use crate::support::{configure_provider, configured_resource, create_request, mock_oauth};

const GROUP_PATH: &str = "/phone/shared_line_groups/slg1";

fn numbers_plan(numbers: &[&str], primary: &str) -> DynamicValue {
    let items = numbers
        .iter()
        .map(|n| Dynamic::object([("id", Dynamic::Null), ("number", Dynamic::from(*n))]))
        .collect();
    DynamicValue::new(Dynamic::object([
        ("shared_line_group_id", Dynamic::from("slg1")),
        ("phone_numbers", Dynamic::List(items)),
        ("primary_number", Dynamic::from(primary)),
    ]))
}

fn common_area(id: &str) -> Dynamic {
    Dynamic::object([
        ("id", Dynamic::from(id)),
        ("name", Dynamic::Unknown),
        ("extension_id", Dynamic::Unknown),
        ("receive_call", Dynamic::Unknown),
    ])
}

#[tokio::test(flavor = "multi_thread")]
async fn phone_numbers_assign_then_set_primary() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    server
        .mock("GET", GROUP_PATH)
        .with_body(json!({"id": "slg1", "phone_numbers": []}).to_string())
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", GROUP_PATH)
        .with_body(
            json!({
                "id": "slg1",
                "primary_number": "+12055550101",
                "phone_numbers": [
                    {"id": "p1", "number": "+12055550100"},
                    {"id": "p2", "number": "+12055550101"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let assign = server
        .mock("POST", format!("{}/phone_numbers", GROUP_PATH).as_str())
        .match_body(Matcher::Json(json!({
            "phone_numbers": [{"number": "+12055550100"}, {"number": "+12055550101"}]
        })))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    let primary = server
        .mock("PATCH", GROUP_PATH)
        .match_body(Matcher::Json(json!({"primary_number": "+12055550101"})))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let type_name = "zoom_phone_shared_line_group_phone_numbers";
    let resource = configured_resource(&provider, &provider_data, type_name).await;

    let created = resource
        .create(
            Context::new(),
            create_request(
                type_name,
                numbers_plan(&["+12055550100", "+12055550101"], "+12055550101"),
            ),
        )
        .await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(
        created.new_state.value.attribute("primary_number").as_str(),
        Some("+12055550101")
    );

    assign.assert_async().await;
    primary.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn primary_outside_the_list_is_rejected_before_any_call() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;
    let lookup = server.mock("GET", GROUP_PATH).expect(0).create_async().await;

    let (provider, provider_data) = configure_provider(&server).await;
    let type_name = "zoom_phone_shared_line_group_phone_numbers";
    let resource = configured_resource(&provider, &provider_data, type_name).await;

    let created = resource
        .create(
            Context::new(),
            create_request(type_name, numbers_plan(&["+12055550100"], "+12055550199")),
        )
        .await;

    assert_eq!(created.diagnostics.len(), 1);
    assert!(created.diagnostics[0]
        .detail
        .contains("primary number +12055550199 must be included in phone_numbers"));
    lookup.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn members_add_missing_common_areas_only() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    server
        .mock("GET", GROUP_PATH)
        .with_body(
            json!({"id": "slg1", "members": {"common_areas": [
                {"id": "ca1", "name": "Lobby", "extension_id": "e1"}
            ]}})
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", GROUP_PATH)
        .with_body(
            json!({"id": "slg1", "members": {"common_areas": [
                {"id": "ca1", "name": "Lobby", "extension_id": "e1"},
                {"id": "ca2", "name": "Kitchen", "extension_id": "e2"}
            ]}})
            .to_string(),
        )
        .create_async()
        .await;
    let add = server
        .mock("POST", format!("{}/members", GROUP_PATH).as_str())
        .match_body(Matcher::Json(json!({"members": {"common_area_ids": ["ca2"]}})))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    let users = server
        .mock("GET", "/phone/users")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let type_name = "zoom_phone_shared_line_group_members";
    let resource = configured_resource(&provider, &provider_data, type_name).await;

    let planned = DynamicValue::new(Dynamic::object([
        ("shared_line_group_id", Dynamic::from("slg1")),
        ("users", Dynamic::Null),
        (
            "common_areas",
            Dynamic::List(vec![common_area("ca1"), common_area("ca2")]),
        ),
    ]));
    let created = resource
        .create(Context::new(), create_request(type_name, planned))
        .await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(created.new_state.value.attribute("users"), &Dynamic::Null);
    assert_eq!(
        created
            .new_state
            .value
            .attribute("common_areas")
            .as_list()
            .map(|items| items.len()),
        Some(2)
    );

    add.assert_async().await;
    users.assert_async().await;
}
