use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::context::Context;
use tfplug::data_source::{
    ConfigureDataSourceRequest, DataSource, DataSourceWithConfigure, ReadDataSourceRequest,
};
use tfplug::provider::Provider;
use tfplug::resource::Resource;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};

use crate::support::{
    capabilities, configure_provider, configured_resource, create_request, delete_request,
    mock_oauth, read_request,
};

const TYPE_NAME: &str = "zoom_phone_shared_line_group";

const GROUP_BODY: &str = r#"{
    "id": "slg1",
    "display_name": "Front Desk",
    "extension_id": "ext1",
    "extension_number": 1001,
    "primary_number": "+12055550100",
    "status": "active",
    "site": {"id": "site1", "name": "Main"}
}"#;

fn planned_group() -> DynamicValue {
    DynamicValue::new(Dynamic::object([
        ("id", Dynamic::Unknown),
        ("display_name", Dynamic::from("Front Desk")),
        ("extension_id", Dynamic::Unknown),
        ("extension_number", Dynamic::Number(1001.0)),
        ("primary_number", Dynamic::Unknown),
        ("site_id", Dynamic::from("site1")),
        ("status", Dynamic::from("active")),
    ]))
}

#[tokio::test(flavor = "multi_thread")]
async fn shared_line_group_lifecycle() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let create = server
        .mock("POST", "/phone/shared_line_groups")
        .match_body(Matcher::Json(json!({
            "display_name": "Front Desk",
            "extension_number": 1001,
            "site_id": "site1"
        })))
        .with_status(201)
        .with_body(r#"{"id":"slg1","display_name":"Front Desk"}"#)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/phone/shared_line_groups/slg1")
        .match_body(Matcher::Json(json!({
            "display_name": "Front Desk",
            "extension_number": 1001,
            "status": "active"
        })))
        .with_status(204)
        .create_async()
        .await;
    let get = server
        .mock("GET", "/phone/shared_line_groups/slg1")
        .with_body(GROUP_BODY)
        .expect(3)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/phone/shared_line_groups/slg1")
        .with_status(204)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let created = resource
        .create(Context::new(), create_request(TYPE_NAME, planned_group()))
        .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let state = created.new_state;
    assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "slg1");
    assert_eq!(
        state.get_string(&AttributePath::new("primary_number")).unwrap(),
        "+12055550100"
    );
    assert_eq!(
        state.value.attribute("extension_number"),
        &Dynamic::Number(1001.0)
    );

    let read = resource
        .read(Context::new(), read_request(TYPE_NAME, state.clone()))
        .await;
    assert!(read.diagnostics.is_empty());
    assert_eq!(
        read.new_state.unwrap().get_string(&AttributePath::new("site_id")).unwrap(),
        "site1"
    );

    let deleted = resource
        .delete(Context::new(), delete_request(TYPE_NAME, state))
        .await;
    assert!(deleted.diagnostics.is_empty());

    create.assert_async().await;
    patch.assert_async().await;
    get.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_follow_up_update_removes_new_group() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    server
        .mock("POST", "/phone/shared_line_groups")
        .with_status(201)
        .with_body(r#"{"id":"slg1"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/shared_line_groups/slg1")
        .with_body(GROUP_BODY)
        .create_async()
        .await;
    server
        .mock("PATCH", "/phone/shared_line_groups/slg1")
        .with_status(400)
        .with_body(r#"{"code":1001,"message":"Extension number is already in use."}"#)
        .create_async()
        .await;
    let cleanup = server
        .mock("DELETE", "/phone/shared_line_groups/slg1")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let created = resource
        .create(Context::new(), create_request(TYPE_NAME, planned_group()))
        .await;

    assert_eq!(created.diagnostics.len(), 1);
    assert_eq!(
        created.diagnostics[0].summary,
        "Error creating phone shared line group on updating"
    );
    assert!(created.diagnostics[0]
        .detail
        .contains("Extension number is already in use."));
    cleanup.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn read_drops_group_that_no_longer_exists() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;
    server
        .mock("GET", "/phone/shared_line_groups/slg1")
        .with_status(400)
        .with_body(r#"{"code":300,"message":"Shared line group does not exist."}"#)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let state = DynamicValue::new(Dynamic::object([("id", Dynamic::from("slg1"))]));
    let read = resource
        .read(Context::new(), read_request(TYPE_NAME, state))
        .await;

    assert!(read.diagnostics.is_empty());
    assert!(read.new_state.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn data_source_reads_group() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;
    server
        .mock("GET", "/phone/shared_line_groups/slg1")
        .with_body(GROUP_BODY)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let factories = provider.data_sources();
    let mut data_source = factories.get(TYPE_NAME).unwrap()();
    let configured = data_source
        .configure(Context::new(), ConfigureDataSourceRequest { provider_data })
        .await;
    assert!(configured.diagnostics.is_empty());

    let response = data_source
        .read(
            Context::new(),
            ReadDataSourceRequest {
                type_name: TYPE_NAME.to_string(),
                config: DynamicValue::new(Dynamic::object([("id", Dynamic::from("slg1"))])),
                provider_meta: None,
                client_capabilities: capabilities(),
            },
        )
        .await;

    assert!(response.diagnostics.is_empty());
    assert_eq!(
        response.state.get_string(&AttributePath::new("display_name")).unwrap(),
        "Front Desk"
    );
    assert_eq!(
        response.state.get_string(&AttributePath::new("extension_id")).unwrap(),
        "ext1"
    );
}
