use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::context::Context;
use tfplug::resource::Resource;
use tfplug::types::{AttributePath, Dynamic, DynamicValue};

use crate::support::{
    configure_provider, configured_resource, create_request, delete_request, mock_oauth,
    read_request, update_request,
};

const TYPE_NAME: &str = "zoom_phone_external_contact";

fn contact(name: &str, external_contact_id: Dynamic) -> DynamicValue {
    DynamicValue::new(Dynamic::object([
        ("external_contact_id", external_contact_id),
        ("id", Dynamic::Unknown),
        ("name", Dynamic::from(name)),
        ("description", Dynamic::Null),
        ("extension_number", Dynamic::Null),
        ("email", Dynamic::from("vendor@example.com")),
        ("phone_numbers", Dynamic::List(vec![Dynamic::from("+12055550123")])),
        ("auto_call_recorded", Dynamic::Bool(false)),
        ("routing_path", Dynamic::Unknown),
    ]))
}

fn remote_body(name: &str) -> String {
    json!({
        "external_contact_id": "ec1",
        "id": "vendor-1",
        "name": name,
        "email": "vendor@example.com",
        "phone_numbers": ["+12055550123"],
        "auto_call_recorded": false,
        "routing_path": "PSTN"
    })
    .to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn external_contact_lifecycle() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let create = server
        .mock("POST", "/phone/external_contacts")
        .match_body(Matcher::Json(json!({
            "name": "Vendor",
            "email": "vendor@example.com",
            "phone_numbers": ["+12055550123"],
            "auto_call_recorded": false
        })))
        .with_status(201)
        .with_body(r#"{"external_contact_id":"ec1"}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/external_contacts/ec1")
        .with_body(remote_body("Vendor"))
        .expect(2)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/phone/external_contacts/ec1")
        .match_body(Matcher::PartialJson(json!({"name": "Vendor Support"})))
        .with_status(204)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/external_contacts/ec1")
        .with_body(remote_body("Vendor Support"))
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/phone/external_contacts/ec1")
        .with_status(204)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let created = resource
        .create(
            Context::new(),
            create_request(TYPE_NAME, contact("Vendor", Dynamic::Unknown)),
        )
        .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let state = created.new_state;
    assert_eq!(
        state.get_string(&AttributePath::new("external_contact_id")).unwrap(),
        "ec1"
    );
    assert_eq!(state.get_string(&AttributePath::new("id")).unwrap(), "vendor-1");
    assert_eq!(
        state.get_string(&AttributePath::new("routing_path")).unwrap(),
        "PSTN"
    );

    let read = resource
        .read(Context::new(), read_request(TYPE_NAME, state.clone()))
        .await;
    assert!(read.diagnostics.is_empty());
    assert!(read.new_state.is_some());

    let planned = contact("Vendor Support", Dynamic::Unknown);
    let updated = resource
        .update(Context::new(), update_request(TYPE_NAME, state.clone(), planned))
        .await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(
        updated.new_state.get_string(&AttributePath::new("name")).unwrap(),
        "Vendor Support"
    );

    let deleted = resource
        .delete(Context::new(), delete_request(TYPE_NAME, updated.new_state))
        .await;
    assert!(deleted.diagnostics.is_empty());

    create.assert_async().await;
    patch.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_of_missing_contact_succeeds() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;
    let delete = server
        .mock("DELETE", "/phone/external_contacts/ec1")
        .with_status(400)
        .with_body(r#"{"code":300,"message":"External contact does not exist."}"#)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let deleted = resource
        .delete(
            Context::new(),
            delete_request(TYPE_NAME, contact("Vendor", Dynamic::from("ec1"))),
        )
        .await;

    assert!(deleted.diagnostics.is_empty());
    delete.assert_async().await;
}
