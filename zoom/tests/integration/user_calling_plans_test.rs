use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::context::Context;
use tfplug::resource::Resource;
use tfplug::types::{Dynamic, DynamicValue};

use crate::support::{
    configure_provider, configured_resource, create_request, delete_request, mock_oauth,
    update_request,
};

const TYPE_NAME: &str = "zoom_phone_user_calling_plans";

fn plan(code: f64, name: Dynamic) -> Dynamic {
    Dynamic::object([
        ("type", Dynamic::Number(code)),
        ("billing_account_id", Dynamic::Null),
        ("name", name),
    ])
}

fn plans(plans: Vec<Dynamic>) -> DynamicValue {
    DynamicValue::new(Dynamic::object([
        ("user_id", Dynamic::from("u1")),
        ("calling_plans", Dynamic::List(plans)),
    ]))
}

#[tokio::test(flavor = "multi_thread")]
async fn create_assigns_plans_and_fills_names() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let assign = server
        .mock("POST", "/phone/users/u1/calling_plans")
        .match_body(Matcher::Json(json!({"calling_plans": [{"type": 200}]})))
        .with_status(201)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/users/u1")
        .with_body(r#"{"id":"u1","calling_plans":[{"type":200}]}"#)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let created = resource
        .create(
            Context::new(),
            create_request(TYPE_NAME, plans(vec![plan(200.0, Dynamic::Unknown)])),
        )
        .await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(
        created.new_state.value.attribute("calling_plans"),
        &Dynamic::List(vec![plan(200.0, Dynamic::from("UNLIMITED_PLAN_US_CA"))])
    );
    assign.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn update_replaces_prior_plans() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let unassign = server
        .mock("DELETE", "/phone/users/u1/calling_plans/200")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let assign = server
        .mock("POST", "/phone/users/u1/calling_plans")
        .match_body(Matcher::Json(json!({"calling_plans": [{"type": 3000}]})))
        .with_status(201)
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/users/u1")
        .with_body(r#"{"id":"u1","calling_plans":[{"type":3000,"name":"Pro"}]}"#)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let prior = plans(vec![plan(200.0, Dynamic::from("UNLIMITED_PLAN_US_CA"))]);
    let planned = plans(vec![plan(3000.0, Dynamic::Unknown)]);
    let updated = resource
        .update(Context::new(), update_request(TYPE_NAME, prior, planned))
        .await;

    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(
        updated.new_state.value.attribute("calling_plans"),
        &Dynamic::List(vec![plan(3000.0, Dynamic::from("Pro"))])
    );
    unassign.assert_async().await;
    assign.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_unassigns_every_plan_and_joins_failures() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let gone = server
        .mock("DELETE", "/phone/users/u1/calling_plans/100")
        .with_status(404)
        .with_body(r#"{"code":404,"message":"Calling plan not found."}"#)
        .create_async()
        .await;
    let first = server
        .mock("DELETE", "/phone/users/u1/calling_plans/200")
        .with_status(400)
        .with_body(r#"{"code":1001,"message":"Plan 200 is in use."}"#)
        .create_async()
        .await;
    let second = server
        .mock("DELETE", "/phone/users/u1/calling_plans/3000")
        .with_status(400)
        .with_body(r#"{"code":1001,"message":"Plan 3000 is in use."}"#)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let prior = plans(vec![
        plan(100.0, Dynamic::Null),
        plan(200.0, Dynamic::Null),
        plan(3000.0, Dynamic::Null),
    ]);
    let deleted = resource
        .delete(Context::new(), delete_request(TYPE_NAME, prior))
        .await;

    assert_eq!(deleted.diagnostics.len(), 1);
    let detail = &deleted.diagnostics[0].detail;
    assert!(detail.contains("could not unassign calling plan 200 from user u1"));
    assert!(detail.contains("Plan 200 is in use."));
    assert!(detail.contains("could not unassign calling plan 3000 from user u1"));
    assert!(detail.contains("Plan 3000 is in use."));
    assert!(!detail.contains("calling plan 100"));

    gone.assert_async().await;
    first.assert_async().await;
    second.assert_async().await;
}
