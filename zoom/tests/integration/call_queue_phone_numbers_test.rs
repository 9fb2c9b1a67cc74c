use mockito::{Matcher, Server};
use serde_json::{json, Value};
use tfplug::context::Context;
use tfplug::resource::Resource;
use tfplug::types::{Dynamic, DynamicValue};

use crate::support::{
    configure_provider, configured_resource, create_request, delete_request, mock_oauth,
};

const TYPE_NAME: &str = "zoom_phone_call_queue_phone_numbers";

fn number_ids(range: std::ops::RangeInclusive<u32>) -> Vec<String> {
    range.map(|i| format!("n{}", i)).collect()
}

fn by_id(ids: &[String]) -> Value {
    json!({
        "phone_numbers": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>()
    })
}

fn plan(ids: &[String]) -> DynamicValue {
    let numbers = ids
        .iter()
        .map(|id| {
            Dynamic::object([
                ("id", Dynamic::from(id.as_str())),
                ("number", Dynamic::Unknown),
                ("source", Dynamic::Unknown),
            ])
        })
        .collect();
    DynamicValue::new(Dynamic::object([
        ("call_queue_id", Dynamic::from("cq1")),
        ("phone_numbers", Dynamic::List(numbers)),
    ]))
}

#[tokio::test(flavor = "multi_thread")]
async fn twelve_numbers_are_assigned_in_chunks_of_five() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let ids = number_ids(1..=12);
    let assigned: Vec<Value> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| json!({"id": id, "number": format!("+1205555{:04}", i), "source": "internal"}))
        .collect();

    server
        .mock("GET", "/phone/call_queues/cq1")
        .with_body(
            json!({"id": "cq1", "phone_numbers": [{"id": "old", "number": "+12055559999"}]})
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    server
        .mock("GET", "/phone/call_queues/cq1")
        .with_body(json!({"id": "cq1", "phone_numbers": assigned}).to_string())
        .create_async()
        .await;

    // Already unassigned elsewhere
    let unassign = server
        .mock("DELETE", "/phone/call_queues/cq1/phone_numbers/old")
        .with_status(404)
        .with_body(r#"{"code":1001,"message":"Phone number not found"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut chunks = Vec::new();
    for chunk in [&ids[0..5], &ids[5..10], &ids[10..12]] {
        chunks.push(
            server
                .mock("POST", "/phone/call_queues/cq1/phone_numbers")
                .match_body(Matcher::Json(by_id(chunk)))
                .with_status(201)
                .expect(1)
                .create_async()
                .await,
        );
    }

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let created = resource
        .create(Context::new(), create_request(TYPE_NAME, plan(&ids)))
        .await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let numbers = created
        .new_state
        .value
        .attribute("phone_numbers")
        .as_list()
        .map(|items| items.to_vec())
        .unwrap_or_default();
    assert_eq!(numbers.len(), 12);
    assert_eq!(numbers[0].attribute("source").as_str(), Some("internal"));

    unassign.assert_async().await;
    for chunk in chunks {
        chunk.assert_async().await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn first_failing_chunk_stops_the_rest() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let ids = number_ids(1..=7);
    server
        .mock("GET", "/phone/call_queues/cq1")
        .with_body(json!({"id": "cq1", "phone_numbers": []}).to_string())
        .create_async()
        .await;
    let first = server
        .mock("POST", "/phone/call_queues/cq1/phone_numbers")
        .match_body(Matcher::Json(by_id(&ids[0..5])))
        .with_status(400)
        .with_body(r#"{"code":300,"message":"Phone number n3 is already assigned"}"#)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", "/phone/call_queues/cq1/phone_numbers")
        .match_body(Matcher::Json(by_id(&ids[5..7])))
        .expect(0)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let created = resource
        .create(Context::new(), create_request(TYPE_NAME, plan(&ids)))
        .await;

    assert_eq!(created.diagnostics.len(), 1);
    assert!(created.diagnostics[0]
        .detail
        .contains("could not sync phone call queue phone numbers cq1"));

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_unassigns_every_number() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;
    let unassign_all = server
        .mock("DELETE", "/phone/call_queues/cq1/phone_numbers")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let deleted = resource
        .delete(
            Context::new(),
            delete_request(TYPE_NAME, plan(&number_ids(1..=2))),
        )
        .await;

    assert!(deleted.diagnostics.is_empty(), "{:?}", deleted.diagnostics);
    unassign_all.assert_async().await;
}
