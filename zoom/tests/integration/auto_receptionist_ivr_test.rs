use mockito::{Matcher, Server};
use serde_json::json;
use tfplug::context::Context;
use tfplug::resource::Resource;
use tfplug::types::{Dynamic, DynamicValue};

use crate::support::{
    configure_provider, configured_resource, create_request, delete_request, mock_oauth,
};

const TYPE_NAME: &str = "zoom_phone_auto_receptionist_ivr";
const IVR_PATH: &str = "/phone/auto_receptionists/ar1/ivr";

fn key_action(action: f64, target_extension: Option<&str>) -> Dynamic {
    let target = match target_extension {
        Some(extension_id) => Dynamic::object([
            ("extension_id", Dynamic::from(extension_id)),
            ("phone_number", Dynamic::Null),
            ("display_name", Dynamic::Unknown),
            ("extension_number", Dynamic::Unknown),
            ("id", Dynamic::Unknown),
        ]),
        None => Dynamic::Null,
    };
    Dynamic::object([
        ("action", Dynamic::Number(action)),
        ("target", target),
        ("voicemail_greeting", Dynamic::Null),
    ])
}

fn plan() -> DynamicValue {
    DynamicValue::new(Dynamic::object([
        ("auto_receptionist_id", Dynamic::from("ar1")),
        ("hours_type", Dynamic::from("business_hours")),
        ("holiday_id", Dynamic::Null),
        ("audio_prompt", Dynamic::Null),
        ("caller_enters_no_action", Dynamic::Null),
        (
            "key_actions",
            Dynamic::object([
                ("1", key_action(2.0, Some("e1"))),
                ("5", key_action(-1.0, None)),
            ]),
        ),
    ]))
}

#[tokio::test(flavor = "multi_thread")]
async fn create_writes_every_key_and_reads_back_configured_ones() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let key_one = server
        .mock("PATCH", IVR_PATH)
        .match_body(Matcher::Json(json!({
            "hours_type": "business_hours",
            "key_action": {"key": "1", "action": 2, "target": {"extension_id": "e1"}}
        })))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    // Common fields plus the eleven other keys
    let others = server
        .mock("PATCH", IVR_PATH)
        .with_status(204)
        .expect(12)
        .create_async()
        .await;
    server
        .mock("GET", IVR_PATH)
        .match_query(Matcher::UrlEncoded("hours_type".into(), "business_hours".into()))
        .with_body(
            json!({
                "audio_prompt": {"id": "", "name": "Default"},
                "key_actions": [
                    {"key": "0", "action": 100, "voicemail_greeting": {"id": "", "name": "Default"}},
                    {"key": "1", "action": 2, "target": {
                        "extension_id": "e1", "display_name": "Alice", "extension_number": "1001", "id": "u1"
                    }}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let created = resource
        .create(Context::new(), create_request(TYPE_NAME, plan()))
        .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);

    let key_actions = created
        .new_state
        .value
        .attribute("key_actions")
        .as_map()
        .cloned()
        .unwrap_or_default();
    let mut keys: Vec<_> = key_actions.keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["1", "5"]);
    assert_eq!(
        key_actions["1"].attribute("target").attribute("display_name").as_str(),
        Some("Alice")
    );
    assert_eq!(key_actions["5"].attribute("action"), &Dynamic::Number(-1.0));
    assert_eq!(created.new_state.value.attribute("audio_prompt"), &Dynamic::Null);

    key_one.assert_async().await;
    others.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_key_stops_the_write() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let key_three = server
        .mock("PATCH", IVR_PATH)
        .match_body(Matcher::PartialJson(json!({"key_action": {"key": "3"}})))
        .with_status(400)
        .with_body(r#"{"code":300,"message":"Invalid extension"}"#)
        .expect(1)
        .create_async()
        .await;
    // Common fields and keys 0, 1 and 2
    let earlier = server
        .mock("PATCH", IVR_PATH)
        .with_status(204)
        .expect(4)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let created = resource
        .create(Context::new(), create_request(TYPE_NAME, plan()))
        .await;

    assert_eq!(created.diagnostics.len(), 1);
    assert_eq!(
        created.diagnostics[0].summary,
        "Error creating phone auto receptionist ivr"
    );
    assert!(created.diagnostics[0]
        .detail
        .contains("error updating phone auto receptionist ivr on key=3"));

    key_three.assert_async().await;
    earlier.assert_async().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_restores_defaults() {
    let mut server = Server::new_async().await;
    mock_oauth(&mut server).await;

    let common = server
        .mock("PATCH", IVR_PATH)
        .match_body(Matcher::Json(json!({
            "hours_type": "business_hours",
            "audio_prompt_id": "",
            "caller_enters_no_action": {"action": -1, "audio_prompt_repeat": 3}
        })))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let voicemail_key = server
        .mock("PATCH", IVR_PATH)
        .match_body(Matcher::Json(json!({
            "hours_type": "business_hours",
            "key_action": {"key": "0", "action": 100, "voicemail_greeting_id": ""}
        })))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let repeat_key = server
        .mock("PATCH", IVR_PATH)
        .match_body(Matcher::Json(json!({
            "hours_type": "business_hours",
            "key_action": {"key": "*", "action": 21}
        })))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    let disabled_keys = server
        .mock("PATCH", IVR_PATH)
        .match_body(Matcher::PartialJson(json!({"key_action": {"action": -1}})))
        .with_status(204)
        .expect(10)
        .create_async()
        .await;

    let (provider, provider_data) = configure_provider(&server).await;
    let resource = configured_resource(&provider, &provider_data, TYPE_NAME).await;

    let deleted = resource
        .delete(Context::new(), delete_request(TYPE_NAME, plan()))
        .await;
    assert!(deleted.diagnostics.is_empty(), "{:?}", deleted.diagnostics);

    common.assert_async().await;
    voicemail_key.assert_async().await;
    repeat_key.assert_async().await;
    disabled_keys.assert_async().await;
}
