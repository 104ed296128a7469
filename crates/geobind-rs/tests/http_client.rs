//! HTTP execution client against a local axum engine stub.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use geobind_rs::config::{GeobindConfig, LayeredConfigOptions};
use geobind_rs::protocol::{InvocationId, InvocationPayload, RemoteExecutionError, ToolOutputs, WireValue};
use geobind_rs::tools::{
    EnvironmentSettings, ExecutionClient, HttpExecutionClient, InvocationError, ParamValue,
    ParameterValues,
};
use geobind_rs_test_utils::scenario_registry;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Payloads seen by the stub engine, keyed by path target.
#[derive(Default)]
struct Received(Mutex<Vec<(String, InvocationPayload)>>);

async fn execute(
    State(received): State<Arc<Received>>,
    Path(target): Path<String>,
    Json(payload): Json<InvocationPayload>,
) -> impl IntoResponse {
    if let Ok(mut seen) = received.0.lock() {
        seen.push((target.clone(), payload.clone()));
    }
    match target.as_str() {
        "Scenario_test" => (
            StatusCode::OK,
            Json(json!({
                "values": { "c": { "type": "string", "value": "C:/out.gdb/result" } },
                "messages": [{ "severity": "warning", "text": "Dataset already exists" }],
            })),
        )
            .into_response(),
        "Garbled_test" => (StatusCode::OK, "not json").into_response(),
        "Plain_test" => (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": "ERROR 000735", "message": "Value is required" })),
        )
            .into_response(),
    }
}

async fn spawn_engine() -> (SocketAddr, Arc<Received>) {
    let received = Arc::new(Received::default());
    let app = Router::new()
        .route("/{target}/execute", post(execute))
        .with_state(received.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (addr, received)
}

fn payload(target: &str) -> InvocationPayload {
    InvocationPayload {
        invocation_id: InvocationId::nil(),
        tool_target: target.to_string(),
        ordered_values: vec![WireValue::Long(5), WireValue::Bool(true)],
        environment: Default::default(),
        output_names: vec!["c".to_string()],
    }
}

#[tokio::test]
async fn success_body_decodes_into_outputs() {
    let (addr, received) = spawn_engine().await;
    let client = HttpExecutionClient::new(format!("http://{addr}/")).expect("client");

    let outputs: ToolOutputs = client.submit(payload("Scenario_test")).await.expect("submit");
    assert_eq!(
        outputs.get("c"),
        Some(&WireValue::String("C:/out.gdb/result".to_string()))
    );
    assert!(outputs.has_warnings());

    let seen = received.0.lock().expect("lock");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "Scenario_test");
    assert_eq!(seen[0].1, payload("Scenario_test"));
}

#[tokio::test]
async fn failure_body_maps_to_remote_failure() {
    let (addr, _) = spawn_engine().await;
    let client = HttpExecutionClient::new(format!("http://{addr}")).expect("client");

    let err = client.submit(payload("Other_test")).await.unwrap_err();
    assert_eq!(
        err,
        RemoteExecutionError::Failed {
            status: 400,
            code: Some("ERROR 000735".to_string()),
            message: "Value is required".to_string(),
        }
    );

    let err = client.submit(payload("Plain_test")).await.unwrap_err();
    assert_eq!(
        err,
        RemoteExecutionError::Failed {
            status: 502,
            code: None,
            message: "upstream unavailable".to_string(),
        }
    );
}

#[tokio::test]
async fn undecodable_success_is_invalid_response() {
    let (addr, _) = spawn_engine().await;
    let client = HttpExecutionClient::new(format!("http://{addr}")).expect("client");
    let err = client.submit(payload("Garbled_test")).await.unwrap_err();
    assert!(matches!(err, RemoteExecutionError::InvalidResponse(_)));
}

#[tokio::test]
async fn unreachable_engine_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = HttpExecutionClient::new(format!("http://{addr}")).expect("client");
    let err = client.submit(payload("Scenario_test")).await.unwrap_err();
    assert!(matches!(err, RemoteExecutionError::Transport(_)));
}

#[tokio::test]
async fn executor_from_layered_config_reaches_engine() {
    let (addr, received) = spawn_engine().await;
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path().join("work");
    std::fs::create_dir_all(&cwd).expect("cwd");
    std::fs::write(
        cwd.join("geobind.json5"),
        format!(
            r#"{{
                client: {{ base_url: "http://{addr}", headers: {{ "x-api-key": "secret" }} }},
                invocation: {{ derived_slots: "placeholder", submit_timeout_ms: 5000 }},
            }}"#
        ),
    )
    .expect("write");
    let options = LayeredConfigOptions {
        cwd: cwd.clone(),
        system_config_path: Some(temp.path().join("system.json5")),
        user_config_path: Some(temp.path().join("user.json5")),
        runtime_paths: Vec::new(),
    };
    let config: GeobindConfig = GeobindConfig::load_layered_with_options(options)
        .expect("config")
        .config;

    let client = HttpExecutionClient::from_config(&config.client).expect("client");
    let executor = geobind_rs::executor_with(scenario_registry(), Arc::new(client), &config);
    executor
        .execute(
            "Scenario",
            &ParameterValues::new().with("a", 5),
            &EnvironmentSettings::new(),
        )
        .await
        .expect("execute");

    let seen = received.0.lock().expect("lock");
    assert_eq!(
        seen[0].1.ordered_values,
        vec![WireValue::Long(5), WireValue::Bool(true), WireValue::Null]
    );
}

#[tokio::test]
async fn engine_failures_carry_the_tool_name() {
    let (addr, _) = spawn_engine().await;
    let config = GeobindConfig::default();
    let client = HttpExecutionClient::new(format!("http://{addr}")).expect("client");
    let executor = geobind_rs::executor_with(
        geobind_rs::catalog::catalog_registry().expect("catalog"),
        Arc::new(client),
        &config,
    );
    let err = executor
        .execute(
            "MakeRouteLayer",
            &ParameterValues::new().with(
                "network_data_source",
                ParamValue::FeatureRef("Streets_ND".to_string()),
            ),
            &EnvironmentSettings::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvocationError::Remote { ref tool, source: RemoteExecutionError::Failed { status: 400, .. } }
            if tool == "MakeRouteLayer"
    ));
}
