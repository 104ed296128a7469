//! Executor integration tests with recording execution clients.

use geobind_rs::config::{GeobindConfig, InvocationConfig};
use geobind_rs::protocol::{
    InvocationEventPayload, MessageSeverity, RemoteExecutionError, ToolMessage, ToolOutputs,
    WireValue,
};
use geobind_rs::tools::{
    EnvironmentSettings, ExecutorOptions, GeoprocessingExecutor, InvocationError, ParameterValues,
};
use geobind_rs::catalog::MakeRouteLayer;
use geobind_rs::catalog::network::UturnPolicy;
use geobind_rs_test_utils::{
    FailingExecutionClient, RecordingEventSink, RecordingExecutionClient, SlowExecutionClient,
    scenario_registry,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn outputs() -> ToolOutputs {
    ToolOutputs {
        values: [("c".to_string(), WireValue::String("done".to_string()))]
            .into_iter()
            .collect(),
        messages: vec![ToolMessage {
            severity: MessageSeverity::Info,
            text: "Succeeded".to_string(),
        }],
    }
}

#[tokio::test]
async fn execute_submits_payload_and_emits_events() {
    let client = Arc::new(RecordingExecutionClient::new().with_outputs(outputs()));
    let sink = Arc::new(RecordingEventSink::new());
    let executor = GeoprocessingExecutor::new(scenario_registry(), client.clone())
        .with_event_sink(sink.clone());

    let result = executor
        .execute(
            "Scenario",
            &ParameterValues::new().with("a", 7),
            &EnvironmentSettings::new().with("workspace", "C:/gis.gdb"),
        )
        .await
        .expect("execute");
    assert_eq!(result.get("c"), Some(&WireValue::String("done".to_string())));

    let submitted = client.last().expect("payload");
    assert_eq!(submitted.tool_target, "Scenario_test");
    assert_eq!(
        submitted.ordered_values,
        vec![WireValue::Long(7), WireValue::Bool(true)]
    );
    assert_eq!(
        submitted.environment.get("workspace"),
        Some(&WireValue::String("C:/gis.gdb".to_string()))
    );

    assert_eq!(sink.kinds(), vec!["submitted", "completed"]);
    let events = sink.events();
    assert!(events.iter().all(|event| event.invocation_id == submitted.invocation_id));
    assert!(matches!(
        events[1].payload,
        InvocationEventPayload::Completed { output_count: 1 }
    ));
}

#[tokio::test]
async fn validation_failure_never_reaches_client() {
    let client = Arc::new(RecordingExecutionClient::new());
    let executor = GeoprocessingExecutor::new(scenario_registry(), client.clone());
    let err = executor
        .execute("Scenario", &ParameterValues::new(), &EnvironmentSettings::new())
        .await
        .unwrap_err();
    assert!(err.validation_errors().is_some());
    assert!(client.submitted().is_empty());
}

#[tokio::test]
async fn unknown_tool_is_reported() {
    let executor =
        GeoprocessingExecutor::new(scenario_registry(), Arc::new(RecordingExecutionClient::new()));
    let err = executor
        .execute("Nope", &ParameterValues::new(), &EnvironmentSettings::new())
        .await
        .unwrap_err();
    assert!(matches!(err, InvocationError::UnknownTool(name) if name == "Nope"));
}

#[tokio::test]
async fn remote_errors_pass_through_with_tool_name() {
    let remote = RemoteExecutionError::Failed {
        status: 500,
        code: Some("ERROR 000732".to_string()),
        message: "Input dataset does not exist".to_string(),
    };
    let sink = Arc::new(RecordingEventSink::new());
    let executor = GeoprocessingExecutor::new(
        scenario_registry(),
        Arc::new(FailingExecutionClient::new(remote.clone())),
    )
    .with_event_sink(sink.clone());

    let err = executor
        .execute(
            "Scenario",
            &ParameterValues::new().with("a", 1),
            &EnvironmentSettings::new(),
        )
        .await
        .unwrap_err();
    let InvocationError::Remote { tool, source } = err else {
        panic!("expected remote error");
    };
    assert_eq!(tool, "Scenario");
    assert_eq!(source, remote);
    assert_eq!(sink.kinds(), vec!["submitted", "failed"]);
}

#[tokio::test]
async fn slow_submission_times_out() {
    let options = ExecutorOptions::from(&InvocationConfig {
        submit_timeout_ms: Some(20),
        ..InvocationConfig::default()
    });
    let executor = GeoprocessingExecutor::new(
        scenario_registry(),
        Arc::new(SlowExecutionClient::new(Duration::from_secs(5))),
    )
    .with_options(options);

    let err = executor
        .execute(
            "Scenario",
            &ParameterValues::new().with("a", 1),
            &EnvironmentSettings::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InvocationError::Timeout { ref tool, after } if tool == "Scenario" && after == Duration::from_millis(20)
    ));
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn typed_tools_run_without_registration() {
    let client = Arc::new(RecordingExecutionClient::new());
    let executor = geobind_rs::executor_with(
        scenario_registry(),
        client.clone(),
        &GeobindConfig::default(),
    );

    let mut route = MakeRouteLayer::new("Streets_ND");
    route
        .uturn_policy(UturnPolicy::DeadEndsOnly)
        .expect("uturn policy");
    executor.run(&route).await.expect("run");

    let payload = client.last().expect("payload");
    assert_eq!(payload.tool_target, "MakeRouteLayer_na");
    assert_eq!(
        payload.ordered_values[8],
        WireValue::String("ALLOW_DEAD_ENDS_ONLY".to_string())
    );
}

#[tokio::test]
async fn independent_invocations_run_concurrently() {
    let client = Arc::new(RecordingExecutionClient::new());
    let executor = GeoprocessingExecutor::new(scenario_registry(), client.clone());

    let handles = (0..8_i64)
        .map(|a| {
            let executor = executor.clone();
            tokio::spawn(async move {
                executor
                    .execute(
                        "Scenario",
                        &ParameterValues::new().with("a", a),
                        &EnvironmentSettings::new(),
                    )
                    .await
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.await.expect("join").expect("execute");
    }

    let mut seen = client
        .submitted()
        .into_iter()
        .map(|payload| payload.ordered_values[0].clone())
        .collect::<Vec<_>>();
    seen.sort_by_key(|value| value.to_string());
    assert_eq!(seen, (0..8).map(WireValue::Long).collect::<Vec<_>>());
    let ids = client
        .submitted()
        .iter()
        .map(|payload| payload.invocation_id)
        .collect::<std::collections::HashSet<_>>();
    assert_eq!(ids.len(), 8);
}
