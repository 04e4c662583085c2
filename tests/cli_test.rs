use httpmock::prelude::*;
use std::process::Command;
use tempfile::TempDir;

const ENV_VARS: [&str; 4] = [
    "API_KEY",
    "AZURE_AI_MODEL_DEPLOYMENT_NAME",
    "AZURE_AI_PROJECT_ENDPOINT",
    "AZURE_AI_API_VERSION",
];

const SALES_CSV: &str = "\
Date,Region,Product,Salesperson,Units_Sold,Revenue
2024-10-01,East,Product A,Mike Brown,10,1000.00
2024-10-02,West,Product B,Sara Lee,3,750.00
";

fn workspace_with_csv() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("sample_sales_data.csv"), SALES_CSV).unwrap();
    temp_dir
}

fn reporter(dir: &TempDir, server: &MockServer) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_daily-sales-reporter"));
    cmd.current_dir(dir.path())
        .env("API_KEY", "cli-key")
        .env("AZURE_AI_MODEL_DEPLOYMENT_NAME", "writer")
        .env("AZURE_AI_PROJECT_ENDPOINT", server.base_url())
        .env("AZURE_AI_API_VERSION", "2024-10-21")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_missing_env_var_aborts_before_network_call() {
    for missing in ENV_VARS {
        let dir = workspace_with_csv();
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.any_request();
            then.status(200);
        });

        let output = reporter(&dir, &server)
            .env_remove(missing)
            .output()
            .unwrap();

        assert!(!output.status.success(), "{} missing should fail", missing);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains(missing), "stderr should name {}: {}", missing, stderr);
        api_mock.assert_hits(0);
    }
}

#[test]
fn test_cli_prints_conversation_with_mocked_report() {
    let dir = workspace_with_csv();
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/openai/deployments/writer/chat/completions")
            .header("api-key", "cli-key")
            .body_contains("$1,750.00");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Mocked stakeholder report"}}]
            }));
    });

    let output = reporter(&dir, &server).output().unwrap();

    api_mock.assert();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("===== Conversation ====="));
    assert!(stdout.contains("03 [ReportWriter]\nMocked stakeholder report"));
}

#[test]
fn test_missing_csv_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.any_request();
        then.status(200);
    });

    let output = reporter(&dir, &server).output().unwrap();

    assert_eq!(output.status.code(), Some(3));
    api_mock.assert_hits(0);
}
