//! `ProcessAgentRuntime` against fake agent scripts.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;

use siumai_provider_agent::error::ErrorCategory;
use siumai_provider_agent::prelude::*;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

// Scripts are written and run one after another in a single test so no
// script is executed while another thread still holds it open for writing.
#[tokio::test]
async fn runs_scripted_agent_processes() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().display().to_string();

    let ok = write_script(
        dir.path(),
        "agent-ok",
        &format!(
            r#"cat > "{out}/prompt.txt"
printf '%s\n' "$@" > "{out}/args.txt"
echo '{{"type":"system","subtype":"init","session_id":"s1"}}'
echo ''
echo '{{"type":"assistant","message":{{"id":"m1","content":[{{"type":"text","text":"Hello"}}],"stop_reason":null}},"session_id":"s1"}}'
echo '{{"type":"assistant","message":{{"id":"m2","content":[{{"type":"text","text":"World"}}],"stop_reason":"end_turn"}},"session_id":"s1"}}'
echo '{{"type":"result","subtype":"success","is_error":false,"session_id":"s1","num_turns":1,"usage":{{"input_tokens":10,"output_tokens":5,"cache_creation_input_tokens":2,"cache_read_input_tokens":3}}}}'"#
        ),
    );

    let config = AgentProviderConfig::builder()
        .with_model("haiku")
        .with_binary_path(&ok)
        .with_max_turns(2)
        .build();
    let model = AgentChatModel::from_config(config);
    let response = model
        .chat(vec![ChatMessage::system("Be brief"), ChatMessage::user("Hi")])
        .await
        .unwrap();

    assert_eq!(response.text(), "HelloWorld");
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.usage.total_tokens, 20);
    assert_eq!(response.usage.cached_input_tokens, Some(3));
    assert_eq!(response.id.as_deref(), Some("s1"));

    let prompt = std::fs::read_to_string(dir.path().join("prompt.txt")).unwrap();
    assert_eq!(prompt, "User: Hi");
    let args = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
    let args: Vec<&str> = args.lines().collect();
    assert_eq!(
        args,
        vec![
            "-p",
            "--output-format",
            "stream-json",
            "--verbose",
            "--model",
            "haiku",
            "--system-prompt",
            "Be brief",
            "--max-turns",
            "2",
        ]
    );

    let streamed: Vec<ChatStreamEvent> = model
        .chat_stream(vec![ChatMessage::user("Hi")])
        .await
        .unwrap()
        .map(|event| event.unwrap())
        .collect()
        .await;
    assert_eq!(streamed.len(), 3);
    assert!(matches!(
        streamed[2],
        ChatStreamEvent::Finish {
            finish_reason: FinishReason::Stop,
            ..
        }
    ));

    let noisy = write_script(
        dir.path(),
        "agent-noisy",
        r#"head -c 200000 /dev/zero | tr '\0' x >&2
cat > /dev/null
echo '{"type":"assistant","message":{"content":[{"type":"text","text":"done"}],"stop_reason":"end_turn"}}'
echo '{"type":"result","subtype":"success","is_error":false}'"#,
    );
    let model = AgentChatModel::from_config(
        AgentProviderConfig::builder().with_binary_path(&noisy).build(),
    );
    let long_prompt = "x".repeat(200_000);
    let response = tokio::time::timeout(
        Duration::from_secs(30),
        model.chat(vec![ChatMessage::user(long_prompt)]),
    )
    .await
    .expect("agent with a full stderr pipe must not stall")
    .unwrap();
    assert_eq!(response.text(), "done");

    let unauthorized = write_script(
        dir.path(),
        "agent-401",
        r#"cat > /dev/null
echo 'API Error: 401 {"type":"error","error":{"type":"authentication_error"}}' >&2
exit 1"#,
    );
    let model = AgentChatModel::from_config(
        AgentProviderConfig::builder()
            .with_binary_path(&unauthorized)
            .build(),
    );
    let err = model.chat(vec![ChatMessage::user("Hi")]).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Authentication);
    assert_eq!(err.status_code(), Some(401));

    let crashed = write_script(
        dir.path(),
        "agent-crash",
        r#"cat > /dev/null
echo 'segfault somewhere' >&2
exit 3"#,
    );
    let model = AgentChatModel::from_config(
        AgentProviderConfig::builder().with_binary_path(&crashed).build(),
    );
    let err = model.chat(vec![ChatMessage::user("Hi")]).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Provider);

    let garbled = write_script(
        dir.path(),
        "agent-garbled",
        r#"cat > /dev/null
echo 'not json'"#,
    );
    let model = AgentChatModel::from_config(
        AgentProviderConfig::builder().with_binary_path(&garbled).build(),
    );
    let err = model.chat(vec![ChatMessage::user("Hi")]).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Provider);
    assert!(err.to_string().contains("not json"));
}

#[tokio::test]
async fn missing_binary_is_a_provider_error() {
    let dir = tempfile::tempdir().unwrap();
    let model = AgentChatModel::from_config(
        AgentProviderConfig::builder()
            .with_binary_path(dir.path().join("does-not-exist"))
            .build(),
    );
    let err = model.chat(vec![ChatMessage::user("Hi")]).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Provider);
}
