//! Mock `ask` CLI binary for integration testing
//!
//! Accepts the same `simulate` arguments as the real tool and prints output
//! shaped like its responses, so the harness can be tested without
//! credentials or a deployed skill. The utterance selects the behavior:
//!
//! - starts with `fail`: exit code 3 with a message on stderr
//! - contains `no caption`: JSON result without a caption
//! - contains `pending`: status `IN_PROGRESS`
//! - contains `plain`: free text instead of JSON
//! - contains `sleep`: sleeps 30 seconds before answering
//! - contains `echo`: caption is the raw `--text` argument
//! - contains `whoami`: caption lists locale, stage, profile and skill id
//! - contains `hello`: caption `Hello world`
//! - anything else: caption `You said <utterance>`

use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

const REQUIRED: [&str; 5] = ["--locale", "--stage", "--profile", "--skill-id", "--text"];

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.first().map(String::as_str) != Some("simulate") {
        eprintln!("Error: unknown command {:?}", args.first());
        std::process::exit(2);
    }

    let mut flags = HashMap::new();
    let mut rest = args[1..].iter();
    while let Some(flag) = rest.next() {
        match rest.next() {
            Some(value) => {
                flags.insert(flag.as_str(), value.clone());
            }
            None => {
                eprintln!("Error: missing value for {flag}");
                std::process::exit(2);
            }
        }
    }

    for flag in REQUIRED {
        if !flags.contains_key(flag) {
            eprintln!("Error: missing required option {flag}");
            std::process::exit(2);
        }
    }

    let raw_text = flags["--text"].clone();
    let text = raw_text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(&raw_text)
        .to_string();
    let lower = text.to_lowercase();

    if lower.starts_with("fail") {
        eprintln!("Error: simulation rejected for utterance \"{text}\"");
        std::process::exit(3);
    }

    if lower.contains("sleep") {
        std::thread::sleep(Duration::from_secs(30));
    }

    let caption = if lower.contains("echo") {
        raw_text.clone()
    } else if lower.contains("whoami") {
        format!(
            "{} {} {} {}",
            flags["--locale"], flags["--stage"], flags["--profile"], flags["--skill-id"]
        )
    } else if lower.contains("hello") {
        "Hello world".to_string()
    } else {
        format!("You said {text}")
    };

    let status = if lower.contains("pending") {
        "IN_PROGRESS"
    } else {
        "SUCCESSFUL"
    };

    if lower.contains("plain") {
        println!("Simulation finished.");
        println!("  \"status\": \"{status}\"");
        println!("  \"caption\": \"{caption}\"");
        return;
    }

    let caption = if lower.contains("no caption") {
        None
    } else {
        Some(caption)
    };

    println!("✓ Simulation created for simulation id: mock-simulation-1");
    println!("{}", render(status, caption.as_deref()));
}

fn render(status: &str, caption: Option<&str>) -> String {
    let responses: Value = match caption {
        Some(caption) => json!([{ "type": "Speech", "content": { "caption": caption } }]),
        None => json!([]),
    };

    let body = json!({
        "id": "mock-simulation-1",
        "status": status,
        "result": {
            "skillExecutionInfo": {
                "invocations": [{
                    "invocationResponse": {
                        "body": { "response": { "shouldEndSession": true } }
                    }
                }]
            },
            "alexaExecutionInfo": {
                "alexaResponses": responses
            }
        }
    });

    serde_json::to_string_pretty(&body).unwrap_or_default()
}
