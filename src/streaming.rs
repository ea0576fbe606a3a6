use std::collections::HashMap;
use std::io::{self, Write};

use adk_rust::futures::StreamExt;
use adk_rust::prelude::*;
use anyhow::{Context, Result};
use serde_json::Value;

use crate::runner::USER_ID;
use crate::telemetry::TelemetrySink;
use crate::theme::{self, Spinner};

pub const NO_TEAM_RESPONSE: &str = "No textual response produced by the team.";

/// Reconciles streamed text per team member. ADK emits both partial deltas
/// and full snapshots; the tracker keeps one buffer per member so repeated
/// snapshots never print twice and the final report can be recovered after
/// the stream ends.
#[derive(Default, Debug)]
pub struct MemberTextTracker {
    pub latest_final_text: Option<String>,
    pub latest_final_member: Option<String>,
    pub last_textful_member: Option<String>,
    pub by_member: HashMap<String, String>,
}

impl MemberTextTracker {
    /// Feeds one event's text through the member's buffer, returning the
    /// not-yet-printed delta.
    pub fn ingest(&mut self, member: &str, text: &str, partial: bool, is_final: bool) -> String {
        if text.is_empty() {
            return String::new();
        }

        self.last_textful_member = Some(member.to_string());
        if is_final && !text.trim().is_empty() {
            self.latest_final_text = Some(text.to_string());
            self.latest_final_member = Some(member.to_string());
        }

        let buffer = self.by_member.entry(member.to_string()).or_default();
        ingest_member_text(buffer, text, partial, is_final)
    }

    /// The team's answer: the last final snapshot (the summarizer's report in
    /// a normal run), falling back to whatever member spoke last.
    pub fn resolve_text(&self) -> Option<String> {
        if let Some(final_text) = &self.latest_final_text {
            return Some(final_text.clone());
        }

        let member = self.last_textful_member.as_ref()?;
        let text = self.by_member.get(member)?.trim();
        if text.is_empty() {
            return None;
        }
        Some(text.to_string())
    }
}

pub fn ingest_member_text(buffer: &mut String, text: &str, partial: bool, is_final: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Deltas and the first chunk print as-is.
    if partial || buffer.is_empty() {
        buffer.push_str(text);
        return text.to_string();
    }

    // A snapshot that extends the buffer prints only its new tail. This also
    // swallows exact repeats (empty suffix).
    if let Some(suffix) = text.strip_prefix(buffer.as_str()) {
        let delta = suffix.to_string();
        buffer.push_str(&delta);
        return delta;
    }

    // Divergent final snapshots are authoritative state but must not reprint
    // after partial streaming already emitted text.
    if is_final {
        buffer.clear();
        buffer.push_str(text);
        return String::new();
    }

    let overlap = suffix_prefix_overlap(buffer, text);
    let delta = text[overlap..].to_string();
    buffer.push_str(&delta);
    delta
}

/// Longest prefix of `incoming` that is already a suffix of `existing`,
/// measured on char boundaries.
pub fn suffix_prefix_overlap(existing: &str, incoming: &str) -> usize {
    let cap = existing.len().min(incoming.len());
    let boundaries = incoming
        .char_indices()
        .map(|(idx, _)| idx)
        .skip(1)
        .chain(std::iter::once(incoming.len()));

    let mut best = 0usize;
    for boundary in boundaries {
        if boundary > cap {
            break;
        }
        if existing.ends_with(&incoming[..boundary]) {
            best = boundary;
        }
    }
    best
}

/// What still has to be printed once the stream is over, given what was
/// already emitted for the final member.
pub fn final_stream_suffix(emitted: &str, final_text: &str) -> Option<String> {
    if final_text.trim().is_empty() {
        return None;
    }
    if emitted.is_empty() {
        return Some(final_text.to_string());
    }

    match final_text.strip_prefix(emitted) {
        Some("") => None,
        Some(suffix) => Some(suffix.to_string()),
        None if final_text.trim() == emitted.trim() => None,
        None => Some(format!("\n{final_text}")),
    }
}

pub fn event_text(event: &Event) -> String {
    let Some(content) = event.content() else {
        return String::new();
    };
    content
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<String>()
}

pub fn extract_tool_failure_message(response: &Value) -> Option<String> {
    if let Some(message) = response.get("error").and_then(Value::as_str) {
        return Some(message.to_string());
    }

    let status = response
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if status.eq_ignore_ascii_case("error") || status.eq_ignore_ascii_case("failed") {
        return response
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
    }
    None
}

fn record_tool_call(member: &str, tool: &str, telemetry: &TelemetrySink) {
    tracing::info!(tool = %tool, member = %member, "tool call requested");
    telemetry.emit(
        "tool.requested",
        serde_json::json!({"tool": tool, "member": member}),
    );
}

fn record_tool_result(member: &str, tool: &str, response: &Value, telemetry: &TelemetrySink) {
    match extract_tool_failure_message(response) {
        Some(error_message) => {
            tracing::warn!(tool = %tool, member = %member, error = %error_message, "tool call failed");
            telemetry.emit(
                "tool.failed",
                serde_json::json!({"tool": tool, "member": member, "error": error_message}),
            );
        }
        None => {
            tracing::info!(tool = %tool, member = %member, "tool call completed");
            telemetry.emit(
                "tool.succeeded",
                serde_json::json!({"tool": tool, "member": member}),
            );
        }
    }
}

pub fn emit_tool_lifecycle_events(event: &Event, telemetry: &TelemetrySink) {
    let Some(content) = event.content() else {
        return;
    };

    for part in &content.parts {
        match part {
            Part::FunctionCall { name, .. } => record_tool_call(&event.author, name, telemetry),
            Part::FunctionResponse {
                function_response, ..
            } => record_tool_result(
                &event.author,
                &function_response.name,
                &function_response.response,
                telemetry,
            ),
            _ => {}
        }
    }
}

fn record_member_completion(event: &Event, text: &str, telemetry: &TelemetrySink) {
    if event.is_final_response() && !text.trim().is_empty() {
        telemetry.emit(
            "member.responded",
            serde_json::json!({"member": event.author, "chars": text.len()}),
        );
    }
}

/// Runs the team to completion without printing, returning the final report.
pub async fn run_team(
    runner: &Runner,
    session_id: &str,
    request: &str,
    telemetry: &TelemetrySink,
) -> Result<String> {
    let mut stream = runner
        .run(
            adk_rust::UserId::new_unchecked(USER_ID),
            adk_rust::SessionId::new_unchecked(session_id),
            Content::new("user").with_text(request),
        )
        .await
        .context("failed to start team run")?;
    let mut tracker = MemberTextTracker::default();

    while let Some(event_result) = stream.next().await {
        let event = match event_result {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!("team event error: {err:#}");
                continue;
            }
        };
        if event.author == "user" {
            continue;
        }

        let text = event_text(&event);
        tracing::debug!(
            member = %event.author,
            is_final = event.is_final_response(),
            partial = event.llm_response.partial,
            text_len = text.len(),
            "received team event"
        );

        emit_tool_lifecycle_events(&event, telemetry);
        record_member_completion(&event, &text, telemetry);

        let _ = tracker.ingest(
            &event.author,
            &text,
            event.llm_response.partial,
            event.is_final_response(),
        );
    }

    Ok(tracker
        .resolve_text()
        .unwrap_or_else(|| NO_TEAM_RESPONSE.to_string()))
}

/// Runs the team and streams output to the terminal as it arrives. When
/// `show_member_responses` is on, a labelled rule marks each switch to a
/// different member, so the researchers' intermediate findings stay visible
/// above the final report.
pub async fn run_team_streaming(
    runner: &Runner,
    session_id: &str,
    request: &str,
    show_member_responses: bool,
    telemetry: &TelemetrySink,
) -> Result<String> {
    let mut stream = runner
        .run(
            adk_rust::UserId::new_unchecked(USER_ID),
            adk_rust::SessionId::new_unchecked(session_id),
            Content::new("user").with_text(request),
        )
        .await
        .context("failed to start team run")?;

    let mut tracker = MemberTextTracker::default();
    let mut emitted_by_member: HashMap<String, String> = HashMap::new();
    let mut current_member: Option<String> = None;
    let mut printed_any_output = false;
    let mut spinner = Some(Spinner::start("Researching leads..."));

    while let Some(event_result) = stream.next().await {
        let event = match event_result {
            Ok(event) => event,
            Err(err) => {
                eprintln!("{}  team event error: {err:#}{}", theme::DIM, theme::RESET);
                continue;
            }
        };
        if event.author == "user" {
            continue;
        }

        let text = event_text(&event);
        emit_tool_lifecycle_events(&event, telemetry);
        record_member_completion(&event, &text, telemetry);

        let delta = tracker.ingest(
            &event.author,
            &text,
            event.llm_response.partial,
            event.is_final_response(),
        );
        if delta.is_empty() {
            continue;
        }

        if let Some(active) = spinner.take() {
            active.stop();
        }

        if show_member_responses && current_member.as_deref() != Some(event.author.as_str()) {
            if printed_any_output {
                println!();
            }
            println!("{}", theme::member_rule(&event.author));
            current_member = Some(event.author.clone());
        }

        print!("{delta}");
        io::stdout().flush().context("failed to flush stdout")?;

        emitted_by_member
            .entry(event.author.clone())
            .or_default()
            .push_str(&delta);
        printed_any_output = true;
    }

    // Stop the spinner if the stream ended without any output.
    drop(spinner);

    if !printed_any_output {
        let fallback = tracker
            .resolve_text()
            .unwrap_or_else(|| NO_TEAM_RESPONSE.to_string());
        println!("{fallback}");
        return Ok(fallback);
    }

    if let (Some(final_text), Some(final_member)) = (
        tracker.latest_final_text.as_deref(),
        tracker.latest_final_member.as_deref(),
    ) {
        let emitted = emitted_by_member
            .get(final_member)
            .map(String::as_str)
            .unwrap_or_default();
        if let Some(suffix) = final_stream_suffix(emitted, final_text) {
            print!("{suffix}");
            io::stdout().flush().context("failed to flush stdout")?;
        }
    }
    println!();

    Ok(tracker
        .resolve_text()
        .unwrap_or_else(|| NO_TEAM_RESPONSE.to_string()))
}
