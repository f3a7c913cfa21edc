//! Mapping between docchat messages and the Gemini wire format.

use docchat_core::{
    Content, CoreError, FunctionCall, LlmRequest, LlmResponse, Message, Part,
    Result, Role, ToolDeclaration,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

// ── Request types ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<WireContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<WireTool>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireTool {
    pub function_declarations: Vec<ToolDeclaration>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerationConfig {
    pub temperature: f32,
}

// ── Response types ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<WireContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub message: String,
}

// ── docchat → Gemini ───────────────────────────────────────────────

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        Role::User | Role::Tool => "user",
    }
}

/// Gemini requires `functionResponse.response` to be an object.
fn response_object(value: &Value) -> Value {
    match value {
        Value::Object(_) => value.clone(),
        other => json!({ "result": other }),
    }
}

fn part_to_wire(part: &Part) -> Option<Value> {
    match part {
        Part::Text { text } => Some(json!({ "text": text })),
        Part::FunctionCall(call) => {
            let mut part = json!({ "functionCall": { "name": call.name, "args": call.args } });
            if let Some(signature) = &call.thought_signature {
                part["thoughtSignature"] = json!(signature);
            }
            Some(part)
        }
        Part::FunctionResponse(response) => Some(json!({
            "functionResponse": {
                "name": response.name,
                "response": response_object(&response.response),
            }
        })),
        // Decoded Gemini parts keep the whole wire object and go back as-is.
        Part::Other { payload: Value::Object(object), .. } => Some(Value::Object(object.clone())),
        Part::Other { kind, .. } => {
            debug!(kind = %kind, "dropping part with no Gemini encoding");
            None
        }
    }
}

fn message_to_wire(message: &Message) -> WireContent {
    let parts = match &message.content {
        Content::Text(text) => vec![json!({ "text": text })],
        Content::Parts(parts) => parts.iter().filter_map(part_to_wire).collect(),
    };
    WireContent { role: Some(wire_role(message.role).to_string()), parts }
}

pub(crate) fn build_request(request: &LlmRequest, temperature: f32) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: request.messages.iter().map(message_to_wire).collect(),
        system_instruction: request.system_instruction.as_ref().map(|text| WireContent {
            role: None,
            parts: vec![json!({ "text": text })],
        }),
        tools: if request.tools.is_empty() {
            Vec::new()
        } else {
            vec![WireTool { function_declarations: request.tools.clone() }]
        },
        generation_config: GenerationConfig { temperature },
    }
}

// ── Gemini → docchat ───────────────────────────────────────────────

fn part_from_wire(index: usize, value: Value) -> Option<Part> {
    let Value::Object(mut object) = value else {
        return None;
    };

    // Reasoning summaries come back as text parts flagged `thought`.
    if object.get("thought").and_then(Value::as_bool) == Some(true) {
        return Some(Part::Other { kind: "thought".to_string(), payload: Value::Object(object) });
    }
    if let Some(Value::String(text)) = object.remove("text") {
        return Some(Part::text(text));
    }

    if let Some(call) = object.get("functionCall") {
        let name = call.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
        let id = call
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{name}-{index}"));
        let args = call.get("args").cloned().unwrap_or_else(|| json!({}));
        let thought_signature =
            object.get("thoughtSignature").and_then(Value::as_str).map(str::to_string);
        return Some(Part::FunctionCall(FunctionCall { id, name, args, thought_signature }));
    }

    let kind = object.keys().find(|key| *key != "thoughtSignature")?.clone();
    debug!(kind = %kind, "keeping uninterpreted Gemini part");
    Some(Part::Other { kind, payload: Value::Object(object) })
}

/// Decode the first candidate. A lone text part becomes [`Content::Text`];
/// anything else stays structured.
pub(crate) fn parse_response(response: GenerateContentResponse) -> Result<LlmResponse> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::Model("Gemini returned no candidates".to_string()))?;

    let wire_parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let parts: Vec<Part> = wire_parts
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| part_from_wire(i, value))
        .collect();

    let content = match <[Part; 1]>::try_from(parts) {
        Ok([Part::Text { text }]) => Content::Text(text),
        Ok([part]) => Content::Parts(vec![part]),
        Err(parts) => Content::Parts(parts),
    };

    Ok(LlmResponse {
        message: Message::new(Role::Assistant, content),
        finish_reason: candidate.finish_reason,
    })
}
