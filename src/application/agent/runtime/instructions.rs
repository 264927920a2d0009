use super::ToolCatalogue;
use serde_json::json;

pub(crate) const TOOL_RESULT_INSTRUCTION: &str = "Continue from this tool result. Call another tool if something is still missing, otherwise reply with the final action.";

const PROTOCOL: [&str; 6] = [
    "You may call tools to gather information before you answer.",
    "Reply with exactly one JSON object and nothing else, no prose and no code fences.",
    "Call a tool with {\"action\":\"call_tool\",\"tool\":\"<name>\",\"input\":{...}}.",
    "Ask for the tool list with {\"action\":\"call_tool\",\"tool\":\"list_tools\"}.",
    "Answer with {\"action\":\"final\",\"response\":...}; the response may be text or any JSON value.",
    "When a tool fails, either try a different tool or answer with what you already have.",
];

/// Caller instructions followed by the action protocol and the tool list.
pub(crate) fn system_prompt(instructions: &str, catalogue: &ToolCatalogue) -> String {
    let mut prompt = String::new();
    if !instructions.trim().is_empty() {
        prompt.push_str(instructions.trim());
        prompt.push_str("\n\n");
    }
    prompt.push_str(&PROTOCOL.join(" "));

    if catalogue.is_empty() {
        prompt.push_str(" No tools are currently configured.");
        return prompt;
    }

    for guidance in &catalogue.guidance {
        prompt.push_str(&format!(
            "\nGuidance from server '{}': {}",
            guidance.name, guidance.instruction
        ));
    }
    if !catalogue.tools.is_empty() {
        prompt.push_str("\nAvailable tools:");
    }
    for entry in &catalogue.tools {
        prompt.push_str(&format!("\n- {}", entry.name));
        if let Some(server) = &entry.server {
            prompt.push_str(&format!(" [{server}]"));
        }
        if let Some(description) = &entry.description {
            prompt.push_str(&format!(": {description}"));
        }
        if let Some(schema) = &entry.input_schema {
            prompt.push_str(&format!(" (input schema: {schema})"));
        }
    }
    prompt
}

/// First user turn: the request plus the catalogue as JSON.
pub(crate) fn opening_request(prompt: String, catalogue: &ToolCatalogue) -> String {
    let mut request = json!({
        "action": "user_request",
        "prompt": prompt,
    });
    if let (false, Ok(tools)) = (catalogue.is_empty(), serde_json::to_value(catalogue)) {
        request["tool_context"] = tools;
    }
    request.to_string()
}
