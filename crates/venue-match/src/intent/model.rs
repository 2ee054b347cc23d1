use serde::Deserialize;

/// Single-shot text-generation backend used by the extraction workflow.
///
/// Kept deliberately narrow (one prompt in, one completion out) so the
/// workflow can be exercised with scripted responses in tests and with the
/// offline heuristic model in the CLI.
pub trait IntentModel: Send + Sync {
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model backend failure: {0}")]
    Backend(String),
}

/// Fields the extraction prompt asks the model to produce.
#[derive(Debug, Deserialize)]
pub(crate) struct RawExtraction {
    pub(crate) organizer: Option<String>,
    pub(crate) event_type: Option<String>,
    pub(crate) attendees: Option<u32>,
    #[serde(default)]
    pub(crate) requirements: Vec<String>,
    #[serde(default)]
    pub(crate) constraints: Vec<String>,
}

/// Models frequently wrap JSON in markdown fences; unwrap the first fenced
/// block if present, otherwise return the input trimmed.
pub(crate) fn strip_code_fence(raw: &str) -> &str {
    if let Some(start) = raw.find("```json") {
        let rest = &raw[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
        return rest.trim();
    }
    if let Some(start) = raw.find("```") {
        let rest = &raw[start + "```".len()..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
        return rest.trim();
    }
    raw.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fences() {
        let raw = "Here you go:\n```json\n{\"attendees\": 50}\n```\nanything after";
        assert_eq!(strip_code_fence(raw), "{\"attendees\": 50}");
    }

    #[test]
    fn strips_bare_fences() {
        let raw = "```\n[\"quiet\"]\n```";
        assert_eq!(strip_code_fence(raw), "[\"quiet\"]");
    }

    #[test]
    fn passes_through_plain_json() {
        assert_eq!(strip_code_fence("  {\"a\":1} \n"), "{\"a\":1}");
    }
}
