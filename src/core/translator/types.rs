use serde::{Deserialize, Serialize};

/// Source language sent with every request; detection is left to the API.
pub const AUTO_SOURCE: &str = "auto";

/// How layer text is cleaned up before it is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextNormalization {
    /// Trim surrounding whitespace.
    #[default]
    Trim,
    /// Remove embedded line breaks, then trim.
    StripNewlines,
}

impl TextNormalization {
    pub fn apply(self, text: &str) -> String {
        match self {
            TextNormalization::Trim => text.trim().to_string(),
            TextNormalization::StripNewlines => text
                .chars()
                .filter(|c| !matches!(c, '\n' | '\r'))
                .collect::<String>()
                .trim()
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source: String,
    pub target: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: AUTO_SOURCE.to_string(),
            target: target.into(),
        }
    }
}

/// Success body. Only `text` is read; a missing field is not an error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TranslationResponse {
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trim() {
        assert_eq!(TextNormalization::Trim.apply("  Hello\nWorld \n"), "Hello\nWorld");
    }

    #[test]
    fn test_strip_newlines() {
        assert_eq!(TextNormalization::StripNewlines.apply(" Hello\r\nWorld\n"), "HelloWorld");
    }

    #[test]
    fn test_request_body_escapes_quotes() {
        let body = serde_json::to_value(TranslationRequest::new("Say \"hi\"", "ko")).unwrap();
        assert_eq!(body, json!({"text": "Say \"hi\"", "source": "auto", "target": "ko"}));
    }

    #[test]
    fn test_response_without_text() {
        let resp: TranslationResponse = serde_json::from_value(json!({"message": "quota"})).unwrap();
        assert_eq!(resp.text, None);
    }
}
