use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classified intent selecting the retrieval and response path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Delegate to the GitHub tool integration.
    #[serde(rename = "tool:github")]
    ToolGithub,
    /// Delegate to the Gmail tool integration.
    #[serde(rename = "tool:gmail")]
    ToolGmail,
    /// Calendar and meeting questions.
    #[serde(rename = "calendar")]
    Calendar,
    /// Notes questions.
    #[serde(rename = "notes")]
    Notes,
    /// Task questions.
    #[serde(rename = "tasks")]
    Tasks,
    /// Board and card questions.
    #[serde(rename = "board")]
    Board,
    /// General workspace questions.
    #[serde(rename = "chatbot")]
    Chatbot,
}

impl Intent {
    /// Every intent in declaration order.
    pub const ALL: [Intent; 7] = [
        Intent::ToolGithub,
        Intent::ToolGmail,
        Intent::Calendar,
        Intent::Notes,
        Intent::Tasks,
        Intent::Board,
        Intent::Chatbot,
    ];

    /// Return the wire label for the intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ToolGithub => "tool:github",
            Intent::ToolGmail => "tool:gmail",
            Intent::Calendar => "calendar",
            Intent::Notes => "notes",
            Intent::Tasks => "tasks",
            Intent::Board => "board",
            Intent::Chatbot => "chatbot",
        }
    }

    /// Whether the intent is served by an external tool integration.
    pub fn is_specialized(&self) -> bool {
        matches!(self, Intent::ToolGithub | Intent::ToolGmail)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str() == value)
            .ok_or_else(|| format!("unknown intent: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Intent;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_parse_back() {
        for intent in Intent::ALL {
            assert_eq!(intent.as_str().parse::<Intent>(), Ok(intent));
        }
        assert!("tool:slack".parse::<Intent>().is_err());
    }

    #[test]
    fn only_tool_intents_are_specialized() {
        let specialized: Vec<Intent> = Intent::ALL
            .into_iter()
            .filter(Intent::is_specialized)
            .collect();
        assert_eq!(specialized, vec![Intent::ToolGithub, Intent::ToolGmail]);
    }
}
