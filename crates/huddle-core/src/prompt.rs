//! Generator prompt assembly.

use huddle_protocol::{ChatMessage, Role, WorkspaceInfo};

/// Formatting contract appended to meeting-like questions.
const MEETING_FORMAT: &str = "\
## Formatting rules for meetings and events
Follow this format exactly when listing meetings or events:

1. Group events under these markdown headers, in this order, and omit empty groups:
   ### 📅 Today
   ### 🗓️ Tomorrow
   ### 📆 This Week
   ### 🔜 Next Week
2. Write one bullet per event: `- 🕒 **<time>** - <title>`.
3. Use 12-hour time with AM/PM (for example 9:30 AM, 2:00 PM). Never use 24-hour time.
4. Add a short indented line under the bullet for the location, attendees or agenda when the context has them.
5. Mention related tasks, messages or board cards marked as relevant under the event they belong to.
6. If no events match, say so in one sentence and do not print empty headers.";

/// Everything the prompt template needs for one request.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub workspace: &'a WorkspaceInfo,
    pub context: &'a str,
    pub history: &'a [ChatMessage],
    pub question: &'a str,
    pub meeting_like: bool,
}

/// Builds the generator prompt from a fixed template.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    persona: Option<String>,
    history_window: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(None, 5)
    }
}

impl PromptBuilder {
    pub fn new(persona: Option<String>, history_window: usize) -> Self {
        Self {
            persona,
            history_window,
        }
    }

    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn build(&self, input: PromptInput<'_>) -> String {
        let mut sections = vec![self.preamble(input.workspace)];
        sections.push(format!("## Workspace content\n{}", input.context.trim()));

        let turns = render_turns(input.history, self.history_window);
        if !turns.is_empty() {
            sections.push(format!("## Recent conversation\n{turns}"));
        }
        sections.push(format!("## Question\nUser: {}", input.question.trim()));
        if input.meeting_like {
            sections.push(MEETING_FORMAT.to_string());
        }
        sections.push(
            "Answer using only the workspace content above. If it does not contain the answer, \
say that you could not find it in this workspace."
                .to_string(),
        );
        sections.join("\n\n")
    }

    fn preamble(&self, workspace: &WorkspaceInfo) -> String {
        match self.persona.as_deref().map(str::trim) {
            Some(persona) if !persona.is_empty() => persona.to_string(),
            _ => format!(
                "You are Huddle, the assistant of the \"{}\" workspace. You answer questions \
about the messages, tasks, notes, board cards and calendar events that already exist in \
this workspace. Be concise and specific, and refer to items by their titles.",
                workspace.name
            ),
        }
    }
}

/// The last `window` messages as `User:` / `Assistant:` lines.
fn render_turns(history: &[ChatMessage], window: usize) -> String {
    let start = history.len().saturating_sub(window);
    history[start..]
        .iter()
        .map(|message| {
            let speaker = match message.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{speaker}: {}", message.content.trim())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn workspace() -> WorkspaceInfo {
        WorkspaceInfo {
            id: "ws-1".to_string(),
            name: "Design".to_string(),
        }
    }

    #[test]
    fn includes_only_the_recent_window() {
        let history: Vec<_> = (0..7)
            .map(|idx| {
                if idx % 2 == 0 {
                    ChatMessage::user(format!("q{idx}"), Utc::now())
                } else {
                    ChatMessage::assistant(format!("a{idx}"), Utc::now())
                }
            })
            .collect();
        let workspace = workspace();
        let prompt = PromptBuilder::default().build(PromptInput {
            workspace: &workspace,
            context: "[NOTE] Retro",
            history: &history,
            question: "what did we decide?",
            meeting_like: false,
        });

        assert!(!prompt.contains("q0"));
        assert!(!prompt.contains("a1"));
        assert!(prompt.contains("User: q2\nAssistant: a3\nUser: q4\nAssistant: a5\nUser: q6"));
        assert!(prompt.contains("## Workspace content\n[NOTE] Retro"));
        assert!(prompt.contains("\"Design\" workspace"));
        assert!(!prompt.contains("Formatting rules"));
    }

    #[test]
    fn meeting_questions_carry_the_format_contract() {
        let workspace = workspace();
        let prompt = PromptBuilder::default().build(PromptInput {
            workspace: &workspace,
            context: "[EVENT] Standup",
            history: &[],
            question: "any meetings today?",
            meeting_like: true,
        });
        assert!(prompt.contains("### 📅 Today"));
        assert!(prompt.contains("12-hour time"));
        assert!(!prompt.contains("## Recent conversation"));
    }

    #[test]
    fn persona_override_replaces_preamble() {
        let workspace = workspace();
        let builder = PromptBuilder::new(Some("You are a terse bot.".to_string()), 5);
        let prompt = builder.build(PromptInput {
            workspace: &workspace,
            context: "",
            history: &[],
            question: "hi",
            meeting_like: false,
        });
        assert_eq!(prompt.lines().next(), Some("You are a terse bot."));
    }
}
