//! Prompt catalogue.
//!
//! Every fixed string sent to the provider or shown as a canned reply lives
//! here so the client and the front ends agree on them.

use forge_models::{ComplexityMode, DisplayType};

/// System instruction bound to every chat session.
pub const SYSTEM_INSTRUCTION: &str = r#"You are InsightForge, an elite research agent.
Your goal is to provide crystal-clear, well-structured answers based on the specific URL or File provided by the user.

Rules:
1. CITATIONS: You MUST cite your sources. When you use information found via the search tool or the provided document, append a bracketed number like [1] at the end of the sentence.
2. Be concise but comprehensive. Use Markdown.
3. Do not hallucinate.
4. IF the user asks for a "Twitter Thread", format it as a series of tweets (1/x, 2/x) with punchy hooks and viral formatting.
5. IF the user sets mode to "ELI5" (Explain Like I'm 5), use simple analogies and avoid jargon.
6. IF the user sets mode to "Expert", use technical terminology, focus on nuance, data, and strategic implications."#;

/// Marker prefixed to follow-ups in simplified mode.
pub const SIMPLIFIED_MARKER: &str = "(Mode: Explain Like I'm 5) ";

/// Marker prefixed to follow-ups in expert mode.
pub const EXPERT_MARKER: &str = "(Mode: PhD Expert Level) ";

/// Model text used when the first analysis returns no text.
pub const EMPTY_ANALYSIS_TEXT: &str =
    "I analyzed the content but couldn't generate a text summary. Ask me anything about it.";

/// Model text used when a follow-up returns no text.
pub const EMPTY_REPLY_TEXT: &str = "I couldn't generate a response.";

/// Reply returned by the client when a follow-up fails at the provider.
pub const FOLLOW_UP_FAILURE_TEXT: &str = "Sorry, I encountered an error processing your request.";

/// Where users can support the project; linked from the capacity texts.
pub const SUPPORT_URL: &str = "https://twitter.com/Rafay835113";

/// Transcript notice appended when a follow-up turn fails outright.
pub const DEGRADED_SERVICE_TEXT: &str = "⚠️ **High Traffic Warning**\n\n\
InsightForge is an independent project maintained by a solo developer. \
We are currently experiencing unusually high volume.\n\n\
Please wait a few moments and try again. \
[Support the project](https://twitter.com/Rafay835113) to help us keep the lights on.";

/// Title of the notice shown when the first analysis fails.
pub const CAPACITY_NOTICE_TITLE: &str = "High Traffic Alert";

/// Body of the notice shown when the first analysis fails.
pub const CAPACITY_NOTICE_BODY: &str = "InsightForge is an independent project maintained by a solo developer. \
Due to viral traffic, our servers are currently at max capacity.\n\n\
Please give us a moment to cool down and try your request again shortly.\n\n\
Support the developer: https://twitter.com/Rafay835113";

/// Status lines cycled while the first analysis runs.
pub const LOADING_STAGES: [&str; 7] = [
    "Resolving source...",
    "Extracting semantic data...",
    "Searching for related entities...",
    "Cross-referencing sources...",
    "Detecting contradictions...",
    "Synthesizing master report...",
    "Finalizing citations...",
];

/// Seconds each loading stage stays on screen.
pub const LOADING_STAGE_SECS: u64 = 2;

/// Prompt for the first analysis of a URL.
pub fn url_prompt(url: &str, deep_research: bool) -> String {
    if deep_research {
        return format!(
            r#"NUCLEAR RESEARCH MODE ACTIVATED.
Target URL: {url}

Task: "I just read 6 articles so you don't have to."

1. Analyze the target URL deeply.
2. Use Google Search to find 3-5 DISTINCT, high-quality sources that discuss this same topic.
3. Look specifically for contrasting opinions or updated data.
4. Synthesize ALL sources into one master report.
5. Structure:
   - 🎯 **Consensus**: What everyone agrees on.
   - ⚔️ **Controversy**: Where the sources disagree (compare opinions).
   - 💡 **Key Takeaways**: The absolute most important facts.

Cite every claim."#
        );
    }

    format!(
        r#"I have a link I need you to analyze: {url}

Please perform a deep analysis of this content.
1. Identify what type of content it is (Blog, Video, Paper).
2. Provide a high-level summary.
3. List the key takeaways with inline citations.

Ready for questions."#
    )
}

/// Prompt sent alongside an uploaded document.
pub fn file_prompt(file_name: &str) -> String {
    format!(
        "Analyze this uploaded document ({file_name}).\n\
         Provide a comprehensive executive summary with citations to specific sections if possible.\n\
         Identify key arguments, data points, and strategic insights."
    )
}

/// Prefix a follow-up with the steering marker for its complexity mode.
pub fn steer(text: &str, mode: ComplexityMode) -> String {
    match mode {
        ComplexityMode::Standard => text.to_string(),
        ComplexityMode::Simplified => format!("{SIMPLIFIED_MARKER}{text}"),
        ComplexityMode::Expert => format!("{EXPERT_MARKER}{text}"),
    }
}

/// Canned follow-up requests offered under every model reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Turn the last answer into a social media thread.
    Thread,
    /// Look for credible sources disagreeing with the last answer.
    Opposing,
}

impl Action {
    /// Prompt routed through the follow-up path.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Thread => {
                "Convert the above response into a viral Twitter thread. Use hooks, threads (1/x), and emojis."
            }
            Self::Opposing => {
                "Find credible sources that completely disagree with the above analysis. Focus on risks, downsides, and controversies. Be critical."
            }
        }
    }

    /// Display tag carried by the resulting user message.
    pub fn display_type(self) -> DisplayType {
        match self {
            Self::Thread => DisplayType::ActionThread,
            Self::Opposing => DisplayType::ActionOpposing,
        }
    }

    /// Banner shown in place of the prompt text.
    pub fn banner(self) -> &'static str {
        match self {
            Self::Thread => "Generating Thread...",
            Self::Opposing => "Analyzing Counter-Arguments...",
        }
    }
}

/// Banner for an action display type, if it is one.
pub fn banner_for(display_type: DisplayType) -> Option<&'static str> {
    match display_type {
        DisplayType::Text => None,
        DisplayType::ActionThread => Some(Action::Thread.banner()),
        DisplayType::ActionOpposing => Some(Action::Opposing.banner()),
    }
}

/// Loading stage to show after `elapsed_secs` seconds; sticks on the last.
pub fn loading_stage(elapsed_secs: u64) -> &'static str {
    let idx = (elapsed_secs / LOADING_STAGE_SECS) as usize;
    LOADING_STAGES[idx.min(LOADING_STAGES.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_prompt_variants() {
        let standard = url_prompt("https://example.com/a", false);
        assert!(standard.contains("I have a link I need you to analyze: https://example.com/a"));
        assert!(!standard.contains("NUCLEAR"));

        let deep = url_prompt("https://example.com/a", true);
        assert!(deep.starts_with("NUCLEAR RESEARCH MODE ACTIVATED."));
        assert!(deep.contains("Target URL: https://example.com/a"));
        assert!(deep.contains("Consensus"));
    }

    #[test]
    fn test_file_prompt_mentions_name() {
        assert!(file_prompt("report.pdf").contains("(report.pdf)"));
    }

    #[test]
    fn test_steer_simplified() {
        let out = steer("explain X", ComplexityMode::Simplified);
        assert!(out.starts_with(SIMPLIFIED_MARKER));
        assert_eq!(out, "(Mode: Explain Like I'm 5) explain X");
    }

    #[test]
    fn test_steer_expert_and_standard() {
        assert_eq!(
            steer("explain X", ComplexityMode::Expert),
            "(Mode: PhD Expert Level) explain X"
        );
        assert_eq!(steer("explain X", ComplexityMode::Standard), "explain X");
    }

    #[test]
    fn test_action_metadata() {
        assert_eq!(Action::Thread.display_type(), DisplayType::ActionThread);
        assert_eq!(Action::Opposing.display_type(), DisplayType::ActionOpposing);
        assert!(Action::Thread.prompt().contains("Twitter thread"));
        assert!(Action::Opposing.prompt().contains("disagree"));
        assert_eq!(banner_for(DisplayType::Text), None);
        assert_eq!(banner_for(DisplayType::ActionThread), Some("Generating Thread..."));
    }

    #[test]
    fn test_capacity_texts_link_support() {
        assert!(DEGRADED_SERVICE_TEXT.contains(&format!("[Support the project]({})", SUPPORT_URL)));
        assert!(CAPACITY_NOTICE_BODY.ends_with(SUPPORT_URL));
    }

    #[test]
    fn test_loading_stage_progression() {
        assert_eq!(loading_stage(0), "Resolving source...");
        assert_eq!(loading_stage(3), "Extracting semantic data...");
        assert_eq!(loading_stage(1000), "Finalizing citations...");
    }
}
