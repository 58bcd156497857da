use crate::corpus::HistoricalRecord;
use crate::persona::{LengthTarget, StyleProfile};
use std::fmt::Write;

pub const SYSTEM_PROMPT: &str = "You write short, realistic community feedback comments about \
local traffic and congestion. Reply with the comment text only: no quotes, no preamble, \
no explanation.";

/// User prompt for one generation attempt.
pub fn build_prompt(
    examples: &[HistoricalRecord],
    style: &StyleProfile,
    length: &LengthTarget,
    ceiling: usize,
) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str("Recent real comments from the community (with character counts):\n\n");
    for (idx, example) in examples.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. \"{}\" ({}, {} chars)",
            idx + 1,
            example.text.trim(),
            example.category,
            example.char_len()
        );
    }

    let _ = write!(
        prompt,
        "\nWrite ONE new comment as {persona}. Tone: {tone}.\nStyle guide: {guide}\n\n\
         Requirements:\n\
         - Between {min} and {max} characters long, never more than {ceiling}.\n\
         - Same themes as the examples (traffic, congestion, safety, quality of life).\n\
         - Use COMPLETELY DIFFERENT words and phrasing: do not reuse phrases, sentence \
         structures or distinctive vocabulary from the examples.\n\
         - Sound like a real person, not marketing copy.\n",
        persona = style.persona,
        tone = style.tone,
        guide = style.style_guide,
        min = length.min,
        max = length.max,
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Category;
    use chrono::Utc;

    fn style() -> StyleProfile {
        StyleProfile {
            persona: "a cyclist".into(),
            tone: "matter-of-fact".into(),
            style_guide: "State facts without elaboration.".into(),
            temperature: 0.9,
        }
    }

    fn length() -> LengthTarget {
        LengthTarget {
            name: "short".into(),
            min: 40,
            max: 80,
            generation_budget: 60,
        }
    }

    #[test]
    fn prompt_echoes_examples_with_lengths_and_categories() {
        let examples = vec![
            HistoricalRecord::human("Traffic is terrible on Station Road", Category::Local, Utc::now()),
            HistoricalRecord::human("Coaches block the seafront", Category::Tourist, Utc::now()),
        ];

        let prompt = build_prompt(&examples, &style(), &length(), 300);

        assert!(prompt.contains("1. \"Traffic is terrible on Station Road\" (Local, 35 chars)"));
        assert!(prompt.contains("2. \"Coaches block the seafront\" (Tourist, 26 chars)"));
    }

    #[test]
    fn prompt_states_style_length_and_overlap_rule() {
        let prompt = build_prompt(&[], &style(), &length(), 300);

        assert!(prompt.contains("as a cyclist"));
        assert!(prompt.contains("Tone: matter-of-fact"));
        assert!(prompt.contains("Between 40 and 80 characters"));
        assert!(prompt.contains("never more than 300"));
        assert!(prompt.contains("COMPLETELY DIFFERENT words"));
    }
}
