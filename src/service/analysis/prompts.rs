//! Prompts for story analysis

use crate::service::analysis::schema::response_schema_text;

/// Sentence every story for this task must begin with
pub const TASK_OPENING_SENTENCE: &str = "When Pat opened the book, an old letter fell out of it.";

/// System prompt for story analysis
pub const ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a Cambridge English B1 Preliminary (PET) Examiner.

Your role is to mark student stories written for Writing Part 2 and to annotate
every error in place.

You must:
- Mark strictly against the Cambridge B1 Writing Part 2 assessment scales
- Give each criterion a whole-number score from 0 to 5
- Preserve the student's text exactly when splitting it into segments

Do not:
- Correct, trim or normalize the student's text inside segment 'text' fields
- Add commentary outside the JSON document

Your output must be structured JSON only and conform to the requested schema."#;

/// Everything sent to the grading model for one story
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub preamble: String,
    pub prompt: String,
    pub temperature: f64,
}

/// Build the complete request for a story
pub fn build_analysis_request(story: &str, temperature: f64) -> AnalysisRequest {
    AnalysisRequest {
        preamble: ANALYSIS_SYSTEM_PROMPT.to_string(),
        prompt: build_analysis_prompt(story),
        temperature,
    }
}

/// Build the analysis prompt embedding the student's story and the response schema
pub fn build_analysis_prompt(story: &str) -> String {
    format!(
        r#"Analyze the following student story written for the prompt: "Your story must begin with this sentence: {opening}"

The student's story is:
"""
{story}
"""

Evaluate it strictly according to the Cambridge B1 Writing Part 2 criteria:
1. Content: Is the story relevant? Is the target reader informed?
2. Communicative Achievement: Is the style appropriate for a story?
3. Organization: formatting, paragraphing, linking words.
4. Language: Grammar, vocabulary range and accuracy.

totalScore must be the sum of the four sub-scores.

IMPORTANT for 'inlineFeedback':
Break the ENTIRE student story into a list of sequential text segments.
- Every character from the original story (including spaces and newlines) must be preserved in the 'text' fields.
- When you find an error (grammar, spelling, awkward phrasing), mark that specific segment with isError: true, and provide the correction, explanation and type.
- Segments without errors should have isError: false.

### Required Output

Provide a single JSON document conforming to this JSON Schema:

{schema}

Output JSON only."#,
        opening = TASK_OPENING_SENTENCE,
        story = story,
        schema = response_schema_text(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_story_verbatim() {
        let story = "When Pat opened the book, an old letter fell out of it.\n\n  He saw a photo insde.";
        let prompt = build_analysis_prompt(story);

        assert!(prompt.contains(&format!("\"\"\"\n{story}\n\"\"\"")));
        assert!(prompt.contains(TASK_OPENING_SENTENCE));
    }

    #[test]
    fn test_prompt_lists_criteria_and_schema() {
        let prompt = build_analysis_prompt("x");

        for criterion in [
            "Content",
            "Communicative Achievement",
            "Organization",
            "Language",
        ] {
            assert!(prompt.contains(criterion));
        }
        assert!(prompt.contains("\"inlineFeedback\""));
        assert!(prompt.contains("\"communicativeAchievement\""));
    }

    #[test]
    fn test_request_is_deterministic() {
        let a = build_analysis_request("A story.", 0.1);
        let b = build_analysis_request("A story.", 0.1);

        assert_eq!(a.prompt, b.prompt);
        assert_eq!(a.preamble, ANALYSIS_SYSTEM_PROMPT);
        assert_eq!(a.temperature, 0.1);
    }
}
