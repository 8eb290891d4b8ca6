// src/generate/story.rs — Storytelling element generation (JSON contract)

use serde::{Deserialize, Serialize};

use super::Generator;
use crate::infra::errors::CopyBloomError;

/// Brief for generating storytelling elements ahead of a full script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryBrief {
    pub topic: String,
    pub audience: String,
    pub tone: String,
    pub duration: String,
    pub style: String,
}

/// Structured storytelling elements for the Hook-Content-Outro framework.
/// All three sections must be present for the result to be accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryElements {
    pub hook: Hook,
    pub content: Content,
    pub outro: Outro,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hook {
    pub hook_question: String,
    pub pain_point: String,
    pub curiosity_hook: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub key_points: String,
    pub backstory: String,
    pub challenge: String,
    pub twist: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outro {
    pub call_to_action: String,
    pub transition: String,
}

impl StoryBrief {
    pub fn prompt(&self) -> String {
        format!(
            "Based on the following YouTube video details, generate engaging storytelling \
             elements in JSON format:\n\n\
             Topic: \"{}\"\n\
             Target audience: {}\n\
             Tone: {}\n\
             Duration: {} minutes\n\
             Style: {}\n\n\
             Return ONLY a valid JSON object with the following structure:\n\
             {{\n\
             \x20 \"hook\": {{\n\
             \x20   \"hookQuestion\": \"A thought-provoking question related to the topic\",\n\
             \x20   \"painPoint\": \"A common problem the audience faces related to this topic\",\n\
             \x20   \"curiosityHook\": \"A surprising fact or statement to create curiosity\"\n\
             \x20 }},\n\
             \x20 \"content\": {{\n\
             \x20   \"keyPoints\": \"3-5 key points as a numbered list, each point should be concise and focused on one aspect of the topic\",\n\
             \x20   \"backstory\": \"A brief contextual backstory to make the topic relatable\",\n\
             \x20   \"challenge\": \"A challenge or obstacle that makes this topic engaging\",\n\
             \x20   \"twist\": \"An unexpected insight or twist that makes the content stand out\"\n\
             \x20 }},\n\
             \x20 \"outro\": {{\n\
             \x20   \"callToAction\": \"A compelling call-to-action for viewers\",\n\
             \x20   \"transition\": \"A smooth transition to other content\"\n\
             \x20 }}\n\
             }}\n\n\
             Ensure all elements are creative, engaging, and tailored to the specified \
             audience and tone.\n\
             For the keyPoints, make sure to format them as a numbered list (1., 2., 3., etc.) \
             with each point being distinct and focused.\n\
             Return ONLY the JSON object, nothing else.",
            self.topic, self.audience, self.tone, self.duration, self.style
        )
    }
}

fn refinement_prompt(elements: &StoryElements, request: &str) -> Result<String, CopyBloomError> {
    let elements_json = serde_json::to_string_pretty(elements)
        .map_err(|e| CopyBloomError::MalformedOutput(e.to_string()))?;

    Ok(format!(
        "I have the following storytelling elements for a YouTube video:\n\n\
         {}\n\n\
         Please refine these elements based on this user request: \"{}\"\n\n\
         Return ONLY a valid JSON object with the same structure, refined according \
         to the user's request.",
        elements_json, request
    ))
}

/// Parse model output into story elements: direct JSON parse first, then a
/// brace-extraction fallback for replies with prose around the object.
pub fn parse_story_elements(raw: &str) -> Result<StoryElements, CopyBloomError> {
    if let Ok(elements) = serde_json::from_str::<StoryElements>(raw) {
        return Ok(elements);
    }

    let start = raw.find('{');
    let end = raw.rfind('}');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(CopyBloomError::MalformedOutput(
            "reply contained no JSON object".into(),
        ));
    };
    if end <= start {
        return Err(CopyBloomError::MalformedOutput(
            "reply contained no JSON object".into(),
        ));
    }

    serde_json::from_str::<StoryElements>(&raw[start..=end])
        .map_err(|e| CopyBloomError::MalformedOutput(format!("invalid story elements: {}", e)))
}

impl Generator {
    /// Generate storytelling elements for a video brief.
    /// JSON content skips the quality loop; the refiner's rubric is written
    /// for prose and its rewrites are not guaranteed to stay valid JSON.
    pub async fn generate_story_elements(
        &self,
        brief: &StoryBrief,
    ) -> Result<StoryElements, CopyBloomError> {
        tracing::info!(topic = %brief.topic, "Generating story elements");
        let raw = self.generate_text(brief.prompt()).await?;
        parse_story_elements(&raw)
    }

    /// Refine existing story elements based on a free-form user request.
    pub async fn refine_story_elements(
        &self,
        elements: &StoryElements,
        request: &str,
    ) -> Result<StoryElements, CopyBloomError> {
        let prompt = refinement_prompt(elements, request)?;
        let raw = self.generate_text(prompt).await?;
        parse_story_elements(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_JSON: &str = r#"{
        "hook": {
            "hookQuestion": "Why?",
            "painPoint": "It is hard",
            "curiosityHook": "A twist"
        },
        "content": {
            "keyPoints": "1. A 2. B",
            "backstory": "Once",
            "challenge": "Hard part",
            "twist": "Surprise"
        },
        "outro": {
            "callToAction": "Subscribe",
            "transition": "Next up"
        }
    }"#;

    #[test]
    fn test_parse_direct_json() {
        let e = parse_story_elements(VALID_JSON).unwrap();
        assert_eq!(e.hook.hook_question, "Why?");
        assert_eq!(e.outro.call_to_action, "Subscribe");
    }

    #[test]
    fn test_parse_json_wrapped_in_prose() {
        let raw = format!("Here are your elements:\n```json\n{}\n```\nEnjoy!", VALID_JSON);
        let e = parse_story_elements(&raw).unwrap();
        assert_eq!(e.content.twist, "Surprise");
    }

    #[test]
    fn test_parse_no_json_fails() {
        let err = parse_story_elements("sorry, I cannot do that").unwrap_err();
        assert!(matches!(err, CopyBloomError::MalformedOutput(_)));
    }

    #[test]
    fn test_parse_missing_section_fails() {
        let raw = r#"{"hook": {"hookQuestion": "a", "painPoint": "b", "curiosityHook": "c"}}"#;
        assert!(parse_story_elements(raw).is_err());
    }

    #[test]
    fn test_brief_prompt_mentions_structure() {
        let brief = StoryBrief {
            topic: "Chess openings".into(),
            audience: "beginners".into(),
            tone: "upbeat".into(),
            duration: "8".into(),
            style: "explainer".into(),
        };
        let p = brief.prompt();
        assert!(p.contains("Topic: \"Chess openings\""));
        assert!(p.contains("\"hookQuestion\""));
        assert!(p.contains("\"callToAction\""));
        assert!(p.contains("Return ONLY the JSON object"));
    }

    #[test]
    fn test_refinement_prompt_embeds_current_elements() {
        let elements = parse_story_elements(VALID_JSON).unwrap();
        let p = refinement_prompt(&elements, "make it funnier").unwrap();
        assert!(p.contains("\"hookQuestion\": \"Why?\""));
        assert!(p.contains("user request: \"make it funnier\""));
    }
}
