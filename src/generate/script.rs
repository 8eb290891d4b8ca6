// src/generate/script.rs — YouTube script generation

use serde::{Deserialize, Serialize};

use super::Generator;
use crate::infra::errors::CopyBloomError;
use crate::quality::Refined;

/// Brief for a video script. The basics are required; the storytelling
/// elements are optional and, when present, steer the Hook-Content-Outro
/// structure of the prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptBrief {
    pub topic: String,
    pub audience: String,
    pub tone: String,
    /// Length in minutes, as entered by the user.
    pub duration: String,
    pub style: String,

    // Hook
    pub hook_question: Option<String>,
    pub pain_point: Option<String>,
    pub curiosity_hook: Option<String>,

    // Content
    /// Key points, typically a numbered list ("1. ... 2. ...").
    pub key_points: Option<String>,
    pub backstory: Option<String>,
    pub challenge: Option<String>,
    pub twist: Option<String>,

    // Outro
    pub call_to_action: Option<String>,
    pub transition: Option<String>,
}

impl ScriptBrief {
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "Generate a viral YouTube script for a {} minute {} video about \"{}\". \n\
             Target audience: {}. \n\
             Tone: {}.\n\n\
             Script structure should follow the Hook-Content-Outro framework:",
            self.duration, self.style, self.topic, self.audience, self.tone
        );

        prompt.push_str("\n\n1. HOOK (Opening):");
        if let Some(ref q) = self.hook_question {
            prompt.push_str(&format!(
                "\n- Include this thought-provoking question: \"{}\"",
                q
            ));
        }
        if let Some(ref p) = self.pain_point {
            prompt.push_str(&format!("\n- Address this audience pain point: \"{}\"", p));
        }
        if let Some(ref c) = self.curiosity_hook {
            prompt.push_str(&format!("\n- Use this curiosity element: \"{}\"", c));
        }

        prompt.push_str("\n\n2. CONTENT (Main body):");
        if let Some(ref key_points) = self.key_points {
            let points = split_key_points(key_points);
            if !points.is_empty() {
                prompt.push_str(
                    "\n- Cover these key points, with each one following a storytelling framework. \
                     IMPORTANT: Create a cohesive narrative where each point naturally flows into \
                     the next one with smooth transitions. Make sure the points build on each other \
                     and connect thematically:",
                );

                for (index, point) in points.iter().enumerate() {
                    prompt.push_str(&format!("\n  Point {}: {}", index + 1, point));
                    prompt.push_str(
                        "\n    - Backstory: Introduce the origins or background related to this point.",
                    );
                    prompt.push_str(
                        "\n    - Details: Elaborate on key features and important information.",
                    );
                    prompt.push_str(
                        "\n    - Challenge: Present a common problem or obstacle related to this point.",
                    );
                    prompt.push_str(
                        "\n    - Plot Twist: Reveal an unexpected insight or innovative solution.",
                    );

                    if let Some(next) = points.get(index + 1) {
                        prompt.push_str(&format!(
                            "\n    - Transition: Create a natural bridge from this point to the next point: \"{}\".",
                            next
                        ));
                    } else {
                        prompt.push_str(
                            "\n    - Engagement: Include a mini-engagement element specific to this point.",
                        );
                    }
                }

                prompt.push_str(
                    "\n\nEnsure that the script maintains a cohesive narrative thread throughout. \
                     Each point should build on the previous one and lead naturally to the next, \
                     creating a compelling and connected storyline rather than disjointed segments.",
                );
            }
        }

        if let Some(ref b) = self.backstory {
            prompt.push_str(&format!(
                "\n- Include this overall backstory for context: \"{}\"",
                b
            ));
        }
        if let Some(ref c) = self.challenge {
            prompt.push_str(&format!(
                "\n- Address this overall challenge or obstacle: \"{}\"",
                c
            ));
        }
        if let Some(ref t) = self.twist {
            prompt.push_str(&format!(
                "\n- Incorporate this unexpected insight or twist: \"{}\"",
                t
            ));
        }

        prompt.push_str("\n\n3. OUTRO (Closing):");
        if let Some(ref cta) = self.call_to_action {
            prompt.push_str(&format!("\n- End with this call to action: \"{}\"", cta));
        }
        if let Some(ref t) = self.transition {
            prompt.push_str(&format!(
                "\n- Include this transition to other content: \"{}\"",
                t
            ));
        }

        prompt.push_str(
            "\n\nFormat the script with clear sections for HOOK, MAIN CONTENT (with each key \
             point flowing naturally into the next), and OUTRO.\n\
             Include engaging transitions between points to create a cohesive narrative arc \
             rather than isolated segments.\n\
             Include timestamps, engaging questions for viewers, and a memorable closing.\n\
             Make it comprehensive and engaging within 1000 words maximum.",
        );

        prompt
    }
}

/// Split a user-entered key-points string on numbered-list markers
/// ("1. ", "2. ", ...), dropping empty fragments. A marker is a digit run
/// followed by a dot and whitespace, at the start or after whitespace, so
/// decimals like "1.5" inside a point are left alone.
fn split_key_points(key_points: &str) -> Vec<String> {
    let bytes = key_points.as_bytes();
    let mut markers: Vec<(usize, usize)> = Vec::new(); // (start, end-exclusive)

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            let mut j = i;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j < bytes.len()
                && bytes[j] == b'.'
                && bytes.get(j + 1).is_some_and(|c| c.is_ascii_whitespace())
            {
                markers.push((i, j + 2));
                i = j + 2;
                continue;
            }
        }
        i += 1;
    }

    let mut points = Vec::new();
    let mut push = |segment: &str| {
        let trimmed = segment.trim();
        if !trimmed.is_empty() {
            points.push(trimmed.to_string());
        }
    };

    if markers.is_empty() {
        push(key_points);
        return points;
    }

    push(&key_points[..markers[0].0]);
    for (idx, &(_, end)) in markers.iter().enumerate() {
        let next_start = markers.get(idx + 1).map(|m| m.0).unwrap_or(key_points.len());
        push(&key_points[end..next_start]);
    }

    points
}

impl Generator {
    /// Generate a structured video script and run it through the quality loop.
    pub async fn generate_script(&self, brief: &ScriptBrief) -> Result<Refined, CopyBloomError> {
        tracing::info!(topic = %brief.topic, "Generating video script");
        self.generate_refined(brief.prompt()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_brief() -> ScriptBrief {
        ScriptBrief {
            topic: "Sourdough baking".into(),
            audience: "home bakers".into(),
            tone: "casual".into(),
            duration: "10".into(),
            style: "tutorial".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_prompt_basics() {
        let p = basic_brief().prompt();
        assert!(p.contains("10 minute tutorial video about \"Sourdough baking\""));
        assert!(p.contains("Target audience: home bakers"));
        assert!(p.contains("1. HOOK"));
        assert!(p.contains("2. CONTENT"));
        assert!(p.contains("3. OUTRO"));
        assert!(p.contains("1000 words maximum"));
    }

    #[test]
    fn test_prompt_optional_elements() {
        let brief = ScriptBrief {
            hook_question: Some("Why does your bread fall flat?".into()),
            call_to_action: Some("Subscribe for more".into()),
            ..basic_brief()
        };
        let p = brief.prompt();
        assert!(p.contains("thought-provoking question: \"Why does your bread fall flat?\""));
        assert!(p.contains("call to action: \"Subscribe for more\""));
    }

    #[test]
    fn test_prompt_key_points_with_transitions() {
        let brief = ScriptBrief {
            key_points: Some("1. Starter health 2. Hydration 3. Shaping".into()),
            ..basic_brief()
        };
        let p = brief.prompt();
        assert!(p.contains("Point 1: Starter health"));
        assert!(p.contains("Point 2: Hydration"));
        assert!(p.contains("Point 3: Shaping"));
        // Middle points bridge forward, the last one gets an engagement element
        assert!(p.contains("next point: \"Hydration\""));
        assert!(p.contains("mini-engagement element"));
    }

    #[test]
    fn test_split_key_points_numbered() {
        let points = split_key_points("1. First thing 2. Second thing 3. Third");
        assert_eq!(points, vec!["First thing", "Second thing", "Third"]);
    }

    #[test]
    fn test_split_key_points_newlines() {
        let points = split_key_points("1. Alpha\n2. Beta\n");
        assert_eq!(points, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_split_key_points_plain_text() {
        // No numbering: the whole string is one point
        let points = split_key_points("just one big idea");
        assert_eq!(points, vec!["just one big idea"]);
    }

    #[test]
    fn test_split_key_points_empty() {
        assert!(split_key_points("").is_empty());
    }

    #[test]
    fn test_split_key_points_ignores_decimals() {
        let points = split_key_points("1. Use 1.5 cups of water 2. Rest the dough");
        assert_eq!(points, vec!["Use 1.5 cups of water", "Rest the dough"]);
    }
}
