// src/generate/ideas.rs — Video and reels idea generation

use serde::{Deserialize, Serialize};

use super::Generator;
use crate::infra::errors::CopyBloomError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoIdea {
    pub title: String,
    pub description: String,
    pub target_audience: String,
}

fn video_ideas_prompt(niche: &str) -> String {
    let scope = if niche == "general" {
        "across different niches".to_string()
    } else {
        format!("for the {} niche", niche)
    };

    format!(
        "You are an AI content strategist.\n\
         Generate 10 fresh and engaging YouTube video ideas {}.\n\
         These ideas should be optimized for YouTube SEO and have viral potential.\n\n\
         For each idea, provide:\n\
         1. A catchy title that would work well for YouTube\n\
         2. A brief description of what the video would cover (2-3 sentences)\n\
         3. The target audience for this video\n\n\
         Format the response in a way that can be easily parsed, with clear separations \
         between each idea.\n\
         Make the ideas specific, actionable, and trend-aware.",
        scope
    )
}

fn reels_ideas_prompt(video_title: &str) -> String {
    format!(
        "Generate 5 creative short-form video ideas (15-60 seconds each) based on this \
         YouTube video concept: \"{}\".\n\
         Each idea should include:\n\
         1. A catchy hook/title\n\
         2. A brief 15-second script outline\n\
         3. The key message or takeaway\n\n\
         Format each idea with emoji bullets and make them engaging for social media.\n\
         Focus on creating viral-worthy content for Instagram Reels or TikTok that would \
         complement the main video.",
        video_title
    )
}

/// Parse a numbered-list reply into structured video ideas. The first line of
/// each chunk is the title, the rest is split between description and an
/// optional "target audience" trailer. Best effort; malformed chunks become
/// title-only ideas rather than being dropped.
pub fn parse_video_ideas(raw: &str) -> Vec<VideoIdea> {
    split_numbered(raw)
        .into_iter()
        .map(|chunk| {
            let mut lines = chunk.lines().map(str::trim).filter(|l| !l.is_empty());
            let title = lines
                .next()
                .unwrap_or_default()
                .trim_matches(|c| c == '"' || c == '*')
                .to_string();

            let mut description = String::new();
            let mut target_audience = String::new();
            for line in lines {
                if let Some(rest) = strip_prefix_ci(line, "target audience") {
                    target_audience = rest.trim_start_matches(':').trim().to_string();
                } else {
                    if !description.is_empty() {
                        description.push(' ');
                    }
                    description.push_str(line);
                }
            }

            VideoIdea {
                title,
                description,
                target_audience,
            }
        })
        .filter(|idea| !idea.title.is_empty())
        .collect()
}

/// ASCII case-insensitive prefix strip.
fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    match line.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&line[prefix.len()..]),
        _ => None,
    }
}

/// Split a reels reply into individual ideas on emoji bullets or numbered
/// markers, mirroring how replies to the reels prompt come back formatted.
pub fn parse_reels_ideas(raw: &str) -> Vec<String> {
    const BULLETS: [&str; 6] = ["📱", "🎬", "✨", "🔥", "💡", "#"];

    let mut ideas = Vec::new();
    let mut current = String::new();

    for line in raw.lines() {
        let trimmed = line.trim();
        let starts_new = BULLETS.iter().any(|b| trimmed.starts_with(b))
            || trimmed
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit() && trimmed.contains('.'));

        if starts_new && !current.trim().is_empty() {
            ideas.push(current.trim().to_string());
            current.clear();
        }
        current.push_str(line);
        current.push('\n');
    }

    if !current.trim().is_empty() {
        ideas.push(current.trim().to_string());
    }

    ideas
}

/// Split on top-level numbered markers ("1." at line start).
fn split_numbered(raw: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in raw.lines() {
        let trimmed = line.trim_start();
        let is_marker = trimmed
            .split_once('.')
            .is_some_and(|(head, _)| !head.is_empty() && head.chars().all(|c| c.is_ascii_digit()));

        if is_marker && !current.trim().is_empty() {
            chunks.push(current.trim().to_string());
            current.clear();
        }

        let cleaned = if is_marker {
            trimmed.split_once('.').map(|(_, rest)| rest.trim()).unwrap_or(trimmed)
        } else {
            line
        };
        current.push_str(cleaned);
        current.push('\n');
    }

    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
}

impl Generator {
    /// Generate structured YouTube video ideas for a niche.
    pub async fn video_ideas(&self, niche: &str) -> Result<Vec<VideoIdea>, CopyBloomError> {
        tracing::info!(niche, "Generating video ideas");
        let raw = self.generate_text(video_ideas_prompt(niche)).await?;
        let ideas = parse_video_ideas(&raw);
        if ideas.is_empty() {
            return Err(CopyBloomError::MalformedOutput(
                "no ideas could be parsed from the reply".into(),
            ));
        }
        Ok(ideas)
    }

    /// Generate short-form reel ideas that complement a video concept.
    pub async fn reels_ideas(&self, video_title: &str) -> Result<Vec<String>, CopyBloomError> {
        tracing::info!(video_title, "Generating reels ideas");
        let raw = self.generate_text(reels_ideas_prompt(video_title)).await?;
        let ideas = parse_reels_ideas(&raw);
        if ideas.is_empty() {
            return Err(CopyBloomError::MalformedOutput(
                "no ideas could be parsed from the reply".into(),
            ));
        }
        Ok(ideas)
    }
}
