// src/cli/script.rs — `copybloom script` and `copybloom story`

use crate::generate::{Generator, ScriptBrief, StoryBrief};
use crate::infra::session::Profile;
use crate::store::{Campaign, Store};

pub struct ScriptArgs {
    pub topic: Option<String>,
    pub audience: Option<String>,
    pub tone: Option<String>,
    pub duration: Option<String>,
    pub style: Option<String>,
    pub story: bool,
    pub key_points: Option<String>,
    pub hook_question: Option<String>,
    pub pain_point: Option<String>,
    pub call_to_action: Option<String>,
    pub no_save: bool,
}

pub async fn run_script(
    generator: &Generator,
    store: Option<&Store>,
    args: ScriptArgs,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut brief = ScriptBrief {
        topic: super::require_field(args.topic, "Video topic:")?,
        audience: super::require_field(args.audience, "Target audience:")?,
        tone: super::require_field(args.tone, "Tone:")?,
        duration: super::require_field(args.duration, "Duration (minutes):")?,
        style: super::require_field(args.style, "Style:")?,
        key_points: args.key_points,
        hook_question: args.hook_question,
        pain_point: args.pain_point,
        call_to_action: args.call_to_action,
        ..Default::default()
    };

    // --story fills the storytelling fields the user left blank.
    if args.story {
        if !quiet {
            eprintln!("Generating storytelling elements...");
        }
        let story_brief = StoryBrief {
            topic: brief.topic.clone(),
            audience: brief.audience.clone(),
            tone: brief.tone.clone(),
            duration: brief.duration.clone(),
            style: brief.style.clone(),
        };
        match generator.generate_story_elements(&story_brief).await {
            Ok(elements) => {
                brief.hook_question = brief.hook_question.or(Some(elements.hook.hook_question));
                brief.pain_point = brief.pain_point.or(Some(elements.hook.pain_point));
                brief.curiosity_hook = Some(elements.hook.curiosity_hook);
                brief.key_points = brief.key_points.or(Some(elements.content.key_points));
                brief.backstory = Some(elements.content.backstory);
                brief.challenge = Some(elements.content.challenge);
                brief.twist = Some(elements.content.twist);
                brief.call_to_action = brief.call_to_action.or(Some(elements.outro.call_to_action));
                brief.transition = Some(elements.outro.transition);
            }
            Err(e) => {
                // The script still works without elements, it just leans on
                // the basics.
                eprintln!("Story elements failed ({}), continuing without them", e);
            }
        }
    }

    if !generator.refine_enabled() {
        let content = super::copy::stream_to_stdout(generator, brief.prompt()).await?;
        save(store, &brief, &content, None, args.no_save);
        return Ok(());
    }

    if !quiet {
        eprintln!("Generating script for \"{}\"...", brief.topic);
    }

    let refined = generator.generate_script(&brief).await?;

    if !quiet {
        eprintln!(
            "Quality: {}/10 after {} rewrite(s){}",
            refined.final_score,
            refined.attempts,
            if refined.met_threshold {
                ""
            } else {
                " (below threshold)"
            },
        );
    }

    println!("{}", refined.content);
    save(
        store,
        &brief,
        &refined.content,
        Some(refined.final_score),
        args.no_save,
    );
    Ok(())
}

pub struct StoryArgs {
    pub topic: Option<String>,
    pub audience: Option<String>,
    pub tone: Option<String>,
    pub duration: Option<String>,
    pub style: Option<String>,
    pub refine: Option<String>,
}

pub async fn run_story(generator: &Generator, args: StoryArgs, quiet: bool) -> anyhow::Result<()> {
    let brief = StoryBrief {
        topic: super::require_field(args.topic, "Video topic:")?,
        audience: super::require_field(args.audience, "Target audience:")?,
        tone: super::require_field(args.tone, "Tone:")?,
        duration: super::require_field(args.duration, "Duration (minutes):")?,
        style: super::require_field(args.style, "Style:")?,
    };

    if !quiet {
        eprintln!("Generating storytelling elements for \"{}\"...", brief.topic);
    }

    let mut elements = generator.generate_story_elements(&brief).await?;

    if let Some(ref request) = args.refine {
        if !quiet {
            eprintln!("Refining elements: \"{}\"...", request);
        }
        elements = generator.refine_story_elements(&elements, request).await?;
    }

    println!("{}", serde_json::to_string_pretty(&elements)?);
    Ok(())
}

fn save(
    store: Option<&Store>,
    brief: &ScriptBrief,
    content: &str,
    score: Option<u8>,
    no_save: bool,
) {
    if no_save {
        return;
    }
    let Some(store) = store else { return };

    let brief_json = match serde_json::to_string(brief) {
        Ok(j) => j,
        Err(e) => {
            tracing::warn!("Could not serialize brief, skipping history: {}", e);
            return;
        }
    };

    let title = format!("script: {}", brief.topic);
    let mut campaign = Campaign::new("script", &title, brief_json, content.to_string())
        .with_author(Profile::load().map(|p| p.name));
    if let Some(score) = score {
        campaign = campaign.with_score(score);
    }

    if let Err(e) = store.insert_campaign(&campaign) {
        tracing::warn!("Could not save campaign: {}", e);
    } else {
        eprintln!("Saved as campaign {}", &campaign.id[..8]);
    }
}
