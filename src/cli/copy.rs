// src/cli/copy.rs — `copybloom copy`

use futures::StreamExt;

use crate::generate::{CopyBrief, Generator};
use crate::infra::session::Profile;
use crate::store::{Campaign, Store};

pub struct CopyArgs {
    pub campaign_type: Option<String>,
    pub audience: Option<String>,
    pub message: Option<String>,
    pub tone: Option<String>,
    pub cta: Option<String>,
    pub no_save: bool,
}

pub async fn run_copy(
    generator: &Generator,
    store: Option<&Store>,
    args: CopyArgs,
    quiet: bool,
) -> anyhow::Result<()> {
    let brief = CopyBrief {
        campaign_type: super::require_field(args.campaign_type, "Campaign type:")?,
        audience: super::require_field(args.audience, "Target audience:")?,
        message: super::require_field(args.message, "Core message:")?,
        tone: super::require_field(args.tone, "Tone:")?,
        cta: super::require_field(args.cta, "Call to action:")?,
    };

    // Without the quality loop the text can go out token by token.
    if !generator.refine_enabled() {
        let content = stream_to_stdout(generator, brief.prompt()).await?;
        save(store, &brief, &content, None, args.no_save);
        return Ok(());
    }

    if !quiet {
        eprintln!("Generating {} copy...", brief.campaign_type);
    }

    let refined = generator.generate_copy(&brief).await?;

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

/// Stream a raw generation to stdout, returning the collected text.
pub(crate) async fn stream_to_stdout(
    generator: &Generator,
    prompt: String,
) -> anyhow::Result<String> {
    use std::io::Write;

    let mut stream = generator.stream_text(prompt).await?;
    let mut content = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        print!("{}", chunk.delta);
        std::io::stdout().flush().ok();
        content.push_str(&chunk.delta);
    }
    println!();
    Ok(content)
}

fn save(store: Option<&Store>, brief: &CopyBrief, content: &str, score: Option<u8>, no_save: bool) {
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

    let mut campaign = Campaign::new("copy", &brief.title(), brief_json, content.to_string())
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
