// src/cli/ideas.rs — `copybloom ideas` and `copybloom reels`

use crate::generate::Generator;

pub async fn run_ideas(generator: &Generator, niche: Option<String>, quiet: bool) -> anyhow::Result<()> {
    let niche = niche.unwrap_or_else(|| "general".to_string());

    if !quiet {
        eprintln!("Generating video ideas ({})...", niche);
    }

    let ideas = generator.video_ideas(&niche).await?;

    for (i, idea) in ideas.iter().enumerate() {
        println!("{}. {}", i + 1, idea.title);
        if !idea.description.is_empty() {
            println!("   {}", idea.description);
        }
        if !idea.target_audience.is_empty() {
            println!("   Audience: {}", idea.target_audience);
        }
        println!();
    }
    Ok(())
}

pub async fn run_reels(generator: &Generator, title: Option<String>, quiet: bool) -> anyhow::Result<()> {
    let title = super::require_field(title, "Video title or concept:")?;

    if !quiet {
        eprintln!("Generating reel ideas for \"{}\"...", title);
    }

    let ideas = generator.reels_ideas(&title).await?;

    for (i, idea) in ideas.iter().enumerate() {
        println!("{}. {}", i + 1, idea);
        println!();
    }
    Ok(())
}
