// src/cli/campaigns.rs — Campaign history browsing

use super::CampaignsAction;
use crate::infra::errors::CopyBloomError;
use crate::store::Store;

pub fn run_campaigns(store: Option<Store>, action: CampaignsAction) -> anyhow::Result<()> {
    let Some(store) = store else {
        anyhow::bail!("campaign history is unavailable (database could not be opened)");
    };

    match action {
        CampaignsAction::List { kind, limit } => {
            let campaigns = store.list_campaigns(kind.as_deref(), limit)?;
            if campaigns.is_empty() {
                println!("No saved campaigns.");
                return Ok(());
            }

            for c in &campaigns {
                let score = c
                    .score
                    .map(|s| format!("{}/10", s))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  {}  {:<6}  {:<5}  {}",
                    &c.id[..8],
                    c.created_at.format("%Y-%m-%d %H:%M"),
                    c.kind,
                    score,
                    c.title,
                );
            }
            println!("\n{} of {} campaign(s)", campaigns.len(), store.count_campaigns()?);
        }

        CampaignsAction::Show { id } => {
            let Some(c) = store.get_campaign(&id)? else {
                return Err(CopyBloomError::CampaignNotFound { id }.into());
            };

            println!("Campaign {}", c.id);
            println!("Kind:    {}", c.kind);
            println!("Title:   {}", c.title);
            println!("Created: {}", c.created_at.format("%Y-%m-%d %H:%M:%S"));
            if let Some(score) = c.score {
                println!("Score:   {}/10", score);
            }
            if let Some(ref author) = c.author {
                println!("Author:  {}", author);
            }
            println!("\n{}", c.content);
        }

        CampaignsAction::Delete { id } => {
            // Resolve prefixes through get_campaign so the user deletes what
            // they saw in `show`.
            let Some(c) = store.get_campaign(&id)? else {
                return Err(CopyBloomError::CampaignNotFound { id }.into());
            };
            if store.delete_campaign(&c.id)? {
                println!("Deleted campaign {} ({})", &c.id[..8], c.title);
            } else {
                anyhow::bail!("campaign '{}' disappeared before deletion", id);
            }
        }
    }

    Ok(())
}
