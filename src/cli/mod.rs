// src/cli/mod.rs — CLI definition (clap derive)

pub mod campaigns;
pub mod chat;
pub mod copy;
pub mod ideas;
pub mod init;
pub mod script;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "copybloom", about = "AI marketing content generator", version)]
pub struct Cli {
    /// Model to use (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Skip the quality refinement loop (single generation pass)
    #[arg(long)]
    pub no_refine: bool,

    /// Suppress progress output (only emit final result)
    #[arg(long)]
    pub quiet: bool,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate marketing copy from a campaign brief
    Copy {
        /// Campaign type (e.g. "email", "landing page", "social")
        #[arg(long = "type", value_name = "TYPE")]
        campaign_type: Option<String>,
        /// Target audience
        #[arg(long)]
        audience: Option<String>,
        /// Core message of the campaign
        #[arg(long)]
        message: Option<String>,
        /// Tone of voice (e.g. "friendly", "professional")
        #[arg(long)]
        tone: Option<String>,
        /// Call-to-action to include verbatim
        #[arg(long)]
        cta: Option<String>,
        /// Don't record the result in campaign history
        #[arg(long)]
        no_save: bool,
    },

    /// Generate a YouTube script with the Hook-Content-Outro framework
    Script {
        /// Video topic
        #[arg(long)]
        topic: Option<String>,
        /// Target audience
        #[arg(long)]
        audience: Option<String>,
        /// Tone of voice
        #[arg(long)]
        tone: Option<String>,
        /// Length in minutes
        #[arg(long)]
        duration: Option<String>,
        /// Video style (e.g. "tutorial", "vlog", "explainer")
        #[arg(long)]
        style: Option<String>,
        /// Generate storytelling elements first and weave them into the script
        #[arg(long)]
        story: bool,
        /// Key points as a numbered list ("1. ... 2. ...")
        #[arg(long)]
        key_points: Option<String>,
        /// Opening hook question
        #[arg(long)]
        hook_question: Option<String>,
        /// Audience pain point for the hook
        #[arg(long)]
        pain_point: Option<String>,
        /// Closing call-to-action
        #[arg(long)]
        call_to_action: Option<String>,
        /// Don't record the result in campaign history
        #[arg(long)]
        no_save: bool,
    },

    /// Generate storytelling elements (JSON) for a video brief
    Story {
        /// Video topic
        #[arg(long)]
        topic: Option<String>,
        /// Target audience
        #[arg(long)]
        audience: Option<String>,
        /// Tone of voice
        #[arg(long)]
        tone: Option<String>,
        /// Length in minutes
        #[arg(long)]
        duration: Option<String>,
        /// Video style
        #[arg(long)]
        style: Option<String>,
        /// Refine the generated elements with a free-form request
        #[arg(long)]
        refine: Option<String>,
    },

    /// Generate YouTube video ideas for a niche
    Ideas {
        /// Content niche (defaults to a cross-niche mix)
        niche: Option<String>,
    },

    /// Generate short-form reel ideas from a video concept
    Reels {
        /// The long-form video title or concept to slice up
        title: Option<String>,
    },

    /// Interactive marketing assistant chat
    Chat,

    /// Browse campaign history
    Campaigns {
        #[command(subcommand)]
        action: CampaignsAction,
    },

    /// First-time setup (API key, profile, directories)
    Init,

    /// Create or replace the local author profile
    Login {
        /// Display name for the profile
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// Remove the local author profile
    Logout,
}

#[derive(Subcommand, Clone)]
pub enum CampaignsAction {
    /// List saved campaigns, newest first
    List {
        /// Filter by kind (copy, script)
        #[arg(long)]
        kind: Option<String>,
        /// Maximum number of rows
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show one campaign in full (id prefix accepted)
    Show { id: String },
    /// Delete a campaign by id
    Delete { id: String },
}

/// Prompt for a required brief field that was not given as a flag.
pub(crate) fn require_field(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => {
            let answer = inquire::Text::new(prompt).prompt()?;
            Ok(answer)
        }
    }
}
