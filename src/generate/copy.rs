// src/generate/copy.rs — Marketing copy generation

use serde::{Deserialize, Serialize};

use super::Generator;
use crate::infra::errors::CopyBloomError;
use crate::quality::Refined;

/// Everything a user tells us about the campaign they want copy for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyBrief {
    /// e.g. "landing page", "email", "social"
    pub campaign_type: String,
    pub audience: String,
    pub message: String,
    pub tone: String,
    /// Call-to-action text to include verbatim.
    pub cta: String,
}

impl CopyBrief {
    pub fn prompt(&self) -> String {
        format!(
            "Generate a {} copy for a {} with the message: \"{}\". \n\
             Tone: {}. Include a CTA: \"{}\". \n\
             Make it comprehensive and persuasive within 1000 words maximum.",
            self.campaign_type, self.audience, self.message, self.tone, self.cta
        )
    }

    /// Short display title for campaign history.
    pub fn title(&self) -> String {
        format!("{}: {}", self.campaign_type, self.message)
    }
}

impl Generator {
    /// Generate campaign copy from a brief and run it through the quality loop.
    pub async fn generate_copy(&self, brief: &CopyBrief) -> Result<Refined, CopyBloomError> {
        tracing::info!(campaign_type = %brief.campaign_type, "Generating marketing copy");
        self.generate_refined(brief.prompt()).await
    }
}
