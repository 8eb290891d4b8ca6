// src/cli/init.rs — First-time setup wizard and profile management

use crate::infra::config::Config;
use crate::infra::paths;
use crate::infra::session::Profile;

/// Run the first-time setup wizard.
pub async fn run_init() -> anyhow::Result<()> {
    println!("copybloom setup");
    println!();

    // 1. Create directories
    eprint!("  Creating directories... ");
    paths::ensure_dirs().await?;
    eprintln!("done");

    // 2. API key
    let config_path = paths::config_file_path();
    let mut config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        Config::default()
    };

    if config.model.resolve_api_key().is_some() {
        println!("  API key: found");
    } else {
        println!("  No Gemini API key detected.");
        let key = inquire::Password::new("Gemini API key (blank to skip):")
            .with_display_mode(inquire::PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .unwrap_or_default();
        if key.trim().is_empty() {
            println!("  Skipped. Set one later with:");
            println!("    export GEMINI_API_KEY=...");
        } else {
            config.model.api_key = Some(key.trim().to_string());
        }
    }

    // 3. Author profile for campaign history
    if Profile::load().is_none() {
        let name = inquire::Text::new("Your name (blank to skip):")
            .prompt()
            .unwrap_or_default();
        if !name.trim().is_empty() {
            Profile::new(name.trim(), None).save()?;
            println!("  Profile saved.");
        }
    } else {
        println!("  Profile: already set");
    }

    // 4. Write config
    config.save(&config_path)?;
    println!("  Config: {}", config_path.display());

    println!();
    println!("Setup complete!");
    println!();
    println!("Try:");
    println!("  copybloom copy --type email --message \"...\"   Generate campaign copy");
    println!("  copybloom ideas fitness                        Video ideas for a niche");
    println!("  copybloom chat                                 Interactive assistant");
    println!("  copybloom campaigns list                       Browse saved campaigns");

    Ok(())
}

pub fn run_login(name: Option<String>, email: Option<String>) -> anyhow::Result<()> {
    let name = super::require_field(name, "Your name:")?;
    let profile = Profile::new(name.trim(), email.as_deref());
    profile.save()?;
    println!("Signed in as {}", profile.name);
    Ok(())
}

pub fn run_logout() -> anyhow::Result<()> {
    Profile::clear()?;
    println!("Profile removed.");
    Ok(())
}
