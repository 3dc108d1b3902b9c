//! `automl config`: profiles and settings.

use anyhow::Result;
use automl::Profile;
use colored::Colorize;
use serde_json::json;

use crate::app::App;
use crate::cli::ConfigCommand;
use crate::render;

pub fn execute(mut app: App, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => show(&app),
        ConfigCommand::SetProfile {
            name,
            token,
            api_url,
            websocket_url,
            serving_url,
            admin_url,
        } => {
            let profile = Profile {
                token,
                api_url,
                admin_url,
                websocket_url,
                serving_url,
            };
            let result = app.config.set_profile(name.clone(), profile);
            app.surface(result)?;
            app.save()?;
            println!("{} Profile '{}' saved", "✓".green(), name);
            Ok(())
        },
        ConfigCommand::Use { name } => {
            let result = app.config.use_profile(&name);
            app.surface(result)?;
            app.save()?;
            println!("{} Now using profile '{}'", "✓".green(), name);
            Ok(())
        },
        ConfigCommand::Remove { name } => {
            if app.config.remove_profile(&name).is_none() {
                println!("{} No profile named '{}'", "⚠".yellow(), name);
                return Ok(());
            }
            app.save()?;
            println!("{} Profile '{}' removed", "✓".green(), name);
            Ok(())
        },
        ConfigCommand::Set { key, value } => {
            let result = app.config.settings.set(&key, &value);
            app.surface(result)?;
            app.save()?;
            println!("{} {} = {}", "✓".green(), key, value);
            Ok(())
        },
    }
}

/// Keep the first four characters of a secret.
fn mask(token: &str) -> String {
    let head: String = token.chars().take(4).collect();
    format!("{head}****")
}

fn show(app: &App) -> Result<()> {
    let config = &app.config;
    if app.global.json {
        let profiles: serde_json::Map<String, serde_json::Value> = config
            .profiles
            .iter()
            .map(|(name, p)| {
                (
                    name.clone(),
                    json!({
                        "token": mask(&p.token),
                        "api_url": p.api_url,
                        "admin_url": p.admin_url(),
                        "websocket_url": p.websocket_url,
                        "serving_url": p.serving_url,
                    }),
                )
            })
            .collect();
        return render::print_json(&json!({
            "path": app.config_path,
            "current_profile": config.current_profile,
            "settings": config.settings,
            "profiles": profiles,
        }));
    }

    println!("\n{}", "AutoML configuration".bright_cyan().bold());
    println!("{}", "─────────────────────────────────────".bright_cyan());
    println!("  {} File: {}", "→".blue(), app.config_path.display());
    println!(
        "  {} Timeout: {}s, verbosity: {}, error policy: {}",
        "→".blue(),
        config.settings.timeout,
        config.settings.verbosity,
        config.settings.error_policy
    );
    println!();

    if config.profiles.is_empty() {
        println!("{}", "No profiles configured".yellow());
        println!();
        println!("{}", "To add one:".bright_white().bold());
        println!(
            "  automl config set-profile <name> --token <token> --api-url <url> \\\n      --websocket-url <url> --serving-url <url>"
        );
        return Ok(());
    }

    for (name, profile) in &config.profiles {
        let marker = if config.current_profile.as_deref() == Some(name.as_str()) {
            "*".green().bold().to_string()
        } else {
            " ".to_string()
        };
        println!("{} {}", marker, name.bright_white().bold());
        println!("    token:         {}", mask(&profile.token));
        println!("    api_url:       {}", profile.api_url);
        println!("    admin_url:     {}", profile.admin_url());
        println!("    websocket_url: {}", profile.websocket_url);
        println!("    serving_url:   {}", profile.serving_url);
    }
    println!();
    Ok(())
}
