//! Preference commands

use crate::app::{OutputFormat, PrefsAction, PrefsArgs};
use crate::output::format_preferences;
use crate::Services;
use anyhow::Result;

pub fn run(args: PrefsArgs, services: &Services, format: OutputFormat) -> Result<()> {
    let update = args.action.update();
    let db = services.database()?;

    match args.action {
        PrefsAction::Show { user_id } => match db.get_preferences(&user_id)? {
            Some(prefs) => print!("{}", with_newline(format_preferences(&prefs, format))),
            None => match format {
                OutputFormat::Json => println!("null"),
                OutputFormat::Cli => println!("No preferences saved for '{}'", user_id),
            },
        },
        PrefsAction::Set { user_id, .. } => {
            let update = update.unwrap_or_default();
            if update.is_empty() {
                tracing::info!("No fields given; touching preferences for '{}'", user_id);
            }
            let prefs = db.save_preferences(&user_id, &update)?;
            match format {
                OutputFormat::Json => print!("{}", with_newline(format_preferences(&prefs, format))),
                OutputFormat::Cli => println!("Preferences saved for '{}'", prefs.user_id),
            }
        }
    }
    Ok(())
}

fn with_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}
