//! User preference storage
//!
//! One record per user id, created on first save and updated field by field
//! afterwards. Updates run inside an immediate transaction so concurrent
//! saves for the same user serialize instead of losing writes.

use super::Database;
use crate::error::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Stored dietary preferences for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: String,
    #[serde(default)]
    pub dietary_type: Option<String>,
    #[serde(default)]
    pub spice_level: Option<String>,
    #[serde(default)]
    pub allergens: BTreeSet<String>,
    #[serde(default)]
    pub preferred_cuisines: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl UserPreferences {
    /// Empty record for a new user
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            dietary_type: None,
            spice_level: None,
            allergens: BTreeSet::new(),
            preferred_cuisines: BTreeSet::new(),
            updated_at: None,
        }
    }

    /// Overwrite every field the update carries; leave the rest alone
    pub fn apply(&mut self, update: &PreferenceUpdate) {
        if let Some(ref dietary_type) = update.dietary_type {
            self.dietary_type = Some(dietary_type.clone());
        }
        if let Some(ref spice_level) = update.spice_level {
            self.spice_level = Some(spice_level.clone());
        }
        if let Some(ref allergens) = update.allergens {
            self.allergens = allergens.clone();
        }
        if let Some(ref cuisines) = update.preferred_cuisines {
            self.preferred_cuisines = cuisines.clone();
        }
    }
}

/// Partial update: `None` means "keep the stored value"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceUpdate {
    #[serde(default)]
    pub dietary_type: Option<String>,
    #[serde(default)]
    pub spice_level: Option<String>,
    #[serde(default)]
    pub allergens: Option<BTreeSet<String>>,
    #[serde(default)]
    pub preferred_cuisines: Option<BTreeSet<String>>,
}

impl PreferenceUpdate {
    pub fn is_empty(&self) -> bool {
        self.dietary_type.is_none()
            && self.spice_level.is_none()
            && self.allergens.is_none()
            && self.preferred_cuisines.is_none()
    }
}

impl Database {
    /// Get preferences for a user
    pub fn get_preferences(&self, user_id: &str) -> Result<Option<UserPreferences>> {
        load_preferences(&self.conn, user_id)
    }

    /// Create or partially update a user's preferences.
    ///
    /// Returns the record as committed.
    pub fn save_preferences(
        &self,
        user_id: &str,
        update: &PreferenceUpdate,
    ) -> Result<UserPreferences> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;

        let existing = load_preferences(&tx, user_id)?;
        let created = existing.is_none();
        let mut prefs = existing.unwrap_or_else(|| UserPreferences::new(user_id));
        prefs.apply(update);

        let now = Utc::now().to_rfc3339();
        prefs.updated_at = Some(now.clone());

        tx.execute(
            "INSERT INTO user_preferences
                (user_id, dietary_type, spice_level, allergens, preferred_cuisines, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(user_id) DO UPDATE SET
                dietary_type = excluded.dietary_type,
                spice_level = excluded.spice_level,
                allergens = excluded.allergens,
                preferred_cuisines = excluded.preferred_cuisines,
                updated_at = excluded.updated_at",
            params![
                prefs.user_id,
                prefs.dietary_type,
                prefs.spice_level,
                serde_json::to_string(&prefs.allergens)?,
                serde_json::to_string(&prefs.preferred_cuisines)?,
                now,
            ],
        )?;

        tx.commit()?;

        tracing::debug!(
            "{} preferences for user '{}'",
            if created { "Created" } else { "Updated" },
            user_id
        );
        Ok(prefs)
    }
}

fn load_preferences(conn: &Connection, user_id: &str) -> Result<Option<UserPreferences>> {
    let prefs = conn
        .query_row(
            "SELECT user_id, dietary_type, spice_level, allergens, preferred_cuisines, updated_at
             FROM user_preferences WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(UserPreferences {
                    user_id: row.get(0)?,
                    dietary_type: row.get(1)?,
                    spice_level: row.get(2)?,
                    allergens: json_set_column(row, 3)?,
                    preferred_cuisines: json_set_column(row, 4)?,
                    updated_at: row.get(5)?,
                })
            },
        )
        .optional()?;
    Ok(prefs)
}

/// Decode a JSON array column; malformed content is an error, never an empty set
fn json_set_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<BTreeSet<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
