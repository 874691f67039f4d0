//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use thali_core::{DishConstraints, PreferenceUpdate};

#[derive(Parser)]
#[command(name = "thali")]
#[command(
    author,
    version,
    about = "Vegetarian Indian dish recommendations grounded in a vector index"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "THALI_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Semantic dish search with dietary filters
    Search(SearchArgs),

    /// Show a single dish by id
    Get(GetArgs),

    /// Ask for a recommendation
    Ask(AskArgs),

    /// Manage stored user preferences
    Prefs(PrefsArgs),

    /// Start MCP server on stdio
    Mcp,
}

/// Dietary constraints shared by `search` and `ask`
#[derive(Args, Default)]
pub struct FilterArgs {
    /// Allergen to exclude (repeatable)
    #[arg(long = "allergy", value_name = "ALLERGEN")]
    pub allergies: Vec<String>,

    /// Dietary type tag (e.g. jain, vegan)
    #[arg(long = "diet")]
    pub dietary_type: Option<String>,

    /// Spice level: mild, medium, spicy, extra_spicy
    #[arg(long = "spice")]
    pub spice_level: Option<String>,

    /// Meal type: breakfast, lunch, dinner, snack, dessert
    #[arg(long = "meal")]
    pub meal_type: Option<String>,

    /// Preferred cuisine (repeatable)
    #[arg(long = "cuisine")]
    pub cuisines: Vec<String>,
}

impl FilterArgs {
    pub fn constraints(&self) -> DishConstraints {
        let mut constraints = DishConstraints::new();
        for allergen in &self.allergies {
            constraints = constraints.allergen(allergen.as_str());
        }
        for cuisine in &self.cuisines {
            constraints = constraints.cuisine(cuisine.as_str());
        }
        if let Some(ref diet) = self.dietary_type {
            constraints = constraints.dietary_type(diet.as_str());
        }
        if let Some(ref spice) = self.spice_level {
            constraints = constraints.spice_level(spice.as_str());
        }
        if let Some(ref meal) = self.meal_type {
            constraints = constraints.meal_type(meal.as_str());
        }
        constraints
    }
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    pub query: Vec<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of results
    #[arg(short = 'n', long, default_value_t = thali_core::DEFAULT_LIMIT)]
    pub limit: usize,

    /// Show full dish descriptions
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct GetArgs {
    /// Dish id
    pub id: String,
}

#[derive(Args)]
pub struct AskArgs {
    /// Message to the assistant
    #[arg(required = true)]
    pub message: Vec<String>,

    /// Apply stored preferences for this user
    #[arg(short, long)]
    pub user: Option<String>,

    /// Wait for the complete answer instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of dishes used for grounding
    #[arg(short = 'n', long, default_value_t = thali_core::DEFAULT_LIMIT)]
    pub limit: usize,
}

#[derive(Args)]
pub struct PrefsArgs {
    #[command(subcommand)]
    pub action: PrefsAction,
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show a user's stored preferences
    Show { user_id: String },

    /// Create or update a user's preferences; omitted fields keep their value
    Set {
        user_id: String,

        /// Dietary type
        #[arg(long = "diet")]
        dietary_type: Option<String>,

        /// Preferred spice level
        #[arg(long = "spice")]
        spice_level: Option<String>,

        /// Allergens, replacing the stored list (repeatable)
        #[arg(long = "allergy", value_name = "ALLERGEN")]
        allergies: Option<Vec<String>>,

        /// Preferred cuisines, replacing the stored list (repeatable)
        #[arg(long = "cuisine")]
        cuisines: Option<Vec<String>>,
    },
}

impl PrefsAction {
    /// Fields given on the command line, as a partial update
    pub fn update(&self) -> Option<PreferenceUpdate> {
        match self {
            PrefsAction::Show { .. } => None,
            PrefsAction::Set {
                dietary_type,
                spice_level,
                allergies,
                cuisines,
                ..
            } => Some(PreferenceUpdate {
                dietary_type: dietary_type.clone(),
                spice_level: spice_level.clone(),
                allergens: allergies.as_ref().map(|a| a.iter().cloned().collect()),
                preferred_cuisines: cuisines.as_ref().map(|c| c.iter().cloned().collect()),
            }),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
