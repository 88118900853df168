use std::collections::BTreeMap;

use bevy::prelude::*;

// =============================================================================
// Constants
// =============================================================================

/// Locale used when a player's locale has no table or lacks a key.
pub const DEFAULT_LOCALE: &str = "en";

/// Message keys used in chat replies.
pub mod lang {
    pub const NO_PERMISSION: &str = "NoPermission";
    pub const BARRICADE_ENABLED: &str = "BarricadeEnabled";
    pub const BARRICADE_DISABLED: &str = "BarricadeDisabled";
}

/// A string table maps message keys to their template for a single locale.
pub type StringTable = BTreeMap<String, String>;

// =============================================================================
// Service
// =============================================================================

/// Renders a message key for a locale, substituting `{0}`, `{1}`, ... with `args`.
pub trait MessageRenderer: Send + Sync + 'static {
    fn render(&self, key: &str, locale: &str, args: &[&str]) -> String;
}

/// Per-locale string tables.
///
/// Lookup order is the requested locale, then [`DEFAULT_LOCALE`], then the key
/// itself so a missing translation still says something.
#[derive(Debug, Clone, Default)]
pub struct LangTable {
    tables: BTreeMap<String, StringTable>,
}

impl LangTable {
    /// Table preloaded with the plugin's English messages.
    pub fn with_defaults() -> Self {
        let mut table = Self::default();
        table.register_messages(DEFAULT_LOCALE, build_english_table());
        table
    }

    /// Merge `messages` into the table for `locale`, replacing existing keys.
    pub fn register_messages(&mut self, locale: &str, messages: StringTable) {
        self.tables
            .entry(locale.to_string())
            .or_default()
            .extend(messages);
    }

    pub fn get(&self, key: &str, locale: &str) -> Option<&str> {
        self.tables
            .get(locale)
            .and_then(|table| table.get(key))
            .or_else(|| {
                self.tables
                    .get(DEFAULT_LOCALE)
                    .and_then(|table| table.get(key))
            })
            .map(String::as_str)
    }
}

impl MessageRenderer for LangTable {
    fn render(&self, key: &str, locale: &str, args: &[&str]) -> String {
        let template = self.get(key, locale).unwrap_or(key);
        format_args_positional(template, args)
    }
}

/// The active message renderer.
#[derive(Resource)]
pub struct Localizer(pub Box<dyn MessageRenderer>);

impl Default for Localizer {
    fn default() -> Self {
        Self(Box::new(LangTable::with_defaults()))
    }
}

impl Localizer {
    pub fn new(renderer: impl MessageRenderer) -> Self {
        Self(Box::new(renderer))
    }

    pub fn render(&self, key: &str, locale: &str, args: &[&str]) -> String {
        self.0.render(key, locale, args)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn format_args_positional(template: &str, args: &[&str]) -> String {
    if args.is_empty() {
        return template.to_string();
    }
    let mut out = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), arg);
    }
    out
}

fn build_english_table() -> StringTable {
    let mut t = StringTable::new();
    t.insert(
        lang::NO_PERMISSION.into(),
        "You do not have permission to use this command.".into(),
    );
    t.insert(
        lang::BARRICADE_ENABLED.into(),
        "You have turned Barricade-to-Wall ON! Any barricades you place will turn into walls."
            .into(),
    );
    t.insert(
        lang::BARRICADE_DISABLED.into(),
        "You have turned Barricade-to-Wall OFF! Barricades you place will remain normal.".into(),
    );
    t
}
