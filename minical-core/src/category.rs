//! Event categories with display colors.

use serde::{Deserialize, Serialize};

/// Fallback color when an event has no resolvable category.
pub const DEFAULT_COLOR: &str = "#BFDBFE";

/// A user-defined event category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Hex color, e.g. `#BFDBFE`.
    pub color: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Category {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// The categories a fresh calendar starts with.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("work", "Work", "#BFDBFE"),
        Category::new("personal", "Personal", "#A7F3D0"),
        Category::new("important", "Important", "#FECACA"),
        Category::new("appointment", "Appointment", "#FDE68A"),
    ]
}

/// Look up the display color for a category id, falling back to the default.
pub fn color_for<'a>(categories: &'a [Category], id: Option<&str>) -> &'a str {
    id.and_then(|id| categories.iter().find(|c| c.id == id))
        .map(|c| c.color.as_str())
        .unwrap_or(DEFAULT_COLOR)
}
