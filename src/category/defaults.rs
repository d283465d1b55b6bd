//! The categories every new account starts with.

use rusqlite::Connection;

use crate::{
    Error, UserId,
    category::{Category, CategoryKind, CategoryName, Color, NewCategory, create_category},
};

/// A category created for every new user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCategory {
    /// The category's display name.
    pub name: &'static str,
    /// Whether the category is for income or expenses.
    pub kind: CategoryKind,
    /// An emoji shown next to the name.
    pub icon: &'static str,
    /// The hex colour used in charts.
    pub color: &'static str,
}

const fn expense(name: &'static str, icon: &'static str, color: &'static str) -> DefaultCategory {
    DefaultCategory {
        name,
        kind: CategoryKind::Expense,
        icon,
        color,
    }
}

const fn income(name: &'static str, icon: &'static str, color: &'static str) -> DefaultCategory {
    DefaultCategory {
        name,
        kind: CategoryKind::Income,
        icon,
        color,
    }
}

/// The categories created for every new user.
pub const DEFAULT_CATEGORIES: [DefaultCategory; 14] = [
    expense("Food & Dining", "🍔", "#FF6B6B"),
    expense("Transportation", "🚗", "#4ECDC4"),
    expense("Shopping", "🛍️", "#FFE66D"),
    expense("Entertainment", "🎬", "#95E1D3"),
    expense("Bills & Utilities", "💡", "#F38181"),
    expense("Healthcare", "🏥", "#AA96DA"),
    expense("Education", "📚", "#FCBAD3"),
    expense("Travel", "✈️", "#A8D8EA"),
    expense("Other", "💼", "#C7CEEA"),
    income("Salary", "💰", "#34C759"),
    income("Freelance", "💻", "#5AC8FA"),
    income("Investment", "📈", "#AF52DE"),
    income("Gift", "🎁", "#FF9500"),
    income("Other Income", "💵", "#8E8E93"),
];

/// Create a copy of each of [DEFAULT_CATEGORIES] owned by `user_id`.
///
/// The caller should run this inside the same SQL transaction that creates the user.
///
/// # Errors
///
/// Returns an [Error::SqlError] if a category could not be inserted.
pub fn create_default_categories(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|default| {
            create_category(
                NewCategory {
                    user_id,
                    name: CategoryName::new_unchecked(default.name),
                    kind: default.kind,
                    icon: default.icon.to_owned(),
                    color: Color::new_unchecked(default.color),
                    is_default: true,
                },
                connection,
            )
        })
        .collect()
}
