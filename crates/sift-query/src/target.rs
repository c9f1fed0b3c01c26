//! Table/column reference that every emitted predicate filters on.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SiftError;

/// `Name[Column]`, non-greedy on the name.
static BRACKET_BINDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\[(.*)\]$").expect("bracket binding regex"));

/// The column a filter applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub table: String,
    pub column: String,
}

impl TargetRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        TargetRef {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Derives a target from a host column binding.
    ///
    /// - `Sales[Region]` gives table `Sales`, column `Region`
    /// - `db.Sales.Region` gives the last two segments: `Sales`, `Region`
    /// - anything else gives `None`
    pub fn from_binding(raw: &str) -> Option<TargetRef> {
        if let Some(caps) = BRACKET_BINDING.captures(raw) {
            return Some(TargetRef::new(&caps[1], &caps[2]));
        }

        let segments: Vec<&str> = raw.split('.').collect();
        match segments.as_slice() {
            [.., table, column] => Some(TargetRef::new(*table, *column)),
            _ => None,
        }
    }
}

impl FromStr for TargetRef {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetRef::from_binding(s).ok_or_else(|| SiftError::InvalidTarget(s.to_string()))
    }
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.table, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_binding() {
        assert_eq!(
            TargetRef::from_binding("Tickets[Priority]"),
            Some(TargetRef::new("Tickets", "Priority"))
        );
    }

    #[test]
    fn bracket_binding_wins_over_dots() {
        assert_eq!(
            TargetRef::from_binding("'Sales.2024'[Region Name]"),
            Some(TargetRef::new("'Sales.2024'", "Region Name"))
        );
    }

    #[test]
    fn dotted_binding_uses_last_two_segments() {
        assert_eq!(
            TargetRef::from_binding("Tickets.Priority"),
            Some(TargetRef::new("Tickets", "Priority"))
        );
        assert_eq!(
            TargetRef::from_binding("dbo.Tickets.Priority"),
            Some(TargetRef::new("Tickets", "Priority"))
        );
    }

    #[test]
    fn unsplittable_binding() {
        assert_eq!(TargetRef::from_binding("Priority"), None);
        assert!(matches!(
            "Priority".parse::<TargetRef>(),
            Err(SiftError::InvalidTarget(s)) if s == "Priority"
        ));
    }

    #[test]
    fn display_uses_bracket_form() {
        let t = TargetRef::new("Tickets", "Priority");
        assert_eq!(t.to_string(), "Tickets[Priority]");
        assert_eq!(t.to_string().parse::<TargetRef>().unwrap(), t);
    }
}
