//! Soft findings recorded while a plan is computed.
//!
//! Nothing in here aborts a request. Issues are collected on the solution so
//! callers can inspect them instead of scraping log lines:
//!
//! - [`Category::Convergence`]: rebalancer residual beyond the acceptance tolerance
//! - [`Category::Rounding`]: residual the rounding pass could not place
//! - [`Category::Floor`]: a unit left below its effective minimum
//! - [`Category::Market`]: a market input that was clamped into range
//!
//! # Example
//!
//! ```
//! use merit_core::diagnostics::{Category, Diagnostics};
//!
//! let mut diag = Diagnostics::new();
//! diag.add(Category::Market, "wind availability 120 clamped to 100");
//! diag.add_with_entity(Category::Floor, "power 25.0 MW below minimum 30.0 MW", "gas2");
//!
//! assert_eq!(diag.len(), 2);
//! assert_eq!(diag.by_category(Category::Floor).count(), 1);
//! ```

use serde::Serialize;

/// Grouping for diagnostic issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Convergence,
    Rounding,
    Floor,
    Market,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Convergence => "convergence",
            Category::Rounding => "rounding",
            Category::Floor => "floor",
            Category::Market => "market",
        };
        f.write_str(name)
    }
}

/// A single finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticIssue {
    pub category: Category,
    /// Human-readable description of the issue
    pub message: String,
    /// Optional unit reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(category: Category, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            entity: None,
        }
    }

    /// Add unit reference to the issue
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)?;
        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }
        Ok(())
    }
}

/// Collection of findings for one request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, category: Category, message: impl Into<String>) {
        self.issues.push(DiagnosticIssue::new(category, message));
    }

    pub fn add_with_entity(
        &mut self,
        category: Category,
        message: impl Into<String>,
        entity: impl Into<String>,
    ) {
        self.issues
            .push(DiagnosticIssue::new(category, message).with_entity(entity));
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    /// Get summary string
    pub fn summary(&self) -> String {
        match self.issues.len() {
            0 => "No issues".to_string(),
            1 => "1 warning".to_string(),
            n => format!("{} warnings", n),
        }
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Diagnostics: {}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}
