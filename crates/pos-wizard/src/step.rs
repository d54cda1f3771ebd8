//! Wizard steps.

use std::fmt;

/// The four ordered wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    #[default]
    Upload,
    Mapping,
    Validation,
    Review,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Upload, Step::Mapping, Step::Validation, Step::Review];

    pub fn index(self) -> usize {
        match self {
            Step::Upload => 0,
            Step::Mapping => 1,
            Step::Validation => 2,
            Step::Review => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Upload => "Upload",
            Step::Mapping => "Map Columns",
            Step::Validation => "Validate",
            Step::Review => "Review",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::Upload => "Choose a CSV or Excel file with your products",
            Step::Mapping => "Match file columns to product fields",
            Step::Validation => "Check rows for errors before importing",
            Step::Review => "Confirm and import",
        }
    }

    /// The following step, `None` at the last one.
    pub fn next(self) -> Option<Step> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The preceding step, `None` at the first one.
    pub fn prev(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_first(self) -> bool {
        self.prev().is_none()
    }

    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
