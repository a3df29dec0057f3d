use crate::error::AppError;

pub const PROFILE_VIEWER_COLUMN: &str = "Profile viewer";
pub const COMPANY_COLUMN: &str = "Company";
pub const JOB_TITLE_COLUMN: &str = "Job title";
pub const CONTENT_COLUMN: &str = "Content";
pub const POST_COLUMN: &str = "Post";
pub const DATE_COLUMN: &str = "Date";

/// Columns we look for by keyword rather than by exact header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnConcept {
    Date,
    EngagementMetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    FirstMatch,
    AllMatches,
}

impl ColumnConcept {
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            ColumnConcept::Date => &["date"],
            ColumnConcept::EngagementMetric => &["like", "comment", "share", "click", "impression"],
        }
    }

    pub fn policy(self) -> MatchPolicy {
        match self {
            ColumnConcept::Date => MatchPolicy::FirstMatch,
            ColumnConcept::EngagementMetric => MatchPolicy::AllMatches,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColumnConcept::Date => "date",
            ColumnConcept::EngagementMetric => "engagement metric",
        }
    }
}

/// Case-insensitive substring matching over one sheet's headers.
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver<'a> {
    headers: &'a [String],
}

impl<'a> ColumnResolver<'a> {
    pub fn new(headers: &'a [String]) -> Self {
        Self { headers }
    }

    /// Matching headers in column order, cut to one for `FirstMatch` concepts.
    pub fn resolve(&self, concept: ColumnConcept) -> Vec<&'a str> {
        let keywords = concept.keywords();
        let matches = self.headers
            .iter()
            .filter(|header| {
                let lowered = header.to_lowercase();
                keywords.iter().any(|keyword| lowered.contains(keyword))
            })
            .map(String::as_str);

        match concept.policy() {
            MatchPolicy::FirstMatch => matches.take(1).collect(),
            MatchPolicy::AllMatches => matches.collect(),
        }
    }

    pub fn date_column(&self) -> Option<&'a str> {
        self.resolve(ColumnConcept::Date).into_iter().next()
    }

    pub fn require_date_column(&self, sheet: &str) -> Result<&'a str, AppError> {
        self.date_column().ok_or_else(|| AppError::MissingExpectedColumn {
            sheet: sheet.to_string(),
            column: ColumnConcept::Date.name().to_string(),
        })
    }

    pub fn engagement_columns(&self) -> Vec<&'a str> {
        self.resolve(ColumnConcept::EngagementMetric)
    }

    /// Exact, case-sensitive header lookup.
    pub fn exact(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .find(|header| header.as_str() == name)
            .map(String::as_str)
    }

    /// First of `names` that exists as a header.
    pub fn first_present(&self, names: &[&str]) -> Option<&'a str> {
        names.iter().find_map(|name| self.exact(name))
    }
}
