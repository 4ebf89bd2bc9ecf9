//! Analysis selection and tuning passed from the CLI into the pipeline

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::text::DEFAULT_KEYWORD_LIMIT;

/// Default |r| for the console list of correlated question pairs
pub const DEFAULT_MIN_CORRELATION: f64 = 0.4;

/// One selectable analysis step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Basic,
    Correlation,
    TTest,
    Ipa,
    Text,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 5] = [
        AnalysisKind::Basic,
        AnalysisKind::Correlation,
        AnalysisKind::TTest,
        AnalysisKind::Ipa,
        AnalysisKind::Text,
    ];
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisKind::Basic => write!(f, "basic"),
            AnalysisKind::Correlation => write!(f, "correlation"),
            AnalysisKind::TTest => write!(f, "ttest"),
            AnalysisKind::Ipa => write!(f, "ipa"),
            AnalysisKind::Text => write!(f, "text"),
        }
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" | "stats" => Ok(AnalysisKind::Basic),
            "correlation" | "corr" => Ok(AnalysisKind::Correlation),
            "ttest" | "t-test" => Ok(AnalysisKind::TTest),
            "ipa" => Ok(AnalysisKind::Ipa),
            "text" => Ok(AnalysisKind::Text),
            other => Err(format!(
                "unknown analysis '{}' (expected basic, correlation, ttest, ipa or text)",
                other
            )),
        }
    }
}

/// Set of analyses to run, kept in canonical order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnalysisSet(Vec<AnalysisKind>);

impl AnalysisSet {
    pub fn all() -> Self {
        Self(AnalysisKind::ALL.to_vec())
    }

    pub fn from_kinds(kinds: impl IntoIterator<Item = AnalysisKind>) -> Self {
        let mut kinds: Vec<AnalysisKind> = kinds.into_iter().collect();
        kinds.sort();
        kinds.dedup();
        Self(kinds)
    }

    pub fn contains(&self, kind: AnalysisKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = AnalysisKind> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for AnalysisSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for AnalysisSet {
    type Err = String;

    /// Parse a comma-separated list; `all` selects everything.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }
        let kinds = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(AnalysisKind::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if kinds.is_empty() {
            return Err("at least one analysis must be selected".to_string());
        }
        Ok(Self::from_kinds(kinds))
    }
}

impl fmt::Display for AnalysisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|k| k.to_string()).collect();
        write!(f, "{}", names.join(","))
    }
}

/// Analysis settings resolved from the command line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisConfig {
    pub analyses: AnalysisSet,
    pub keyword_limit: usize,
    pub min_correlation: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            analyses: AnalysisSet::all(),
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            min_correlation: DEFAULT_MIN_CORRELATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis_set_sorts_and_dedups() {
        let set: AnalysisSet = "ipa, basic,IPA".parse().unwrap();
        assert_eq!(set.to_string(), "basic,ipa");
        assert!(set.contains(AnalysisKind::Ipa));
        assert!(!set.contains(AnalysisKind::Text));
    }

    #[test]
    fn test_parse_all_and_invalid() {
        assert_eq!("all".parse::<AnalysisSet>().unwrap(), AnalysisSet::all());
        assert!("basic,anova".parse::<AnalysisSet>().is_err());
        assert!(" , ".parse::<AnalysisSet>().is_err());
    }

    #[test]
    fn test_settings_serialize() {
        let json = serde_json::to_value(AnalysisConfig::default()).unwrap();
        assert_eq!(json["keyword_limit"], 5);
        assert_eq!(json["analyses"][2], "ttest");
    }
}
