//! Violation taxonomy and default severity classification.
//!
//! Categories follow an ICT operational-resilience taxonomy (risk
//! management, incident handling, resilience testing, third-party risk,
//! information sharing). Each category maps to exactly one default tier
//! through an exhaustive `match`, so adding a category without a tier is a
//! compile error rather than a runtime fallthrough.

use crate::schedule::SeverityTier;
use regrisk_core::types::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Business taxonomy of regulatory violations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCategory {
    /// ICT risk-management framework missing or ineffective
    IctRiskManagementFailure,
    /// Management body failed to define, approve or oversee the framework
    GovernanceFailure,
    /// Major ICT-related incident not reported to the authority
    IncidentNonReporting,
    /// Incident reported outside the statutory deadlines
    IncidentReportingDelay,
    /// Digital operational resilience testing programme incomplete
    TestingProgrammeGap,
    /// Contractual or concentration risk with ICT third parties unmanaged
    ThirdPartyRiskFailure,
    /// Register of information on ICT third-party arrangements incomplete
    RegisterOfInformationGap,
    /// Cyber-threat information-sharing arrangements breached
    InformationSharingFailure,
}

impl ViolationCategory {
    /// Every category, in declaration order.
    pub const ALL: [ViolationCategory; 8] = [
        ViolationCategory::IctRiskManagementFailure,
        ViolationCategory::GovernanceFailure,
        ViolationCategory::IncidentNonReporting,
        ViolationCategory::IncidentReportingDelay,
        ViolationCategory::TestingProgrammeGap,
        ViolationCategory::ThirdPartyRiskFailure,
        ViolationCategory::RegisterOfInformationGap,
        ViolationCategory::InformationSharingFailure,
    ];

    /// Canonical snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IctRiskManagementFailure => "ict_risk_management_failure",
            Self::GovernanceFailure => "governance_failure",
            Self::IncidentNonReporting => "incident_non_reporting",
            Self::IncidentReportingDelay => "incident_reporting_delay",
            Self::TestingProgrammeGap => "testing_programme_gap",
            Self::ThirdPartyRiskFailure => "third_party_risk_failure",
            Self::RegisterOfInformationGap => "register_of_information_gap",
            Self::InformationSharingFailure => "information_sharing_failure",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::IctRiskManagementFailure => "ICT risk-management framework failure",
            Self::GovernanceFailure => "Management-body governance failure",
            Self::IncidentNonReporting => "Failure to report a major ICT-related incident",
            Self::IncidentReportingDelay => "Late incident notification",
            Self::TestingProgrammeGap => "Gap in the resilience testing programme",
            Self::ThirdPartyRiskFailure => "Unmanaged ICT third-party risk",
            Self::RegisterOfInformationGap => "Incomplete register of information",
            Self::InformationSharingFailure => "Breach of information-sharing arrangements",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViolationCategory {
    type Err = EngineError;

    /// Parses the snake_case name; case, `-` and spaces are tolerated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name() == normalised)
            .ok_or_else(|| EngineError::UnknownCategory(s.to_string()))
    }
}

/// Statutory default tier per category.
fn baseline_tier(category: ViolationCategory) -> SeverityTier {
    match category {
        ViolationCategory::IctRiskManagementFailure => SeverityTier::Major,
        ViolationCategory::GovernanceFailure => SeverityTier::Major,
        ViolationCategory::IncidentNonReporting => SeverityTier::Critical,
        ViolationCategory::IncidentReportingDelay => SeverityTier::Moderate,
        ViolationCategory::TestingProgrammeGap => SeverityTier::Moderate,
        ViolationCategory::ThirdPartyRiskFailure => SeverityTier::Major,
        ViolationCategory::RegisterOfInformationGap => SeverityTier::Minor,
        ViolationCategory::InformationSharingFailure => SeverityTier::Minor,
    }
}

/// Maps a violation category to its default severity tier.
///
/// The baseline mapping is total over [`ViolationCategory`]. A classifier
/// may carry per-category overrides (e.g. from supervisory guidance loaded
/// at configuration time); a per-violation `severity_override` on the
/// [`ViolationInstance`](crate::ViolationInstance) still takes precedence.
///
/// # Examples
///
/// ```
/// use regrisk_penalty::{SeverityTier, ViolationCategory, ViolationClassifier};
///
/// let classifier = ViolationClassifier::standard();
/// assert_eq!(
///     classifier.default_severity(ViolationCategory::IncidentNonReporting),
///     SeverityTier::Critical
/// );
///
/// let stricter = classifier.with_override(ViolationCategory::TestingProgrammeGap, SeverityTier::Major);
/// assert_eq!(
///     stricter.default_severity(ViolationCategory::TestingProgrammeGap),
///     SeverityTier::Major
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViolationClassifier {
    overrides: BTreeMap<ViolationCategory, SeverityTier>,
}

impl ViolationClassifier {
    /// Classifier using only the statutory baseline mapping.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Returns a classifier that maps `category` to `tier`.
    pub fn with_override(mut self, category: ViolationCategory, tier: SeverityTier) -> Self {
        self.overrides.insert(category, tier);
        self
    }

    /// Default severity tier for a category.
    pub fn default_severity(&self, category: ViolationCategory) -> SeverityTier {
        self.overrides
            .get(&category)
            .copied()
            .unwrap_or_else(|| baseline_tier(category))
    }
}
