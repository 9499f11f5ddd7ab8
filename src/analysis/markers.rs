//! Section markers
//!
//! The four headers the model is asked to emit, in the order they are
//! expected to appear in its reply.

use serde::Serialize;

/// One of the four fixed report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SectionMarker {
    KeyPoints,
    SuspiciousElements,
    RiskAssessment,
    Recommendations,
}

impl SectionMarker {
    /// Fixed display and extraction order.
    pub const ALL: [SectionMarker; 4] = [
        SectionMarker::KeyPoints,
        SectionMarker::SuspiciousElements,
        SectionMarker::RiskAssessment,
        SectionMarker::Recommendations,
    ];

    /// Literal header text searched for in the model reply (case-sensitive).
    pub fn label(&self) -> &'static str {
        match self {
            SectionMarker::KeyPoints => "KEY IMPORTANT POINTS",
            SectionMarker::SuspiciousElements => "SUSPICIOUS ELEMENTS",
            SectionMarker::RiskAssessment => "RISK ASSESSMENT",
            SectionMarker::Recommendations => "RECOMMENDATIONS",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionMarker::KeyPoints => "Key Important Points",
            SectionMarker::SuspiciousElements => "Suspicious Elements",
            SectionMarker::RiskAssessment => "Risk Assessment",
            SectionMarker::Recommendations => "Recommendations",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SectionMarker::KeyPoints => "📋",
            SectionMarker::SuspiciousElements => "⚠️",
            SectionMarker::RiskAssessment => "📊",
            SectionMarker::Recommendations => "💡",
        }
    }

    /// CSS modifier used by the report template
    pub fn css_class(&self) -> &'static str {
        match self {
            SectionMarker::KeyPoints => "section-key-points",
            SectionMarker::SuspiciousElements => "section-suspicious",
            SectionMarker::RiskAssessment => "section-risk",
            SectionMarker::Recommendations => "section-recommendations",
        }
    }

    /// The marker that closes this section, `None` for the last one.
    pub fn next(&self) -> Option<SectionMarker> {
        match self {
            SectionMarker::KeyPoints => Some(SectionMarker::SuspiciousElements),
            SectionMarker::SuspiciousElements => Some(SectionMarker::RiskAssessment),
            SectionMarker::RiskAssessment => Some(SectionMarker::Recommendations),
            SectionMarker::Recommendations => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_follows_display_order() {
        for pair in SectionMarker::ALL.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert_eq!(SectionMarker::Recommendations.next(), None);
    }

    #[test]
    fn test_labels_are_distinct_and_not_nested() {
        for a in SectionMarker::ALL {
            for b in SectionMarker::ALL {
                if a != b {
                    assert!(!a.label().contains(b.label()));
                }
            }
        }
    }
}
