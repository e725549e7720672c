//! Static checklist templates for supported ISO standards.

use serde::Serialize;

use crate::error::DomainError;

/// Identifier of the ISO 9001 quality management template.
pub const ISO_9001: &str = "ISO 9001";

/// One section/question pair of a standard's question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateEntry {
    pub section: &'static str,
    pub question: &'static str,
}

const ISO_9001_TEMPLATE: &[TemplateEntry] = &[
    TemplateEntry {
        section: "4.1",
        question: "Has the organization determined the external and internal issues relevant to its purpose and strategic direction?",
    },
    TemplateEntry {
        section: "4.2",
        question: "Have the needs and expectations of relevant interested parties been determined and reviewed?",
    },
    TemplateEntry {
        section: "5.1",
        question: "Does top management demonstrate leadership and commitment to the quality management system?",
    },
    TemplateEntry {
        section: "6.1",
        question: "Have the risks and opportunities that need to be addressed been determined and planned for?",
    },
    TemplateEntry {
        section: "7.1",
        question: "Are the resources needed for the quality management system determined and provided?",
    },
    TemplateEntry {
        section: "7.5",
        question: "Is documented information controlled, available and protected where required?",
    },
    TemplateEntry {
        section: "8.1",
        question: "Are operational processes planned, implemented and controlled to meet product and service requirements?",
    },
    TemplateEntry {
        section: "8.5",
        question: "Is production and service provision carried out under controlled conditions?",
    },
    TemplateEntry {
        section: "9.1",
        question: "Is performance monitored, measured, analysed and evaluated at planned intervals?",
    },
    TemplateEntry {
        section: "10.2",
        question: "When a nonconformity occurs, does the organization react, correct it and evaluate the need for corrective action?",
    },
];

/// Summary of a supported standard, returned by the standards listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardSummary {
    pub id: &'static str,
    pub question_count: usize,
}

/// Returns the question bank for `standard`, in template order.
pub fn template_for(standard: &str) -> Result<&'static [TemplateEntry], DomainError> {
    match standard.trim() {
        ISO_9001 => Ok(ISO_9001_TEMPLATE),
        other => Err(DomainError::UnsupportedStandard(other.to_string())),
    }
}

/// All standards that have a template.
pub fn supported_standards() -> Vec<StandardSummary> {
    vec![StandardSummary {
        id: ISO_9001,
        question_count: ISO_9001_TEMPLATE.len(),
    }]
}
