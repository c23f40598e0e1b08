//! Scheme catalog
//!
//! The procurement schemes the dashboard ships with. Seeded once at startup
//! and never mutated afterwards.

use crate::workflow::error::{WorkflowError, WorkflowResult};
use crate::workflow::models::{Scheme, StageTemplate};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// (id, name, description, color, [(stage name, stage description)])
type SchemeSeed = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static [(&'static str, &'static str)],
);

const SEED: &[SchemeSeed] = &[
    (
        "make-i",
        "Make-I Scheme",
        "Government-Funded Prototyping with up to 70% funding and mandatory bulk order assurance",
        "blue",
        &[
            ("Feasibility Study & Categorization", "Initial assessment of the project feasibility and categorization"),
            ("Approval of Necessity (AoN) & Project Definition", "Formal approval of the project necessity and definition of project parameters"),
            ("Expression of Interest (EoI) & Vendor Shortlisting", "Publication of EoI and selection of potential vendors"),
            ("Project Sanction Order & Prototype Development", "Formal sanction order and commencement of prototype development"),
            ("Technical & Staff Evaluation", "Comprehensive evaluation of the developed prototype"),
            ("Solicitation of Revised Commercial Offer", "Request for updated commercial proposals based on evaluation"),
            ("Contract Negotiation & Finalization", "Final negotiations and contract completion"),
        ],
    ),
    (
        "make-ii",
        "Make-II Scheme",
        "Industry-Funded Prototyping with no government funding but assured orders upon success",
        "emerald",
        &[
            ("Project Identification & Categorization", "Identification of suitable projects and their categorization"),
            ("Approval of Necessity (AoN) & Expression of Interest (EoI)", "Formal approval and publication of EoI for industry participation"),
            ("Industry Submission of Proposals & Screening", "Receipt and initial screening of industry proposals"),
            ("Shortlisting & Vendor Development", "Selection of potential vendors and commencement of development"),
            ("Prototype Development & Field Trials", "Development of prototypes and their field evaluation"),
            ("Final Evaluation & Contract Placement", "Comprehensive evaluation and finalization of contracts"),
        ],
    ),
    (
        "make-iii",
        "Make-III Scheme",
        "Import Substitution through private manufacturing using JVs & Transfer of Technology",
        "indigo",
        &[
            ("Identification of Import-Dependent Equipment", "Identifying equipment currently reliant on imports"),
            ("Approval & Selection of Vendors", "Formal approval process and selection of suitable vendors"),
            ("Prototype Development & Testing", "Development and testing of prototype equipment"),
            ("Indigenous Content Validation", "Verification of indigenous content in the developed prototype"),
            ("Final Contracting & Bulk Procurement", "Contract finalization and commencement of bulk procurement"),
        ],
    ),
    (
        "idex",
        "iDEX Scheme",
        "Innovations for Defence Excellence supporting startups, MSMEs, and innovators",
        "amber",
        &[
            ("Identification of Problem Statement (iDEX Challenge)", "Definition of specific defence challenge to be addressed"),
            ("Open Call for Applications from Startups/MSMEs", "Invitation for proposals from startups and MSMEs"),
            ("Screening & Selection by High-Powered Committee (HPSC)", "Evaluation and selection of promising proposals"),
            ("Development of Prototype & AI-Based Review", "Prototype development with AI-assisted evaluation"),
            ("Field Trials & Testing", "Comprehensive field testing of the developed prototype"),
            ("Acceptance & Contract Award", "Final acceptance and contract formalization"),
        ],
    ),
    (
        "tdf",
        "Technology Development Fund (TDF) Scheme",
        "Government grants for developing indigenous defence technologies",
        "rose",
        &[
            ("Submission of Technology Development Proposal", "Formal submission of detailed technology development proposals"),
            ("Approval by Defence Research & Development Organisation (DRDO)", "Evaluation and approval by DRDO"),
            ("Grant Disbursement & Prototype Development", "Release of funds and commencement of prototype development"),
            ("Testing & Certification", "Comprehensive testing and certification of the developed technology"),
            ("Final Selection for Mass Production", "Selection for mass production based on testing results"),
        ],
    ),
    (
        "revenue",
        "Revenue Scheme",
        "Routine procurement & maintenance of defence systems",
        "purple",
        &[
            ("Item Identification & Demand Generation", "Identification of required items and formal demand creation"),
            ("Formulation of Statement of Technical Requirements (SOTRs)", "Development of detailed technical specifications"),
            ("Vendor Identification & EoI Submission", "Identification of potential vendors and request for expressions of interest"),
            ("Acceptance of Necessity (AoN) & Budget Allocation", "Formal approval and budget allocation for procurement"),
            ("Technical & Commercial Evaluation", "Comprehensive evaluation of technical and commercial aspects"),
            ("Contract Finalization & Procurement", "Finalization of contracts and initiation of procurement"),
            ("Post-Procurement Maintenance & Audit", "Ongoing maintenance and audit of procured items"),
        ],
    ),
];

/// Built-in schemes, stage ids derived as `<scheme>-stage-<n>`
static DEFAULT_SCHEMES: Lazy<Vec<Scheme>> = Lazy::new(|| {
    SEED.iter()
        .map(|(id, name, description, color, stages)| Scheme {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            color: color.to_string(),
            stages: stages
                .iter()
                .enumerate()
                .map(|(i, (stage_name, stage_description))| {
                    StageTemplate::new(format!("{}-stage-{}", id, i + 1), *stage_name, *stage_description)
                })
                .collect(),
        })
        .collect()
});

/// Immutable, ordered set of schemes
#[derive(Debug, Clone)]
pub struct SchemeCatalog {
    schemes: Vec<Scheme>,
}

impl SchemeCatalog {
    /// Build a catalog, rejecting duplicate ids and schemes without stages
    pub fn new(schemes: Vec<Scheme>) -> WorkflowResult<Self> {
        let mut seen = HashSet::new();
        for scheme in &schemes {
            if !seen.insert(scheme.id.as_str()) {
                return Err(WorkflowError::InvalidScheme(format!(
                    "duplicate scheme id '{}'",
                    scheme.id
                )));
            }
            if scheme.stages.is_empty() {
                return Err(WorkflowError::InvalidScheme(format!(
                    "scheme '{}' has no stages",
                    scheme.id
                )));
            }
            let mut stage_ids = HashSet::new();
            if let Some(dup) = scheme.stages.iter().find(|s| !stage_ids.insert(s.id.as_str())) {
                return Err(WorkflowError::InvalidScheme(format!(
                    "duplicate stage id '{}' in scheme '{}'",
                    dup.id, scheme.id
                )));
            }
        }
        Ok(Self { schemes })
    }

    /// All schemes in declaration order
    pub fn all(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn get(&self, id: &str) -> Option<&Scheme> {
        self.schemes.iter().find(|s| s.id == id)
    }

    /// The schemes the dashboard ships with
    pub fn builtin() -> WorkflowResult<Self> {
        Self::new(DEFAULT_SCHEMES.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = SchemeCatalog::builtin().unwrap();
        let summary: Vec<(&str, usize, &str)> = catalog
            .all()
            .iter()
            .map(|s| (s.id.as_str(), s.stages.len(), s.color.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("make-i", 7, "blue"),
                ("make-ii", 6, "emerald"),
                ("make-iii", 5, "indigo"),
                ("idex", 6, "amber"),
                ("tdf", 5, "rose"),
                ("revenue", 7, "purple"),
            ]
        );
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        assert!(SchemeCatalog::builtin().is_ok());
    }

    #[test]
    fn test_stage_ids_follow_scheme_id() {
        let catalog = SchemeCatalog::builtin().unwrap();
        let tdf = catalog.get("tdf").unwrap();
        assert_eq!(tdf.stages[0].id, "tdf-stage-1");
        assert_eq!(tdf.stages[4].id, "tdf-stage-5");
        assert_eq!(tdf.stages[1].name, "Approval by Defence Research & Development Organisation (DRDO)");
    }

    #[test]
    fn test_unknown_scheme_lookup() {
        assert!(SchemeCatalog::builtin().unwrap().get("make-iv").is_none());
    }

    #[test]
    fn test_rejects_duplicate_and_empty_schemes() {
        let base = SchemeCatalog::builtin().unwrap().get("tdf").unwrap().clone();
        let dup = SchemeCatalog::new(vec![base.clone(), base.clone()]);
        assert!(matches!(dup, Err(WorkflowError::InvalidScheme(_))));

        let empty = Scheme {
            stages: vec![],
            ..base
        };
        assert!(matches!(
            SchemeCatalog::new(vec![empty]),
            Err(WorkflowError::InvalidScheme(_))
        ));
    }
}
