//! Stage insights
//!
//! Canned guidance shown next to a proposal. Selection is a deterministic
//! lookup keyed on the proposal and its current stage.

use crate::workflow::models::{Proposal, Scheme};

pub const NO_RECOMMENDATION: &str = "No AI recommendations available at this time.";

const VENDORS: [&str; 13] = [
    "Bharat Electronics Limited (BEL)",
    "Hindustan Aeronautics Limited (HAL)",
    "Bharat Dynamics Limited (BDL)",
    "Mazagon Dock Shipbuilders Ltd",
    "Larsen & Toubro Defence",
    "Tata Advanced Systems",
    "Kalyani Strategic Systems",
    "Mahindra Defence Systems",
    "Alpha Design Technologies",
    "Astra Microwave Products",
    "Centum Electronics",
    "Data Patterns India",
    "Adani Defence & Aerospace",
];

/// Guidance for the proposal's current stage
pub fn recommendation(proposal: &Proposal, scheme: Option<&Scheme>) -> String {
    let Some(scheme) = scheme else {
        return NO_RECOMMENDATION.to_string();
    };
    let stage = proposal.current_stage();

    let candidates = [
        format!(
            "Based on similar {} proposals, we recommend focusing on detailed technical documentation for this stage.",
            scheme.name
        ),
        format!(
            "Historical data shows that {} typically requires approximately 3-4 weeks to complete.",
            stage.name
        ),
        "Consider involving technical experts early in this stage to prevent approval delays.".to_string(),
        "Previous successful proposals in this scheme had thorough risk assessment documentation.".to_string(),
        "For optimal approval rates, ensure all technical specifications are clearly defined and measurable.".to_string(),
        "AI analysis suggests including comprehensive vendor capability assessment to improve approval chances.".to_string(),
        "Similar proposals have benefited from early stakeholder consultation during this stage.".to_string(),
        "Based on pattern analysis, successful proposals typically include detailed milestone timelines.".to_string(),
    ];

    let seed = first_char_code(&proposal.id.to_string()) + first_char_code(&stage.id);
    let index = seed as usize % candidates.len();
    candidates[index].clone()
}

/// The first `limit` vendors of the shortlist
pub fn vendor_recommendations(limit: usize) -> Vec<&'static str> {
    VENDORS.iter().take(limit).copied().collect()
}

fn first_char_code(s: &str) -> u32 {
    s.chars().next().map_or(0, u32::from)
}
