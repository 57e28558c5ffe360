use serde::Serialize;

use crate::{
    settings::settings_model::{IncentiveConfig, IncentiveType, TestimonialFormat},
    widget::widget_model::TestimonialDraft,
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Eligibility {
    pub eligible: bool,

    /// Why the draft does not qualify, in check order
    pub reasons: Vec<String>,
}

/// Check a draft against the incentive's minimum qualification.
///
/// Disabled incentives stop immediately. Otherwise every check runs so the
/// visitor sees all unmet requirements at once: format, then rating, then
/// text length (text testimonials only). A draft with no format counts as
/// text.
pub fn is_eligible(config: &IncentiveConfig, draft: &TestimonialDraft) -> Eligibility {
    if !config.enabled {
        return Eligibility {
            eligible: false,
            reasons: vec!["Incentives are not enabled".into()],
        };
    }

    let qualification = config.minimum_qualification.clone().unwrap_or_default();
    let format = draft.format.unwrap_or(TestimonialFormat::Text);
    let mut reasons = Vec::new();

    if let Some(allowed) = &qualification.testimonial_type {
        if !allowed.is_empty() && !allowed.contains(&format) {
            let names = allowed
                .iter()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            reasons.push(format!("Incentives only apply to {} testimonials", names));
        }
    }

    let minimum_rating = qualification.minimum_rating.unwrap_or(0);
    if draft.rating < minimum_rating {
        reasons.push(format!("Rating must be at least {} stars", minimum_rating));
    }

    if format == TestimonialFormat::Text {
        let minimum_length = qualification.minimum_length.unwrap_or(0);
        if draft.text.trim().chars().count() < minimum_length {
            reasons.push(format!("Text must be at least {} characters", minimum_length));
        }
    }

    Eligibility {
        eligible: reasons.is_empty(),
        reasons,
    }
}

/// Reward shown on the completion step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardOffer {
    pub label: String,
    pub code: String,
    pub description: String,
    pub validity: Option<String>,
}

/// The reward to reveal, if the incentive has a code and the draft qualifies.
pub fn reward_offer(config: &IncentiveConfig, draft: &TestimonialDraft) -> Option<RewardOffer> {
    let code = config.code.as_ref().filter(|c| !c.trim().is_empty())?;
    if !is_eligible(config, draft).eligible {
        return None;
    }

    let label = match config.kind {
        IncentiveType::Discount => "Discount code",
        _ => "Reward code",
    };

    Some(RewardOffer {
        label: label.to_string(),
        code: code.clone(),
        description: config.value.clone(),
        validity: config
            .expiry_days
            .map(|days| format!("Valid for {} days", days)),
    })
}
