//! CDS Hooks adapter: draft imaging orders in, advisory cards out.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EvaluationError;
use crate::evaluation::{CoverageStatus, Engine, EvaluationResult};
use crate::scenario::{
    ImagingInput, PregnancyStatus, PriorImaging, RedFlags, ScenarioInput, Urgency,
};
use crate::scoring::Category;

pub const SOURCE_LABEL: &str = "AIIE Imaging Appropriateness";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookRequest {
    pub hook: String,
    pub hook_instance: String,
    pub context: HookContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookContext {
    pub patient_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub draft_orders: Vec<DraftOrder>,
}

/// One draft imaging order. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftOrder {
    pub modality: Option<String>,
    pub body_part: Option<String>,
    pub indication: Option<String>,
    pub reason: Option<String>,
    pub urgency: Option<Urgency>,
    pub patient_age: Option<u32>,
    pub patient_sex: Option<String>,
    pub clinical_history: Option<String>,
    pub symptoms: Vec<String>,
    pub duration: Option<String>,
    pub red_flags: Option<RedFlags>,
    pub prior_imaging: Vec<PriorImaging>,
    pub pregnancy_status: Option<PregnancyStatus>,
}

impl DraftOrder {
    /// The order as a scenario payload; the reason for the order doubles as
    /// the chief complaint, falling back to the indication
    pub fn to_input(&self) -> ScenarioInput {
        ScenarioInput {
            patient_age: self.patient_age,
            sex: self.patient_sex.clone(),
            chief_complaint: self.reason.clone().or_else(|| self.indication.clone()),
            clinical_history: self.clinical_history.clone(),
            symptoms: self.symptoms.clone(),
            duration: self.duration.clone(),
            red_flags: self.red_flags.unwrap_or_default(),
            pregnancy_status: self.pregnancy_status,
            proposed_imaging: Some(ImagingInput {
                modality: self.modality.clone(),
                body_part: self.body_part.clone(),
                indication: self.indication.clone().or_else(|| self.reason.clone()),
                urgency: self.urgency,
                contrast: None,
            }),
            prior_imaging: self.prior_imaging.clone(),
            ..Default::default()
        }
    }

    fn describe(&self) -> String {
        match (&self.modality, &self.body_part) {
            (Some(modality), Some(body_part)) => format!("{} {}", modality, body_part),
            (Some(modality), None) => modality.clone(),
            (None, Some(body_part)) => format!("imaging of the {}", body_part),
            (None, None) => "imaging order".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub label: String,
    pub uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub summary: String,
    pub indicator: Indicator,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HookResponse {
    pub cards: Vec<Card>,
}

fn source() -> Source {
    Source {
        label: SOURCE_LABEL.to_string(),
    }
}

fn indicator_for(result: &EvaluationResult) -> Indicator {
    if result.has_critical_warning() {
        return Indicator::Critical;
    }
    match result.result.category {
        Category::Inappropriate => Indicator::Warning,
        Category::Appropriate | Category::Uncertain => Indicator::Info,
    }
}

/// Stable id so identical requests produce identical responses
fn suggestion_uuid(hook_instance: &str, order_index: usize, procedure: &str) -> Uuid {
    let name = format!("{}/{}/{}", hook_instance, order_index, procedure);
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

fn detail(result: &EvaluationResult) -> String {
    let mut lines = vec![
        result.result.recommendation.clone(),
        String::new(),
        result.explanation.summary.clone(),
    ];

    if !result.warnings.is_empty() {
        lines.push(String::new());
        lines.push("**Safety and data warnings**".to_string());
        lines.extend(
            result
                .warnings
                .iter()
                .map(|w| format!("- [{:?}] {}", w.severity, w.message)),
        );
    }

    if !result.result.alternatives.is_empty() {
        lines.push(String::new());
        lines.push("**Alternatives**".to_string());
        lines.extend(
            result
                .result
                .alternatives
                .iter()
                .map(|a| format!("- {} (score {}/9)", a.procedure, a.score)),
        );
    }

    lines.push(String::new());
    lines.push(format!("Coverage: {}", result.coverage.as_str()));
    lines.join("\n")
}

fn evaluation_card(
    order: &DraftOrder,
    result: &EvaluationResult,
    hook_instance: &str,
    order_index: usize,
) -> Card {
    let suggestions: Vec<Suggestion> = result
        .result
        .alternatives
        .iter()
        .map(|alternative| Suggestion {
            label: format!("Consider {}", alternative.procedure),
            uuid: suggestion_uuid(hook_instance, order_index, &alternative.procedure),
        })
        .collect();

    Card {
        summary: format!(
            "{}: {} ({}/9)",
            order.describe(),
            result.result.category.label(),
            result.result.final_score
        ),
        indicator: indicator_for(result),
        source: source(),
        detail: Some(detail(result)),
        suggestions: (!suggestions.is_empty()).then_some(suggestions),
    }
}

fn insufficient_data_card(order: &DraftOrder, missing: &[String]) -> Card {
    Card {
        summary: format!("Insufficient data to evaluate {}", order.describe()),
        indicator: Indicator::Info,
        source: source(),
        detail: Some(format!(
            "Missing fields: {}\n\nCoverage: {}",
            missing.join(", "),
            CoverageStatus::InsufficientData.as_str()
        )),
        suggestions: None,
    }
}

impl Engine {
    /// One card per draft order
    pub fn handle_hook_request(&self, request: &HookRequest) -> HookResponse {
        let cards = request
            .context
            .draft_orders
            .iter()
            .enumerate()
            .map(|(index, order)| {
                let input = order.to_input();
                let missing = input.missing_fields();
                if !missing.is_empty() {
                    tracing::debug!(order = index, ?missing, "draft order lacks required fields");
                    return insufficient_data_card(order, &missing);
                }
                match self.evaluate_input(&input) {
                    Ok(result) => evaluation_card(order, &result, &request.hook_instance, index),
                    Err(EvaluationError::MissingFields(fields)) => {
                        insufficient_data_card(order, &fields)
                    }
                }
            })
            .collect();

        tracing::debug!(
            hook = %request.hook,
            hook_instance = %request.hook_instance,
            "handled hook request"
        );
        HookResponse { cards }
    }
}

/// Handle a hook request with the compiled-in defaults
pub fn handle_hook_request(request: &HookRequest) -> HookResponse {
    Engine::default().handle_hook_request(request)
}
