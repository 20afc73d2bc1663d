use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::evaluation::{EvaluationResult, TrafficLight};
use crate::hooks::{Card, HookResponse, Indicator};
use crate::scenario::{NormalizedDuration, Severity, ValidationIssue};
use crate::scoring::{Alternative, FactorContribution};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Signed contribution with one decimal ("+3.0", "-1.5")
pub fn format_contribution(delta: f64) -> String {
    format!("{:+.1}", delta)
}

/// Wire name of a unit enum ("lower", "high")
fn wire_name<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Score badge, e.g. "[RED] 1/9"
pub fn format_badge(light: TrafficLight, score: u8, use_colors: bool) -> String {
    let badge = format!("[{}] {}/9", wire_name(&light).to_uppercase(), score);
    if !use_colors {
        return badge;
    }
    match light {
        TrafficLight::Green => badge.green().bold().to_string(),
        TrafficLight::Yellow => badge.yellow().bold().to_string(),
        TrafficLight::Red => badge.red().bold().to_string(),
    }
}

/// Contribution column: 5 chars (fits "+10.0"), right-aligned.
/// Each line shows the running score after the factor.
fn format_contributions(factors: &[FactorContribution], use_colors: bool) -> Vec<String> {
    let term_width = get_terminal_width();
    let delta_width = 5;
    let separator = "  ";

    factors
        .iter()
        .map(|factor| {
            let delta = factor.after - factor.before;
            let delta_str = format!("{:>width$}", format_contribution(delta), width = delta_width);
            let running = format!("-> {:.1}", factor.after);

            let fixed_width = 2 + delta_width + separator.len() * 2 + running.len();
            let label = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_text(&factor.label, width - fixed_width)
                }
                Some(_) => truncate_text(&factor.label, 20),
                None => factor.label.clone(),
            };

            if use_colors {
                let delta_colored = if delta < 0.0 {
                    delta_str.red().to_string()
                } else {
                    delta_str.green().to_string()
                };
                format!(
                    "  {}{}{}{}{}",
                    delta_colored,
                    separator,
                    label,
                    separator,
                    running.dimmed()
                )
            } else {
                format!("  {}{}{}{}{}", delta_str, separator, label, separator, running)
            }
        })
        .collect()
}

fn format_alternative(alternative: &Alternative) -> String {
    format!(
        "  {}/9  {} (radiation: {}, cost: {})",
        alternative.score,
        alternative.procedure,
        wire_name(&alternative.radiation),
        wire_name(&alternative.cost)
    )
}

fn format_warning(issue: &ValidationIssue, use_colors: bool) -> String {
    let tag = match issue.severity {
        Severity::Critical => "CRITICAL",
        Severity::Error => "ERROR",
        Severity::Warning => "WARNING",
    };
    if use_colors {
        let tag = match issue.severity {
            Severity::Critical => tag.red().bold().to_string(),
            Severity::Error => tag.red().to_string(),
            Severity::Warning => tag.yellow().to_string(),
        };
        format!("  {} {}: {}", tag, issue.field.dimmed(), issue.message)
    } else {
        format!("  {} {}: {}", tag, issue.field, issue.message)
    }
}

/// Format a normalized duration on one line
pub fn format_duration(duration: &NormalizedDuration) -> String {
    format!(
        "{:.2} weeks, pattern {}, confidence {} ({})",
        duration.weeks,
        wire_name(&duration.pattern),
        wire_name(&duration.confidence),
        duration.interpretation
    )
}

/// Format a full evaluation with explanation, alternatives and warnings
pub fn format_evaluation(result: &EvaluationResult, use_colors: bool) -> String {
    let core = &result.result;
    let mut lines = Vec::new();

    let heading = format!("{} ({})", core.category.label(), result.topic.label());
    lines.push(format!(
        "{}  {}",
        format_badge(result.traffic_light, core.final_score, use_colors),
        if use_colors {
            heading.bold().to_string()
        } else {
            heading
        }
    ));
    lines.push(format!(
        "  Coverage: {}  Confidence: {}",
        result.coverage.as_str(),
        wire_name(&core.confidence)
    ));
    lines.push(format!("  Duration: {}", format_duration(&result.duration)));
    lines.push(String::new());
    lines.push(core.recommendation.clone());

    lines.push(String::new());
    lines.push(format!("Factors (baseline {:.1}):", core.baseline_score));
    if result.explanation.contributions.is_empty() {
        lines.push("  none".to_string());
    } else {
        lines.extend(format_contributions(&result.explanation.contributions, use_colors));
    }
    lines.push(format!("  {}", result.explanation.summary));

    if !core.alternatives.is_empty() {
        lines.push(String::new());
        lines.push("Alternatives:".to_string());
        lines.extend(core.alternatives.iter().map(format_alternative));
    }

    if !result.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        lines.extend(result.warnings.iter().map(|w| format_warning(w, use_colors)));
    }

    if !core.evidence_sources.is_empty() || !result.evidence.is_empty() {
        lines.push(String::new());
        lines.push("Evidence:".to_string());
        lines.extend(core.evidence_sources.iter().map(|c| format!("  {}", c)));
        lines.extend(
            result
                .evidence
                .iter()
                .map(|link| format!("  {} <{}>", link.title, link.url)),
        );
    }

    lines.join("\n")
}

fn format_card(card: &Card, use_colors: bool) -> String {
    let tag = format!("[{}]", wire_name(&card.indicator));
    let tag = if use_colors {
        match card.indicator {
            Indicator::Info => tag.cyan().to_string(),
            Indicator::Warning => tag.yellow().to_string(),
            Indicator::Critical => tag.red().bold().to_string(),
        }
    } else {
        tag
    };

    let mut lines = vec![format!("{} {}", tag, card.summary)];
    if let Some(detail) = &card.detail {
        lines.extend(detail.lines().map(|l| format!("    {}", l)));
    }
    if let Some(suggestions) = &card.suggestions {
        lines.extend(
            suggestions
                .iter()
                .map(|s| format!("    -> {} ({})", s.label, s.uuid)),
        );
    }
    lines.join("\n")
}

/// Format hook response cards, one block per card
pub fn format_hook_response(response: &HookResponse, use_colors: bool) -> String {
    if response.cards.is_empty() {
        return "No cards.".to_string();
    }

    response
        .cards
        .iter()
        .map(|card| format_card(card, use_colors))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluate;
    use crate::hooks::Source;
    use crate::scenario::{normalize_duration, ClinicalScenario, Modality, ProposedImaging};

    fn low_back_pain() -> EvaluationResult {
        evaluate(&ClinicalScenario::new(
            45,
            "male",
            "Lower back pain",
            "3 days",
            ProposedImaging::new(Modality::Ct, "lumbar spine", "low back pain"),
        ))
    }

    #[test]
    fn test_format_contribution() {
        assert_eq!(format_contribution(3.0), "+3.0");
        assert_eq!(format_contribution(-1.5), "-1.5");
        assert_eq!(format_contribution(0.0), "+0.0");
    }

    #[test]
    fn test_format_badge_plain() {
        assert_eq!(format_badge(TrafficLight::Red, 1, false), "[RED] 1/9");
        assert_eq!(format_badge(TrafficLight::Green, 9, false), "[GREEN] 9/9");
    }

    #[test]
    fn test_format_evaluation_plain() {
        let output = format_evaluation(&low_back_pain(), false);
        assert!(output.starts_with("[RED] 1/9  Usually not appropriate (Low back pain)"));
        assert!(output.contains("Coverage: DIRECT_MATCH"));
        assert!(output.contains("-2.0  Acute duration  -> 3.0"));
        assert!(output.contains("Alternatives:"));
        assert!(output.contains("9/9  Conservative management / observation (radiation: none, cost: lower)"));
        assert!(output.contains("Evidence:"));
    }

    #[test]
    fn test_format_evaluation_lists_warnings() {
        let mut scenario = ClinicalScenario::new(
            30,
            "female",
            "Lower back pain",
            "2 weeks",
            ProposedImaging::new(Modality::Ct, "lumbar spine", "low back pain"),
        );
        scenario.pregnancy_status = Some(crate::scenario::PregnancyStatus::Pregnant);
        let output = format_evaluation(&evaluate(&scenario), false);
        assert!(output.contains("Warnings:"));
        assert!(output.contains("CRITICAL pregnancyStatus:"));
    }

    #[test]
    fn test_format_duration() {
        let output = format_duration(&normalize_duration("2 weeks"));
        assert!(output.starts_with("2.00 weeks, pattern constant, confidence high"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Short", 20), "Short");
        assert_eq!(truncate_text("This is a very long label", 15), "This is a ve...");
        assert_eq!(truncate_text("Hello world", 3), "Hel");
    }

    #[test]
    fn test_format_hook_response() {
        assert_eq!(format_hook_response(&HookResponse::default(), false), "No cards.");

        let response = HookResponse {
            cards: vec![Card {
                summary: "CT head: Usually appropriate (9/9)".to_string(),
                indicator: Indicator::Info,
                source: Source {
                    label: "test".to_string(),
                },
                detail: Some("line one\nline two".to_string()),
                suggestions: None,
            }],
        };
        let output = format_hook_response(&response, false);
        assert_eq!(
            output,
            "[info] CT head: Usually appropriate (9/9)\n    line one\n    line two"
        );
    }
}
