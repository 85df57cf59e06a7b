//! Askama templates for the web frontend.

use askama::Template;

use super::dto::{AdvisoryResponse, EstimateResult, LegResult, RecommendationResult};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with the trip form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

/// Advisory result page.
#[derive(Template)]
#[template(path = "advisory.html")]
pub struct AdvisoryTemplate {
    pub advisory: AdvisoryView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Advisory view model for templates.
#[derive(Debug, Clone)]
pub struct AdvisoryView {
    pub origin: String,
    pub destination: String,
    pub generated_at: String,
    pub distance: String,
    pub legs: Vec<LegView>,
    pub subway: String,
    pub any_transit: String,
    pub recommended: String,
    pub degraded: bool,
    pub tolerance: String,
    pub urgency_level: String,
    pub headline: String,
    pub advice: String,
}

impl AdvisoryView {
    /// Create from an advisory response.
    pub fn from_response(response: &AdvisoryResponse) -> Self {
        let generated_at = response
            .generated_at
            .get(11..16)
            .unwrap_or(&response.generated_at)
            .to_string();

        let distance = response
            .distance_km
            .map(|km| format!("{km:.1} km"))
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            origin: response.origin.clone(),
            destination: response.destination.clone(),
            generated_at,
            distance,
            legs: response.current_route.iter().map(LegView::from_leg).collect(),
            subway: response
                .subway_only
                .as_ref()
                .map(describe_estimate)
                .unwrap_or_else(|| "gone".to_string()),
            any_transit: describe_estimate(&response.any_transit),
            recommended: describe_recommendation(&response.recommended),
            degraded: response.recommended.degraded,
            tolerance: format!("±{:.0} min", response.any_transit.tolerance_mins.ceil()),
            urgency_level: response.urgency.level.clone(),
            headline: response.urgency.headline.clone(),
            advice: response.urgency.advice.clone(),
        }
    }

    /// Whether there are legs to show.
    pub fn has_route(&self) -> bool {
        !self.legs.is_empty()
    }
}

/// Leg view model.
#[derive(Debug, Clone)]
pub struct LegView {
    pub icon: String,
    pub line: String,
    pub from: String,
    pub to: String,
}

impl LegView {
    /// Create from a leg result.
    pub fn from_leg(leg: &LegResult) -> Self {
        Self {
            icon: leg.icon.clone(),
            line: if leg.line.is_empty() {
                leg.mode.clone()
            } else {
                leg.line.clone()
            },
            from: leg.from.clone(),
            to: leg.to.clone(),
        }
    }
}

/// "23:41 (52 min trip, 21 min left)", or "gone" once it has left.
fn describe_estimate(estimate: &EstimateResult) -> String {
    if estimate.minutes_left < 0 {
        return "gone".to_string();
    }
    let via = if estimate.night_bus { ", night bus" } else { "" };
    format!(
        "{} ({} min trip{via}, {} min left)",
        estimate.departure, estimate.duration_mins, estimate.minutes_left
    )
}

fn describe_recommendation(rec: &RecommendationResult) -> String {
    match rec.duration_mins {
        Some(duration) => format!(
            "{} ({} min trip, {} min left)",
            rec.departure,
            duration,
            rec.minutes_left.max(0)
        ),
        None => format!("{} ({} min left)", rec.departure, rec.minutes_left.max(0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::dto::UrgencyResult;

    fn estimate(departure: &str, minutes_left: i64) -> EstimateResult {
        EstimateResult {
            departure: departure.into(),
            departure_time: String::new(),
            duration_mins: 48,
            minutes_left,
            tolerance_mins: 2.6,
            oracle_calls: 8,
            night_bus: false,
        }
    }

    fn response() -> AdvisoryResponse {
        AdvisoryResponse {
            origin: "Hongdae".into(),
            destination: "Bundang".into(),
            generated_at: "2024-03-15T23:20:00+09:00".into(),
            distance_km: Some(27.46),
            current_route: vec![
                LegResult {
                    mode: "walk".into(),
                    icon: "🚶".into(),
                    line: String::new(),
                    from: "origin".into(),
                    to: "Hongik Univ.".into(),
                },
                LegResult {
                    mode: "subway".into(),
                    icon: "🚇".into(),
                    line: "2".into(),
                    from: "Hongik Univ.".into(),
                    to: "Gangnam".into(),
                },
            ],
            baseline_duration_mins: 48,
            any_transit: estimate("01:04", 104),
            subway_only: Some(estimate("23:18", -2)),
            recommended: RecommendationResult {
                departure: "23:20".into(),
                departure_time: String::new(),
                duration_mins: None,
                minutes_left: 0,
                degraded: true,
            },
            urgency: UrgencyResult {
                level: "subway_gone".into(),
                headline: "🚇 Subway is done. Take the bus!".into(),
                advice: "104 minutes until the last departure.".into(),
            },
        }
    }

    #[test]
    fn advisory_view() {
        let view = AdvisoryView::from_response(&response());

        assert_eq!(view.generated_at, "23:20");
        assert_eq!(view.distance, "27.5 km");
        assert_eq!(view.subway, "gone");
        assert_eq!(view.any_transit, "01:04 (48 min trip, 104 min left)");
        assert_eq!(view.recommended, "23:20 (0 min left)");
        assert_eq!(view.tolerance, "±3 min");
        assert!(view.degraded);
        assert_eq!(view.legs[0].line, "walk");
        assert_eq!(view.legs[1].line, "2");
    }

    #[test]
    fn night_bus_is_mentioned() {
        let mut response = response();
        response.any_transit.night_bus = true;

        let view = AdvisoryView::from_response(&response);

        assert_eq!(view.any_transit, "01:04 (48 min trip, night bus, 104 min left)");
    }

    #[test]
    fn renders_advisory_page() {
        let html = AdvisoryTemplate {
            advisory: AdvisoryView::from_response(&response()),
        }
        .render()
        .unwrap();

        assert!(html.contains("Hongdae"));
        assert!(html.contains("01:04 (48 min trip, 104 min left)"));
        assert!(html.contains("Take the bus!"));
    }

    #[test]
    fn renders_error_page() {
        let html = ErrorTemplate {
            title: "No route".into(),
            message: "no transit route tonight".into(),
            details: Some("no_route".into()),
        }
        .render()
        .unwrap();

        assert!(html.contains("no transit route tonight"));
    }
}
