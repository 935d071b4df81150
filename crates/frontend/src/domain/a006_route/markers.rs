use contracts::domain::a006_route::aggregate::StepLocation;
use contracts::shared::LngLat;

const START_COLOR: &str = "#00FF00";
const END_COLOR: &str = "#FF0000";
const STEP_COLOR: &str = "#FFA500";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointKind {
    Start,
    End,
    /// One-based position in the route
    Step(usize),
}

/// One pin of a drawn route
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointMarker {
    pub kind: WaypointKind,
    pub position: LngLat,
    pub english_name: String,
    pub burmese_name: String,
    pub address: String,
}

impl WaypointMarker {
    /// Text shown inside the pin
    pub fn label(&self) -> String {
        match self.kind {
            WaypointKind::Start => "🚩".to_string(),
            WaypointKind::End => "🏁".to_string(),
            WaypointKind::Step(n) => n.to_string(),
        }
    }

    pub fn color(&self) -> &'static str {
        match self.kind {
            WaypointKind::Start => START_COLOR,
            WaypointKind::End => END_COLOR,
            WaypointKind::Step(_) => STEP_COLOR,
        }
    }

    pub fn title(&self) -> String {
        match self.kind {
            WaypointKind::Start => "🚩 START".to_string(),
            WaypointKind::End => "🏁 END".to_string(),
            WaypointKind::Step(n) => format!("📍 STEP {}", n),
        }
    }

    pub fn popup_html(&self) -> String {
        format!(
            concat!(
                r#"<div class="step-popup__body">"#,
                r#"<div class="step-popup__title">{}</div>"#,
                r#"<div class="step-popup__name">{}</div>"#,
                r#"<div class="step-popup__name step-popup__name--my">{}</div>"#,
                r#"<div class="step-popup__address">{}</div>"#,
                "</div>"
            ),
            self.title(),
            escape_html(&self.english_name),
            escape_html(&self.burmese_name),
            escape_html(&self.address),
        )
    }
}

/// First stop is the start, last is the end, the rest are numbered by position
pub fn waypoint_markers(steps: &[StepLocation]) -> Vec<WaypointMarker> {
    let last = steps.len().saturating_sub(1);
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let kind = if index == 0 {
                WaypointKind::Start
            } else if index == last {
                WaypointKind::End
            } else {
                WaypointKind::Step(index + 1)
            };
            WaypointMarker {
                kind,
                position: step.position(),
                english_name: step.english_name.clone(),
                burmese_name: step.burmese_name.clone(),
                address: step.address.clone(),
            }
        })
        .collect()
}

/// Pin colour and icon for a location type; unknown types get a red pin
pub fn location_style(location_type: &str) -> (&'static str, &'static str) {
    match location_type {
        "landmark" => ("#FF6B6B", "🏛️"),
        "restaurant" => ("#4ECDC4", "🍽️"),
        "hospital" => ("#45B7D1", "🏥"),
        "school" => ("#96CEB4", "🏫"),
        "market" => ("#FFEAA7", "🏪"),
        "temple" => ("#DDA0DD", "🛕"),
        "government" => ("#98D8C8", "🏛️"),
        "defined_location" => ("#FF7675", "📍"),
        _ => ("#FF0000", "📍"),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(name: &str) -> StepLocation {
        StepLocation {
            address: "Pagoda Road".into(),
            burmese_name: String::new(),
            english_name: name.into(),
            latitude: 16.73,
            longitude: 95.64,
            location_type: "defined_location".into(),
        }
    }

    #[test]
    fn test_start_end_and_numbered_steps() {
        let markers = waypoint_markers(&[stop("A"), stop("B"), stop("C"), stop("D")]);
        let kinds: Vec<_> = markers.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WaypointKind::Start,
                WaypointKind::Step(2),
                WaypointKind::Step(3),
                WaypointKind::End
            ]
        );
        assert_eq!(markers[1].label(), "2");
        assert_eq!(markers[2].title(), "📍 STEP 3");
        assert_eq!(markers[3].color(), "#FF0000");
        assert_eq!(markers[0].position, [95.64, 16.73]);
    }

    #[test]
    fn test_single_stop_is_start() {
        let markers = waypoint_markers(&[stop("Only")]);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].kind, WaypointKind::Start);
        assert!(waypoint_markers(&[]).is_empty());
    }

    #[test]
    fn test_popup_escapes_names() {
        let marker = &waypoint_markers(&[stop("Tea <&> Shop"), stop("End")])[0];
        let html = marker.popup_html();
        assert!(html.contains("🚩 START"));
        assert!(html.contains("Tea &lt;&amp;&gt; Shop"));
        assert!(!html.contains("<&>"));
    }

    #[test]
    fn test_location_style_fallback() {
        assert_eq!(location_style("hospital"), ("#45B7D1", "🏥"));
        assert_eq!(location_style("spaceport"), ("#FF0000", "📍"));
    }
}
