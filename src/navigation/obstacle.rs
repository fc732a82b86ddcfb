use tracing::trace;

use crate::config::NavigatorConfig;
use crate::infra::{RecognitionRequest, Recognizer, Region};

/// Scans the whole scene for text announcing that the way is blocked.
#[derive(Debug, Clone)]
pub struct ObstacleDetector {
    label: String,
    region: Option<Region>,
    markers: Vec<String>,
}

impl ObstacleDetector {
    pub fn new(label: impl Into<String>, region: Option<Region>, markers: Vec<String>) -> Self {
        Self {
            label: label.into(),
            region,
            markers,
        }
    }

    pub fn from_config(config: &NavigatorConfig) -> Self {
        Self::new(
            config.obstacle_label.clone(),
            config.obstacle_region,
            config.obstacle_markers.clone(),
        )
    }

    /// Captures a fresh scene and reports whether any fragment contains an obstruction marker.
    pub fn is_blocked<R: Recognizer>(&self, recognizer: &mut R) -> bool {
        let image = recognizer.capture_scene();
        let request = RecognitionRequest::new(&self.label, self.region);
        let Some(result) = recognizer.recognize(&request, &image) else {
            return false;
        };

        result.fragments.iter().any(|fragment| {
            let hit = self
                .markers
                .iter()
                .any(|marker| fragment.text.contains(marker.as_str()));
            if hit {
                trace!("Obstruction marker in {:?}", fragment.text);
            }
            hit
        })
    }
}

impl Default for ObstacleDetector {
    fn default() -> Self {
        Self::from_config(&NavigatorConfig::default())
    }
}
