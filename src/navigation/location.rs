use tracing::{debug, trace};

use crate::infra::{Position, TextFragment};

/// Point-in-time snapshot of the status panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDescriptor {
    pub area_name: String,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub current_load: Option<i32>,
    pub max_load: Option<i32>,
    pub supply_label: Option<String>,
}

impl LocationDescriptor {
    pub fn unknown(area_name: impl Into<String>) -> Self {
        Self {
            area_name: area_name.into(),
            x: None,
            y: None,
            current_load: None,
            max_load: None,
            supply_label: None,
        }
    }

    /// Grid position, if both coordinates were recognized.
    pub fn position(&self) -> Option<Position> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Position::new(x, y)),
            _ => None,
        }
    }
}

/// Textual markers the status panel uses for each field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationMarkers {
    pub coord_open: String,
    pub coord_close: String,
    pub coord_separator: char,
    pub load_label: String,
    pub load_separator: char,
    pub supply_label: String,
    pub unknown_area: String,
}

impl Default for LocationMarkers {
    fn default() -> Self {
        Self {
            coord_open: "（".to_string(),
            coord_close: "）".to_string(),
            coord_separator: ',',
            load_label: "负重：".to_string(),
            load_separator: '/',
            supply_label: "食物：".to_string(),
            unknown_area: "未知地图".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FragmentKind {
    AreaAndCoordinates,
    Load,
    Supply,
}

/// Turns recognized status-panel text into a [`LocationDescriptor`].
///
/// Parsing is total: unrecognized or malformed fragments leave their fields
/// at the default. A field is set by the first fragment that yields a usable
/// value for it and never overwritten afterwards. The area name comes from the
/// first coordinate fragment even when its numbers are unreadable, while the
/// coordinate pair keeps looking until a fragment parses.
#[derive(Debug, Clone, Default)]
pub struct LocationParser {
    markers: LocationMarkers,
}

impl LocationParser {
    pub fn new(markers: LocationMarkers) -> Self {
        Self { markers }
    }

    pub fn parse(&self, fragments: &[TextFragment]) -> LocationDescriptor {
        let mut info = LocationDescriptor::unknown(self.markers.unknown_area.clone());
        let mut area_seen = false;
        let mut supply_seen = false;

        for fragment in fragments {
            let text = fragment.text.as_str();
            let Some(kind) = self.classify(text) else {
                trace!("Ignoring fragment {:?}", text);
                continue;
            };

            match kind {
                FragmentKind::AreaAndCoordinates if !area_seen || info.x.is_none() => {
                    self.apply_area(text, !area_seen, &mut info);
                    area_seen = true;
                }
                FragmentKind::Load if info.current_load.is_none() => {
                    self.apply_load(text, &mut info);
                }
                FragmentKind::Supply if !supply_seen => {
                    supply_seen = true;
                    self.apply_supply(text, &mut info);
                }
                _ => trace!("Category {:?} already set, skipping {:?}", kind, text),
            }
        }

        debug!("Parsed location: {:?}", info);
        info
    }

    fn classify(&self, text: &str) -> Option<FragmentKind> {
        let m = &self.markers;
        if text.contains(m.coord_open.as_str()) && text.contains(m.coord_close.as_str()) {
            Some(FragmentKind::AreaAndCoordinates)
        } else if text.contains(m.load_label.as_str()) {
            Some(FragmentKind::Load)
        } else if text.contains(m.supply_label.as_str()) {
            Some(FragmentKind::Supply)
        } else {
            None
        }
    }

    fn apply_area(&self, text: &str, set_name: bool, info: &mut LocationDescriptor) {
        let m = &self.markers;
        let Some((area, rest)) = text.split_once(m.coord_open.as_str()) else {
            return;
        };
        let inner = rest
            .split_once(m.coord_close.as_str())
            .map_or(rest, |(inner, _)| inner);

        if set_name {
            info.area_name = area.to_string();
        }
        if let Some((x, y)) = parse_pair(inner, m.coord_separator) {
            info.x = Some(x);
            info.y = Some(y);
        }
    }

    fn apply_load(&self, text: &str, info: &mut LocationDescriptor) {
        let m = &self.markers;
        let Some((_, rest)) = text.split_once(m.load_label.as_str()) else {
            return;
        };
        if let Some((current, max)) = parse_pair(rest, m.load_separator) {
            info.current_load = Some(current);
            info.max_load = Some(max);
        }
    }

    fn apply_supply(&self, text: &str, info: &mut LocationDescriptor) {
        if let Some((_, rest)) = text.split_once(self.markers.supply_label.as_str()) {
            info.supply_label = Some(rest.to_string());
        }
    }
}

/// Both halves must parse, otherwise neither is returned.
fn parse_pair(text: &str, separator: char) -> Option<(i32, i32)> {
    let mut parts = text.split(separator);
    let first = parse_int(parts.next()?)?;
    let second = parse_int(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((first, second))
}

/// OCR output often uses full-width digits and signs (`１４`, `－３`).
fn parse_int(text: &str) -> Option<i32> {
    let ascii: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            '－' => '-',
            '＋' => '+',
            _ => c,
        })
        .collect();
    ascii.parse().ok()
}
