use std::collections::HashMap;

use super::{
    Rgb,
    css::CSS_COLORS,
    reference::{ self, ReferenceColor },
};

use crate::error::Result;

use serde::Serialize;

const UNKNOWN_CHINESE: &str = "未知";
const UNKNOWN_STANDARD: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorDescription {
    pub rgb: Rgb,
    pub hex: String,
    pub eng_name: String,
    pub chinese_name: String,
    pub eng_stander_name: String,
}

/// Lookup tables for naming colors. Built once at startup and only read
/// afterwards.
pub struct ColorNamer {
    reference: Vec<ReferenceColor>,
    standard: HashMap<Rgb, &'static str>,
}

impl ColorNamer {
    pub fn new() -> Result<Self> {
        let mut standard = HashMap::with_capacity(CSS_COLORS.len());
        for (name, rgb) in CSS_COLORS.iter() {
            standard.entry(*rgb).or_insert(*name);
        }

        Ok(Self {
            reference: reference::load()?,
            standard,
        })
    }

    pub fn reference_colors(&self) -> &[ReferenceColor] {
        &self.reference
    }

    /// First reference color at the smallest distance.
    pub fn nearest(&self, rgb: Rgb) -> Option<&ReferenceColor> {
        let mut nearest: Option<(&ReferenceColor, u32)> = None;
        for candidate in self.reference.iter() {
            let distance = rgb.distance_sq(candidate.rgb);
            match nearest {
                Some((_, min)) if distance >= min => {},
                _ => nearest = Some((candidate, distance)),
            }
        }

        nearest.map(|(color, _)| color)
    }

    pub fn standard_name(&self, rgb: Rgb) -> &'static str {
        self.standard.get(&rgb).copied().unwrap_or(UNKNOWN_STANDARD)
    }

    pub fn describe(&self, rgb: Rgb) -> ColorDescription {
        let (eng_name, matched) = match self.nearest(rgb) {
            Some(color) => (color.name, color.rgb),
            None => (UNKNOWN_STANDARD, rgb),
        };

        ColorDescription {
            rgb,
            hex: rgb.hex(),
            eng_name: eng_name.to_string(),
            chinese_name: reference::chinese_label(eng_name).unwrap_or(UNKNOWN_CHINESE).to_string(),
            // Looked up by the matched reference value, so this always names
            // one of the reference colors.
            eng_stander_name: self.standard_name(matched).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namer() -> ColorNamer {
        ColorNamer::new().unwrap()
    }

    #[test]
    fn pure_red() {
        let desc = namer().describe(Rgb::new(255, 0, 0));
        assert_eq!(desc.hex, "#FF0000");
        assert_eq!(desc.eng_name, "Red");
        assert_eq!(desc.chinese_name, "純紅");
        assert_eq!(desc.eng_stander_name, "red");
    }

    #[test]
    fn standard_name_follows_the_reference_match() {
        // crimson in CSS terms, but named after the reference red
        let desc = namer().describe(Rgb::new(220, 20, 60));
        assert_eq!(desc.eng_name, "Red");
        assert_eq!(desc.eng_stander_name, "red");

        let desc = namer().describe(Rgb::new(150, 75, 20));
        assert_eq!(desc.eng_name, "Brown");
        assert_eq!(desc.chinese_name, "棕色");
        assert_eq!(desc.eng_stander_name, "saddlebrown");
    }

    #[test]
    fn every_reference_color_has_a_standard_name() {
        let namer = namer();
        for color in namer.reference_colors() {
            let desc = namer.describe(color.rgb);
            assert_eq!(desc.eng_name, color.name);
            assert_ne!(desc.eng_stander_name, "Unknown", "{}", color.name);
            assert_ne!(desc.chinese_name, "未知", "{}", color.name);
        }
    }

    #[test]
    fn duplicate_values_resolve_to_first_alphabetical_name() {
        let namer = namer();
        assert_eq!(namer.standard_name(Rgb::new(128, 128, 128)), "gray");
        assert_eq!(namer.standard_name(Rgb::new(0, 255, 255)), "aqua");
        assert_eq!(namer.standard_name(Rgb::new(255, 0, 255)), "fuchsia");
    }

    #[test]
    fn unlisted_value_has_no_standard_name() {
        assert_eq!(namer().standard_name(Rgb::new(1, 2, 3)), "Unknown");
    }

    #[test]
    fn ties_go_to_the_earlier_reference_color() {
        // equidistant from Gray, Black, Purple and Green; Gray is listed first
        let namer = namer();
        let nearest = namer.nearest(Rgb::new(32, 64, 96)).unwrap();
        assert_eq!(nearest.name, "Gray");
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let json = serde_json::to_value(namer().describe(Rgb::new(0, 0, 254))).unwrap();
        assert_eq!(json, serde_json::json!({
            "rgb": { "r": 0, "g": 0, "b": 254 },
            "hex": "#0000FE",
            "engName": "Blue",
            "chineseName": "標準純藍",
            "engStanderName": "blue",
        }));
    }
}
