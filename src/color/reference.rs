use super::Rgb;

use crate::error::Result;

/// English name, hex value and Chinese label. Order matters: nearest-color
/// ties go to the earlier entry.
pub const REFERENCE_PALETTE: [(&str, &str, &str); 10] = [
    ("Blue", "#0000FF", "標準純藍"),
    ("Gray", "#808080", "中性灰"),
    ("White", "#FFFFFF", "白色"),
    ("Brown", "#8B4513", "棕色"),
    ("Yellow", "#FFFF00", "純黃色"),
    ("Orange", "#FFA500", "標準橙色"),
    ("Black", "#000000", "黑色"),
    ("Red", "#FF0000", "純紅"),
    ("Purple", "#800080", "標準紫色"),
    ("Green", "#008000", "標準綠色"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceColor {
    pub name: &'static str,
    pub rgb: Rgb,
}

pub fn load() -> Result<Vec<ReferenceColor>> {
    REFERENCE_PALETTE
        .iter()
        .map(|&(name, hex, _)| -> Result<ReferenceColor> {
            Ok(ReferenceColor {
                name,
                rgb: hex.parse()?,
            })
        })
        .collect()
}

pub fn chinese_label(name: &str) -> Option<&'static str> {
    REFERENCE_PALETTE
        .iter()
        .find(|(english, _, _)| *english == name)
        .map(|(_, _, chinese)| *chinese)
}
