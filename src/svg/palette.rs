//! Layer colors matching the authoring tool's 25-entry palette.

const PALETTE: [&str; 25] = [
    "#FF0000", // C00 - Red
    "#0000FF", // C01 - Blue
    "#cb04cbff", // C02 - Magenta
    "#008000", // C03 - Dark Green
    "#FFFF00", // C04 - Yellow
    "#FF8000", // C05 - Orange
    "#00FFFF", // C06 - Cyan
    "#000000", // C07 - Black
    "#C0C0C0", // C08 - Light Gray
    "#808080", // C09 - Gray
    "#800000", // C10 - Maroon
    "#00FF00", // C11 - Green
    "#000080", // C12 - Navy
    "#808000", // C13 - Olive
    "#800080", // C14 - Purple
    "#008080", // C15 - Teal
    "#A0A0A0", // C16 - Gray
    "#8080C0", // C17 - Light Blue/Purple
    "#FFC0C0", // C18 - Light Pink
    "#0080FF", // C19 - Bright Blue
    "#FF0080", // C20 - Hot Pink/Magenta
    "#00FF80", // C21 - Spring Green
    "#FF8040", // C22 - Light Orange/Peach
    "#FFC0FF", // C23 - Light Magenta/Pink
    "#FF80C0", // C24 - Pink
];

/// Stroke color for a layer index; "black" for absent or out-of-range.
pub fn color_for_cut_index(cut_index: Option<i32>) -> &'static str {
    cut_index
        .and_then(|i| usize::try_from(i).ok())
        .and_then(|i| PALETTE.get(i).copied())
        .unwrap_or("black")
}

/// Convert a `#RRGGBB` color to an `rgba()` value with the given opacity.
/// Other forms pass through unchanged.
pub fn hex_to_rgba(hex: &str, opacity: f64) -> String {
    if let Some(digits) = hex.strip_prefix('#')
        && digits.len() == 6
        && let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&digits[0..2], 16),
            u8::from_str_radix(&digits[2..4], 16),
            u8::from_str_radix(&digits[4..6], 16),
        )
    {
        return format!("rgba({r}, {g}, {b}, {opacity})");
    }
    hex.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_indices_map_to_palette() {
        assert_eq!(color_for_cut_index(Some(0)), "#FF0000");
        assert_eq!(color_for_cut_index(Some(7)), "#000000");
        assert_eq!(color_for_cut_index(Some(24)), "#FF80C0");
    }

    #[test]
    fn out_of_range_and_absent_fall_back_to_black() {
        assert_eq!(color_for_cut_index(None), "black");
        assert_eq!(color_for_cut_index(Some(25)), "black");
        assert_eq!(color_for_cut_index(Some(-1)), "black");
    }

    #[test]
    fn hex_to_rgba_expands_six_digit_form() {
        assert_eq!(hex_to_rgba("#FF8000", 0.8), "rgba(255, 128, 0, 0.8)");
        assert_eq!(hex_to_rgba("black", 0.5), "black");
        assert_eq!(hex_to_rgba("#cb04cbff", 0.5), "#cb04cbff");
    }
}
