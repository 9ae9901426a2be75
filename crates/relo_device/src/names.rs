//! Tile and site naming conventions.
//!
//! Xilinx device databases encode a grid position in every tile and site
//! name as a trailing `X<int>Y<int>` suffix (`CLBLL_L_X16Y149`,
//! `SLICE_X24Y149`). This module is the only place that slices those
//! strings; everything else works with [`GridCoord`] values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer `(x, y)` position parsed from a tile or site name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column from the `X` part of the name.
    pub x: i32,
    /// Row from the `Y` part of the name.
    pub y: i32,
}

impl GridCoord {
    /// Sentinel used for instances that are not placed.
    pub const UNPLACED: GridCoord = GridCoord { x: -1, y: -1 };

    /// Creates a coordinate.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns `self - origin` as a `(dx, dy)` offset, or `None` if it does
    /// not fit in `i32`.
    pub fn offset_from(self, origin: GridCoord) -> Option<(i32, i32)> {
        Some((
            self.x.checked_sub(origin.x)?,
            self.y.checked_sub(origin.y)?,
        ))
    }

    /// Returns this coordinate shifted by `(dx, dy)`, or `None` on overflow.
    pub fn shifted(self, (dx, dy): (i32, i32)) -> Option<GridCoord> {
        Some(GridCoord::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X{}Y{}", self.x, self.y)
    }
}

/// Parses the trailing `X<int>Y<int>` suffix of a tile or site name.
///
/// Returns `None` if the name has no `Y` marker, no `X` marker before it, or
/// either field is not an integer.
pub fn parse_xy_suffix(name: &str) -> Option<GridCoord> {
    let (head, y) = name.rsplit_once('Y')?;
    let (_, x) = head.rsplit_once('X')?;
    Some(GridCoord::new(parse_field(x)?, parse_field(y)?))
}

fn parse_field(digits: &str) -> Option<i32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Returns the name prefix up to and including its last `X` marker.
///
/// `CLBLL_L_X16Y149` yields `CLBLL_L_X`.
pub fn tile_name_prefix(name: &str) -> Option<&str> {
    name.rfind('X').map(|i| &name[..=i])
}

/// Formats a name from a prefix ending in `X` and a coordinate.
pub fn format_with_coord(prefix_with_x: &str, coord: GridCoord) -> String {
    format!("{prefix_with_x}{}Y{}", coord.x, coord.y)
}

/// Replaces the coordinate suffix of `name`, keeping its family prefix.
///
/// Returns `None` if the name has no `X` marker.
pub fn retarget_name(name: &str, coord: GridCoord) -> Option<String> {
    tile_name_prefix(name).map(|prefix| format_with_coord(prefix, coord))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_site_name() {
        assert_eq!(parse_xy_suffix("SLICE_X5Y10"), Some(GridCoord::new(5, 10)));
    }

    #[test]
    fn parse_tile_name_with_side_suffix() {
        assert_eq!(
            parse_xy_suffix("CLBLL_L_X16Y149"),
            Some(GridCoord::new(16, 149))
        );
    }

    #[test]
    fn parse_name_with_digits_in_family() {
        assert_eq!(
            parse_xy_suffix("RAMB36_X0Y20"),
            Some(GridCoord::new(0, 20))
        );
    }

    #[test]
    fn parse_rejects_missing_markers() {
        assert_eq!(parse_xy_suffix("NULL"), None);
        assert_eq!(parse_xy_suffix("PAD12"), None);
        assert_eq!(parse_xy_suffix("SLICE_Y3"), None);
    }

    #[test]
    fn parse_rejects_garbage_fields() {
        assert_eq!(parse_xy_suffix("SLICE_XAY3"), None);
        assert_eq!(parse_xy_suffix("SLICE_X3Y"), None);
        assert_eq!(parse_xy_suffix("SLICE_X-3Y4"), None);
    }

    #[test]
    fn prefix_keeps_last_x() {
        assert_eq!(tile_name_prefix("CLBLL_L_X16Y149"), Some("CLBLL_L_X"));
        assert_eq!(tile_name_prefix("INT_X0Y0"), Some("INT_X"));
        assert_eq!(tile_name_prefix("NULL"), None);
    }

    #[test]
    fn retarget_rewrites_only_coordinates() {
        assert_eq!(
            retarget_name("CLBLM_R_X3Y7", GridCoord::new(21, 30)).as_deref(),
            Some("CLBLM_R_X21Y30")
        );
    }

    #[test]
    fn offsets_roundtrip() {
        let anchor = GridCoord::new(5, 10);
        let other = GridCoord::new(6, 8);
        let offset = other.offset_from(anchor).unwrap();
        assert_eq!(offset, (1, -2));
        assert_eq!(
            GridCoord::new(20, 30).shifted(offset),
            Some(GridCoord::new(21, 28))
        );
    }

    #[test]
    fn offsets_that_overflow_are_none() {
        let far = parse_xy_suffix("INT_L_X2147483647Y0").unwrap();
        let offset = far.offset_from(GridCoord::new(0, 0)).unwrap();
        assert_eq!(GridCoord::new(5, 0).shifted(offset), None);
        assert_eq!(
            GridCoord::new(i32::MIN, 0).offset_from(GridCoord::new(1, 0)),
            None
        );
    }

    #[test]
    fn display_matches_name_suffix() {
        assert_eq!(GridCoord::new(3, 4).to_string(), "X3Y4");
        assert_eq!(GridCoord::UNPLACED, GridCoord::new(-1, -1));
    }
}
