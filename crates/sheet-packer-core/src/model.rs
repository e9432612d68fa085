use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in integer pixels. `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge coordinate (`x + w`).
    pub fn max_x(&self) -> i32 {
        self.x + self.w
    }
    /// Exclusive bottom edge coordinate (`y + h`).
    pub fn max_y(&self) -> i32 {
        self.y + self.h
    }
    pub fn area(&self) -> i64 {
        i64::from(self.w) * i64::from(self.h)
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.max_x() <= self.max_x() && r.max_y() <= self.max_y()
    }
    /// Returns true if `self` and `r` share interior area (touching edges don't count).
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.max_x() || r.x >= self.max_x() || self.y >= r.max_y() || r.y >= self.max_y())
    }
}

/// One rectangle to pack: a caller-chosen id plus its content size.
///
/// The id is opaque to the packer and comes back unchanged on the matching
/// [`Placement`]. Sizes must be at least 1x1; anything else is dropped during
/// settings normalization together with rectangles that cannot fit the
/// maximum sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackSize {
    pub id: u32,
    pub w: i32,
    pub h: i32,
}

impl PackSize {
    pub fn new(id: u32, w: i32, h: i32) -> Self {
        Self { id, w, h }
    }
}

/// A packed rectangle on a sheet.
///
/// `x,y` are the top-left corner of the content (border padding already
/// applied). When `rotated` is set the rectangle was placed turned 90°, so
/// its extent on the sheet is the input's `(h, w)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub id: u32,
    pub x: i32,
    pub y: i32,
    pub rotated: bool,
}

/// A single output sheet: final outer dimensions plus its placements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackSheet {
    pub width: i32,
    pub height: i32,
    pub placements: Vec<Placement>,
}

/// Statistics about packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    /// Total number of sheets.
    pub num_sheets: usize,
    /// Total number of placed rectangles.
    pub num_placed: usize,
    /// Number of rotated placements.
    pub num_rotated: usize,
    /// Sum of sheet width * height.
    pub total_sheet_area: i64,
    /// Sum of placed rectangle areas.
    pub used_area: i64,
    /// used_area / total_sheet_area (0.0 to 1.0). Higher is better.
    pub occupancy: f64,
}

impl PackStats {
    /// Computes statistics for a packing result. `sizes` is the input list
    /// the result was produced from; placements are matched to it by id.
    pub fn from_sheets(sheets: &[PackSheet], sizes: &[PackSize]) -> PackStats {
        let mut num_placed = 0;
        let mut num_rotated = 0;
        let mut total_sheet_area = 0i64;
        let mut used_area = 0i64;

        for sheet in sheets {
            total_sheet_area += i64::from(sheet.width) * i64::from(sheet.height);
            for p in &sheet.placements {
                num_placed += 1;
                if p.rotated {
                    num_rotated += 1;
                }
                if let Some(size) = sizes.iter().find(|s| s.id == p.id) {
                    used_area += i64::from(size.w) * i64::from(size.h);
                }
            }
        }

        let occupancy = if total_sheet_area > 0 {
            used_area as f64 / total_sheet_area as f64
        } else {
            0.0
        };

        PackStats {
            num_sheets: sheets.len(),
            num_placed,
            num_rotated,
            total_sheet_area,
            used_area,
            occupancy,
        }
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Sheets: {}, Placed: {}, Occupancy: {:.2}%, Sheet Area: {} px², Used Area: {} px², Rotated: {}",
            self.num_sheets,
            self.num_placed,
            self.occupancy * 100.0,
            self.total_sheet_area,
            self.used_area,
            self.num_rotated,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> i64 {
        self.total_sheet_area - self.used_area
    }
}
