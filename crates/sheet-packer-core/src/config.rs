use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// MaxRects placement heuristics, in cycling order.
///
/// The optimizer tries them in this order when no method is pinned, wrapping
/// from `ContactPoint` back to `BestShortSideFit`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackMethod {
    BestShortSideFit,
    BestLongSideFit,
    BestAreaFit,
    BottomLeft,
    ContactPoint,
}

impl PackMethod {
    /// The next heuristic in cycling order, wrapping at the end.
    pub fn next(self) -> PackMethod {
        match self {
            PackMethod::BestShortSideFit => PackMethod::BestLongSideFit,
            PackMethod::BestLongSideFit => PackMethod::BestAreaFit,
            PackMethod::BestAreaFit => PackMethod::BottomLeft,
            PackMethod::BottomLeft => PackMethod::ContactPoint,
            PackMethod::ContactPoint => PackMethod::BestShortSideFit,
        }
    }
}

impl FromStr for PackMethod {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "cp" | "contactpoint" => Ok(Self::ContactPoint),
            _ => Err(()),
        }
    }
}

/// Packing constraints and options.
///
/// Key notes:
///   - `max_width`/`max_height` of 0 mean unbounded (internally capped at 1,000,000)
///   - `method: None` lets the optimizer pick and cycle heuristics
///   - `max_sheets` of 0 means unlimited
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PackSettings {
    /// Minimum sheet width in pixels.
    pub min_width: i32,
    /// Minimum sheet height in pixels.
    pub min_height: i32,
    /// Maximum sheet width in pixels (0 = unbounded).
    pub max_width: i32,
    /// Maximum sheet height in pixels (0 = unbounded).
    pub max_height: i32,

    /// Pixels around the entire sheet border.
    pub border_padding: i32,
    /// Pixels between placed rectangles.
    pub shape_padding: i32,
    /// Extra pixels added to each sheet dimension.
    pub over_allocate: i32,

    /// Allow 90° rotations where beneficial.
    pub allow_rotation: bool,
    /// Force sheet dimensions to powers of two.
    pub power_of_two: bool,
    /// Force sheets to be square.
    pub square: bool,
    /// Round sheet widths to a multiple of this (0 = off).
    pub align_width: i32,

    /// Pinned placement heuristic; `None` lets the optimizer search.
    pub method: Option<PackMethod>,
    /// Keep at most this many sheets (0 = unlimited). Rectangles on
    /// truncated sheets are dropped from the result.
    pub max_sheets: usize,
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            min_width: 0,
            min_height: 0,
            max_width: 0,
            max_height: 0,
            border_padding: 0,
            shape_padding: 0,
            over_allocate: 0,
            allow_rotation: false,
            power_of_two: false,
            square: false,
            align_width: 0,
            method: None,
            max_sheets: 0,
        }
    }
}

impl PackSettings {
    /// Validates the settings.
    ///
    /// [`crate::pack`] normalizes whatever it is given and never fails; this
    /// is an opt-in strict check for callers that want to reject nonsense
    /// (negative sizes or paddings) up front instead of having it clamped.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::PackError;

        if self.max_width < 0 || self.max_height < 0 {
            return Err(PackError::InvalidDimensions {
                width: self.max_width,
                height: self.max_height,
            });
        }
        if self.min_width < 0 || self.min_height < 0 {
            return Err(PackError::InvalidDimensions {
                width: self.min_width,
                height: self.min_height,
            });
        }
        if self.border_padding < 0 || self.shape_padding < 0 || self.over_allocate < 0 {
            return Err(PackError::InvalidConfig(format!(
                "paddings must be non-negative (border {}, shape {}, over-allocate {})",
                self.border_padding, self.shape_padding, self.over_allocate
            )));
        }
        if self.align_width < 0 {
            return Err(PackError::InvalidConfig(format!(
                "align_width must be non-negative (got {})",
                self.align_width
            )));
        }
        Ok(())
    }

    /// Create a fluent builder for `PackSettings`.
    pub fn builder() -> PackSettingsBuilder {
        PackSettingsBuilder::new()
    }
}

/// Builder for `PackSettings` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackSettingsBuilder {
    settings: PackSettings,
}

impl PackSettingsBuilder {
    pub fn new() -> Self {
        Self {
            settings: PackSettings::default(),
        }
    }
    pub fn min_dimensions(mut self, w: i32, h: i32) -> Self {
        self.settings.min_width = w;
        self.settings.min_height = h;
        self
    }
    pub fn max_dimensions(mut self, w: i32, h: i32) -> Self {
        self.settings.max_width = w;
        self.settings.max_height = h;
        self
    }
    pub fn border_padding(mut self, v: i32) -> Self {
        self.settings.border_padding = v;
        self
    }
    pub fn shape_padding(mut self, v: i32) -> Self {
        self.settings.shape_padding = v;
        self
    }
    pub fn over_allocate(mut self, v: i32) -> Self {
        self.settings.over_allocate = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.settings.allow_rotation = v;
        self
    }
    pub fn pow2(mut self, v: bool) -> Self {
        self.settings.power_of_two = v;
        self
    }
    pub fn square(mut self, v: bool) -> Self {
        self.settings.square = v;
        self
    }
    pub fn align_width(mut self, v: i32) -> Self {
        self.settings.align_width = v;
        self
    }
    pub fn method(mut self, v: PackMethod) -> Self {
        self.settings.method = Some(v);
        self
    }
    pub fn max_sheets(mut self, v: usize) -> Self {
        self.settings.max_sheets = v;
        self
    }
    pub fn build(self) -> PackSettings {
        self.settings
    }
}
