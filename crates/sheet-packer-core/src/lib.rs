//! Core library for packing rectangles into sheets of minimal total area.
//!
//! - Placer: MaxRects free-list (BSSF/BLSF/BAF/BL/CP heuristics)
//! - Optimizer: staged coordinate descent over `(width, height, heuristic)`,
//!   minimizing sheet count first, total sheet area second
//! - Constraints: size bounds, power-of-two, square, width alignment,
//!   border/shape padding, over-allocation, rotation, sheet cap
//! - Data model is serde-serializable
//!
//! Quick example:
//! ```
//! use sheet_packer_core::{pack, PackSettings, PackSize};
//!
//! let settings = PackSettings::builder()
//!     .max_dimensions(256, 256)
//!     .allow_rotation(true)
//!     .build();
//! let sheets = pack(settings, vec![
//!     PackSize::new(0, 64, 32),
//!     PackSize::new(1, 40, 40),
//! ]);
//! assert_eq!(sheets.len(), 1);
//! assert_eq!(sheets[0].placements.len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod optimizer;
pub mod packer;

pub use config::*;
pub use error::*;
pub use model::*;
pub use optimizer::pack;

/// Convenience prelude for common types and functions.
/// Importing `sheet_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PackMethod, PackSettings, PackSettingsBuilder};
    pub use crate::model::{PackSheet, PackSize, PackStats, Placement, Rect};
    pub use crate::optimizer::pack;
}
