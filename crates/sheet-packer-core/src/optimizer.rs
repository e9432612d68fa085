//! Sheet-size optimizer on top of the MaxRects placer.
//!
//! Searches `(width, height, method)` with a staged coordinate descent:
//! grow to merge sheets, then shrink toward the perfect area, cycling
//! placement heuristics between shrink stages when none is pinned. Runs are
//! compared by sheet count first, total sheet area second, and a run is
//! abandoned as soon as it can no longer beat the best one.

use crate::config::{PackMethod, PackSettings};
use crate::model::{PackSheet, PackSize, Placement};
use crate::packer::{MaxRectsPacker, RectSize};
use tracing::{debug, instrument};

/// Upper bound for sheet dimensions, low enough that an area still fits i64.
const SIZE_LIMIT: i32 = 1_000_000;

/// Intermediate dimensions are capped here so power-of-two rounding cannot
/// overflow; anything this large gets clamped to `max_*` later anyway.
const DIM_LIMIT: i64 = (i32::MAX / 4) as i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunSettings {
    width: i32,
    height: i32,
    method: PackMethod,
}

struct Run {
    settings: RunSettings,
    sheets: Vec<PackSheet>,
    total_area: i64,
}

impl Run {
    fn is_better_than(&self, other: &Run) -> bool {
        if self.sheets.len() != other.sheets.len() {
            return self.sheets.len() < other.sheets.len();
        }
        self.total_area < other.total_area
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    FirstRun,
    MinimizeSheetCount,
    ShrinkSquare,
    ShrinkWidthFast,
    ShrinkHeightFast,
    ShrinkWidthSlow,
    ShrinkHeightSlow,
    End,
}

impl Stage {
    fn advance(&mut self) -> bool {
        let next = match self {
            Stage::FirstRun => Stage::MinimizeSheetCount,
            Stage::MinimizeSheetCount => Stage::ShrinkSquare,
            Stage::ShrinkSquare => Stage::ShrinkWidthFast,
            Stage::ShrinkWidthFast => Stage::ShrinkHeightFast,
            Stage::ShrinkHeightFast => Stage::ShrinkWidthSlow,
            Stage::ShrinkWidthSlow => Stage::ShrinkHeightSlow,
            Stage::ShrinkHeightSlow => Stage::End,
            Stage::End => return false,
        };
        *self = next;
        true
    }
}

struct OptimizerState {
    perfect_area: i64,
    settings: RunSettings,
    stage: Stage,
    first_method: PackMethod,
    iteration: u32,
}

/// Packs `sizes` into as few, as small sheets as the search finds.
///
/// Rectangles that cannot fit a `max_width` x `max_height` sheet (in any
/// allowed orientation), or whose sides are below 1, are silently dropped.
/// Empty input yields an empty result. Never panics.
#[instrument(skip_all)]
pub fn pack(settings: PackSettings, sizes: Vec<PackSize>) -> Vec<PackSheet> {
    let mut settings = settings;
    let mut sizes = sizes;
    correct_settings(&mut settings, &mut sizes);
    if sizes.is_empty() {
        return Vec::new();
    }

    let perfect_area = perfect_area(&sizes);
    let initial = initial_run_settings(&settings, &sizes, perfect_area);
    let mut state = OptimizerState {
        perfect_area,
        settings: initial,
        stage: Stage::FirstRun,
        first_method: initial.method,
        iteration: 0,
    };

    let base_sizes: Vec<RectSize> = sizes
        .iter()
        .enumerate()
        .map(|(index, s)| RectSize {
            index,
            w: s.w,
            h: s.h,
        })
        .collect();

    let mut best_run: Option<Run> = None;

    loop {
        let mut remaining = base_sizes.clone();
        let mut cancelled = false;
        let mut run = Run {
            settings: state.settings,
            sheets: Vec::new(),
            total_area: 0,
        };

        while !cancelled && !remaining.is_empty() {
            let mut packer = MaxRectsPacker::new(
                run.settings.width,
                run.settings.height,
                settings.allow_rotation,
                settings.shape_padding,
                run.settings.method,
            );
            let placed = packer.insert_all(&mut remaining);

            let (extent_w, extent_h) = packer.bottom_right();
            let (w, h) = correct_size(&settings, extent_w, extent_h);
            let (w, h) = apply_padding(&settings, w, h, false);

            run.total_area += i64::from(w) * i64::from(h);
            run.sheets.push(PackSheet {
                width: w,
                height: h,
                placements: Vec::new(),
            });

            // a sheet that fits nothing means this candidate can never finish
            if placed.is_empty()
                || best_run.as_ref().is_some_and(|best| !run.is_better_than(best))
            {
                cancelled = true;
                continue;
            }

            if let Some(sheet) = run.sheets.last_mut() {
                sheet.placements.reserve(placed.len());
                for p in &placed {
                    sheet.placements.push(Placement {
                        id: sizes[p.index].id,
                        x: p.x + settings.border_padding,
                        y: p.y + settings.border_padding,
                        rotated: p.rotated,
                    });
                }
            }
        }

        if !cancelled && best_run.as_ref().map_or(true, |best| run.is_better_than(best)) {
            debug!(
                width = run.settings.width,
                height = run.settings.height,
                method = ?run.settings.method,
                sheets = run.sheets.len(),
                total_area = run.total_area,
                "new best run"
            );
            best_run = Some(run);
        }

        let Some(best) = best_run.as_ref() else {
            // the first run placed nothing at all; constraints leave no usable bin
            return Vec::new();
        };
        if !optimize_run_settings(&mut state, &settings, best) {
            break;
        }
    }

    let Some(mut best) = best_run else {
        return Vec::new();
    };
    if settings.max_sheets > 0 && best.sheets.len() > settings.max_sheets {
        best.sheets.truncate(settings.max_sheets);
    }
    best.sheets
}

/// Shifts between outer sheet dimensions and usable placement area.
fn apply_padding(settings: &PackSettings, w: i32, h: i32, indent: bool) -> (i32, i32) {
    let mut delta = 2 * i64::from(settings.border_padding) - i64::from(settings.over_allocate);
    if !indent {
        delta = -delta;
    }
    (
        (i64::from(w) - delta).clamp(-DIM_LIMIT, DIM_LIMIT) as i32,
        (i64::from(h) - delta).clamp(-DIM_LIMIT, DIM_LIMIT) as i32,
    )
}

fn can_fit(settings: &PackSettings, w: i32, h: i32) -> bool {
    (w <= settings.max_width && h <= settings.max_height)
        || (settings.allow_rotation && w <= settings.max_height && h <= settings.max_width)
}

/// Normalizes settings once and drops rectangles that can never be placed.
/// Afterwards `min_*`/`max_*` describe the usable area, not outer dimensions.
fn correct_settings(settings: &mut PackSettings, sizes: &mut Vec<PackSize>) {
    if settings.max_width <= 0 || settings.max_width > SIZE_LIMIT {
        settings.max_width = SIZE_LIMIT;
    }
    if settings.max_height <= 0 || settings.max_height > SIZE_LIMIT {
        settings.max_height = SIZE_LIMIT;
    }
    settings.min_width = settings.min_width.clamp(0, settings.max_width);
    settings.min_height = settings.min_height.clamp(0, settings.max_height);

    let (min_w, min_h) = apply_padding(settings, settings.min_width, settings.min_height, true);
    settings.min_width = min_w;
    settings.min_height = min_h;
    let (max_w, max_h) = apply_padding(settings, settings.max_width, settings.max_height, true);
    settings.max_width = max_w;
    settings.max_height = max_h;

    sizes.retain(|s| s.w >= 1 && s.h >= 1 && can_fit(settings, s.w, s.h));

    let mut rect_max_w = 0;
    let mut rect_max_h = 0;
    for s in sizes.iter() {
        rect_max_w = rect_max_w.max(s.w);
        rect_max_h = rect_max_h.max(s.h);
    }
    if settings.allow_rotation {
        let short = rect_max_w.min(rect_max_h);
        rect_max_w = short;
        rect_max_h = short;
    }
    settings.min_width = settings.min_width.max(rect_max_w);
    settings.min_height = settings.min_height.max(rect_max_h);
}

/// Corrects a candidate usable size against every constraint: raise to the
/// minimum, round up for power-of-two/alignment/square, then clamp to the
/// maximum and round down again. The ceil-then-floor pair first expands to
/// clear the minimum, then contracts to respect the maximum.
fn correct_size(settings: &PackSettings, width: i32, height: i32) -> (i32, i32) {
    let mut w = width.max(settings.min_width);
    let mut h = height.max(settings.min_height);
    (w, h) = apply_padding(settings, w, h, false);

    if settings.power_of_two {
        w = ceil_to_pow2(w);
        h = ceil_to_pow2(h);
    }
    if settings.align_width > 0 {
        w = align_ceil(w, settings.align_width);
    }
    if settings.square {
        w = w.max(h);
        h = w;
    }

    (w, h) = apply_padding(settings, w, h, true);
    w = w.min(settings.max_width);
    h = h.min(settings.max_height);
    (w, h) = apply_padding(settings, w, h, false);

    if settings.power_of_two {
        w = floor_to_pow2(w);
        h = floor_to_pow2(h);
    }
    if settings.align_width > 0 {
        w = align_floor(w, settings.align_width);
    }
    if settings.square {
        w = w.min(h);
        h = w;
    }

    apply_padding(settings, w, h, true)
}

fn perfect_area(sizes: &[PackSize]) -> i64 {
    sizes
        .iter()
        .map(|s| i64::from(s.w) * i64::from(s.h))
        .sum()
}

/// A near-square corrected bin of roughly the given area.
fn get_run_size(settings: &PackSettings, area: i64) -> (i32, i32) {
    let mut width = to_dim((area.max(0) as f64).sqrt() as i64);
    let mut height = to_dim(div_ceil(area, i64::from(width.max(1))));
    if width < settings.min_width || width > settings.max_width {
        width = width.clamp(settings.min_width, settings.max_width);
        height = to_dim(div_ceil(area, i64::from(width.max(1))));
    } else if height < settings.min_height || height > settings.max_height {
        height = height.clamp(settings.min_height, settings.max_height);
        width = to_dim(div_ceil(area, i64::from(height.max(1))));
    }
    correct_size(settings, width, height)
}

fn initial_run_settings(
    settings: &PackSettings,
    sizes: &[PackSize],
    perfect_area: i64,
) -> RunSettings {
    let method = settings.method.unwrap_or(PackMethod::BestLongSideFit);
    let (mut width, mut height) = get_run_size(settings, perfect_area * 5 / 4);

    // With rotation, min_* only covers every rectangle's short side; the
    // first bin must also fit each long side in some orientation or the
    // first run can never place those rectangles.
    if settings.allow_rotation {
        let (mut w, mut h) = (width, height);
        for s in sizes {
            let long = s.w.max(s.h);
            let short = s.w.min(s.h);
            let fits = (w >= long && h >= short) || (w >= short && h >= long);
            if !fits {
                if long <= settings.max_height {
                    h = h.max(long);
                } else {
                    w = w.max(long);
                }
            }
        }
        if (w, h) != (width, height) {
            (width, height) = correct_size(settings, w, h);
        }
    }

    RunSettings {
        width,
        height,
        method,
    }
}

fn advance_method(method: &mut PackMethod, first_method: PackMethod) -> bool {
    *method = method.next();
    *method != first_method
}

/// One stage step. Returns true while the stage has proposals left; false
/// hands control to the next stage.
fn optimize_stage(state: &mut OptimizerState, settings: &PackSettings, best_run: &Run) -> bool {
    match state.stage {
        Stage::FirstRun | Stage::End => false,

        Stage::MinimizeSheetCount => {
            if best_run.sheets.len() <= 1 || state.iteration > 5 {
                return false;
            }
            let Some(last_sheet) = best_run.sheets.last() else {
                return false;
            };
            // grow until the added area could absorb the smallest sheet
            let run = &mut state.settings;
            let mut area = i64::from(last_sheet.width) * i64::from(last_sheet.height);
            let mut i = 0;
            while area > 0 {
                if run.width == settings.max_width && run.height == settings.max_height {
                    break;
                }
                if run.height == settings.max_height
                    || (run.width < settings.max_width && i % 2 == 1)
                {
                    run.width += 1;
                    area -= i64::from(run.height);
                } else {
                    run.height += 1;
                    area -= i64::from(run.width);
                }
                i += 1;
            }
            true
        }

        Stage::ShrinkSquare => {
            if state.settings.width != best_run.settings.width
                || state.settings.height != best_run.settings.height
                || state.iteration > 5
            {
                return false;
            }
            let (w, h) = get_run_size(settings, state.perfect_area);
            state.settings.width = (state.settings.width + w) / 2;
            state.settings.height = (state.settings.height + h) / 2;
            true
        }

        Stage::ShrinkWidthFast
        | Stage::ShrinkHeightFast
        | Stage::ShrinkWidthSlow
        | Stage::ShrinkHeightSlow => {
            if state.settings.width != best_run.settings.width
                || state.settings.height != best_run.settings.height
                || state.iteration > 5
            {
                // when no method is pinned, retry the stage with each one
                if settings.method.is_some()
                    || !advance_method(&mut state.settings.method, state.first_method)
                {
                    return false;
                }
                // skip the costly contact point rule
                if state.settings.method == PackMethod::ContactPoint
                    && !advance_method(&mut state.settings.method, state.first_method)
                {
                    return false;
                }
                state.settings.width = best_run.settings.width;
                state.settings.height = best_run.settings.height;
            }

            let (w, h) = get_run_size(settings, state.perfect_area);
            match state.stage {
                Stage::ShrinkWidthFast => {
                    if state.settings.width > w + 4 {
                        state.settings.width = (state.settings.width + w) / 2;
                    }
                }
                Stage::ShrinkHeightFast => {
                    if state.settings.height > h + 4 {
                        state.settings.height = (state.settings.height + h) / 2;
                    }
                }
                Stage::ShrinkWidthSlow => {
                    if state.settings.width > w {
                        state.settings.width -= 1;
                    }
                }
                Stage::ShrinkHeightSlow => {
                    if state.settings.height > h {
                        state.settings.height -= 1;
                    }
                }
                _ => {}
            }
            true
        }
    }
}

/// Advances to the next candidate `(width, height, method)`. Returns false
/// when the search is exhausted.
fn optimize_run_settings(
    state: &mut OptimizerState,
    settings: &PackSettings,
    best_run: &Run,
) -> bool {
    let previous = state.settings;
    loop {
        if !optimize_stage(state, settings, best_run) && state.stage.advance() {
            state.settings = best_run.settings;
            state.first_method = best_run.settings.method;
            state.iteration = 0;
            continue;
        }

        if state.stage == Stage::End {
            return false;
        }

        state.iteration += 1;

        let (w, h) = correct_size(settings, state.settings.width, state.settings.height);
        if w != previous.width || h != previous.height || state.settings.method != previous.method
        {
            state.settings.width = w;
            state.settings.height = h;
            return true;
        }
    }
}

fn to_dim(v: i64) -> i32 {
    v.clamp(0, DIM_LIMIT) as i32
}

fn div_ceil(a: i64, b: i64) -> i64 {
    (a + b - 1) / b
}

/// Smallest power of two >= n (0 for n <= 0).
fn ceil_to_pow2(n: i32) -> i32 {
    if n <= 1 {
        return n.max(0);
    }
    1 << (32 - ((n - 1) as u32).leading_zeros())
}

/// Largest power of two <= n (0 for n <= 0).
fn floor_to_pow2(n: i32) -> i32 {
    if n <= 0 {
        return 0;
    }
    1 << (31 - (n as u32).leading_zeros())
}

fn align_ceil(n: i32, m: i32) -> i32 {
    (n + m - 1) / m * m
}

fn align_floor(n: i32, m: i32) -> i32 {
    n / m * m
}
