use super::{PlacedRect, RectSize};
use crate::config::PackMethod;
use crate::model::Rect;

/// MaxRects bin for a single sheet.
///
/// Keeps the set of maximal free rectangles and the rectangles placed so far.
/// Each placement round scores every remaining size in both orientations
/// against every free rectangle and commits the best pair, so results do not
/// depend on input order beyond tie-breaking.
///
/// `shape_padding` is handled here: the bin and every candidate are inflated
/// by it on the right/bottom, and reported placements and extents are content
/// sized. A fresh packer is built per sheet; nothing is cached across sheets.
pub struct MaxRectsPacker {
    bin: Rect,
    shape_padding: i32,
    allow_rotation: bool,
    method: PackMethod,
    free: Vec<Rect>,
    used: Vec<Rect>,
}

struct Candidate {
    score: i64,
    tie_y: i32,
    tie_x: i32,
    size_idx: usize,
    rect: Rect,
    rotated: bool,
}

impl MaxRectsPacker {
    pub fn new(
        width: i32,
        height: i32,
        allow_rotation: bool,
        shape_padding: i32,
        method: PackMethod,
    ) -> Self {
        let bin = Rect::new(
            0,
            0,
            width.saturating_add(shape_padding),
            height.saturating_add(shape_padding),
        );
        Self {
            bin,
            shape_padding,
            allow_rotation,
            method,
            free: vec![bin],
            used: Vec::new(),
        }
    }

    /// Places as many of `sizes` as fit, removing them from the list.
    /// Whatever remains in `sizes` afterwards did not fit.
    pub fn insert_all(&mut self, sizes: &mut Vec<RectSize>) -> Vec<PlacedRect> {
        let mut placed = Vec::new();
        while !sizes.is_empty() {
            let Some(best) = self.find_best(sizes) else {
                break;
            };
            self.place(best.rect);
            let size = sizes.remove(best.size_idx);
            placed.push(PlacedRect {
                index: size.index,
                x: best.rect.x,
                y: best.rect.y,
                w: best.rect.w - self.shape_padding,
                h: best.rect.h - self.shape_padding,
                rotated: best.rotated,
            });
        }
        placed
    }

    /// Bottom-right corner of the bounding box of all placed content, or
    /// `(0, 0)` when nothing was placed.
    pub fn bottom_right(&self) -> (i32, i32) {
        if self.used.is_empty() {
            return (0, 0);
        }
        let mut x = 0;
        let mut y = 0;
        for u in &self.used {
            x = x.max(u.max_x());
            y = y.max(u.max_y());
        }
        (x - self.shape_padding, y - self.shape_padding)
    }

    fn find_best(&self, sizes: &[RectSize]) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for (idx, size) in sizes.iter().enumerate() {
            let w = size.w.saturating_add(self.shape_padding);
            let h = size.h.saturating_add(self.shape_padding);
            self.consider(&mut best, idx, w, h, false);
            if self.allow_rotation && size.w != size.h {
                self.consider(&mut best, idx, h, w, true);
            }
        }
        best
    }

    fn consider(&self, best: &mut Option<Candidate>, size_idx: usize, w: i32, h: i32, rotated: bool) {
        for fr in &self.free {
            if fr.w < w || fr.h < h {
                continue;
            }
            let score = self.score(fr, w, h);
            // ties fall back to bottom-left ordering: lowest top edge, then leftmost
            let tie_y = fr.y + h;
            let tie_x = fr.x;
            let better = match best {
                None => true,
                Some(b) => (score, tie_y, tie_x) < (b.score, b.tie_y, b.tie_x),
            };
            if better {
                *best = Some(Candidate {
                    score,
                    tie_y,
                    tie_x,
                    size_idx,
                    rect: Rect::new(fr.x, fr.y, w, h),
                    rotated,
                });
            }
        }
    }

    fn score(&self, fr: &Rect, w: i32, h: i32) -> i64 {
        match self.method {
            PackMethod::BestShortSideFit => i64::from((fr.w - w).min(fr.h - h)),
            PackMethod::BestLongSideFit => i64::from((fr.w - w).max(fr.h - h)),
            PackMethod::BestAreaFit => fr.area() - i64::from(w) * i64::from(h),
            PackMethod::BottomLeft => i64::from(fr.y) + i64::from(h),
            // contact score is maximized
            PackMethod::ContactPoint => -self.contact_score(fr.x, fr.y, w, h),
        }
    }

    fn contact_score(&self, x: i32, y: i32, w: i32, h: i32) -> i64 {
        let mut score = 0i64;

        if x == self.bin.x {
            score += i64::from(h);
        }
        if y == self.bin.y {
            score += i64::from(w);
        }
        if x + w == self.bin.max_x() {
            score += i64::from(h);
        }
        if y + h == self.bin.max_y() {
            score += i64::from(w);
        }

        for u in &self.used {
            // shared vertical edges
            if x == u.max_x() || u.x == x + w {
                score += i64::from(overlap_1d(y, y + h, u.y, u.max_y()));
            }
            // shared horizontal edges
            if y == u.max_y() || u.y == y + h {
                score += i64::from(overlap_1d(x, x + w, u.x, u.max_x()));
            }
        }
        score
    }

    fn place(&mut self, node: Rect) {
        let mut split: Vec<Rect> = Vec::new();
        let mut i = 0;
        while i < self.free.len() {
            let fr = self.free[i];
            if fr.intersects(&node) {
                self.free.swap_remove(i);
                split_free_rect(fr, &node, &mut split);
            } else {
                i += 1;
            }
        }
        self.free.extend(split);
        self.prune_free_list();
        self.used.push(node);
    }

    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut j = i + 1;
            let mut removed_i = false;
            while j < self.free.len() {
                if self.free[j].contains(&self.free[i]) {
                    self.free.remove(i);
                    removed_i = true;
                    break;
                }
                if self.free[i].contains(&self.free[j]) {
                    self.free.remove(j);
                } else {
                    j += 1;
                }
            }
            if !removed_i {
                i += 1;
            }
        }
    }
}

/// Splits `fr` around `node`, emitting the up to four maximal sub-rectangles
/// of `fr` that lie outside it. Caller guarantees the two intersect.
fn split_free_rect(fr: Rect, node: &Rect, out: &mut Vec<Rect>) {
    if node.x > fr.x {
        out.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
    }
    if node.max_x() < fr.max_x() {
        out.push(Rect::new(node.max_x(), fr.y, fr.max_x() - node.max_x(), fr.h));
    }
    if node.y > fr.y {
        out.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
    }
    if node.max_y() < fr.max_y() {
        out.push(Rect::new(fr.x, node.max_y(), fr.w, fr.max_y() - node.max_y()));
    }
}

fn overlap_1d(a1: i32, a2: i32, b1: i32, b2: i32) -> i32 {
    (a2.min(b2) - a1.max(b1)).max(0)
}
