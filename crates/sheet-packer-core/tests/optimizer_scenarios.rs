use sheet_packer_core::{pack, PackSettings, PackSheet, PackSize, Placement};

fn placed_rect(sizes: &[PackSize], p: &Placement) -> (i32, i32, i32, i32) {
    let s = sizes.iter().find(|s| s.id == p.id).expect("unknown id");
    let (w, h) = if p.rotated { (s.h, s.w) } else { (s.w, s.h) };
    (p.x, p.y, w, h)
}

fn total_placements(sheets: &[PackSheet]) -> usize {
    sheets.iter().map(|s| s.placements.len()).sum()
}

#[test]
fn empty_input_yields_empty_result() {
    let settings = PackSettings::builder().max_dimensions(256, 256).build();
    let sheets = pack(settings, Vec::new());
    assert!(sheets.is_empty());
}

#[test]
fn all_oversized_yields_empty_result() {
    let settings = PackSettings::builder().max_dimensions(64, 64).build();
    let sheets = pack(settings, vec![PackSize::new(0, 100, 100), PackSize::new(1, 65, 1)]);
    assert!(sheets.is_empty());
}

#[test]
fn single_rectangle_gets_a_tight_sheet() {
    let settings = PackSettings::builder().max_dimensions(64, 64).build();
    let sheets = pack(settings, vec![PackSize::new(0, 10, 20)]);

    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].width, 10);
    assert_eq!(sheets[0].height, 20);
    assert_eq!(sheets[0].placements.len(), 1);
    let p = &sheets[0].placements[0];
    assert_eq!((p.id, p.x, p.y, p.rotated), (0, 0, 0, false));
}

#[test]
fn rotation_is_forced_by_a_narrow_sheet() {
    let settings = PackSettings::builder()
        .max_dimensions(10, 40)
        .allow_rotation(true)
        .build();
    let sheets = pack(settings, vec![PackSize::new(0, 30, 5)]);

    assert_eq!(sheets.len(), 1);
    assert_eq!(sheets[0].placements.len(), 1);
    let p = &sheets[0].placements[0];
    assert!(p.rotated);
    assert_eq!((p.x, p.y), (0, 0));
    // placed turned: occupies 5x30
    assert_eq!(sheets[0].width, 5);
    assert_eq!(sheets[0].height, 30);
}

#[test]
fn oversized_rectangles_are_dropped() {
    let settings = PackSettings::builder().max_dimensions(100, 100).build();
    let sizes = vec![PackSize::new(0, 10, 10), PackSize::new(1, 500, 500)];
    let sheets = pack(settings, sizes);

    assert_eq!(total_placements(&sheets), 1);
    assert_eq!(sheets[0].placements[0].id, 0);
}

#[test]
fn every_accepted_rectangle_is_placed_exactly_once() {
    let settings = PackSettings::builder()
        .max_dimensions(128, 128)
        .allow_rotation(true)
        .build();
    let sizes: Vec<PackSize> = (0..20)
        .map(|i| PackSize::new(i, 5 + (i as i32 * 7) % 40, 5 + (i as i32 * 11) % 40))
        .collect();
    let sheets = pack(settings, sizes.clone());

    let mut placed: Vec<(u32, i32, i32)> = sheets
        .iter()
        .flat_map(|sheet| sheet.placements.iter())
        .map(|p| {
            let (_, _, w, h) = placed_rect(&sizes, p);
            (p.id, w.min(h), w.max(h))
        })
        .collect();
    placed.sort_unstable();

    let mut expected: Vec<(u32, i32, i32)> = sizes
        .iter()
        .map(|s| (s.id, s.w.min(s.h), s.w.max(s.h)))
        .collect();
    expected.sort_unstable();

    assert_eq!(placed, expected);
}

#[test]
fn rotated_flag_matches_swapped_dimensions() {
    let settings = PackSettings::builder()
        .max_dimensions(96, 96)
        .allow_rotation(true)
        .build();
    let sizes: Vec<PackSize> = (0..12)
        .map(|i| PackSize::new(i, 8 + (i as i32 * 13) % 30, 8 + (i as i32 * 5) % 30))
        .collect();
    let sheets = pack(settings, sizes.clone());

    for sheet in &sheets {
        for p in &sheet.placements {
            let s = sizes.iter().find(|s| s.id == p.id).expect("unknown id");
            if p.rotated {
                // a square placement never reports rotation
                assert_ne!(s.w, s.h, "square placement reported as rotated");
            }
        }
    }
}

#[test]
fn no_rotation_when_disabled() {
    let settings = PackSettings::builder().max_dimensions(200, 200).build();
    let sizes: Vec<PackSize> = (0..10)
        .map(|i| PackSize::new(i, 10 + i as i32, 40 - i as i32))
        .collect();
    let sheets = pack(settings, sizes);
    for sheet in &sheets {
        for p in &sheet.placements {
            assert!(!p.rotated);
        }
    }
}
