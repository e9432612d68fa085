use sheet_packer_core::{pack, PackSettings, PackSize, Placement};

fn rects(sheet: &[Placement], sizes: &[PackSize]) -> Vec<(i32, i32, i32, i32)> {
    sheet
        .iter()
        .map(|p| {
            let s = sizes.iter().find(|s| s.id == p.id).expect("unknown id");
            let (w, h) = if p.rotated { (s.h, s.w) } else { (s.w, s.h) };
            (p.x, p.y, w, h)
        })
        .collect()
}

#[test]
fn border_padding_offsets_every_placement() {
    let border = 4;
    let settings = PackSettings::builder()
        .max_dimensions(128, 128)
        .border_padding(border)
        .build();
    let sizes: Vec<PackSize> = (0..6).map(|i| PackSize::new(i, 16, 24)).collect();
    let sheets = pack(settings, sizes.clone());

    let placed: usize = sheets.iter().map(|s| s.placements.len()).sum();
    assert_eq!(placed, sizes.len());
    for sheet in &sheets {
        for (x, y, w, h) in rects(&sheet.placements, &sizes) {
            assert!(x >= border && y >= border);
            assert!(x + w <= sheet.width - border);
            assert!(y + h <= sheet.height - border);
        }
    }
}

#[test]
fn shape_padding_separates_placements() {
    let gap = 3;
    let settings = PackSettings::builder()
        .max_dimensions(128, 128)
        .shape_padding(gap)
        .build();
    let sizes: Vec<PackSize> = (0..8).map(|i| PackSize::new(i, 15, 10)).collect();
    let sheets = pack(settings, sizes.clone());

    let placed: usize = sheets.iter().map(|s| s.placements.len()).sum();
    assert_eq!(placed, sizes.len());
    for sheet in &sheets {
        let r = rects(&sheet.placements, &sizes);
        for i in 0..r.len() {
            for j in (i + 1)..r.len() {
                let (ax, ay, aw, ah) = r[i];
                let (bx, by, bw, bh) = r[j];
                // expanding right/bottom by the gap must keep them disjoint
                let overlap = !(ax >= bx + bw + gap
                    || bx >= ax + aw + gap
                    || ay >= by + bh + gap
                    || by >= ay + ah + gap);
                assert!(!overlap, "placements closer than {}: {:?} vs {:?}", gap, r[i], r[j]);
            }
        }
    }
}

#[test]
fn both_paddings_combine() {
    let border = 2;
    let gap = 3;
    let settings = PackSettings::builder()
        .max_dimensions(64, 64)
        .border_padding(border)
        .shape_padding(gap)
        .build();
    let sizes = vec![PackSize::new(0, 10, 10), PackSize::new(1, 10, 10)];
    let sheets = pack(settings, sizes.clone());

    let placed: usize = sheets.iter().map(|s| s.placements.len()).sum();
    assert_eq!(placed, 2);
    for sheet in &sheets {
        for (x, y, w, h) in rects(&sheet.placements, &sizes) {
            assert!(x >= border && y >= border);
            assert!(x + w <= sheet.width - border);
            assert!(y + h <= sheet.height - border);
        }
    }
}
