use super::*;

#[test]
fn zone_zero_is_always_white() {
    for max in 1..=300 {
        assert_eq!(color_for_zone(0, max).unwrap(), 255);
    }
}

#[test]
fn non_zero_zones_scale_by_floor_step() {
    assert_eq!(color_for_zone(1, 2).unwrap(), 127);
    assert_eq!(color_for_zone(2, 2).unwrap(), 254);
    assert_eq!(color_for_zone(3, 5).unwrap(), 153);
    assert_eq!(color_for_zone(5, 5).unwrap(), 255);
    assert_eq!(color_for_zone(7, 7).unwrap(), 252);
}

#[test]
fn sequence_is_non_decreasing() {
    for max in 1..=64u32 {
        let seq: Vec<u8> = (1..=max).map(|i| color_for_zone(i, max).unwrap()).collect();
        assert!(seq.windows(2).all(|w| w[0] <= w[1]), "max={max}: {seq:?}");
    }
}

#[test]
fn zero_max_index_fails_for_real_zones() {
    assert!(matches!(color_for_zone(1, 0), Err(MalathError::ZeroZoneCount)));
}

#[test]
fn index_beyond_max_overflows_grayscale() {
    assert!(matches!(
        color_for_zone(3, 2),
        Err(MalathError::InvalidGrayscale(381))
    ));
}

#[test]
fn grayscale_to_rgb_bounds() {
    assert_eq!(grayscale_to_rgb(0).unwrap(), Rgb8::new(0, 0, 0));
    assert_eq!(grayscale_to_rgb(127).unwrap(), Rgb8::new(127, 127, 127));
    assert_eq!(grayscale_to_rgb(255).unwrap(), Rgb8::WHITE);
    assert!(matches!(
        grayscale_to_rgb(-1),
        Err(MalathError::InvalidGrayscale(-1))
    ));
    assert!(matches!(
        grayscale_to_rgb(256),
        Err(MalathError::InvalidGrayscale(256))
    ));
}

#[test]
fn palette_for_three_zone_matrix() {
    let zones =
        ZoneMatrix::from_rows(vec![vec![0, 1, 0], vec![1, 2, 1], vec![0, 1, 0]]).unwrap();
    let p = GrayscalePalette::for_matrix(&zones).unwrap();
    assert_eq!(p.iter().collect::<Vec<_>>(), vec![(0, 255), (1, 127), (2, 254)]);
    assert_eq!(p.rgb(1), Some(Rgb8::new(127, 127, 127)));
    assert_eq!(p.get(3), None);
}

#[test]
fn palette_covers_exactly_the_distinct_ids() {
    let zones = ZoneMatrix::from_rows(vec![vec![4, 4, 9], vec![0, 9, 4]]).unwrap();
    let p = GrayscalePalette::for_matrix(&zones).unwrap();
    let ids: Vec<u32> = p.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, zones.distinct_ids());
    assert_eq!(p.get(9), Some(252));
}

#[test]
fn background_only_template_is_all_white() {
    let zones = ZoneMatrix::from_rows(vec![vec![0, 0]]).unwrap();
    let p = GrayscalePalette::for_matrix(&zones).unwrap();
    assert_eq!(p.len(), 1);
    assert_eq!(p.get(0), Some(255));
}

#[test]
fn empty_id_set_is_zero_zone_count() {
    assert!(matches!(
        GrayscalePalette::for_ids(Vec::new()),
        Err(MalathError::ZeroZoneCount)
    ));
}
