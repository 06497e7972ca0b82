use super::*;

#[test]
fn width_scales_with_character_count_and_size() {
    let m = NominalTextMeasurer;
    let a = m.measure("abc", 10.0, 400.0);
    assert_eq!(a.width, 3.0 * 10.0 * NOMINAL_ADVANCE_EM);
    assert_eq!(a.height, 10.0 * NOMINAL_LINE_HEIGHT_EM);

    let b = m.measure("abcabc", 10.0, 400.0);
    assert_eq!(b.width, 2.0 * a.width);

    let c = m.measure("abc", 20.0, 400.0);
    assert_eq!(c.width, 2.0 * a.width);
}

#[test]
fn counts_characters_not_bytes() {
    let m = NominalTextMeasurer;
    let ascii = m.measure("aaaa", 10.0, 400.0);
    let accented = m.measure("áááá", 10.0, 400.0);
    assert_eq!(ascii.width, accented.width);
}

#[test]
fn empty_text_has_zero_width_but_a_line_box() {
    let m = NominalTextMeasurer.measure("", 10.0, 400.0);
    assert_eq!(m.width, 0.0);
    assert_eq!(m.height, 12.0);
}

#[test]
fn weight_does_not_change_nominal_metrics() {
    let m = NominalTextMeasurer;
    assert_eq!(m.measure("x", 10.0, 100.0), m.measure("x", 10.0, 900.0));
}
