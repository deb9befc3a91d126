use rstest::rstest;
use shapeshift_core::prelude::*;

fn fractions<T: Lerp>(set: &KeyframeSet<T>) -> Vec<f32> {
    set.keyframes()
        .iter()
        .map(|k| k.fraction().unwrap_or(-1.0))
        .collect()
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
pub fn test_values_are_spread_evenly() -> Result<(), Error> {
    let set = KeyframeSet::of_values(vec![0.0f32, 10.0, 20.0, 30.0, 40.0])?;
    assert_eq!(fractions(&set), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    assert_eq!(set.missing_value(), None);
    Ok(())
}

#[test]
pub fn test_single_value_is_the_end_value() -> Result<(), Error> {
    let mut set = KeyframeSet::of_values(vec![5.0f32])?;
    assert_eq!(fractions(&set), vec![0.0, 1.0]);
    assert_eq!(set.missing_value(), Some(0));
    assert!(matches!(
        set.value_at(0.5),
        Err(Error::MissingKeyframeValue { index: 0 })
    ));

    set.fill_missing_values(&1.0);
    assert_eq!(set.missing_value(), None);
    assert_close(*set.value_at(0.5)?, 3.0);
    Ok(())
}

#[test]
pub fn test_no_values() {
    assert!(matches!(
        KeyframeSet::<f32>::of_values(vec![]),
        Err(Error::EmptyKeyframes)
    ));
    assert!(matches!(
        KeyframeSet::<f32>::of_keyframes(vec![]),
        Err(Error::EmptyKeyframes)
    ));
}

#[rstest]
#[case(0.0, 0.0)]
#[case(0.25, 5.0)]
#[case(0.5, 10.0)]
#[case(0.75, 20.0)]
#[case(1.0, 30.0)]
#[case(-0.5, -10.0)]
#[case(1.5, 50.0)]
fn test_evaluate_three_keyframes(#[case] fraction: f32, #[case] expected: f32) {
    let mut set = KeyframeSet::of_values(vec![0.0f32, 10.0, 30.0]).unwrap();
    assert_close(*set.value_at(fraction).unwrap(), expected);
}

#[test]
pub fn test_unplaced_fractions_are_spread() -> Result<(), Error> {
    let set = KeyframeSet::of_keyframes(vec![
        Keyframe::unplaced(0.0f32),
        Keyframe::unplaced(10.0),
        Keyframe::unplaced(20.0),
        Keyframe::new(1.0, 30.0),
    ])?;
    let f = fractions(&set);
    assert_eq!(f.len(), 4);
    assert_close(f[0], 0.0);
    assert_close(f[1], 1.0 / 3.0);
    assert_close(f[2], 2.0 / 3.0);
    assert_close(f[3], 1.0);

    let set = KeyframeSet::of_keyframes(vec![
        Keyframe::new(0.2, 0.0f32),
        Keyframe::unplaced(10.0),
        Keyframe::new(0.6, 20.0),
        Keyframe::unplaced(30.0),
    ])?;
    // An empty keyframe is put in front of 0.2; the last one lands on 1.
    let f = fractions(&set);
    assert_eq!(f.len(), 5);
    assert_close(f[0], 0.0);
    assert_close(f[1], 0.2);
    assert_close(f[2], 0.4);
    assert_close(f[3], 0.6);
    assert_close(f[4], 1.0);
    assert_eq!(set.missing_value(), Some(0));
    Ok(())
}

#[test]
pub fn test_negative_fraction_means_unplaced() -> Result<(), Error> {
    let set = KeyframeSet::of_keyframes(vec![
        Keyframe::new(0.0, 0.0f32),
        Keyframe::new(-1.0, 5.0),
        Keyframe::new(1.0, 10.0),
    ])?;
    assert_eq!(fractions(&set), vec![0.0, 0.5, 1.0]);
    Ok(())
}

#[test]
pub fn test_keyframes_are_sorted_and_deduplicated() -> Result<(), Error> {
    let mut set = KeyframeSet::of_keyframes(vec![
        Keyframe::new(1.0, 100.0f32),
        Keyframe::new(0.0, 1.0),
        Keyframe::new(0.0, 2.0),
        Keyframe::new(0.5, 50.0),
    ])?;
    assert_eq!(fractions(&set), vec![0.0, 0.5, 1.0]);
    assert_eq!(set.keyframes()[0].value(), Some(&2.0));
    assert_close(*set.value_at(0.0)?, 2.0);
    Ok(())
}

#[test]
pub fn test_trailing_fraction_gets_end_keyframe() -> Result<(), Error> {
    let set = KeyframeSet::of_keyframes(vec![Keyframe::new(0.0, 1.0f32), Keyframe::new(0.5, 2.0)])?;
    assert_eq!(fractions(&set), vec![0.0, 0.5, 1.0]);
    assert_eq!(set.missing_value(), Some(2));
    Ok(())
}

#[test]
pub fn test_interpolator_eases_the_interval_ending_at_its_keyframe() -> Result<(), Error> {
    let mut set = KeyframeSet::of_keyframes(vec![
        Keyframe::new(0.0, 0.0f32),
        Keyframe::new(0.5, 10.0).with_interpolator(Interpolator::Accelerate { factor: 1.0 }),
        Keyframe::new(1.0, 20.0),
    ])?;
    assert_close(*set.value_at(0.25)?, 2.5);
    assert_close(*set.value_at(0.75)?, 15.0);
    Ok(())
}

#[test]
pub fn test_two_keyframes_use_last_interpolator() -> Result<(), Error> {
    let mut set = KeyframeSet::of_keyframes(vec![
        Keyframe::new(0.0, 0.0f32),
        Keyframe::new(1.0, 100.0).with_interpolator(Interpolator::Accelerate { factor: 1.0 }),
    ])?;
    assert_close(*set.value_at(0.5)?, 25.0);
    Ok(())
}

#[test]
pub fn test_color_blends_in_linear_light() -> Result<(), Error> {
    let mut set = KeyframeSet::of_values(vec![Argb(0xFF000000), Argb(0xFFFFFFFF)])?;
    let mid = *set.value_at(0.5)?;
    assert_ne!(mid, Argb(0xFF7F7F7F));
    assert_eq!(mid, Argb(0xFFBABABA));
    assert_eq!(*set.value_at(0.0)?, Argb(0xFF000000));
    assert_eq!(*set.value_at(1.0)?, Argb(0xFFFFFFFF));
    Ok(())
}

#[test]
pub fn test_color_alpha_is_linear() -> Result<(), Error> {
    let mut set = KeyframeSet::of_values(vec![Argb(0x00FF0000), Argb(0xFFFF0000)])?;
    let mid = *set.value_at(0.5)?;
    assert_eq!(mid.alpha(), 128);
    assert_eq!(mid.red(), 255);
    assert_eq!(mid.green(), 0);
    Ok(())
}

#[rstest]
#[case("#FF0000", 0xFFFF0000)]
#[case("#80ff0000", 0x80FF0000)]
#[case("00FF00", 0xFF00FF00)]
fn test_parse_color(#[case] input: &str, #[case] expected: u32) {
    let color: Argb = input.parse().unwrap();
    assert_eq!(color, Argb(expected));
}

#[test]
pub fn test_color_round_trips_through_strings() -> Result<(), Error> {
    let color = Argb::new(0x12, 0x34, 0x56, 0x78);
    assert_eq!(color.to_string(), "#12345678");
    assert_eq!(color.to_string().parse::<Argb>()?, color);
    assert!(matches!("#12345".parse::<Argb>(), Err(Error::InvalidValueType(_))));
    Ok(())
}

#[test]
pub fn test_float_arrays() -> Result<(), Error> {
    let mut set = KeyframeSet::of_values(vec![vec![0.0f32, 10.0], vec![10.0, 0.0]])?;
    assert_eq!(set.value_at(0.25)?, &vec![2.5, 7.5]);

    let mut set = KeyframeSet::of_values(vec![vec![0.0f32, 10.0], vec![10.0]])?;
    assert!(matches!(set.value_at(0.5), Err(Error::InvalidValueType(_))));
    Ok(())
}

#[test]
pub fn test_path_morph_keyframes() -> Result<(), Error> {
    let mut set = KeyframeSet::of_values(vec![
        PathData::parse("M0,0 L10,0")?,
        PathData::parse("M0,10 L10,10")?,
        PathData::parse("M0,20 L20,20")?,
    ])?;
    assert_eq!(set.value_at(0.25)?.to_string(), "M0,5 L10,5");
    assert_eq!(set.value_at(0.75)?.to_string(), "M0,15 L15,15");

    let mut set = KeyframeSet::of_values(vec![
        PathData::parse("M0,0 L10,0")?,
        PathData::parse("M0,10 L10,10 Z")?,
    ])?;
    assert!(matches!(set.value_at(0.5), Err(Error::ShapeMismatch(_))));
    Ok(())
}

#[test]
pub fn test_repeated_evaluation_is_stable() -> Result<(), Error> {
    let mut set = KeyframeSet::of_values(vec![0.0f32, 7.0, 3.0])?;
    let first = *set.value_at(0.37)?;
    let _ = set.value_at(0.9)?;
    let second = *set.value_at(0.37)?;
    assert_eq!(first.to_bits(), second.to_bits());
    Ok(())
}
