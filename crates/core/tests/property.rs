use std::cell::RefCell;
use std::rc::Rc;

use rstest::rstest;
use shapeshift_core::prelude::*;

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
pub fn test_end_to_end() -> Result<(), Error> {
    let animation = Animation::of_float_keyframes(vec![
        Keyframe::new(0.0, 0.0),
        Keyframe::new(1.0, 100.0),
    ])?
    .duration(1000)
    .start_delay(200);
    let mut property = Property::of(animation)?;
    property.set_play_time(700);
    assert_close(property.current_fraction(), 0.5);
    assert_close(property.value()?, 50.0);
    Ok(())
}

#[test]
pub fn test_total_duration() -> Result<(), Error> {
    let animation = Animation::of_float([0.0, 1.0])?
        .start_delay(200)
        .duration(1000)
        .repeat_count(2);
    assert_eq!(animation.total_duration(), TotalDuration::Finite(3200));

    let animation = Animation::of_float([0.0, 1.0])?.repeat_count(RepeatCount::Infinite);
    assert_eq!(animation.total_duration(), TotalDuration::Infinite);
    assert_eq!(animation.total_duration().as_millis(), -1);

    let property = Property::builder()
        .add(Animation::of_float([0.0, 1.0])?.duration(500))
        .add(Animation::of_float([1.0, 0.0])?.start_delay(100).duration(900))
        .build()?;
    assert_eq!(property.total_duration(), TotalDuration::Finite(1000));
    Ok(())
}

#[test]
pub fn test_default_duration() -> Result<(), Error> {
    let animation = Animation::of_float([0.0, 1.0])?;
    assert_eq!(animation.timing().duration, 300);
    assert_eq!(animation.total_duration(), TotalDuration::Finite(300));
    Ok(())
}

#[rstest]
#[case(RepeatMode::Restart, [0.0, 0.5, 1.0, 0.5, 1.0, 0.5, 1.0, 0.5])]
#[case(RepeatMode::Reverse, [0.0, 0.5, 1.0, 0.5, 0.0, 0.5, 1.0, 0.5])]
fn test_repeat_modes(#[case] mode: RepeatMode, #[case] expected: [f32; 8]) {
    let animation = Animation::of_float([0.0, 1.0])
        .unwrap()
        .duration(1000)
        .repeat_count(3)
        .repeat_mode(mode);
    let mut property = Property::of(animation).unwrap();
    for (i, expected) in expected.iter().enumerate() {
        let value = property.value_at(i as i64 * 500).unwrap();
        assert_close(value, *expected);
    }
}

#[test]
pub fn test_infinite_reverse() -> Result<(), Error> {
    let animation = Animation::of_float([0.0, 100.0])?
        .duration(1000)
        .repeat_count(RepeatCount::Infinite)
        .repeat_mode(RepeatMode::Reverse);
    let mut property = Property::of(animation)?;
    assert_eq!(property.total_duration(), TotalDuration::Infinite);
    assert_close(property.value_at(1250)?, 75.0);
    assert_close(property.value_at(2250)?, 25.0);
    assert_close(property.value_at(100_250)?, 25.0);
    Ok(())
}

#[test]
pub fn test_interpolator_is_applied_to_the_local_fraction() -> Result<(), Error> {
    let animation = Animation::of_float([0.0, 100.0])?
        .duration(1000)
        .interpolator(Interpolator::Accelerate { factor: 1.0 });
    let mut property = Property::of(animation)?;
    assert_close(property.value_at(500)?, 25.0);
    Ok(())
}

#[test]
pub fn test_zero_duration_jumps_to_the_end() -> Result<(), Error> {
    let animation = Animation::of_float([0.0, 100.0])?.duration(0);
    let mut property = Property::of(animation)?;
    assert_close(property.value_at(0)?, 100.0);
    Ok(())
}

#[test]
pub fn test_chained_start_value() -> Result<(), Error> {
    let first = Animation::of_float([0.0, 100.0])?.duration(1000);
    let second = Animation::of_float([50.0])?.start_delay(1000).duration(500);
    // Added out of order on purpose; the property sorts by start delay.
    let mut property = Property::builder().add(second).add(first).build()?;

    let end_of_first = property.value_at(1000)?;
    assert_close(end_of_first, 100.0);
    assert_close(property.value_at(1250)?, 75.0);
    assert_close(property.value_at(1500)?, 50.0);
    Ok(())
}

#[test]
pub fn test_boundary_matches_previous_end() -> Result<(), Error> {
    let mut previous = Animation::of_float([3.0, 7.0, -2.5])?.duration(400);
    let expected = previous.value_at(1.0)?;

    let property_first = Animation::of_float([3.0, 7.0, -2.5])?.duration(400);
    let next = Animation::of_float([10.0])?.start_delay(650).duration(300);
    let mut property = Property::builder().add(property_first).add(next).build()?;
    assert_eq!(property.value_at(650)?.to_bits(), expected.to_bits());
    Ok(())
}

#[test]
pub fn test_last_animation_holds_its_value() -> Result<(), Error> {
    let mut property = Property::builder()
        .add(Animation::of_float([0.0, 10.0])?.duration(100))
        .add(Animation::of_float([20.0])?.start_delay(100).duration(100))
        .build()?;
    assert_close(property.value_at(10_000)?, 20.0);
    assert_eq!(property.play_time(), 200);
    Ok(())
}

#[rstest]
#[case(200, 1000, 0, 80.0)]
#[case(200, 1000, 100, 90.0)]
#[case(500, 100, 0, 0.0)]
#[case(250, 100, 0, 50.0)]
fn test_before_the_first_start_delay(
    #[case] start_delay: u64,
    #[case] duration: u64,
    #[case] play_time: i64,
    #[case] expected: f32,
) {
    // Before its start delay the animation shows the fractional part of
    // its negative local fraction.
    let animation = Animation::of_float([0.0, 100.0])
        .unwrap()
        .start_delay(start_delay)
        .duration(duration);
    let mut property = Property::of(animation).unwrap();
    assert_close(property.value_at(play_time).unwrap(), expected);
    assert_close(property.value_at(-100).unwrap(), property.value_at(0).unwrap());
}

#[test]
pub fn test_total_duration_saturates() -> Result<(), Error> {
    let animation = Animation::of_float([0.0, 1.0])?
        .start_delay(10)
        .duration(u64::MAX / 2)
        .repeat_count(u32::MAX);
    assert_eq!(animation.total_duration(), TotalDuration::Finite(u64::MAX));

    let animation = Animation::of_float([0.0, 1.0])?
        .start_delay(u64::MAX)
        .duration(1);
    assert_eq!(animation.total_duration(), TotalDuration::Finite(u64::MAX));
    Ok(())
}

#[test]
pub fn test_idempotent() -> Result<(), Error> {
    let animation = Animation::of_argb([Argb(0xFF102030), Argb(0x80F0E0D0)])?.duration(777);
    let mut property = Property::of(animation)?;
    property.set_play_time(321);
    let first = property.value()?;
    let second = property.value()?;
    assert_eq!(first, second);

    let animation = Animation::of_float([0.1, 0.7, 0.3])?.duration(1000);
    let mut property = Property::of(animation)?;
    let a = property.value_at(123)?;
    let b = property.value_at(123)?;
    assert_eq!(a.to_bits(), b.to_bits());
    Ok(())
}

#[test]
pub fn test_listeners() -> Result<(), Error> {
    let seen = Rc::new(RefCell::new(vec![]));
    let mut property = Property::of(Animation::of_float([0.0, 1.0])?.duration(1000))?;
    let sink = seen.clone();
    property.add_listener(move |t| sink.borrow_mut().push(t));

    assert!(property.set_play_time(100));
    assert!(!property.set_play_time(100));
    assert!(property.set_play_time(5000));
    assert!(!property.set_play_time(2000));
    assert!(property.set_play_time(-5));
    assert_eq!(*seen.borrow(), vec![100, 1000, 0]);
    Ok(())
}

#[test]
pub fn test_first_animation_needs_a_start_value() -> Result<(), Error> {
    let result = Property::of(Animation::of_float([1.0])?);
    assert!(matches!(
        result,
        Err(Error::MissingKeyframeValue { index: 0 })
    ));
    Ok(())
}

#[test]
pub fn test_no_animations() {
    assert!(matches!(
        Property::<f32>::builder().build(),
        Err(Error::NoAnimations)
    ));
    assert!(matches!(
        Animation::of_float(Vec::new()),
        Err(Error::EmptyKeyframes)
    ));
}

#[test]
pub fn test_transform() -> Result<(), Error> {
    let animation = Animation::of_float([0.0, 10.0])?
        .duration(100)
        .transform(|v| format!("{:.1}", v));
    let mut property = Property::of(animation)?;
    assert_eq!(property.value_at(50)?, "5.0");
    Ok(())
}

#[test]
pub fn test_chaining_into_a_transformed_animation() -> Result<(), Error> {
    let first = Animation::of_float([0.0, 10.0])?.duration(100);
    let second = Animation::of_float([4.0])?
        .start_delay(100)
        .duration(100)
        .transform_bidirectional(|v| v * 2.0, |v| v / 2.0);
    let mut property = Property::builder().add(first).add(second).build()?;
    assert_close(property.value_at(100)?, 10.0);
    assert_close(property.value_at(200)?, 8.0);

    let first = Animation::of_float([0.0, 10.0])?.duration(100);
    let second = Animation::of_float([4.0])?
        .start_delay(100)
        .transform(|v| v * 2.0);
    assert!(matches!(
        Property::builder().add(first).add(second).build(),
        Err(Error::InvalidValueType(_))
    ));
    Ok(())
}

#[test]
pub fn test_path_morph() -> Result<(), Error> {
    let animation = Animation::of_path_morph([
        PathData::parse("M0,0 L10,0 L10,10 Z")?,
        PathData::parse("M0,0 L20,0 L20,20 Z")?,
    ])?
    .duration(1000);
    let mut property = Property::of(animation)?;
    assert_eq!(property.value_at(500)?.to_string(), "M0,0 L15,0 L15,15 Z");

    let mismatched = Animation::of_path_morph([
        PathData::parse("M0,0 L10,0")?,
        PathData::parse("M0,0 Q10,0 10,10")?,
    ]);
    assert!(matches!(mismatched, Err(Error::ShapeMismatch(_))));
    Ok(())
}

#[test]
pub fn test_path_motion() -> Result<(), Error> {
    let path = PathData::parse("M0,0 L100,0 L100,100")?;
    let animation = Animation::of_path_motion(&path)?.duration(1000);
    let mut property = Property::of(animation)?;
    let p = property.value_at(250)?;
    assert_close(p.x, 50.0);
    assert_close(p.y, 0.0);
    let p = property.value_at(750)?;
    assert_close(p.x, 100.0);
    assert_close(p.y, 50.0);

    assert!(matches!(
        Animation::of_path_motion(&PathData::parse("M1,1")?),
        Err(Error::EmptyPath)
    ));
    Ok(())
}
