use std::fs;

use rstest::rstest;
use shapeshift_core::prelude::*;

fn load(path: &str) -> Scene {
    let file = fs::File::open(path).unwrap();
    let d = &mut serde_json::Deserializer::from_reader(file);
    let config: SceneConfig = match serde_path_to_error::deserialize(d) {
        Ok(m) => m,
        Err(e) => {
            println!("{}", e.path().to_string());
            panic!("abort");
        }
    };
    config.build().unwrap()
}

fn value(scene: &mut Scene, name: &str) -> Value {
    let id = scene.properties[name];
    scene.timeline.value_of(id).unwrap()
}

fn float(scene: &mut Scene, name: &str) -> f32 {
    match value(scene, name) {
        Value::Float(v) => v,
        other => panic!("expected a float, got {:?}", other),
    }
}

#[rstest]
#[case("../../fixtures/scenes/basic.json")]
#[case("../../fixtures/scenes/keyframes.json")]
fn test_deserialize(#[case] path: &str) {
    let scene = load(path);
    assert!(!scene.timeline.is_empty());
    assert_eq!(scene.properties.len(), scene.timeline.len());
}

#[test]
pub fn test_basic_scene() -> Result<(), Error> {
    let mut scene = load("../../fixtures/scenes/basic.json");
    assert_eq!(scene.timeline.total_duration(), TotalDuration::Finite(1500));

    scene.timeline.tick(500);
    assert!((float(&mut scene, "opacity") - 0.5).abs() < 1e-6);
    assert_eq!(value(&mut scene, "fill"), Value::Argb(Argb(0xFFBABABA)));
    assert_eq!(value(&mut scene, "dash"), Value::FloatArray(vec![5.0, 5.0]));
    assert_eq!(value(&mut scene, "shape").to_string(), "M0,0 L15,0 L15,15 Z");
    match value(&mut scene, "position") {
        Value::Point(p) => assert!((p.x - 50.0).abs() < 1e-3 && p.y.abs() < 1e-3),
        other => panic!("expected a point, got {:?}", other),
    }

    // The second opacity animation fades out from where the first ended.
    scene.timeline.tick(1250);
    assert!((float(&mut scene, "opacity") - 0.5).abs() < 1e-6);

    let names = scene
        .values()?
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["dash", "fill", "opacity", "position", "shape"]);
    Ok(())
}

#[rstest]
#[case(75, 1.5)]
#[case(150, 3.0)]
#[case(375, 2.5)]
#[case(1500, 2.0)]
fn test_keyframes_scene(#[case] play_time: i64, #[case] expected: f32) {
    let mut scene = load("../../fixtures/scenes/keyframes.json");
    assert_eq!(scene.timeline.total_duration(), TotalDuration::Infinite);
    scene.timeline.tick(play_time);
    let actual = float(&mut scene, "scale");
    assert!(
        (actual - expected).abs() < 1e-4,
        "at {}: {}",
        play_time,
        actual
    );
}

#[test]
pub fn test_mixed_kinds() -> Result<(), Error> {
    let file = fs::File::open("../../fixtures/invalid/mixed.json").unwrap();
    let config = SceneConfig::from_reader(file)?;
    assert!(matches!(config.build(), Err(Error::InvalidValueType(_))));
    Ok(())
}

#[test]
pub fn test_bad_path() {
    let file = fs::File::open("../../fixtures/invalid/bad_path.json").unwrap();
    assert!(matches!(
        Scene::from_reader(file),
        Err(Error::Json(_))
    ));
}

#[test]
pub fn test_round_trip() -> Result<(), Error> {
    let file = fs::File::open("../../fixtures/scenes/keyframes.json").unwrap();
    let config = SceneConfig::from_reader(file)?;
    let text = serde_json::to_string(&config)?;
    let mut scene = SceneConfig::from_reader(text.as_bytes())?.build()?;
    scene.timeline.tick(75);
    assert!((float(&mut scene, "scale") - 1.5).abs() < 1e-4);
    Ok(())
}
