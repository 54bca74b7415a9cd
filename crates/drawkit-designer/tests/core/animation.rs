use drawkit_core::{Bounds, Color, FrameEvent, Point, SceneAdapter};
use drawkit_designer::animation::{
    AnimationKind, AnimationProperties, AnimationSnapshot, AnimationState, AnimationUpdate,
    Property,
};
use drawkit_designer::canvas::Canvas;
use drawkit_designer::{ArtefactId, DesignerError};

fn canvas_with_rect() -> (Canvas, ArtefactId) {
    let mut canvas: Canvas = Canvas::default();
    let id = canvas
        .draw_rectangle(&Bounds::new(0.0, 0.0, 40.0, 20.0), Color::rgb(1.0, 0.5, 0.0))
        .unwrap();
    (canvas, id)
}

fn state(canvas: &Canvas, id: ArtefactId) -> Option<AnimationState> {
    canvas.artefact(id).unwrap().animation().map(|a| a.state())
}

fn frame(count: u64) -> FrameEvent {
    FrameEvent::new(count, count as f64 / 60.0, 1.0 / 60.0)
}

#[test]
fn test_kind_parsing() {
    assert_eq!("rotate".parse::<AnimationKind>(), Ok(AnimationKind::Rotate));
    assert_eq!("Bounce".parse::<AnimationKind>(), Ok(AnimationKind::Bounce));
    assert!("spin".parse::<AnimationKind>().is_err());
    assert_eq!(AnimationKind::Bounce.to_string(), "bounce");
}

#[test]
fn test_bounce_travels_and_returns() {
    let (mut canvas, id) = canvas_with_rect();
    canvas.animate(id, AnimationKind::Bounce).unwrap();
    assert_eq!(state(&canvas, id), Some(AnimationState::Idle));
    assert_eq!(canvas.tick(&frame(0)).unwrap(), 0);

    canvas.start_animation(id).unwrap();
    let node = canvas.artefact(id).unwrap().node();
    let rest = canvas.scene().bounds(node).unwrap();
    for count in 0..5 {
        assert_eq!(canvas.tick(&frame(count)).unwrap(), 1);
    }
    let moved = canvas.scene().bounds(node).unwrap();
    assert!(moved.min_x > rest.min_x);
    assert_eq!(moved.min_y, rest.min_y);
    // the shadow stays at rest while the geometry moves
    assert_eq!(canvas.shadow_bounds(id, 0).unwrap(), rest);

    assert!(canvas.pause_animation(id).unwrap());
    assert_eq!(canvas.tick(&frame(5)).unwrap(), 0);
    assert_eq!(canvas.scene().bounds(node).unwrap(), moved);

    assert!(canvas.stop_animation(id).unwrap());
    assert_eq!(state(&canvas, id), Some(AnimationState::Idle));
    assert_eq!(canvas.scene().bounds(node).unwrap(), rest);
}

#[test]
fn test_invalid_property_update_is_atomic() {
    let (mut canvas, id) = canvas_with_rect();
    canvas.animate(id, AnimationKind::Bounce).unwrap();
    let before = canvas.animation_snapshot(id).unwrap();

    let update = AnimationUpdate::Properties(vec![
        Property::point("target", Point::new(500.0, 500.0)),
        Property::number("speed", 2.0),
    ]);
    assert!(matches!(
        canvas.update_animation(id, &update),
        Err(DesignerError::InvalidProperty { name, .. }) if name == "speed"
    ));
    assert_eq!(canvas.animation_snapshot(id).unwrap(), before);

    let update = AnimationUpdate::Properties(vec![Property::number("wobble", 1.0)]);
    assert!(canvas.update_animation(id, &update).is_err());

    let update = AnimationUpdate::Properties(vec![Property::number("speed", 0.25)]);
    assert!(canvas.update_animation(id, &update).unwrap());
    match canvas.animation_snapshot(id).unwrap().unwrap().properties {
        AnimationProperties::Bounce(props) => assert_eq!(props.speed, 0.25),
        other => panic!("unexpected properties {:?}", other),
    }
}

#[test]
fn test_update_without_animation_reports_false() {
    let (mut canvas, id) = canvas_with_rect();
    let update = AnimationUpdate::Properties(vec![Property::number("speed", 1.0)]);
    assert!(!canvas.update_animation(id, &update).unwrap());
}

#[test]
fn test_snapshot_serializes_kind_tag() {
    let (mut canvas, id) = canvas_with_rect();
    canvas.animate(id, AnimationKind::Rotate).unwrap();
    canvas.start_animation(id).unwrap();
    canvas.tick(&frame(0)).unwrap();

    let snapshot = canvas.animation_snapshot(id).unwrap().unwrap();
    assert!(snapshot.running);
    let json = serde_json::to_string(&snapshot).unwrap();
    assert!(json.contains("\"kind\":\"rotate\""), "{}", json);

    let parsed: AnimationSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);
    assert_eq!(parsed.kind(), AnimationKind::Rotate);
}

#[test]
fn test_set_animation_replaces_kind() {
    let (mut canvas, id) = canvas_with_rect();
    canvas.animate(id, AnimationKind::Rotate).unwrap();
    canvas.start_animation(id).unwrap();
    let rotate = canvas.animation_snapshot(id).unwrap();

    canvas.animate(id, AnimationKind::Bounce).unwrap();
    assert_eq!(
        canvas.artefact(id).unwrap().animation().map(|a| a.kind()),
        Some(AnimationKind::Bounce)
    );
    assert_eq!(state(&canvas, id), Some(AnimationState::Idle));

    canvas.apply_animation(id, rotate.as_ref()).unwrap();
    assert_eq!(state(&canvas, id), Some(AnimationState::Active));

    canvas.apply_animation(id, None).unwrap();
    assert_eq!(state(&canvas, id), None);
}
