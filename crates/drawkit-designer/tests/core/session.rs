use drawkit_core::{
    Bounds, FrameEvent, KeyEvent, Modifiers, Point, PointerEvent, Scene, SceneAdapter,
};
use drawkit_designer::animation::{AnimationKind, AnimationState};
use drawkit_designer::session::Session;
use drawkit_designer::{ArtefactId, DesignerError};
use drawkit_settings::Settings;

fn rect(session: &mut Session, x: f64, y: f64, w: f64, h: f64) -> ArtefactId {
    let from = Point::new(x, y);
    let to = Point::new(x + w, y + h);
    session.activate_tool("rectangle").unwrap();
    session.pointer_down(&PointerEvent::down(from)).unwrap();
    session
        .pointer_up(&PointerEvent::moved(from, from, to))
        .unwrap();
    session.activate_tool("select").unwrap();
    session.selected()[0]
}

#[test]
fn test_group_ungroup_round_trip_keeps_positions() {
    let mut session = Session::default();
    let a = rect(&mut session, 0.0, 0.0, 40.0, 40.0);
    let b = rect(&mut session, 100.0, 50.0, 20.0, 30.0);
    let group = session.group(&[a, b]).unwrap().unwrap();
    assert_eq!(session.selected(), vec![group]);
    assert_eq!(
        session.canvas().shadow_bounds(group, 1).unwrap(),
        Bounds::new(0.0, 0.0, 120.0, 80.0)
    );

    assert_eq!(session.canvas().artefact(group).unwrap().children(), &[a, b]);
    assert_eq!(session.canvas().artefact(a).unwrap().parent(), Some(group));

    session.ungroup(&[group]).unwrap();
    assert_eq!(session.canvas().top_level(), vec![a, b]);
    assert_eq!(session.selected(), vec![a, b]);
    assert_eq!(
        session.canvas().world_shadow_bounds(a).unwrap(),
        Bounds::new(0.0, 0.0, 40.0, 40.0)
    );
    assert_eq!(
        session.canvas().world_shadow_bounds(b).unwrap(),
        Bounds::new(100.0, 50.0, 120.0, 80.0)
    );

    // undo ungroup, then undo group
    session.undo().unwrap();
    assert_eq!(session.canvas().top_level(), vec![group]);
    session.undo().unwrap();
    assert_eq!(session.canvas().top_level(), vec![a, b]);
    assert!(session.canvas().is_destroyed(group));
}

#[test]
fn test_group_undo_restores_draw_order() {
    let mut session = Session::default();
    let a = rect(&mut session, 0.0, 0.0, 40.0, 40.0);
    let b = rect(&mut session, 20.0, 20.0, 40.0, 40.0);
    let c = rect(&mut session, 40.0, 40.0, 40.0, 40.0);

    let group = session.group(&[a, c]).unwrap().unwrap();
    assert_eq!(session.canvas().top_level().len(), 2);
    assert!(session.canvas().top_level().contains(&b));

    session.undo().unwrap();
    assert_eq!(session.canvas().top_level(), vec![a, b, c]);
    assert!(session.canvas().is_destroyed(group));

    session.redo().unwrap();
    assert_eq!(session.canvas().artefact(group).unwrap().children(), &[a, c]);
    session.undo().unwrap();
    assert_eq!(session.canvas().top_level(), vec![a, b, c]);
}

#[test]
fn test_undo_animate_resumes_running_animation() {
    let mut session = Session::default();
    let id = rect(&mut session, 0.0, 0.0, 40.0, 40.0);
    let state = |s: &Session| {
        s.canvas()
            .artefact(id)
            .unwrap()
            .animation()
            .map(|a| a.state())
    };
    session.animate(&[id], AnimationKind::Rotate).unwrap();
    session.start_animations(&[id]).unwrap();
    session.advance(0.5).unwrap();

    session.animate(&[id], AnimationKind::Rotate).unwrap();
    assert_eq!(state(&session), Some(AnimationState::Idle));

    session.undo().unwrap();
    assert_eq!(state(&session), Some(AnimationState::Active));
    assert_eq!(session.advance(1.0 / 60.0).unwrap(), 1);
}

#[test]
fn test_moved_group_bakes_offset_into_children() {
    let mut session = Session::default();
    let a = rect(&mut session, 0.0, 0.0, 40.0, 40.0);
    let b = rect(&mut session, 100.0, 0.0, 40.0, 40.0);
    let group = session.group(&[a, b]).unwrap().unwrap();
    session.handle_key(&KeyEvent::new("Escape", Modifiers::NONE)).unwrap();
    session.select_only(&[group]).unwrap();

    let from = Point::new(20.0, 20.0);
    let to = Point::new(30.0, 25.0);
    session.pointer_down(&PointerEvent::down(from)).unwrap();
    session
        .pointer_drag(&PointerEvent::moved(from, from, to))
        .unwrap();
    session.pointer_up(&PointerEvent::moved(from, to, to)).unwrap();

    assert_eq!(
        session.canvas().world_shadow_bounds(a).unwrap(),
        Bounds::new(10.0, 5.0, 50.0, 45.0)
    );
    session.ungroup(&[group]).unwrap();
    assert!(session
        .canvas()
        .world_shadow_bounds(b)
        .unwrap()
        .approx_eq(&Bounds::new(110.0, 5.0, 150.0, 45.0), 1e-9));
    assert!(session
        .canvas()
        .shadow_bounds(b, 0)
        .unwrap()
        .approx_eq(&Bounds::new(110.0, 5.0, 150.0, 45.0), 1e-9));
}

#[test]
fn test_clone_is_independent() {
    let mut session = Session::default();
    let original = rect(&mut session, 0.0, 0.0, 40.0, 40.0);
    let copies = session.clone_artefacts(&[original]).unwrap();
    let copy = copies[0];
    assert_ne!(copy, original);
    assert_ne!(
        session.canvas().artefact(copy).unwrap().node(),
        session.canvas().artefact(original).unwrap().node()
    );

    session.swatches_mut().set_active(2).unwrap();
    session.recolor(&[copy]).unwrap();
    assert_eq!(
        session.canvas().fills(original).unwrap(),
        vec![(original, Some(Settings::default().default_fill()))]
    );

    session.delete(&[original]).unwrap();
    assert_eq!(session.canvas().top_level(), vec![copy]);
    assert_eq!(
        session.canvas().shadow_bounds(copy, 0).unwrap(),
        Bounds::new(0.0, 0.0, 40.0, 40.0)
    );
}

#[test]
fn test_clone_starts_copied_animation() {
    let mut session = Session::default();
    let original = rect(&mut session, 0.0, 0.0, 40.0, 40.0);
    session.animate(&[original], AnimationKind::Bounce).unwrap();
    let copy = session.clone_artefacts(&[original]).unwrap()[0];
    let state = |s: &Session, id| {
        s.canvas()
            .artefact(id)
            .unwrap()
            .animation()
            .map(|a| a.state())
    };
    assert_eq!(state(&session, original), Some(AnimationState::Idle));
    assert_eq!(state(&session, copy), Some(AnimationState::Active));
    assert_eq!(session.tick(&FrameEvent::new(0, 0.0, 0.0)).unwrap(), 1);
}

#[test]
fn test_bounds_invariant_under_rotation() {
    let mut session = Session::default();
    let a = rect(&mut session, 20.0, 30.0, 100.0, 140.0);
    let b = rect(&mut session, 200.0, 30.0, 40.0, 40.0);
    let group = session.group(&[a, b]).unwrap().unwrap();
    session.animate(&[group], AnimationKind::Rotate).unwrap();
    session.start_animations(&[group]).unwrap();

    let before = session.canvas().shadow_bounds(group, 2).unwrap();
    let child_before = session.canvas().shadow_bounds(a, 0).unwrap();
    for _ in 0..45 {
        session.advance(1.0 / 60.0).unwrap();
        assert!(session
            .canvas()
            .shadow_bounds(group, 2)
            .unwrap()
            .approx_eq(&before, 1e-9));
        assert_eq!(session.canvas().shadow_bounds(a, 0).unwrap(), child_before);
    }
    let node = session.canvas().artefact(group).unwrap().node();
    assert!(!session.canvas().scene().bounds(node).unwrap().approx_eq(&before, 1e-3));

    assert_eq!(session.stop_animations(&[group]).unwrap(), 1);
    assert!(session
        .canvas()
        .scene()
        .bounds(node)
        .unwrap()
        .approx_eq(&before, 1e-6));
}

#[test]
fn test_resize_refused_while_animating() {
    let mut session = Session::default();
    let id = rect(&mut session, 0.0, 0.0, 40.0, 40.0);
    session.animate(&[id], AnimationKind::Rotate).unwrap();
    session.start_animations(&[id]).unwrap();
    let handle = Point::new(52.0, 52.0);
    let to = Point::new(70.0, 70.0);
    session.pointer_down(&PointerEvent::down(handle)).unwrap();
    session
        .pointer_drag(&PointerEvent::moved(handle, handle, to))
        .unwrap();
    session.pointer_up(&PointerEvent::moved(handle, to, to)).unwrap();
    assert_eq!(
        session.canvas().shadow_bounds(id, 0).unwrap(),
        Bounds::new(0.0, 0.0, 40.0, 40.0)
    );
    assert_eq!(session.undo_description(), Some("Animate"));
}

#[test]
fn test_history_capacity_from_settings() {
    let mut settings = Settings::default();
    settings.history.capacity = 3;
    let mut session = Session::new(Scene::new(), settings);
    for i in 0..5 {
        rect(&mut session, i as f64 * 50.0, 0.0, 40.0, 40.0);
    }
    assert_eq!(session.history().len(), 3);
    let mut undone = 0;
    while session.undo().unwrap() {
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(session.canvas().top_level().len(), 2);
}

#[test]
fn test_unknown_action_and_tool() {
    let mut session = Session::default();
    assert_eq!(
        session.invoke_action("explode"),
        Err(DesignerError::UnknownAction("explode".to_string()))
    );
    assert_eq!(
        session.activate_tool("lasso"),
        Err(DesignerError::UnknownTool("lasso".to_string()))
    );
}

#[test]
fn test_delete_key_and_undo_restore_animation() {
    let mut session = Session::default();
    let id = rect(&mut session, 0.0, 0.0, 40.0, 40.0);
    session.animate(&[id], AnimationKind::Rotate).unwrap();
    session.start_animations(&[id]).unwrap();
    session.advance(1.0).unwrap();

    assert!(session.handle_key(&KeyEvent::new("Delete", Modifiers::NONE)).unwrap());
    assert!(session.canvas().top_level().is_empty());
    session.undo().unwrap();
    assert_eq!(session.canvas().top_level(), vec![id]);
    let animation = session.canvas().artefact(id).unwrap().animation().unwrap();
    assert_eq!(animation.state(), AnimationState::Active);
    assert_eq!(
        session.canvas().shadow_bounds(id, 0).unwrap(),
        Bounds::new(0.0, 0.0, 40.0, 40.0)
    );
}
