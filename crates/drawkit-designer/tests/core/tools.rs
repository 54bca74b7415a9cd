use drawkit_core::{Bounds, Corner, Modifiers, Point, PointerEvent, SceneAdapter};
use drawkit_designer::animation::{AnimationKind, AnimationProperties};
use drawkit_designer::overlay::HandleRole;
use drawkit_designer::session::Session;
use drawkit_designer::tools::{Tool, ToolKind};
use drawkit_designer::ArtefactId;

fn gesture(session: &mut Session, from: Point, to: Point, modifiers: Modifiers) {
    session
        .pointer_down(&PointerEvent::down(from).with_modifiers(modifiers))
        .unwrap();
    session
        .pointer_drag(&PointerEvent::moved(from, from, to).with_modifiers(modifiers))
        .unwrap();
    session
        .pointer_up(&PointerEvent::moved(from, to, to).with_modifiers(modifiers))
        .unwrap();
}

fn drag(session: &mut Session, from: Point, to: Point) {
    gesture(session, from, to, Modifiers::NONE);
}

fn draw_rect(session: &mut Session, from: Point, to: Point) -> ArtefactId {
    session.activate_tool("rectangle").unwrap();
    drag(session, from, to);
    session.activate_tool("select").unwrap();
    session.selected()[0]
}

#[test]
fn test_draw_undo_redo() {
    let mut session = Session::default();
    let id = draw_rect(
        &mut session,
        Point::new(20.0, 30.0),
        Point::new(120.0, 170.0),
    );
    let drawn = Bounds::from_rect(20.0, 30.0, 100.0, 140.0);
    assert_eq!(session.canvas().shadow_bounds(id, 0).unwrap(), drawn);
    assert_eq!(session.undo_description(), Some("Create"));
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().index(), 1);

    assert!(session.undo().unwrap());
    assert!(session.canvas().top_level().is_empty());
    assert!(session.canvas().is_destroyed(id));
    assert!(!session.can_undo());
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().index(), 0);

    assert!(session.redo().unwrap());
    assert_eq!(session.canvas().top_level(), vec![id]);
    assert_eq!(session.canvas().shadow_bounds(id, 0).unwrap(), drawn);
    assert_eq!(session.history().index(), 1);
    assert!(!session.can_redo());
}

#[test]
fn test_drawing_after_undo_frees_the_undone_shape() {
    let mut session = Session::default();
    let first = draw_rect(&mut session, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
    let node = session.canvas().artefact(first).unwrap().node();
    session.undo().unwrap();
    assert!(session.canvas().scene().contains(node));

    let second = draw_rect(&mut session, Point::new(50.0, 0.0), Point::new(90.0, 40.0));
    assert!(!session.canvas().scene().contains(node));
    assert_eq!(session.canvas().top_level(), vec![second]);
    assert_eq!(session.history().len(), 1);
    assert!(!session.can_redo());
}

#[test]
fn test_draw_tool_stays_armed() {
    let mut session = Session::default();
    session.activate_tool("circle").unwrap();
    drag(&mut session, Point::new(50.0, 50.0), Point::new(70.0, 50.0));
    drag(&mut session, Point::new(150.0, 50.0), Point::new(150.0, 80.0));
    assert!(matches!(session.tool(), Tool::CircleDraw(_)));
    assert_eq!(session.armed_tool(), ToolKind::Circle);
    assert_eq!(session.canvas().top_level().len(), 2);

    let second = session.selected()[0];
    assert_eq!(
        session.canvas().shadow_bounds(second, 0).unwrap(),
        Bounds::new(120.0, 20.0, 180.0, 80.0)
    );
}

#[test]
fn test_tiny_drag_draws_nothing() {
    let mut session = Session::default();
    session.activate_tool("rectangle").unwrap();
    drag(&mut session, Point::new(10.0, 10.0), Point::new(11.0, 40.0));
    assert!(session.canvas().top_level().is_empty());
    assert!(!session.can_undo());
    // the preview outline is gone
    assert_eq!(session.canvas().scene().len(), Session::default().canvas().scene().len());
}

#[test]
fn test_bottom_right_handle_drag() {
    let mut session = Session::default();
    let id = draw_rect(
        &mut session,
        Point::new(20.0, 30.0),
        Point::new(120.0, 170.0),
    );
    let role = HandleRole::Corner(Corner::BottomRight);
    let handle = session
        .canvas()
        .artefact(id)
        .unwrap()
        .overlay()
        .unwrap()
        .handle(role)
        .unwrap()
        .position;
    assert_eq!(handle, Point::new(132.0, 182.0));

    session.pointer_down(&PointerEvent::down(handle)).unwrap();
    assert!(matches!(session.tool(), Tool::Manipulate(_)));
    let to = handle + Point::new(10.0, 10.0);
    session
        .pointer_drag(&PointerEvent::moved(handle, handle, to))
        .unwrap();
    session
        .pointer_up(&PointerEvent::moved(handle, to, to))
        .unwrap();
    assert!(matches!(session.tool(), Tool::Select));

    let resized = Bounds::from_rect(20.0, 30.0, 110.0, 150.0);
    assert_eq!(session.canvas().shadow_bounds(id, 0).unwrap(), resized);
    let handle = session
        .canvas()
        .artefact(id)
        .unwrap()
        .overlay()
        .unwrap()
        .handle(role)
        .unwrap()
        .position;
    assert_eq!(handle, Point::new(142.0, 192.0));

    assert_eq!(session.undo_description(), Some("Resize"));
    session.undo().unwrap();
    assert_eq!(
        session.canvas().shadow_bounds(id, 0).unwrap(),
        Bounds::from_rect(20.0, 30.0, 100.0, 140.0)
    );
}

#[test]
fn test_drag_moves_selection_as_one_step() {
    let mut session = Session::default();
    let id = draw_rect(&mut session, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
    drag(&mut session, Point::new(20.0, 20.0), Point::new(50.0, 30.0));
    assert_eq!(
        session.canvas().shadow_bounds(id, 0).unwrap(),
        Bounds::new(30.0, 10.0, 70.0, 50.0)
    );
    assert_eq!(session.history().len(), 2);
    session.undo().unwrap();
    assert_eq!(
        session.canvas().shadow_bounds(id, 0).unwrap(),
        Bounds::new(0.0, 0.0, 40.0, 40.0)
    );
}

#[test]
fn test_click_without_moving_registers_nothing() {
    let mut session = Session::default();
    draw_rect(&mut session, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
    let p = Point::new(20.0, 20.0);
    session.pointer_down(&PointerEvent::down(p)).unwrap();
    session.pointer_up(&PointerEvent::moved(p, p, p)).unwrap();
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_empty_click_clears_selection_and_marquee_selects() {
    let mut session = Session::default();
    let a = draw_rect(&mut session, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
    let b = draw_rect(&mut session, Point::new(100.0, 0.0), Point::new(140.0, 40.0));
    let c = draw_rect(&mut session, Point::new(300.0, 0.0), Point::new(340.0, 40.0));
    assert_eq!(session.selected(), vec![c]);

    let from = Point::new(-10.0, -10.0);
    session.pointer_down(&PointerEvent::down(from)).unwrap();
    assert!(matches!(session.tool(), Tool::RectSelect(_)));
    assert!(session.selected().is_empty());
    let to = Point::new(120.0, 20.0);
    session
        .pointer_drag(&PointerEvent::moved(from, from, to))
        .unwrap();
    session.pointer_up(&PointerEvent::moved(from, to, to)).unwrap();

    assert_eq!(session.selected(), vec![a, b]);
    assert_eq!(session.history().len(), 3);
}

#[test]
fn test_additive_click_toggles() {
    let mut session = Session::default();
    let a = draw_rect(&mut session, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
    let b = draw_rect(&mut session, Point::new(100.0, 0.0), Point::new(140.0, 40.0));
    let shift = Modifiers::shift();
    let on_a = Point::new(20.0, 20.0);
    gesture(&mut session, on_a, on_a, shift);
    assert_eq!(session.selected(), vec![a, b]);
    gesture(&mut session, on_a, on_a, shift);
    assert_eq!(session.selected(), vec![b]);
}

#[test]
fn test_additive_click_on_empty_canvas_clears_selection() {
    let mut session = Session::default();
    let a = draw_rect(&mut session, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
    session.select_only(&[a]).unwrap();
    let empty = Point::new(200.0, 200.0);
    gesture(&mut session, empty, empty, Modifiers::shift());
    assert!(session.selected().is_empty());
    assert!(matches!(session.tool(), Tool::Select));
}

#[test]
fn test_alt_drag_clones() {
    let mut session = Session::default();
    let original = draw_rect(&mut session, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
    gesture(
        &mut session,
        Point::new(20.0, 20.0),
        Point::new(120.0, 20.0),
        Modifiers::alt(),
    );
    let top = session.canvas().top_level();
    assert_eq!(top.len(), 2);
    let copy = top[1];
    assert_eq!(session.selected(), vec![copy]);
    assert_eq!(
        session.canvas().shadow_bounds(original, 0).unwrap(),
        Bounds::new(0.0, 0.0, 40.0, 40.0)
    );
    assert_eq!(
        session.canvas().shadow_bounds(copy, 0).unwrap(),
        Bounds::new(100.0, 0.0, 140.0, 40.0)
    );
    assert_eq!(session.undo_description(), Some("Clone"));

    session.undo().unwrap();
    assert_eq!(session.canvas().top_level(), vec![original]);
    session.redo().unwrap();
    assert_eq!(
        session.canvas().shadow_bounds(copy, 0).unwrap(),
        Bounds::new(100.0, 0.0, 140.0, 40.0)
    );
}

#[test]
fn test_tweak_moves_rotation_center() {
    let mut session = Session::default();
    let id = draw_rect(&mut session, Point::new(0.0, 0.0), Point::new(40.0, 40.0));
    session.animate(&[id], AnimationKind::Rotate).unwrap();
    let center = Point::new(20.0, 20.0);
    let to = Point::new(60.0, 20.0);

    session.pointer_down(&PointerEvent::down(center)).unwrap();
    assert!(matches!(session.tool(), Tool::Tweak(_)));
    session
        .pointer_drag(&PointerEvent::moved(center, center, to))
        .unwrap();
    session.pointer_up(&PointerEvent::moved(center, to, to)).unwrap();

    let snapshot = session.canvas().animation_snapshot(id).unwrap().unwrap();
    match snapshot.properties {
        AnimationProperties::Rotate(props) => assert!(props.center.approx_eq(&to, 1e-9)),
        other => panic!("unexpected properties {:?}", other),
    }
    assert_eq!(session.undo_description(), Some("Animate"));
    // the rectangle itself did not move
    assert_eq!(
        session.canvas().shadow_bounds(id, 0).unwrap(),
        Bounds::new(0.0, 0.0, 40.0, 40.0)
    );

    session.undo().unwrap();
    let snapshot = session.canvas().animation_snapshot(id).unwrap().unwrap();
    match snapshot.properties {
        AnimationProperties::Rotate(props) => assert!(props.center.approx_eq(&center, 1e-9)),
        other => panic!("unexpected properties {:?}", other),
    }
}
