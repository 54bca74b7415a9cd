use drawkit_core::{Bounds, Color, Corner, Point, PointerEvent};
use drawkit_designer::animation::AnimationKind;
use drawkit_designer::canvas::{Canvas, HitTarget};
use drawkit_designer::overlay::HandleRole;
use drawkit_designer::DesignerError;

fn fill() -> Color {
    Color::rgb(0.2, 0.4, 0.8)
}

#[test]
fn test_select_is_idempotent() {
    let mut canvas: Canvas = Canvas::default();
    let id = canvas
        .draw_rectangle(&Bounds::new(0.0, 0.0, 40.0, 40.0), fill())
        .unwrap();
    let before = canvas.scene().len();

    assert!(canvas.select(id).unwrap());
    let with_overlay = canvas.scene().len();
    assert!(with_overlay > before);

    assert!(!canvas.select(id).unwrap());
    assert_eq!(canvas.scene().len(), with_overlay);
    assert_eq!(canvas.selected(), vec![id]);

    assert!(canvas.deselect(id).unwrap());
    assert!(!canvas.deselect(id).unwrap());
    assert_eq!(canvas.scene().len(), before);
    assert!(canvas.artefact(id).unwrap().overlay().is_none());
}

#[test]
fn test_destroyed_artefact_is_reported() {
    let mut canvas: Canvas = Canvas::default();
    let id = canvas
        .draw_circle(Point::new(50.0, 50.0), 10.0, fill())
        .unwrap();
    let detached = canvas.destroy(id).unwrap();
    assert!(canvas.is_destroyed(id));
    assert_eq!(canvas.artefact(id).unwrap_err(), DesignerError::Destroyed(id));
    assert_eq!(canvas.select(id), Err(DesignerError::Destroyed(id)));
    assert_eq!(canvas.hit(Point::new(50.0, 50.0)).unwrap(), HitTarget::None);

    assert_eq!(canvas.restore(detached).unwrap(), id);
    assert!(!canvas.is_destroyed(id));
    assert_eq!(
        canvas.hit(Point::new(50.0, 50.0)).unwrap(),
        HitTarget::Artefact(id)
    );
}

#[test]
fn test_nested_artefacts_cannot_be_selected() {
    let mut canvas: Canvas = Canvas::default();
    let a = canvas
        .draw_rectangle(&Bounds::new(0.0, 0.0, 10.0, 10.0), fill())
        .unwrap();
    let b = canvas
        .draw_rectangle(&Bounds::new(20.0, 0.0, 30.0, 10.0), fill())
        .unwrap();
    let group = canvas.group(&[a, b]).unwrap().unwrap();
    assert_eq!(canvas.select(a), Err(DesignerError::NotTopLevel(a)));
    assert_eq!(canvas.top_level_of(b).unwrap(), group);
    assert_eq!(
        canvas.hit(Point::new(25.0, 5.0)).unwrap(),
        HitTarget::Artefact(group)
    );
}

#[test]
fn test_foreign_handle_is_rejected() {
    let mut canvas: Canvas = Canvas::default();
    let id = canvas
        .draw_circle(Point::new(50.0, 50.0), 10.0, fill())
        .unwrap();
    let role = HandleRole::Corner(Corner::TopLeft);
    let event = PointerEvent::down(Point::new(0.0, 0.0));
    assert_eq!(
        canvas.manipulate(id, &event, role),
        Err(DesignerError::ForeignHandle { artefact: id, role })
    );
}

#[test]
fn test_selected_artefact_only_accepts_its_own_handles() {
    let mut canvas: Canvas = Canvas::default();
    let id = canvas
        .draw_circle(Point::new(50.0, 50.0), 10.0, fill())
        .unwrap();
    canvas.select(id).unwrap();
    let overlay = canvas.artefact(id).unwrap().overlay().unwrap();
    assert!(overlay.handle(HandleRole::Scale).is_some());
    assert!(Corner::ALL
        .iter()
        .all(|c| overlay.handle(HandleRole::Corner(*c)).is_none()));

    for corner in Corner::ALL {
        let role = HandleRole::Corner(corner);
        let event = PointerEvent::down(Point::new(40.0, 40.0));
        assert_eq!(
            canvas.manipulate(id, &event, role),
            Err(DesignerError::ForeignHandle { artefact: id, role })
        );
    }
    assert_eq!(canvas.shadow_bounds(id, 0).unwrap().width(), 20.0);
}

#[test]
fn test_manipulate_is_refused_while_animating() {
    let mut canvas: Canvas = Canvas::default();
    let bounds = Bounds::new(0.0, 0.0, 40.0, 40.0);
    let id = canvas.draw_rectangle(&bounds, fill()).unwrap();
    canvas.animate(id, AnimationKind::Bounce).unwrap();
    assert!(canvas.start_animation(id).unwrap());

    let from = Point::new(52.0, 52.0);
    let to = Point::new(62.0, 62.0);
    let event = PointerEvent::moved(from, from, to);
    let role = HandleRole::Corner(Corner::BottomRight);
    assert!(!canvas.manipulate(id, &event, role).unwrap());
    assert_eq!(canvas.shadow_bounds(id, 0).unwrap(), bounds);

    assert!(canvas.stop_animation(id).unwrap());
    assert!(canvas.manipulate(id, &event, role).unwrap());
    assert_eq!(
        canvas.shadow_bounds(id, 0).unwrap(),
        Bounds::new(0.0, 0.0, 50.0, 50.0)
    );
}

#[test]
fn test_circle_scale_handle_keeps_center() {
    let mut canvas: Canvas = Canvas::default();
    let center = Point::new(100.0, 100.0);
    let id = canvas.draw_circle(center, 20.0, fill()).unwrap();
    // the scale handle sits on the border, half a margin outside the circle
    let from = Point::new(126.0, 100.0);
    let to = Point::new(152.0, 100.0);
    assert!(canvas
        .manipulate(id, &PointerEvent::moved(from, from, to), HandleRole::Scale)
        .unwrap());

    let bounds = canvas.shadow_bounds(id, 0).unwrap();
    assert!(bounds.center().approx_eq(&center, 1e-9));
    assert!((bounds.width() - 80.0).abs() < 1e-9);
}
