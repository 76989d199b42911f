#[cfg(test)]
mod tests {
    use crate::COMPOSER;
    use crate::Color;
    use crate::Rect;
    use crate::Vec2;
    use crate::locals::*;
    use crate::scope::*;
    use crate::signal::*;
    use crate::{
        Frame, HitRegion, Role, Scene, Scheduler, SemNode, View, ViewKind, remember,
        remember_with_key, reset_composition,
    };
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);
    }

    #[test]
    fn test_signal_subscription() {
        let sig = signal(0);
        let seen = Rc::new(Cell::new(0));

        let seen_clone = seen.clone();
        sig.subscribe(move |v| seen_clone.set(*v));

        sig.set(42);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn test_signal_subscriber_can_read_back() {
        let sig = signal(String::from("a"));
        let echoed = Rc::new(RefCell::new(String::new()));

        let (s, e) = (sig.clone(), echoed.clone());
        sig.subscribe(move |_| *e.borrow_mut() = s.get());

        sig.set("b".into());
        assert_eq!(*echoed.borrow(), "b");
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(Cell::new(false));

        let scope = Scope::new();
        let cleaned_up_clone = cleaned_up.clone();
        scope.add_disposer(move || cleaned_up_clone.set(true));

        assert!(!cleaned_up.get());
        scope.dispose();
        assert!(cleaned_up.get());
    }

    #[test]
    fn test_scope_disposes_children_first() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let parent = Scope::new();
        let child = parent.child();

        let o = order.clone();
        parent.add_disposer(move || o.borrow_mut().push("parent"));
        let o = order.clone();
        child.add_disposer(move || o.borrow_mut().push("child"));

        parent.dispose();
        assert_eq!(*order.borrow(), vec!["child", "parent"]);
    }

    #[test]
    fn test_key_based_remember() {
        COMPOSER.with(|c| c.borrow_mut().keyed_slots.clear());

        let val1 = remember_with_key("test", || 42);
        let val2 = remember_with_key("test", || 100);

        assert_eq!(*val1, 42);
        assert_eq!(*val2, 42);
    }

    #[test]
    fn test_slot_remember_survives_recomposition() {
        reset_composition();
        let mut sched = Scheduler::new();
        let count = Rc::new(RefCell::new(None::<Signal<u32>>));

        let compose = |sched: &mut Scheduler, count: &Rc<RefCell<Option<Signal<u32>>>>| {
            let count = count.clone();
            sched
                .repose(
                    move |_| {
                        let c = remember(|| signal(0u32));
                        *count.borrow_mut() = Some((*c).clone());
                        View::new(0, ViewKind::Box)
                    },
                    |_, _| Ok::<_, ()>((Scene::default(), Vec::new(), Vec::new())),
                )
                .map(|_| ())
        };

        assert!(compose(&mut sched, &count).is_ok());
        if let Some(c) = count.borrow().as_ref() {
            c.set(7);
        }
        assert!(compose(&mut sched, &count).is_ok());
        assert_eq!(count.borrow().as_ref().map(|c| c.get()), Some(7));

        reset_composition();
        assert!(compose(&mut sched, &count).is_ok());
        assert_eq!(count.borrow().as_ref().map(|c| c.get()), Some(0));
    }

    #[test]
    fn test_repose_disposes_previous_scope() {
        let disposed = Rc::new(Cell::new(0));
        let mut sched = Scheduler::new();
        for _ in 0..3 {
            let d = disposed.clone();
            let frame: Result<Frame, ()> = sched.repose(
                move |_| {
                    let d = d.clone();
                    on_dispose(move || d.set(d.get() + 1));
                    View::new(0, ViewKind::Box)
                },
                |_, _| Ok((Scene::default(), Vec::new(), Vec::new())),
            );
            assert!(frame.is_ok());
        }
        assert_eq!(disposed.get(), 2);
    }

    #[test]
    fn test_repose_collects_focus_chain() {
        let mut sched = Scheduler::new();
        let frame: Result<Frame, ()> = sched.repose(
            |_| View::new(0, ViewKind::Box),
            |_, _| {
                let region = |id, focusable| HitRegion {
                    id,
                    rect: Rect::default(),
                    on_click: None,
                    on_scroll: None,
                    focusable,
                    on_text_change: None,
                    text: None,
                    text_inset: 0.0,
                };
                let sem = SemNode {
                    id: 2,
                    role: Role::TextField,
                    label: Some("Search Places".into()),
                    rect: Rect::default(),
                    focused: false,
                    enabled: true,
                };
                Ok((
                    Scene::default(),
                    vec![region(1, false), region(2, true)],
                    vec![sem],
                ))
            },
        );
        let frame = frame.unwrap();
        assert_eq!(frame.focus_chain, vec![2]);
        assert_eq!(frame.semantics_by_label("Search Places").map(|n| n.id), Some(2));
        assert!(frame.hit(1).is_some());
    }

    #[test]
    fn test_repose_propagates_layout_error() {
        let mut sched = Scheduler::new();
        let frame = sched.repose(|_| View::new(0, ViewKind::Box), |_, _| Err("boom"));
        assert!(matches!(frame, Err("boom")));
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF5733");
        assert_eq!(c, Color(255, 87, 51, 255));

        let c_alpha = Color::from_hex("#FF5733AA");
        assert_eq!(c_alpha, Color(255, 87, 51, 170));

        assert_eq!(Color::from_hex("#zz"), Color::BLACK);
    }

    #[test]
    fn test_color_from_argb() {
        assert_eq!(Color::from_argb(0xFF6C63FF), Color(0x6C, 0x63, 0xFF, 255));
        assert_eq!(Color::from_argb(0x808E44AD), Color(0x8E, 0x44, 0xAD, 0x80));
    }

    #[test]
    fn test_default_theme_palette() {
        let th = theme();
        assert_eq!(th.primary, Color::from_hex("#6C63FF"));
        assert_eq!(th.field, Color::from_hex("#F6F6F6"));
        assert_eq!(th.muted, Color::from_hex("#888888"));
        assert_eq!(th.outline, Color::from_hex("#CCCCCC"));
        assert_eq!(th.tab_selected, Color::from_hex("#8E44AD"));
        assert_eq!(th.shape_small, 8.0);
        assert_eq!(th.shape_medium, 12.0);
    }

    #[test]
    fn test_density_nesting() {
        assert_eq!(dp_to_px(10.0), 10.0);
        with_density(Density { scale: 2.0 }, || {
            assert_eq!(dp_to_px(10.0), 20.0);
            with_text_scale(TextScale(1.5), || {
                assert_eq!(sp_to_px(10.0), 30.0);
                assert_eq!(dp_to_px(10.0), 20.0);
            });
        });
        assert_eq!(dp_to_px(10.0), 10.0);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 70.0 }));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect {
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 100.0,
        };
        let b = Rect {
            x: 50.0,
            y: 80.0,
            w: 100.0,
            h: 100.0,
        };
        assert_eq!(
            a.intersect(&b),
            Some(Rect {
                x: 50.0,
                y: 80.0,
                w: 50.0,
                h: 20.0
            })
        );
        assert_eq!(a.intersect(&b.translate(200.0, 0.0)), None);
    }
}
