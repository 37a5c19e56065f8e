//! End-to-end lifecycle of the broadcast facade over the software motion
//! engine: real timeline, deterministic clock, style values observed on the
//! actual element handles.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use ovation_core::{ElementHandle, Host, with_motion_engine};
use ovation_motion::{SoftwareMotion, TestClock};
use ovation_widget::{Clap, ClapCount, ClapIcon, ClapTotal, ClapView, InteractionState};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Mounted {
    view: ClapView,
    trigger: ElementHandle,
    delta: ElementHandle,
    total: ElementHandle,
}

fn render(
    host: &mut Host,
    engine: Rc<SoftwareMotion>,
    notifications: Rc<RefCell<Vec<InteractionState>>>,
) -> Mounted {
    let handles: Rc<RefCell<Option<(ElementHandle, ElementHandle)>>> =
        Rc::new(RefCell::new(None));

    let handles2 = handles.clone();
    let view = host
        .render(move || {
            with_motion_engine(engine, || {
                Clap::new()
                    .initial(InteractionState::with_total(267))
                    .on_clap(move |state| notifications.borrow_mut().push(state))
                    .show(move || {
                        ClapIcon();
                        let delta = ClapCount().handle;
                        let total = ClapTotal().handle;
                        *handles2.borrow_mut() = Some((delta, total));
                    })
            })
        })
        .unwrap();

    let (delta, total) = handles.borrow_mut().take().unwrap();
    Mounted {
        trigger: view.trigger.clone(),
        view,
        delta,
        total,
    }
}

#[test]
fn click_plays_the_full_choreography() {
    init_logging();
    let clock = Rc::new(TestClock::new());
    let engine = Rc::new(SoftwareMotion::new(clock.clone()));
    let notifications = Rc::new(RefCell::new(Vec::new()));
    let mut host = Host::new();

    let mounted = render(&mut host, engine.clone(), notifications.clone());
    assert_eq!(engine.live_timelines(), 1);
    assert!(!mounted.view.timeline.is_running());

    mounted.view.click();
    assert_eq!(mounted.view.state().count_total, 268);

    // Replay snapped everything to t=0 synchronously.
    assert_eq!(mounted.trigger.style().transform.scale_x, 1.3);
    assert_eq!(mounted.delta.style().opacity, 0.0);
    assert_eq!(engine.particles().len(), 10); // two bursts, five each

    // Pulse lands after one base duration.
    clock.advance(ms(300));
    engine.tick();
    assert!((mounted.trigger.style().transform.scale_x - 1.0).abs() < 1e-4);
    assert!((mounted.delta.style().opacity - 1.0).abs() < 1e-4);
    assert!((mounted.delta.style().transform.translate_y - -30.0).abs() < 1e-4);

    // Ring fully expanded: triangle particles sit 95 from the origin.
    let max_dist = engine
        .particles()
        .iter()
        .map(|p| (p.offset.x * p.offset.x + p.offset.y * p.offset.y).sqrt())
        .fold(0.0f32, f32::max);
    assert!((max_dist - 95.0).abs() < 1e-3);

    // Total reveal finishes at 2.5 base durations.
    clock.advance(ms(450));
    engine.tick();
    assert!((mounted.total.style().opacity - 1.0).abs() < 1e-4);
    assert!((mounted.total.style().transform.translate_y - -3.0).abs() < 1e-4);

    // Delta has fully risen and faded out by now.
    assert!((mounted.delta.style().opacity - 0.0).abs() < 1e-4);
    assert!((mounted.delta.style().transform.translate_y - -80.0).abs() < 1e-4);

    // Slowed burst children keep the timeline alive past the tweens.
    assert!(mounted.view.timeline.is_running());
    clock.advance(ms(1000));
    assert!(!engine.tick());
    assert!(!mounted.view.timeline.is_running());
}

#[test]
fn second_click_restarts_from_the_top() {
    init_logging();
    let clock = Rc::new(TestClock::new());
    let engine = Rc::new(SoftwareMotion::new(clock.clone()));
    let notifications = Rc::new(RefCell::new(Vec::new()));
    let mut host = Host::new();

    let mounted = render(&mut host, engine.clone(), notifications.clone());

    mounted.view.click();
    clock.advance(ms(200));
    engine.tick();
    let mid_flight = mounted.trigger.style().transform.scale_x;
    assert!(mid_flight < 1.3);

    mounted.view.click();
    assert_eq!(mounted.trigger.style().transform.scale_x, 1.3);
    // No rebuild happened; the same composed timeline restarted.
    assert_eq!(engine.live_timelines(), 1);
}

#[test]
fn unmount_then_remount_starts_a_fresh_widget() {
    init_logging();
    let clock = Rc::new(TestClock::new());
    let engine = Rc::new(SoftwareMotion::new(clock.clone()));
    let notifications = Rc::new(RefCell::new(Vec::new()));
    let mut host = Host::new();

    let mounted = render(&mut host, engine.clone(), notifications.clone());
    for _ in 0..3 {
        mounted.view.click();
    }
    let mounted = render(&mut host, engine.clone(), notifications.clone());
    assert_eq!(mounted.view.state().count, 3);
    assert_eq!(notifications.borrow().len(), 1);

    host.unmount();
    assert_eq!(engine.live_timelines(), 0);

    let before = notifications.borrow().len();
    let mounted = render(&mut host, engine.clone(), notifications.clone());
    assert_eq!(
        mounted.view.state(),
        InteractionState::with_total(267) // prior viewer's claps are gone
    );
    assert!(!mounted.view.state().is_activated);
    assert_eq!(notifications.borrow().len(), before);
    assert_eq!(engine.live_timelines(), 1);
}
