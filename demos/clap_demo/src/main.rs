//! Headless walkthrough of the clap control: mounts the broadcast facade
//! over the software motion engine, claps a few times, and prints the state
//! transitions and animation frames a renderer would draw.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use ovation_core::{Host, with_motion_engine};
use ovation_motion::{SoftwareMotion, TestClock};
use ovation_widget::{Clap, ClapCount, ClapIcon, ClapTotal, ClapView, InteractionState};

const FRAME: Duration = Duration::from_millis(100);

fn mount(host: &mut Host, engine: Rc<SoftwareMotion>) -> Result<ClapView> {
    let view = host.render(move || {
        with_motion_engine(engine, || {
            Clap::new()
                .initial(InteractionState::with_total(267))
                .on_clap(|state| {
                    println!(
                        "  -> clapped! count={} total={}",
                        state.count, state.count_total
                    );
                })
                .show(|| {
                    let icon = ClapIcon();
                    let count = ClapCount();
                    let total = ClapTotal();
                    println!(
                        "  render: [{}] {} / {} (activated: {})",
                        if icon.is_activated { "x" } else { " " },
                        count.text,
                        total.text,
                        icon.is_activated,
                    );
                })
        })
    })?;
    Ok(view)
}

fn main() -> Result<()> {
    env_logger::init();

    let clock = Rc::new(TestClock::new());
    let engine = Rc::new(SoftwareMotion::new(clock.clone()));
    let mut host = Host::new();

    println!("mounting (267 claps so far):");
    let view = Rc::new(RefCell::new(mount(&mut host, engine.clone())?));

    for clap in 1..=3 {
        println!("\nclap #{clap}:");
        view.borrow().click();
        *view.borrow_mut() = mount(&mut host, engine.clone())?;

        let trigger = view.borrow().trigger.clone();
        let mut elapsed = Duration::ZERO;
        loop {
            clock.advance(FRAME);
            elapsed += FRAME;
            let running = engine.tick();
            let style = trigger.style();
            println!(
                "  t+{:>4}ms  scale={:.3}  particles={}",
                elapsed.as_millis(),
                style.transform.scale_x,
                engine.particles().len(),
            );
            if !running {
                break;
            }
        }
    }

    let state = view.borrow().state();
    println!(
        "\ndone: count={} total={} activated={}",
        state.count, state.count_total, state.is_activated
    );

    host.unmount();
    log::info!("unmounted; live timelines: {}", engine.live_timelines());
    Ok(())
}
