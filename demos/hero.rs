//! Full hero-section showcase: wheel scrolling drives the specimen yaw,
//! `V` toggles section visibility, dragging with the left mouse button
//! orbits the specimen inside its bounds, and Enter/Space activates the
//! hero CTA (here: advancing the scroll model a quarter of the way).
//!
//! Pass a path to an STL file to show your own model:
//!
//! ```sh
//! cargo run --example hero -- path/to/model.stl
//! ```

use std::cell::Cell;
use std::rc::Rc;
use vitrine::*;

fn main() {
    env_logger::init();

    let model_path = std::env::args().nth(1);

    run_with_config(
        ShowcaseConfig::new().title("Vitrine Hero").size(1280, 720),
        move |ctx| {
            if let Some(path) = &model_path {
                ctx.model(path.clone());
            }

            // The "page scroll position", shared with the activation CTA.
            let scroll = Rc::new(Cell::new(0.0f32));
            let cta_scroll = Rc::clone(&scroll);
            ctx.on_activate(move || {
                cta_scroll.set((cta_scroll.get() + 0.25).min(1.0));
                log::info!("activated, scroll -> {:.2}", cta_scroll.get());
            });

            let mut visible = true;

            move |frame| {
                // Wheel scroll maps onto the page's normalized progress.
                let wheel = frame.input.scroll_delta().y;
                if wheel != 0.0 {
                    scroll.set((scroll.get() - wheel * 0.05).clamp(0.0, 1.0));
                }
                frame.set_scroll(scroll.get());

                // Simulate the section scrolling in and out of view.
                if frame.input.key_pressed(KeyCode::KeyV) {
                    visible = !visible;
                }
                frame.set_visible(visible);
            }
        },
    );
}
