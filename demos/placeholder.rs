//! Minimal showcase with no model requested: renders the built-in
//! placeholder sphere with the default rig and scroll at zero.

use vitrine::*;

fn main() {
    env_logger::init();

    run(|_ctx| {
        move |frame| {
            let scroll = frame.scroll() - frame.input.scroll_delta().y * 0.05;
            frame.set_scroll(scroll.clamp(0.0, 1.0));
        }
    });
}
