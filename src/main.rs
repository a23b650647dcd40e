//! Headless demo: bring up a double-buffered display on a memory output
//! device, open a client window and composite one frame.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tenaya::core::{Display, DisplayFlags, WindowFlags};
use tenaya::gfx::{BitmapAlloc, MemGc, NullHooks, Point, Rect};

/// Demo configuration.
struct DemoConfig {
    width: i32,
    height: i32,
    flags: DisplayFlags,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            flags: DisplayFlags::DOUBLE_BUFFERED,
        }
    }
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "tenaya=debug");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(
            "%H:%M:%S%.3f".to_string(),
        ))
        .init();

    let config = DemoConfig::default();
    let rect = Rect::new(0, 0, config.width, config.height);
    let device_alloc = BitmapAlloc::for_rect(&rect);
    let device = MemGc::new(rect, device_alloc, Box::new(NullHooks));

    let shared = Display::new(config.flags).into_shared();
    let mut disp = shared.lock().unwrap();

    disp.add_ddev(rect, Box::new(device))?;
    let seat = disp.add_seat("default");

    let client = disp.add_client();
    let wnd = disp.create_window(
        client,
        Rect::new(0, 0, 400, 300),
        Point::new(100, 100),
        WindowFlags::empty(),
    );
    disp.set_seat_focus(seat, Some(wnd));
    disp.paint(None)?;

    info!(
        "composited desktop {} with window {} focused",
        disp.rect(),
        wnd
    );
    Ok(())
}
