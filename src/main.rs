//! Hero Particles entry point
//!
//! On the web, mounts the field onto `#hero-canvas`. Natively, runs the
//! pointer sweep headlessly and optionally dumps the busiest frame as PPM.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_host {
    use std::cell::RefCell;

    use hero_particles::platform::web::ParticleField;
    use wasm_bindgen::prelude::*;

    const CANVAS_ID: &str = "hero-canvas";

    thread_local! {
        static MOUNTED: RefCell<Option<ParticleField>> = const { RefCell::new(None) };
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        let mut field = ParticleField::new(CANVAS_ID)?;
        if field.start() {
            log::info!("Hero particles running");
        }
        MOUNTED.with(|m| *m.borrow_mut() = Some(field));
        Ok(())
    }

    /// Tear the field down (view unmount)
    #[wasm_bindgen(js_name = unmountHero)]
    pub fn unmount_hero() {
        // Dropping stops the loop and detaches listeners
        MOUNTED.with(|m| m.borrow_mut().take());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_host::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::error::Error;
    use std::fs::File;
    use std::io::BufWriter;

    use glam::Vec2;
    use hero_particles::consts::BACKGROUND;
    use hero_particles::platform::headless::{self, HeadlessScheduler};
    use hero_particles::renderer::Raster;
    use hero_particles::{FieldConfig, FieldLoop, Viewport};

    const VIEWPORT: Viewport = Viewport::new(800, 600);
    const SWEEP_FRAMES: u32 = 120;
    const SETTLE_FRAMES: u32 = 240;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub fn run(ppm_path: Option<String>) -> Result<(), Box<dyn Error>> {
        let mut lp = FieldLoop::new(
            FieldConfig::load(),
            Some(Raster::default()),
            HeadlessScheduler::default(),
        )?;
        lp.start(VIEWPORT);

        let mut time = 0.0;
        let mut peak = 0.0f32;
        let mut busiest: Option<Raster> = None;

        // Sweep left to right across the middle
        for i in 0..SWEEP_FRAMES {
            let t = i as f32 / (SWEEP_FRAMES - 1) as f32;
            lp.pointer_moved(Vec2::new(100.0 + 600.0 * t, 300.0));
            headless::pump(&mut lp, time);
            time += FRAME_MS;

            let displacement = lp.field().max_displacement();
            if displacement > peak {
                peak = displacement;
                busiest = lp.surface().cloned();
            }
            if i % 20 == 0 {
                log::info!("frame {:>3}: max displacement {:.2}", i, displacement);
            }
        }

        lp.pointer_left();
        for _ in 0..SETTLE_FRAMES {
            headless::pump(&mut lp, time);
            time += FRAME_MS;
        }
        let residual = lp.field().max_displacement();
        lp.stop();

        log::info!(
            "{} frames, peak displacement {:.2}, residual {:.5}",
            lp.frames(),
            peak,
            residual
        );

        if let (Some(path), Some(raster)) = (ppm_path, busiest) {
            raster.write_ppm(BufWriter::new(File::create(&path)?), BACKGROUND)?;
            log::info!("Wrote busiest frame to {}", path);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hero Particles (native) starting...");
    log::info!("Native mode renders headlessly - use `trunk serve` for the canvas version");

    if let Err(e) = demo::run(std::env::args().nth(1)) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
