//! view_lights - interactive scene for the lighting compositors.
//!
//! The lamp follows the mouse; a second, fixed light sits in the corner.
//!
//! | key          | action                                  |
//! |--------------|-----------------------------------------|
//! | arrows       | move the rectangle                      |
//! | `[` / `]`    | fewer / more lamp samples               |
//! | `E`          | toggle exact per-sample shadow alpha    |
//! | `M`          | toggle the dark mask                    |
//! | `H`          | hide / show the fixed light in the mask |
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- --samples 24 --radius 12
//! ```

use clap::Parser;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use std::time::{Duration, Instant};

use lumen2d::{
    color::{Color, get_rgba},
    engine::{DarkMask, Lighting, ShadowAlpha},
    math::vec2,
    renderer::{Surface, SurfaceCache},
    shared,
    world::{LampOptions, Light, LightOptions, Obstacle},
};

const MOVE_STEP: f64 = 4.0;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Window width in pixels
    #[arg(long, default_value_t = 960)]
    width: usize,

    /// Window height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Emission points of the mouse lamp
    #[arg(long, default_value_t = 12)]
    samples: usize,

    /// Radius of the mouse lamp's emitting disc
    #[arg(long, default_value_t = 8.0)]
    radius: f64,

    /// Reach of the mouse lamp
    #[arg(long, default_value_t = 260.0)]
    distance: f64,

    /// Lamp colour (any CSS colour string)
    #[arg(long, default_value = "rgba(250,220,150,0.8)")]
    color: Color,

    /// Colour of the darkness overlay
    #[arg(long, default_value = "rgba(0,0,0,0.9)")]
    dark: Color,

    /// Use 1/n instead of the percent-rounded per-sample shadow alpha
    #[arg(long)]
    exact_alpha: bool,

    /// Frame-rate cap handed to the window
    #[arg(long, default_value_t = 60)]
    fps: usize,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();
    let (w, h) = (opts.width, opts.height);
    log::info!(
        "lamp {} ({} samples, radius {})",
        get_rgba(&opts.color.to_string(), opts.color.a)?,
        opts.samples,
        opts.radius
    );

    /* ----------------------------- scene ------------------------------- */
    let lamp = shared(Light::lamp(
        LightOptions {
            position: vec2(w as f64 / 2.0, h as f64 / 2.0),
            distance: opts.distance,
            ..LightOptions::default()
        },
        LampOptions {
            color: opts.color,
            radius: opts.radius,
            samples: opts.samples,
            ..LampOptions::default()
        },
    ));
    let corner = shared(Light::lamp(
        LightOptions {
            position: vec2(120.0, 120.0),
            distance: 180.0,
            ..LightOptions::default()
        },
        LampOptions {
            color: Color::rgba(120, 180, 255, 0.7),
            angle: -std::f64::consts::FRAC_PI_4,
            roughness: 0.4,
            ..LampOptions::default()
        },
    ));

    let rect = shared(Obstacle::rectangle(vec2(560.0, 300.0), vec2(640.0, 360.0)));
    let objects = vec![
        shared(Obstacle::disc(vec2(300.0, 220.0), 30.0)),
        shared(Obstacle::disc(vec2(700.0, 160.0), 18.0).with_diffuse(0.3)),
        shared(Obstacle::polygon(vec![
            vec2(380.0, 420.0),
            vec2(460.0, 400.0),
            vec2(480.0, 470.0),
            vec2(400.0, 500.0),
        ])),
        shared(Obstacle::line(vec2(200.0, 380.0), vec2(260.0, 520.0))),
        rect.clone(),
    ];

    let alpha = if opts.exact_alpha {
        ShadowAlpha::Exact
    } else {
        ShadowAlpha::Quantized
    };
    let mut lightings = [
        Lighting::new(lamp.clone(), objects.clone()).with_shadow_alpha(alpha),
        Lighting::new(corner.clone(), objects.clone()).with_shadow_alpha(alpha),
    ];
    let mut dark_mask = DarkMask::new(vec![lamp.clone(), corner.clone()]).with_color(opts.dark);
    let mut show_mask = true;

    let mut surfaces = SurfaceCache::new();
    let mut buffer = vec![0u32; w * h];

    let mut win = Window::new("lumen2d", w, h, WindowOptions::default())?;
    win.set_target_fps(opts.fps);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();

        /* ---------------------------- input ------------------------------ */
        if let Some((mx, my)) = win.get_mouse_pos(MouseMode::Clamp) {
            lamp.borrow_mut().position = vec2(mx as f64, my as f64);
        }

        let mut delta = vec2(0.0, 0.0);
        if win.is_key_down(Key::Left) {
            delta.x -= MOVE_STEP;
        }
        if win.is_key_down(Key::Right) {
            delta.x += MOVE_STEP;
        }
        if win.is_key_down(Key::Up) {
            delta.y -= MOVE_STEP;
        }
        if win.is_key_down(Key::Down) {
            delta.y += MOVE_STEP;
        }
        if delta != vec2(0.0, 0.0) {
            rect.borrow_mut().translate(delta);
        }

        if let Some(l) = lamp.borrow_mut().as_lamp_mut() {
            if win.is_key_pressed(Key::LeftBracket, KeyRepeat::Yes) {
                l.samples = l.samples.saturating_sub(1).max(1);
                log::info!("lamp samples: {}", l.samples);
            }
            if win.is_key_pressed(Key::RightBracket, KeyRepeat::Yes) {
                l.samples += 1;
                log::info!("lamp samples: {}", l.samples);
            }
        }

        if win.is_key_pressed(Key::E, KeyRepeat::No) {
            for lighting in &mut lightings {
                lighting.shadow_alpha = match lighting.shadow_alpha {
                    ShadowAlpha::Quantized => ShadowAlpha::Exact,
                    ShadowAlpha::Exact => ShadowAlpha::Quantized,
                };
            }
            log::info!("shadow alpha: {:?}", lightings[0].shadow_alpha);
        }
        if win.is_key_pressed(Key::M, KeyRepeat::No) {
            show_mask = !show_mask;
        }
        if win.is_key_pressed(Key::H, KeyRepeat::No) {
            let mut c = corner.borrow_mut();
            c.hidden = !c.hidden;
        }

        /* ---------------------------- draw ------------------------------- */
        for lighting in &mut lightings {
            lighting.compute(w, h)?;
        }
        if show_mask {
            dark_mask.compute(w, h)?;
        }

        let frame = surfaces.acquire("frame", w, h);
        frame.clear();
        frame.set_fill(Color::rgb(24, 24, 28).into());
        frame.fill_rect(vec2(0.0, 0.0), vec2(w as f64, h as f64));
        for lighting in &lightings {
            lighting.render(frame);
        }
        frame.set_fill(Color::rgb(70, 70, 80).into());
        for o in &objects {
            o.borrow().fill_body(frame)?;
        }
        if show_mask {
            dark_mask.render(frame);
        }

        frame.raster().to_argb(&mut buffer);
        win.update_with_buffer(&buffer, w, h)?;

        // ─────────── accumulate & report every ~3 s ────────────────────
        acc_time += t0.elapsed();
        acc_frames += 1;
        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            let fps = 1000.0 / avg_ms;
            println!("avg frame: {:.2} ms  ({:.1} FPS)", avg_ms, fps);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
