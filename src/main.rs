//! toi2d native demo
//!
//! Runs a demo world on a fixed 60 Hz clock and logs where everything is.
//! Usage: `toi2d [settings.json] [two-body|drop|scatter] [seconds]`

use toi2d::consts::PIXELS_PER_METER;
use toi2d::renderer::extract_frame;
use toi2d::scenario::{self, Scenario};
use toi2d::sim::{Body, Boundary, CollisionEvent, Simulator, vec};
use toi2d::{Result, SimSettings};

const FRAME_DT: f64 = 1.0 / 60.0;

fn main() {
    env_logger::init();
    log::info!("toi2d (native) starting...");

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    let settings = match args.next() {
        Some(path) if path != "-" => SimSettings::load(path)?,
        _ => SimSettings::default(),
    };
    let world = args.next().unwrap_or_else(|| "two-body".to_string());
    let seconds: f64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10.0);

    let Scenario { bodies, boundary } = match world.as_str() {
        "drop" => scenario::single_drop(800, 600)?,
        "scatter" => scenario::scatter(0x5eed, 16, Boundary::new(0.0, 160.0, 0.0, 90.0)?)?,
        _ => scenario::two_body()?,
    };
    log::info!("World '{}' with {} bodies for {}s", world, bodies.len(), seconds);

    let mut sim = Simulator::with_settings(bodies, boundary, settings)?;
    let frames = (seconds / FRAME_DT).round() as u64;
    let mut contacts = 0usize;

    for frame in 1..=frames {
        sim.step(FRAME_DT);
        contacts += sim
            .events()
            .iter()
            .filter(|e| !matches!(e, CollisionEvent::Wall { .. }))
            .count();

        if frame % 60 == 0 {
            let positions: Vec<_> = sim.bodies().iter().map(Body::position).collect();
            let centroid = vec::average(&positions).unwrap_or_default();
            log::info!(
                "t={:.2}s  energy={:.3}  contacts={}  centroid=({:.2}, {:.2})",
                sim.elapsed(),
                sim.kinetic_energy(),
                contacts,
                centroid.x,
                centroid.y
            );
            for (i, body) in sim.bodies().iter().enumerate() {
                let p = body.position();
                let v = body.velocity();
                log::debug!("  body {}: pos=({:.3}, {:.3}) vel=({:.3}, {:.3})", i, p.x, p.y, v.x, v.y);
            }
        }
    }

    let frame = extract_frame(&sim, PIXELS_PER_METER);
    println!(
        "Simulated {:.2}s: {} circles, {} lines, {} body contacts",
        sim.elapsed(),
        frame.circles.len(),
        frame.lines.len(),
        contacts
    );
    Ok(())
}
