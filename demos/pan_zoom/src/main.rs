use argh::FromArgs;
use glam::DVec2;

use canvas_transform::{Transform, TransformError};

/// Discrete zoom change per unit of scroll amount.
const ZOOM_FACTOR: f64 = 1.1;

/// Discrete angle change per unit of scroll amount, in degrees.
const ROTATE_UNIT_DEG: f64 = 10.0;

#[derive(FromArgs)]
/// Replay pan/zoom/rotate pointer interactions against a 2D canvas transform
struct Args {
    /// scroll amount applied as zoom, in wheel units (default: 2)
    #[argh(option, short = 'z', default = "2.0")]
    zoom_scroll: f64,

    /// scroll amount applied as rotation, in wheel units (default: 1)
    #[argh(option, short = 'r', default = "1.0")]
    rotate_scroll: f64,

    /// cursor x position in window coordinates (default: 120)
    #[argh(option, short = 'x', default = "120.0")]
    cursor_x: f64,

    /// cursor y position in window coordinates (default: 80)
    #[argh(option, short = 'y', default = "80.0")]
    cursor_y: f64,

    /// drag delta x in window pixels (default: 15)
    #[argh(option, default = "15.0")]
    pan_dx: f64,

    /// drag delta y in window pixels (default: -10)
    #[argh(option, default = "-10.0")]
    pan_dy: f64,
}

/// Zooms about the cursor point: the point under the cursor stays fixed.
fn scroll_to_zoom(
    transform: &mut Transform,
    amount: f64,
    cursor_window: DVec2,
) -> Result<(), TransformError> {
    if amount == 0.0 {
        return Ok(());
    }
    let factor = ZOOM_FACTOR.powf(amount);

    // Cursor location in data coordinates, the center of the zoom.
    let cursor_data = transform.inverted()?.transform_point(cursor_window)?;

    transform.translate(cursor_data)?;
    transform.scale_uniform(factor)?;
    transform.translate(-cursor_data)?;

    log::info!("zoom x{factor:.3} about {cursor_data:.3?}");
    Ok(())
}

/// Rotates about the cursor point.
fn scroll_to_rotate(
    transform: &mut Transform,
    amount: f64,
    cursor_window: DVec2,
) -> Result<(), TransformError> {
    if amount == 0.0 {
        return Ok(());
    }
    let angle = (amount * ROTATE_UNIT_DEG).to_radians();

    let cursor_data = transform.inverted()?.transform_point(cursor_window)?;
    transform.rotate_about(angle, cursor_data)?;

    log::info!("rotate {angle:.3} rad about {cursor_data:.3?}");
    Ok(())
}

/// Pans by a window-space drag delta, mapped into data coordinates through
/// the inverse transform (delta as a vector: the inverse's translation is
/// subtracted back out).
fn drag_to_pan(
    transform: &mut Transform,
    delta_window: DVec2,
) -> Result<(), TransformError> {
    let inverse = transform.inverted()?;
    let base = inverse.transform_point(DVec2::ZERO)?;
    let delta_data = inverse.transform_point(delta_window)? - base;

    transform.translate(delta_data)?;

    log::info!("pan by {delta_data:.3?}");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let cursor = DVec2::new(args.cursor_x, args.cursor_y);
    let mut transform = Transform::new();

    scroll_to_zoom(&mut transform, args.zoom_scroll, cursor)?;
    scroll_to_rotate(&mut transform, args.rotate_scroll, cursor)?;
    drag_to_pan(&mut transform, DVec2::new(args.pan_dx, args.pan_dy))?;

    println!("values: {:?}", transform.values());
    println!(
        "decomposition: {}",
        serde_json::to_string_pretty(&transform.decomposition()?)?
    );

    Ok(())
}
