use drawkit::{config_path, init_logging, load_settings, run_demo};

/// Frames the demo animation runs for.
const DEMO_FRAMES: usize = 90;

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!(
        "DrawKit {} (built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_DATE")
    );

    let path = config_path()?;
    let settings = load_settings(&path)?;
    let report = run_demo(settings, DEMO_FRAMES)?;
    println!("{}", report);
    Ok(())
}
