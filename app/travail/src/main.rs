#[cfg(not(target_os = "android"))]
fn main() -> anyhow::Result<()> {
    use travail_platform::{DesktopOptions, run_desktop_app};

    env_logger::init();
    run_desktop_app(
        DesktopOptions {
            title: "Travail".into(),
            assets_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/assets").into(),
            ..Default::default()
        },
        travail::app,
    )
}

#[cfg(target_os = "android")]
fn main() {}
