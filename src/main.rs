//! arscene - headless editor host.
//!
//! Usage: `arscene [config.json] [out.json]`
//!
//! Mounts an editor, declares a text asset, uploads a sample file into the
//! local asset storage, drops both onto the canvas, runs a few sampling
//! ticks and writes the published project JSON to `out.json` or stdout.

use arscene::assets::{AssetKind, LocalStorage, UploadOutcome};
use arscene::scene::serialization::save_project_to_file;
use arscene::scene::DropEvent;
use arscene::{Editor, EditorConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

const CANVAS: [f32; 2] = [800.0, 600.0];

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let out_path = args.next().map(PathBuf::from);

    let config = match &config_path {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    log::info!("arscene editor host");
    log::info!("   storage root: {}", config.storage_root.display());

    let storage = Arc::new(LocalStorage::new(config.storage_root.clone()));
    let mut editor = Editor::new(config);
    let start = Instant::now();
    editor.mount(start);

    let text = editor.add_text_asset();
    editor.begin_drag(&text.id)?;
    let left = DropEvent::new(CANVAS[0] * 0.25, CANVAS[1] * 0.5, CANVAS[0], CANVAS[1]);
    editor.drop_asset(&left);

    editor.begin_upload(
        storage,
        AssetKind::Image,
        "marker.png".to_string(),
        sample_image_bytes(),
    )?;

    let interval = editor.config().sample_interval();
    let mut now = start;
    let mut uploaded = None;
    for _ in 0..250 {
        now += interval;
        for outcome in editor.tick(now) {
            match outcome {
                UploadOutcome::Registered(_, asset) => uploaded = Some(asset),
                UploadOutcome::Failed(_, err) => return Err(err.into()),
            }
        }
        if editor.assets().pending_uploads() == 0 {
            break;
        }
        std::thread::sleep(Duration::from_millis(2));
    }

    match uploaded {
        Some(asset) => {
            editor.begin_drag(&asset.id)?;
            let right = DropEvent::new(CANVAS[0] * 0.75, CANVAS[1] * 0.5, CANVAS[0], CANVAS[1]);
            if let Some(id) = editor.drop_asset(&right) {
                editor.select_pointer(id, now);
            }
        }
        None => log::warn!("Sample upload did not finish; exporting without it"),
    }
    for _ in 0..3 {
        now += interval;
        editor.tick(now);
    }

    let project = editor.export_project(None);
    editor.unmount();
    match out_path {
        Some(path) => {
            save_project_to_file(&project, &path)?;
            log::info!("Wrote {} asset(s) to {}", project.assets.len(), path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&project)?),
    }
    Ok(())
}

/// A 1x1 PNG, enough to exercise the storage path.
fn sample_image_bytes() -> Vec<u8> {
    vec![
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
        0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8,
        0xcf, 0xc0, 0xf0, 0x1f, 0x00, 0x05, 0x00, 0x01, 0xff, 0x89, 0x99, 0x3d, 0x1d, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ]
}
