//! File inspection commands (info, extract, frames)

use std::path::Path;
use std::process::ExitCode;

use crate::codec::act::ActHeader;
use crate::codec::{pal, spr};
use crate::swatch::save_png;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Sprite,
    Palette,
    Action,
}

fn file_kind(path: &Path) -> Option<FileKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "spr" => Some(FileKind::Sprite),
        "pal" => Some(FileKind::Palette),
        "act" => Some(FileKind::Action),
        _ => None,
    }
}

/// Execute the info command
pub fn run_info(file: &Path, json: bool) -> ExitCode {
    let Some(kind) = file_kind(file) else {
        eprintln!("Error: {} is not a .spr, .pal or .act file", file.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    };

    let summary = match kind {
        FileKind::Sprite => spr::load(file).map(|sprite| {
            serde_json::json!({
                "kind": "sprite",
                "version": sprite.version.to_string(),
                "rgba_images": sprite.rgba_count,
                "frames": sprite.frames.iter().map(|f| serde_json::json!({
                    "width": f.width,
                    "height": f.height,
                })).collect::<Vec<_>>(),
                "transparent": sprite.palette.entry(0).color.to_hex(),
            })
        }),
        FileKind::Palette => pal::load(file).map(|palette| {
            serde_json::json!({
                "kind": "palette",
                "colors": palette.iter().map(|c| c.to_hex()).collect::<Vec<_>>(),
            })
        }),
        FileKind::Action => ActHeader::load(file).map(|header| {
            serde_json::json!({
                "kind": "action",
                "version": format!("{}.{}", header.major, header.minor),
                "actions": header.action_count,
            })
        }),
    };

    let summary = match summary {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    println!("{}", file.display());
    match kind {
        FileKind::Sprite => {
            println!("  Version: {}", summary["version"].as_str().unwrap_or("?"));
            println!("  RGBA images: {}", summary["rgba_images"]);
            let frames = summary["frames"].as_array().map(Vec::as_slice).unwrap_or(&[]);
            println!("  Frames: {}", frames.len());
            for (k, frame) in frames.iter().enumerate() {
                println!("    {}: {}x{}", k, frame["width"], frame["height"]);
            }
        }
        FileKind::Palette => {
            let colors = summary["colors"].as_array().map(Vec::as_slice).unwrap_or(&[]);
            for row in colors.chunks(8) {
                let line: Vec<&str> = row.iter().filter_map(|c| c.as_str()).collect();
                println!("  {}", line.join(" "));
            }
        }
        FileKind::Action => {
            println!("  Version: {}", summary["version"].as_str().unwrap_or("?"));
            println!("  Actions: {}", summary["actions"]);
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the extract command
pub fn run_extract(sprite: &Path, output: Option<&Path>) -> ExitCode {
    let output = output.map(Path::to_path_buf).unwrap_or_else(|| sprite.with_extension("pal"));
    let palette = match spr::load_palette(sprite) {
        Ok(embedded) => embedded.to_palette(),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(e) = pal::save(&output, palette.colors()) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Wrote {}", output.display());
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the frames command
pub fn run_frames(sprite: &Path, output: &Path) -> ExitCode {
    let sprite = match spr::load(sprite) {
        Ok(sprite) => sprite,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    for (k, frame) in sprite.frames.iter().enumerate() {
        let path = output.join(format!("frame_{}.png", k));
        if let Err(e) = save_png(&frame.to_rgba(&sprite.palette), &path) {
            eprintln!("Error: failed to write {}: {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    }
    println!("Wrote {} frames to {}", sprite.frames.len(), output.display());
    ExitCode::from(EXIT_SUCCESS)
}
