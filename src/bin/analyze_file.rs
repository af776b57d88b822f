use serde::Serialize;
use synthscan::api;
use synthscan::models::{AnalysisReport, Modality};

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

/// Guess a modality from the file extension when none was declared.
fn modality_from_extension(path: &str) -> Option<Modality> {
    let ext = std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" | "png" | "webp" | "bmp" | "gif" | "tiff" => Some(Modality::Image),
        "mp4" | "mov" | "mkv" | "avi" => Some(Modality::Video),
        "wav" | "mp3" | "flac" | "ogg" | "m4a" | "aac" => Some(Modality::Audio),
        "txt" | "md" | "rst" => Some(Modality::Text),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage:\n  cargo run --bin analyze_file -- <path> [--modality image|video|audio|text] [--out <json_path>] [--quiet]\n\nNotes:\n  - Without --modality the modality is guessed from the file extension.\n  - SYNTHSCAN_INFERENCE_URL / SYNTHSCAN_API_KEY override the stored config."
        );
        return Ok(());
    }

    if !has_flag(&args, "--quiet") {
        synthscan::init_logging();
    }

    let path = args[1].clone();
    let out_path = parse_arg_value(&args, "--out");

    let modality = match parse_arg_value(&args, "--modality") {
        Some(label) => Modality::parse(&label)
            .ok_or_else(|| format!("unknown modality label: {}", label))?,
        None => modality_from_extension(&path)
            .ok_or_else(|| format!("cannot guess modality for {}; pass --modality", path))?,
    };

    let bytes = std::fs::read(&path).map_err(|e| format!("read file failed: {}", e))?;
    let file_name = std::path::Path::new(&path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.clone());

    println!("File: {}", path);
    println!("Modality: {}", modality.as_str());
    println!("Size: {} bytes", bytes.len());
    println!();

    let report = match modality {
        Modality::Text => {
            let text = String::from_utf8_lossy(&bytes).to_string();
            api::analyze_text(&text).await
        }
        _ => api::analyze_content(modality, &bytes, Some(&file_name)).await,
    };

    match report.error_message() {
        Some(error) => println!("Analysis failed: {}", error),
        None => println!("Fake likelihood: {:.1}%", report.score),
    }
    println!("Request id: {}", report.request_id);

    let details =
        serde_json::to_string_pretty(&report.details).map_err(|e| e.to_string())?;
    println!("Details: {}", details);

    if let Some(out_path) = out_path {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Output {
            file: String,
            modality: String,
            report: AnalysisReport,
        }

        let out = Output {
            file: path.clone(),
            modality: modality.as_str().to_string(),
            report,
        };

        let json = serde_json::to_string_pretty(&out).map_err(|e| e.to_string())?;
        std::fs::write(&out_path, json).map_err(|e| format!("write out failed: {}", e))?;
        println!();
        println!("Wrote JSON: {}", out_path);
    }

    Ok(())
}
