use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use location_report::location::{
    Category, ExportArtifact, LocationRecord, ReportConfig, Session, assemble_deck,
    export_spreadsheet,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Report(#[from] location_report::Error),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid --exclude '{0}'; expected <category>/<filename>")]
    InvalidExclude(String),
    #[error("--exclude '{0}' does not name an uploaded image")]
    UnknownExclude(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "location-report",
    about = "Export a filming-location record as a spreadsheet and a picture deck"
)]
struct Cli {
    /// Location record (YAML)
    record: PathBuf,

    /// What to export
    #[arg(value_enum, default_value_t = Format::All)]
    format: Format,

    /// Report configuration (YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with one sub-directory per category key (thumbs, photos, angles, others, floor, map_img)
    #[arg(long)]
    images: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Leave an uploaded image out of the deck, as <category>/<filename>
    #[arg(long, value_name = "CATEGORY/FILENAME")]
    exclude: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Xlsx,
    Pptx,
    All,
}

fn read(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_text(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Upload every file of `<images>/<category key>/` in filename order.
fn load_images(session: &mut Session, root: &Path) -> Result<(), CliError> {
    for category in Category::ALL {
        let dir = root.join(category.key());
        if !dir.is_dir() {
            continue;
        }

        let entries = std::fs::read_dir(&dir).map_err(|source| CliError::Io {
            path: dir.clone(),
            source,
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CliError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if path.is_file() && !hidden {
                paths.push(path);
            }
        }
        paths.sort();

        let mut files = Vec::with_capacity(paths.len());
        for path in &paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            files.push((name, read(path)?));
        }
        let added = session.add_images(category, files)?;
        info!(category = category.key(), added, "loaded images");
    }
    Ok(())
}

fn apply_exclusions(session: &mut Session, exclusions: &[String]) -> Result<(), CliError> {
    for entry in exclusions {
        let (key, filename) = entry
            .split_once('/')
            .ok_or_else(|| CliError::InvalidExclude(entry.clone()))?;
        let category = key
            .parse::<Category>()
            .map_err(|_| CliError::InvalidExclude(entry.clone()))?;
        if !session.set_inclusion(category, filename, false) {
            return Err(CliError::UnknownExclude(entry.clone()));
        }
    }
    Ok(())
}

fn write(out: &Path, artifact: &ExportArtifact) -> Result<(), CliError> {
    let path = out.join(artifact.file_name);
    std::fs::write(&path, &artifact.bytes).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "wrote file");
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => ReportConfig::from_yaml(&read_text(path)?)?,
        None => ReportConfig::default(),
    };
    let record = LocationRecord::from_yaml(&read_text(&cli.record)?)?;

    let mut session = Session::with_page_size(config.preview_page_size());
    match &cli.images {
        Some(root) => load_images(&mut session, root)?,
        None if cli.format != Format::Xlsx => warn!("no --images directory; the deck will have no pictures"),
        None => {},
    }
    apply_exclusions(&mut session, &cli.exclude)?;

    std::fs::create_dir_all(&cli.out).map_err(|source| CliError::Io {
        path: cli.out.clone(),
        source,
    })?;

    if matches!(cli.format, Format::Xlsx | Format::All) {
        write(&cli.out, &export_spreadsheet(&record)?)?;
    }
    if matches!(cli.format, Format::Pptx | Format::All) {
        write(&cli.out, &assemble_deck(&record, &session, &config)?)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png() -> Vec<u8> {
        let buffer = image::RgbImage::from_pixel(8, 6, image::Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        buffer.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn cli(dir: &Path, format: Format, exclude: Vec<String>) -> Cli {
        Cli {
            record: dir.join("record.yaml"),
            format,
            config: None,
            images: Some(dir.join("images")),
            out: dir.join("out"),
            exclude,
        }
    }

    fn setup() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("record.yaml"), "name: 河川敷\nmain_kind: 自然\nsub_kind: 川\n").unwrap();
        let photos = dir.path().join("images").join("photos");
        std::fs::create_dir_all(&photos).unwrap();
        for name in ["b.png", "a.png", ".hidden"] {
            std::fs::write(photos.join(name), png()).unwrap();
        }
        dir
    }

    #[test]
    fn test_run_writes_both_files() {
        let dir = setup();
        run(cli(dir.path(), Format::All, vec!["photos/a.png".into()])).unwrap();

        let out = dir.path().join("out");
        assert!(out.join("location_data.xlsx").is_file());
        assert!(out.join("location_pictures.pptx").is_file());
    }

    #[test]
    fn test_run_single_format() {
        let dir = setup();
        run(cli(dir.path(), Format::Xlsx, Vec::new())).unwrap();

        let out = dir.path().join("out");
        assert!(out.join("location_data.xlsx").is_file());
        assert!(!out.join("location_pictures.pptx").exists());
    }

    #[test]
    fn test_load_images_in_filename_order() {
        let dir = setup();
        let mut session = Session::new();
        load_images(&mut session, &dir.path().join("images")).unwrap();

        let names: Vec<_> = session
            .images(Category::Photos)
            .iter()
            .map(|e| e.filename())
            .collect();
        assert_eq!(names, ["a.png", "b.png"]);
    }

    #[test]
    fn test_bad_exclusions() {
        let dir = setup();
        assert!(matches!(
            run(cli(dir.path(), Format::Pptx, vec!["photos".into()])),
            Err(CliError::InvalidExclude(_))
        ));
        assert!(matches!(
            run(cli(dir.path(), Format::Pptx, vec!["photos/missing.png".into()])),
            Err(CliError::UnknownExclude(_))
        ));
    }
}
