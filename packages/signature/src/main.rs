#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::{
    io::Write as _,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::Parser;
use pmu_config::file::{SignatureConfig, load_signature_config};
use pmu_image::{Color, Encoding};
use pmu_signature::{
    ConfirmError, InvalidCanvasSize, SignatureArtifact, SignaturePad, SignatureSubmitter, SoftwareRasterizer,
    async_trait, drawing::Drawing,
};
use thiserror::Error;

/// Renders a recorded signature drawing (JSON) to an image file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(index = 1)]
    file: String,

    #[arg(short, long)]
    output: String,

    #[arg(short, long)]
    encoding: Option<String>,

    #[arg(short = 'W', long)]
    width: Option<u32>,

    #[arg(short = 'H', long)]
    height: Option<u32>,

    #[arg(long)]
    stroke_width: Option<f32>,

    #[arg(long)]
    color: Option<String>,

    #[arg(long)]
    background: Option<String>,
}

#[tokio::main]
async fn main() {
    let _layer = pmu_logging::init(Some("signature_helper.log")).expect("Failed to init logging");

    let args = Args::parse();

    if let Err(e) = render_drawing_file(args).await {
        log::error!("Failed to render signature: {e}");
        eprintln!("Failed to render signature: {e}");
        std::process::exit(1);
    }
}

#[derive(Error, Debug)]
pub enum RenderDrawingFileError {
    #[error(transparent)]
    Config(#[from] pmu_config::file::ConfigError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Color(#[from] pmu_image::ParseColorError),
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error(transparent)]
    Canvas(#[from] InvalidCanvasSize),
    #[error(transparent)]
    Confirm(#[from] ConfirmError<std::io::Error>),
    #[error(transparent)]
    IO(#[from] std::io::Error),
}

async fn render_drawing_file(args: Args) -> Result<(), RenderDrawingFileError> {
    let config = match load_signature_config() {
        Ok(config) => config,
        Err(pmu_config::file::ConfigError::ConfigDirNotFound) => {
            log::debug!("No config dir, using default signature config");
            SignatureConfig::default()
        }
        Err(e) => return Err(e.into()),
    };
    let config = apply_args(config, &args)?;

    let drawing: Drawing = serde_json::from_str(&std::fs::read_to_string(&args.file)?)?;

    log::debug!(
        "Rendering drawing path={} strokes={} width={} height={} encoding={}",
        args.file,
        drawing.stroke_count(),
        config.canvas_width(),
        config.canvas_height(),
        config.encoding()
    );

    let mut pad = SignaturePad::from_config(&config)?;
    for stroke in drawing.strokes() {
        pad.begin_stroke();
        for point in stroke.points() {
            pad.extend_stroke(*point);
        }
        pad.end_stroke();
    }

    let path = pad
        .confirm(
            &SoftwareRasterizer::from(&config),
            &FileSubmitter(PathBuf::from(&args.output)),
        )
        .await?;

    println!("{}", path.display());

    Ok(())
}

fn apply_args(
    mut config: SignatureConfig,
    args: &Args,
) -> Result<SignatureConfig, RenderDrawingFileError> {
    let encoding = args
        .encoding
        .as_deref()
        .map(|x| {
            parse_encoding(x).ok_or_else(|| RenderDrawingFileError::InvalidEncoding(x.to_string()))
        })
        .transpose()?
        .or_else(|| {
            Path::new(&args.output)
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(Encoding::from_extension)
        });

    if encoding.is_some() {
        config.encoding = encoding;
    }

    let canvas = config.canvas.get_or_insert_with(Default::default);
    canvas.width = args.width.or(canvas.width);
    canvas.height = args.height.or(canvas.height);

    let stroke = config.stroke.get_or_insert_with(Default::default);
    stroke.width = args.stroke_width.or(stroke.width);
    if let Some(color) = &args.color {
        stroke.color = Some(Color::from_str(color)?);
    }

    if let Some(background) = &args.background {
        config.background = Some(Color::from_str(background)?);
    }

    Ok(config)
}

/// Accepts encoding names (`png`, `jpeg`) as well as file extensions (`jpg`).
fn parse_encoding(value: &str) -> Option<Encoding> {
    Encoding::from_str(&value.to_uppercase())
        .ok()
        .or_else(|| Encoding::from_extension(value))
}

/// Writes rasterized signatures to a local file instead of uploading them.
struct FileSubmitter(PathBuf);

#[async_trait]
impl SignatureSubmitter for FileSubmitter {
    type Output = PathBuf;
    type Error = std::io::Error;

    async fn submit(&self, artifact: SignatureArtifact) -> Result<PathBuf, std::io::Error> {
        let SignatureArtifact::Image(image) = artifact else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Drawing has no strokes",
            ));
        };

        if let Some(parent) = self.0.parent().filter(|x| !x.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::File::create(&self.0)?;
        let mut writer = std::io::BufWriter::new(file);
        writer.write_all(&image.bytes)?;
        writer.flush()?;

        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(
            ["signature_helper", "drawing.json", "--output", "out.png"]
                .into_iter()
                .chain(extra.iter().copied()),
        )
    }

    #[test_log::test]
    fn encoding_accepts_names_and_extensions() {
        assert_eq!(parse_encoding("png"), Some(Encoding::Png));
        assert_eq!(parse_encoding("JPEG"), Some(Encoding::Jpeg));
        assert_eq!(parse_encoding("jpg"), Some(Encoding::Jpeg));
        assert_eq!(parse_encoding("gif"), None);
    }

    #[test_log::test]
    fn encoding_flag_overrides_output_extension() {
        let config = apply_args(SignatureConfig::default(), &args(&["-e", "jpg"])).unwrap();
        assert_eq!(config.encoding(), Encoding::Jpeg);

        let config = apply_args(SignatureConfig::default(), &args(&[])).unwrap();
        assert_eq!(config.encoding(), Encoding::Png);
    }

    #[test_log::test]
    fn unknown_encoding_is_rejected() {
        let result = apply_args(SignatureConfig::default(), &args(&["--encoding", "webp"]));

        assert!(matches!(
            result,
            Err(RenderDrawingFileError::InvalidEncoding(x)) if x == "webp"
        ));
    }

    #[test_log::test]
    fn zero_width_is_rejected_before_rendering() {
        let config = apply_args(SignatureConfig::default(), &args(&["-W", "0"])).unwrap();

        assert_eq!(
            SignaturePad::from_config(&config).err(),
            Some(InvalidCanvasSize {
                width: 0,
                height: 150
            })
        );
    }
}
