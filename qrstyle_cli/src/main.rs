mod logging;
mod settings;

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use qrstyle_core::{Ecl, QrCode, Version};
use qrstyle_encode::Encoder;
use qrstyle_render::{
    save_png, AsciiRenderer, Color, Fill, FinderShape, Logo, ModuleShape, Renderer,
};

use settings::Settings;

#[derive(Parser)]
#[command(name = "qrstyle_cli")]
#[command(version)]
#[command(about = "Render QR codes with rounded modules and an embedded logo", long_about = None)]
struct Cli {
    #[arg(help = "Text to encode, or stdin if unspecified")]
    text: Option<String>,
    #[arg(
        short,
        long,
        help = "Output file or stdout if unspecified",
        long_help = "Output file or stdout if unspecified. The output format is determined based on the extension. \
        Supported extensions are:\n\
        * text: .txt\n\
        * images: .png"
    )]
    output: Option<PathBuf>,
    #[arg(short, long, help = "Image to embed at the center of the code")]
    logo: Option<PathBuf>,
    #[arg(short, long, help = "TOML settings file; options given on the command line take precedence")]
    settings: Option<PathBuf>,
    #[arg(long, help = "Smallest symbol version (1-40); bigger ones are used if needed")]
    min_version: Option<Version>,
    #[arg(long, value_enum, help = "Error correction level")]
    ecl: Option<EclArg>,
    #[arg(long, help = "Side of a module in pixels")]
    module_size: Option<u32>,
    #[arg(long, help = "Quiet zone around the code, in modules")]
    border: Option<u32>,
    #[arg(long, help = "Extra background pixels around the image")]
    margin: Option<u32>,
    #[arg(long, value_enum, help = "Shape of the modules")]
    shape: Option<ShapeArg>,
    #[arg(
        long,
        requires = "shape",
        help = "Parameter of the shape: gap size, circle padding, corner radius or bar shrink ratio"
    )]
    shape_ratio: Option<f32>,
    #[arg(long, value_enum, help = "Shape of the finder patterns")]
    finder: Option<FinderArg>,
    #[arg(long, help = "Foreground color, as #rrggbb or #rrggbbaa")]
    foreground: Option<Color>,
    #[arg(long, help = "Background color, as #rrggbb or #rrggbbaa")]
    background: Option<Color>,
    #[arg(long, help = "Also print the code as text to stdout")]
    preview: bool,
    #[arg(short, long, help = "Log debug information")]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum EclArg {
    L,
    M,
    Q,
    H,
}

impl From<EclArg> for Ecl {
    fn from(value: EclArg) -> Self {
        match value {
            EclArg::L => Ecl::L,
            EclArg::M => Ecl::M,
            EclArg::Q => Ecl::Q,
            EclArg::H => Ecl::H,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Square,
    Gapped,
    Circle,
    Rounded,
    VerticalBars,
    HorizontalBars,
}

impl ShapeArg {
    fn with_ratio(self, ratio: Option<f32>) -> ModuleShape {
        let shape = match self {
            ShapeArg::Square => ModuleShape::Square,
            ShapeArg::Gapped => ModuleShape::GAPPED_SQUARE,
            ShapeArg::Circle => ModuleShape::CIRCLE,
            ShapeArg::Rounded => ModuleShape::ROUNDED,
            ShapeArg::VerticalBars => ModuleShape::VERTICAL_BARS,
            ShapeArg::HorizontalBars => ModuleShape::HORIZONTAL_BARS,
        };
        let Some(ratio) = ratio else {
            return shape;
        };
        match shape {
            ModuleShape::Square => shape,
            ModuleShape::GappedSquare { .. } => ModuleShape::GappedSquare { size_ratio: ratio },
            ModuleShape::Circle { .. } => ModuleShape::Circle {
                padding_ratio: ratio,
            },
            ModuleShape::Rounded { .. } => ModuleShape::Rounded {
                radius_ratio: ratio,
            },
            ModuleShape::VerticalBars { .. } => ModuleShape::VerticalBars {
                horizontal_shrink: ratio,
            },
            ModuleShape::HorizontalBars { .. } => ModuleShape::HorizontalBars {
                vertical_shrink: ratio,
            },
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FinderArg {
    Standard,
    Circle,
}

impl From<FinderArg> for FinderShape {
    fn from(value: FinderArg) -> Self {
        match value {
            FinderArg::Standard => FinderShape::Standard,
            FinderArg::Circle => FinderShape::Circle,
        }
    }
}

enum Output {
    Stdout,
    Text(PathBuf),
    Png(PathBuf),
}

fn determine_output_kind(path: Option<PathBuf>) -> Result<Output> {
    let Some(path) = path else {
        return Ok(Output::Stdout);
    };
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("txt") => Ok(Output::Text(path)),
        Some("png") => Ok(Output::Png(path)),
        Some(invalid) => Err(anyhow::Error::msg(format!(
            "invalid output extension '{}'",
            invalid
        ))),
        None => Err(anyhow::Error::msg("requested output has no extension")),
    }
}

/// Load the settings file, if any, and apply the command line on top of it.
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(version) = cli.min_version {
        settings.min_version = version;
    }
    if let Some(ecl) = cli.ecl {
        settings.ecl = ecl.into();
    }
    let style = &mut settings.style;
    if let Some(module_size) = cli.module_size {
        style.module_size = module_size;
    }
    if let Some(border) = cli.border {
        style.border = border;
    }
    if let Some(margin) = cli.margin {
        style.margin = margin;
    }
    if let Some(shape) = cli.shape {
        style.shape = shape.with_ratio(cli.shape_ratio);
    }
    if let Some(finder) = cli.finder {
        style.finder = finder.into();
    }
    if let Some(color) = cli.foreground {
        style.foreground = Fill::from(color);
    }
    if let Some(color) = cli.background {
        style.background = color;
    }
    style.validate()?;
    Ok(settings)
}

fn read_input(text: Option<&str>) -> Result<Vec<u8>> {
    if let Some(text) = text {
        return Ok(text.as_bytes().to_vec());
    }
    let mut bytes = Vec::new();
    std::io::stdin().read_to_end(&mut bytes)?;
    // Drop the newline most shells and pipes append.
    let len = bytes.trim_ascii_end().len();
    bytes.truncate(len);
    Ok(bytes)
}

fn write_text<W: Write>(writer: &mut W, code: &QrCode, settings: &Settings) -> Result<()> {
    AsciiRenderer::new()
        .with_border(settings.style.border as usize)
        .render(writer, code)?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    // Before doing anything, make sure the requested output is valid.
    let output = determine_output_kind(cli.output.clone())?;
    let settings = resolve_settings(&cli)?;

    let data = read_input(cli.text.as_deref())?;
    let code = Encoder::new()
        .with_version_in(settings.min_version..)
        .with_ecl(settings.ecl)
        .encode(&data)?;
    info!(
        version = %code.version(),
        ecl = %code.ecl(),
        "encoded {} B, up to {}% of the symbol can be covered",
        data.len(),
        code.ecl().recovery_percent()
    );

    if cli.preview && matches!(output, Output::Png(_)) {
        write_text(&mut std::io::stdout().lock(), &code, &settings)?;
    }
    match output {
        Output::Stdout => {
            if cli.logo.is_some() {
                warn!("the logo is ignored for text output");
            }
            write_text(&mut std::io::stdout().lock(), &code, &settings)?;
        }
        Output::Text(path) => {
            if cli.logo.is_some() {
                warn!("the logo is ignored for text output");
            }
            let mut writer = BufWriter::new(File::create(&path)?);
            write_text(&mut writer, &code, &settings)?;
            info!("text saved to {}", path.display());
        }
        Output::Png(path) => {
            let logo = cli.logo.as_deref().map(Logo::open).transpose()?;
            let renderer = Renderer::new(settings.style)?;
            let image = renderer.render(&code, logo.as_ref())?;
            save_png(&image, &path)?;
            info!(
                width = image.width(),
                height = image.height(),
                "QR code saved to {}",
                path.display()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_output_kind() {
        assert!(matches!(determine_output_kind(None), Ok(Output::Stdout)));
        assert!(matches!(
            determine_output_kind(Some("qr.png".into())),
            Ok(Output::Png(_))
        ));
        assert!(matches!(
            determine_output_kind(Some("qr.txt".into())),
            Ok(Output::Text(_))
        ));
        assert!(determine_output_kind(Some("qr.jpg".into())).is_err());
        assert!(determine_output_kind(Some("qr".into())).is_err());
    }

    #[test]
    fn test_command_line_overrides_defaults() {
        let cli = Cli::parse_from([
            "qrstyle_cli",
            "hello",
            "--min-version",
            "2",
            "--ecl",
            "q",
            "--shape",
            "rounded",
            "--shape-ratio",
            "0.5",
            "--foreground",
            "#112233",
        ]);
        let settings = resolve_settings(&cli).unwrap();
        assert_eq!(settings.min_version.number(), 2);
        assert_eq!(settings.ecl, Ecl::Q);
        assert_eq!(
            settings.style.shape,
            ModuleShape::Rounded { radius_ratio: 0.5 }
        );
        assert_eq!(settings.style.foreground, Fill::from(Color::rgb(0x11, 0x22, 0x33)));
        assert_eq!(settings.style.module_size, 20);
    }

    #[test]
    fn test_oversized_module_is_rejected() {
        let cli = Cli::parse_from(["qrstyle_cli", "--module-size", "536870911"]);
        assert!(resolve_settings(&cli).is_err());
        let cli = Cli::parse_from(["qrstyle_cli", "--margin", "0"]);
        assert_eq!(resolve_settings(&cli).unwrap().style.margin, 0);
    }

    #[test]
    fn test_shape_ratio_requires_shape() {
        assert!(Cli::try_parse_from(["qrstyle_cli", "--shape-ratio", "0.5"]).is_err());
    }

    #[test]
    fn test_cli_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
