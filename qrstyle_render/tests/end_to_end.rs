use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use itertools::iproduct;

use qrstyle_core::{Ecl, QrCode, Version};
use qrstyle_encode::Encoder;
use qrstyle_render::{placement, save_png, Color, Fill, Logo, ModuleShape, Renderer, Style};

const URL: &str = "https://example.com/";
const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const LOGO_COLOR: Rgba<u8> = Rgba([220, 40, 40, 255]);

fn encode(data: &str) -> QrCode {
    Encoder::new()
        .with_version_in(Version::new(4).unwrap()..)
        .with_ecl(Ecl::H)
        .encode(data)
        .unwrap()
}

fn logo() -> Logo {
    Logo::from(RgbaImage::from_pixel(40, 20, LOGO_COLOR))
}

fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_default_render_of_url() {
    let code = encode(URL);
    assert_eq!(code.version().number(), 4);

    let dir = tempfile::tempdir().unwrap();
    let logo_path = dir.path().join("logo.png");
    save_png(&RgbaImage::from_pixel(310, 150, LOGO_COLOR), &logo_path).unwrap();
    let logo = Logo::open(&logo_path).unwrap();

    let renderer = Renderer::new(Style::default()).unwrap();
    let image = renderer.render(&code, Some(&logo)).unwrap();
    assert_eq!(image.dimensions(), (820, 820));

    // The logo is visible and centered.
    let at = placement(820, 20, &renderer.style().logo).unwrap();
    assert_eq!(image.get_pixel(at.x + at.width / 2, at.y + at.height / 2), &LOGO_COLOR);
    assert_eq!(image.get_pixel(at.x, at.y), &BACKGROUND);
    assert!(at.x.abs_diff(820 - at.x - at.width) <= 20);
    assert!(at.y.abs_diff(820 - at.y - at.height) <= 20);

    let out = dir.path().join("qr.png");
    save_png(&image, &out).unwrap();
    assert_eq!(image::open(&out).unwrap().into_rgba8(), image);
}

#[test]
fn test_rendering_is_deterministic() {
    for shape in [ModuleShape::CIRCLE, ModuleShape::ROUNDED] {
        let style = Style {
            shape,
            ..Default::default()
        };
        let first = Renderer::new(style.clone())
            .unwrap()
            .render(&encode(URL), Some(&logo()))
            .unwrap();
        let second = Renderer::new(style)
            .unwrap()
            .render(&encode(URL), Some(&logo()))
            .unwrap();
        assert_eq!(png_bytes(&first), png_bytes(&second));
    }
}

#[test]
fn test_modules_stay_inside_their_box() {
    let code = encode(URL);
    let grid = code.grid();
    let shapes = [
        ModuleShape::Square,
        ModuleShape::GAPPED_SQUARE,
        ModuleShape::CIRCLE,
        ModuleShape::ROUNDED,
        ModuleShape::VERTICAL_BARS,
        ModuleShape::HORIZONTAL_BARS,
    ];
    for shape in shapes {
        let style = Style {
            shape,
            module_size: 12,
            ..Default::default()
        };
        let image = Renderer::new(style.clone()).unwrap().render(grid, None).unwrap();
        for (i, j) in iproduct!(0..grid.size(), 0..grid.size()) {
            let (x0, y0) = style.module_origin(i, j);
            let mut pixels = iproduct!(0..12, 0..12).map(|(dx, dy)| image.get_pixel(x0 + dx, y0 + dy));
            if grid.is_dark(i, j) {
                assert_ne!(
                    image.get_pixel(x0 + 6, y0 + 6),
                    &BACKGROUND,
                    "{shape:?}: module ({i}, {j}) is blank"
                );
            } else {
                assert!(
                    pixels.all(|px| px == &BACKGROUND),
                    "{shape:?}: module ({i}, {j}) is painted"
                );
            }
        }
        // The quiet zone is untouched.
        assert!((0..style.module_origin(0, 0).0).all(|x| image.get_pixel(x, x) == &BACKGROUND));
    }
}

#[test]
fn test_foreground_only_changes_foreground_pixels() {
    let code = encode(URL);
    let render = |color: Color| {
        let style = Style {
            shape: ModuleShape::ROUNDED,
            foreground: Fill::from(color),
            ..Default::default()
        };
        Renderer::new(style)
            .unwrap()
            .render(&code, Some(&logo()))
            .unwrap()
    };
    let black = render(Color::BLACK);
    let red = render(Color::rgb(0xc0, 0, 0));
    assert_ne!(black, red);
    for (a, b) in black.pixels().zip(red.pixels()) {
        assert_eq!(a == &BACKGROUND, b == &BACKGROUND);
    }
    let at = placement(black.width(), 20, &Style::default().logo).unwrap();
    for (x, y) in iproduct!(at.x..at.x + at.width, at.y..at.y + at.height) {
        assert_eq!(black.get_pixel(x, y), red.get_pixel(x, y));
    }
}

#[test]
fn test_logo_is_snapped_to_modules() {
    let code = encode(URL);
    for module_size in [7, 10, 20, 33] {
        let style = Style {
            module_size,
            ..Default::default()
        };
        let canvas = style.canvas_side(code.grid().size());
        let at = placement(canvas, module_size, &style.logo).unwrap();
        assert_eq!(at.x % module_size, 0);
        assert_eq!(at.y % module_size, 0);
        assert!(at.x + at.width <= canvas && at.y + at.height <= canvas);
    }
}

#[test]
fn test_logo_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("logo.png");
    std::fs::write(&bogus, b"not an image").unwrap();
    assert!(Logo::open(&bogus).is_err());
}

#[test]
fn test_style_from_toml() {
    let style: Style = toml::from_str(
        r##"
        module_size = 8
        [shape]
        kind = "vertical-bars"
        horizontal_shrink = 0.6
        "##,
    )
    .unwrap();
    let image = Renderer::new(style)
        .unwrap()
        .render(&encode(URL), None)
        .unwrap();
    assert_eq!(image.dimensions(), (328, 328));
}
