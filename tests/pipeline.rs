//! End-to-end tests: SVG bytes in, BMP bytes out.

use image::{ImageFormat, RgbImage};

use halftone::{
    Document, Element, Rasterizer, apply_passes, parse_svg, process, process_to_image,
};

fn decode(bmp: &[u8]) -> RgbImage {
    image::load_from_memory_with_format(bmp, ImageFormat::Bmp)
        .unwrap()
        .to_rgb8()
}

fn count_paths(doc: &Document) -> usize {
    doc.count_elements(Element::is_path)
}

/// A small red path (diagonal 10) is pruned at threshold 20, leaving only
/// the containers and a white bitmap.
#[test]
fn test_small_red_path_is_pruned() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40">
        <g><path d="M0 0 L6 0 L6 8 L0 8 Z" fill="#ff0000"/></g>
    </svg>"##;

    let mut doc = parse_svg(std::str::from_utf8(svg).unwrap()).unwrap();
    let report = apply_passes(&mut doc, Some(20.0));
    assert_eq!(report.paths_pruned, 1);
    assert_eq!(count_paths(&doc), 0);
    assert_eq!(doc.count_elements(|e| e.is("g")), 1);

    let img = decode(&process(svg, Some(20.0)).unwrap());
    assert_eq!(img.dimensions(), (40, 40));
    assert!(img.pixels().all(|p| p.0 == [255, 255, 255]));
}

/// Without pruning, a blue square is drawn at half size and half opacity.
#[test]
fn test_blue_path_is_faded_and_shrunk() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="500" height="500">
        <path d="M0 0 H500 V500 H0 Z" fill="#0000ff"/>
    </svg>"##;

    let img = decode(&process(svg, None).unwrap());
    assert_eq!(img.dimensions(), (500, 500));

    // Inside the shrunk square: blue blended halfway toward white
    let [r, g, b] = img.get_pixel(100, 100).0;
    assert!((120..=135).contains(&r), "r = {}", r);
    assert!((120..=135).contains(&g), "g = {}", g);
    assert_eq!(b, 255);

    // Outside it: background
    assert_eq!(img.get_pixel(400, 400).0, [255, 255, 255]);
}

#[test]
fn test_wide_document_is_capped_at_1024() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="2000" height="700">
        <path d="M0 0 H2000 V700 H0 Z" fill="black"/>
    </svg>"#;

    let img = decode(&process(svg, None).unwrap());
    assert_eq!(img.width(), 1024);
    let expected = 700.0 * 1024.0 / 2000.0;
    assert!((f64::from(img.height()) - expected).abs() < 1.0);
}

#[test]
fn test_output_is_opaque_even_when_everything_is_translucent() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20">
        <g fill="green" stroke="rgba(255, 0, 0, 0.1)" stroke-width="4">
            <path d="M0 0 H40 V40 H0 Z"/>
            <rect x="10" y="10" width="10" height="10" fill="purple"/>
        </g>
    </svg>"#;

    let bmp = process(svg, None).unwrap();
    // 24-bit BMP: no alpha channel in the file at all
    assert_eq!(u16::from_le_bytes([bmp[28], bmp[29]]), 24);

    let (image, report) = process_to_image(&Rasterizer::default(), svg, None).unwrap();
    assert_eq!(report.paints_faded, 3);
    // The fully-covered corner is green at half opacity, not pure green
    let [r, g, b] = image.pixel(5, 5).unwrap();
    assert!(r > 100 && b > 100 && g > 150, "{:?}", [r, g, b]);
}

#[test]
fn test_prune_threshold_zero_keeps_all_paths() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <path d="M0 0"/><path d="M0 0 L1 1"/><g><path d="M5 5 h100"/></g>
    </svg>"#;
    let mut doc = parse_svg(svg).unwrap();
    let before = count_paths(&doc);
    let report = apply_passes(&mut doc, Some(0.0));
    assert_eq!(report.paths_pruned, 0);
    assert_eq!(count_paths(&doc), before);
}

#[test]
fn test_path_exactly_at_threshold_is_kept() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0 L30 40"/></svg>"#;
    let mut doc = parse_svg(svg).unwrap();
    apply_passes(&mut doc, Some(50.0));
    assert_eq!(count_paths(&doc), 1);
    apply_passes(&mut doc, Some(50.000001));
    assert_eq!(count_paths(&doc), 0);
}

#[test]
fn test_malformed_input_is_a_parse_error() {
    let inputs: [&[u8]; 6] = [
        b"",
        b"<svg xmlns=\"http://www.w3.org/2000/svg\"><g>",
        b"<svg><g></svg>",
        b"<svg><path d=\"M 0 0 L\"/></svg>",
        b"\xff\xfe<svg/>",
        b"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\"><rect",
    ];
    for input in inputs {
        let err = process(input, None).unwrap_err();
        assert!(err.is_parse(), "{:?} gave {}", input, err);
    }
}

#[test]
fn test_unresolvable_paint_is_a_render_error() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <path d="M0 0 H10 V10 Z" fill="url(#missing)"/>
    </svg>"##;
    let err = process(svg, None).unwrap_err();
    assert!(err.is_render(), "{}", err);
}

/// Solid paints in every color syntax are faded, including `hsl()` and a
/// `color` reached through `currentColor`.
#[test]
fn test_all_solid_color_syntaxes_are_faded() {
    for fill in [
        r##"fill="hsl(240, 100%, 50%)""##,
        r##"fill="rgb(0%, 0%, 100%)""##,
        r##"fill="currentColor" color="#00f""##,
    ] {
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="20" height="20" {}/></svg>"#,
            fill
        );
        let (image, report) =
            process_to_image(&Rasterizer::default(), svg.as_bytes(), None).unwrap();
        assert!(report.paints_faded >= 1, "{}", fill);

        let [r, g, b] = image.pixel(5, 5).unwrap();
        assert!((120..=135).contains(&r), "{}: {:?}", fill, [r, g, b]);
        assert!((120..=135).contains(&g), "{}: {:?}", fill, [r, g, b]);
        assert_eq!(b, 255, "{}", fill);
    }
}

#[test]
fn test_transparent_fill_stays_invisible() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <rect width="10" height="10" fill="transparent" stroke="transparent"/>
    </svg>"#;

    let (image, report) = process_to_image(&Rasterizer::default(), svg, None).unwrap();
    assert_eq!(report.paints_faded, 2);
    assert_eq!(image.pixel(5, 5), Some([255, 255, 255]));
}

/// Minified transform lists run numbers together.
#[test]
fn test_compact_transform_syntax_is_accepted() {
    let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40">
        <g transform="translate(20-20)"><path d="M0 40H40V80H0z" fill="black" transform="matrix(1 0 0 1-20 0)"/></g>
    </svg>"#;

    let img = decode(&process(svg, None).unwrap());
    assert_eq!(img.dimensions(), (40, 40));
    // translate(20 -20) matrix(.. -20 0) scale(0.5): the square lands at (0,0)-(20,20)
    let [r, g, b] = img.get_pixel(10, 10).0;
    assert!(r < 140 && g < 140 && b < 140, "{:?}", [r, g, b]);
    assert_eq!(img.get_pixel(30, 30).0, [255, 255, 255]);
}
