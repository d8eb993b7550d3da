//! Integration tests for JPEG embedding.
//!
//! Covers frame parsing, path deduplication, verbatim DCT passthrough and
//! placement of image elements by the layout engine.

use pdf_report::elements::{Element, ImageElement, Page};
use pdf_report::writer::{parse_jpeg_header, ColorSpace, ImageData, ImageError, PdfWriter};
use pdf_report::LayoutEngine;
use std::path::{Path, PathBuf};

/// Minimal valid 1x1 grayscale JPEG.
const MINIMAL_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00, 0x01,
    0x00, 0x01, 0x00, 0x00, 0xFF, 0xDB, 0x00, 0x43, 0x00, 0x08, 0x06, 0x06, 0x07, 0x06, 0x05, 0x08,
    0x07, 0x07, 0x07, 0x09, 0x09, 0x08, 0x0A, 0x0C, 0x14, 0x0D, 0x0C, 0x0B, 0x0B, 0x0C, 0x19, 0x12,
    0x13, 0x0F, 0x14, 0x1D, 0x1A, 0x1F, 0x1E, 0x1D, 0x1A, 0x1C, 0x1C, 0x20, 0x24, 0x2E, 0x27, 0x20,
    0x22, 0x2C, 0x23, 0x1C, 0x1C, 0x28, 0x37, 0x29, 0x2C, 0x30, 0x31, 0x34, 0x34, 0x34, 0x1F, 0x27,
    0x39, 0x3D, 0x38, 0x32, 0x3C, 0x2E, 0x33, 0x34, 0x32, 0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x01,
    0x00, 0x01, 0x01, 0x01, 0x11, 0x00, 0xFF, 0xC4, 0x00, 0x1F, 0x00, 0x00, 0x01, 0x05, 0x01, 0x01,
    0x01, 0x01, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04,
    0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0xFF, 0xC4, 0x00, 0xB5, 0x10, 0x00, 0x02, 0x01, 0x03,
    0x03, 0x02, 0x04, 0x03, 0x05, 0x05, 0x04, 0x04, 0x00, 0x00, 0x01, 0x7D, 0x01, 0x02, 0x03, 0x00,
    0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07, 0x22, 0x71, 0x14, 0x32,
    0x81, 0x91, 0xA1, 0x08, 0x23, 0x42, 0xB1, 0xC1, 0x15, 0x52, 0xD1, 0xF0, 0x24, 0x33, 0x62, 0x72,
    0x82, 0x09, 0x0A, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x25, 0x26, 0x27, 0x28, 0x29, 0x2A, 0x34, 0x35,
    0x36, 0x37, 0x38, 0x39, 0x3A, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x53, 0x54, 0x55,
    0x56, 0x57, 0x58, 0x59, 0x5A, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, 0x6A, 0x73, 0x74, 0x75,
    0x76, 0x77, 0x78, 0x79, 0x7A, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89, 0x8A, 0x92, 0x93, 0x94,
    0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9, 0xAA, 0xB2,
    0xB3, 0xB4, 0xB5, 0xB6, 0xB7, 0xB8, 0xB9, 0xBA, 0xC2, 0xC3, 0xC4, 0xC5, 0xC6, 0xC7, 0xC8, 0xC9,
    0xCA, 0xD2, 0xD3, 0xD4, 0xD5, 0xD6, 0xD7, 0xD8, 0xD9, 0xDA, 0xE1, 0xE2, 0xE3, 0xE4, 0xE5, 0xE6,
    0xE7, 0xE8, 0xE9, 0xEA, 0xF1, 0xF2, 0xF3, 0xF4, 0xF5, 0xF6, 0xF7, 0xF8, 0xF9, 0xFA, 0xFF, 0xDA,
    0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00, 0xFB, 0xD5, 0xDB, 0x20, 0xA8, 0xF1, 0x47, 0xFF,
    0xD9,
];

/// Header-only JPEG with a 3-component frame of the given SOF type.
fn jpeg_with_frame(marker: u8, width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    // COM segment to skip over
    data.extend_from_slice(&[0xFF, 0xFE, 0x00, 0x06, b't', b'e', b's', b't']);
    data.extend_from_slice(&[0xFF, marker, 0x00, 0x11, 0x08]);
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.push(3);
    for id in 1..=3u8 {
        data.extend_from_slice(&[id, 0x11, 0x00]);
    }
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[test]
fn test_parse_minimal_jpeg() {
    let image = ImageData::from_jpeg(MINIMAL_JPEG.to_vec()).unwrap();
    assert_eq!((image.width, image.height), (1, 1));
    assert_eq!(image.bits_per_component, 8);
    assert_eq!(image.color_space, ColorSpace::DeviceGray);
}

#[test]
fn test_parse_progressive_frame() {
    let frame = parse_jpeg_header(&jpeg_with_frame(0xC2, 640, 480)).unwrap();
    assert_eq!((frame.width, frame.height), (640, 480));
    assert_eq!(frame.color_space, ColorSpace::DeviceRGB);
}

#[test]
fn test_huffman_table_is_not_a_frame() {
    // DHT (C4) sits in the SOF range but must be skipped
    let frame = parse_jpeg_header(MINIMAL_JPEG).unwrap();
    assert_eq!(frame.precision, 8);
}

#[test]
fn test_invalid_jpeg_is_rejected() {
    assert!(matches!(
        ImageData::from_jpeg(b"\x89PNG\r\n\x1a\n".to_vec()),
        Err(ImageError::InvalidData(_))
    ));
    assert!(matches!(
        parse_jpeg_header(&[0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x02]),
        Err(ImageError::MissingFrame)
    ));
}

#[test]
fn test_missing_file_is_reported() {
    let mut writer = PdfWriter::new();
    writer.start();
    let result = writer.embed_image("/nonexistent/picture.jpg");
    assert!(matches!(result, Err(ImageError::NotFound(_))));
    assert_eq!(writer.image_count(), 0);
}

#[test]
fn test_same_path_is_embedded_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "logo.jpg", MINIMAL_JPEG);

    let mut writer = PdfWriter::new();
    writer.start();
    let first = writer.embed_image(&path).unwrap();
    let second = writer.embed_image(&path).unwrap();
    assert_eq!(first, "Im1");
    assert_eq!(first, second);
    writer.draw_image(&first, 50.0, 600.0, 40.0, 40.0);
    writer.draw_image(&second, 150.0, 600.0, 40.0, 40.0);

    let bytes = writer.to_bytes().unwrap();
    assert_eq!(count(&bytes, b"/Subtype /Image"), 1);
    assert_eq!(count(&bytes, b"/Im1 Do"), 2);
    assert_eq!(writer.image_count(), 1);
}

#[test]
fn test_distinct_paths_get_distinct_names() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_file(dir.path(), "a.jpg", MINIMAL_JPEG);
    let b = write_file(dir.path(), "b.jpg", &jpeg_with_frame(0xC0, 20, 10));

    let mut writer = PdfWriter::new();
    writer.start();
    assert_eq!(writer.embed_image(&a).unwrap(), "Im1");
    assert_eq!(writer.embed_image(&b).unwrap(), "Im2");
    assert_eq!(writer.image_size("Im2"), Some((20, 10)));
}

#[test]
fn test_jpeg_bytes_are_copied_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "photo.jpg", MINIMAL_JPEG);

    let mut writer = PdfWriter::new();
    writer.start();
    writer.embed_image(&path).unwrap();
    let bytes = writer.to_bytes().unwrap();

    assert!(contains(&bytes, b"/Filter /DCTDecode"));
    assert!(contains(&bytes, b"/ColorSpace /DeviceGray"));
    let expected = [b"stream\n".as_slice(), MINIMAL_JPEG, b"\nendstream"].concat();
    assert!(contains(&bytes, &expected));
}

#[test]
fn test_image_objects_follow_opacity_states() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "photo.jpg", MINIMAL_JPEG);

    let mut writer = PdfWriter::new();
    writer.start();
    writer.set_opacity(0.5);
    let name = writer.embed_image(&path).unwrap();
    writer.draw_image(&name, 10.0, 10.0, 10.0, 10.0);
    let bytes = writer.to_bytes().unwrap();

    // 1 page: fonts 5/6, GS1 7, Im1 8
    assert!(contains(&bytes, b"7 0 obj\n<< /CA 0.5"));
    assert!(contains(&bytes, b"8 0 obj\n<< /BitsPerComponent 8"));
    assert!(contains(&bytes, b"/XObject << /Im1 8 0 R >>"));
}

#[test]
fn test_unregistered_image_is_not_drawn() {
    let mut writer = PdfWriter::new();
    writer.start();
    writer.draw_image("Im9", 0.0, 0.0, 10.0, 10.0);
    let content = writer.page_stream(0).unwrap().build().unwrap();
    assert!(!contains(&content, b" Do"));
}

#[test]
fn test_layout_places_image_below_cursor() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "chart.jpg", MINIMAL_JPEG);

    let mut image = ImageElement::new(&path);
    image.width = Some(100.0);
    image.height = Some(50.0);
    let mut page = Page::new("images");
    page.elements.push(Element::Image(image));

    let mut writer = PdfWriter::new();
    LayoutEngine::default().render(&mut writer, &[page]);

    let content = writer.page_stream(0).unwrap().build().unwrap();
    let text = String::from_utf8_lossy(&content);
    assert!(text.contains("q\n100 0 0 50 50 712 cm\n/Im1 Do\nQ\n"));
    // Image height plus the default spacing below it
    assert_eq!(writer.cursor_y(), 762.0 - 50.0 - 10.0);
}

#[test]
fn test_layout_reuses_image_across_pages() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "logo.jpg", MINIMAL_JPEG);

    let pages: Vec<Page> = (0..3)
        .map(|i| {
            let mut page = Page::new(format!("page {}", i));
            page.elements.push(Element::Image(ImageElement::new(&path)));
            page
        })
        .collect();

    let mut writer = PdfWriter::new();
    LayoutEngine::default().render(&mut writer, &pages);
    assert_eq!(writer.page_count(), 3);
    assert_eq!(writer.image_count(), 1);
    for index in 0..3 {
        let content = writer.page_stream(index).unwrap().build().unwrap();
        assert!(contains(&content, b"/Im1 Do"));
    }
}
