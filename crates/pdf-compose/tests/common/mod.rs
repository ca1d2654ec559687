#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pdf_compose::SourceDocument;
use std::io::Cursor;

/// Build a PDF with one page per entry of `sizes` (width, height in points).
pub fn create_test_pdf(sizes: &[(i64, i64)]) -> Document {
    build_pdf(sizes, |doc, _| {
        Object::Reference(doc.add_object(Stream::new(
            Dictionary::new(),
            b"0 0 m 10 10 l S".to_vec(),
        )))
    })
}

/// Build a PDF of `num_pages` US Letter pages
pub fn create_letter_pdf(num_pages: usize) -> Document {
    create_test_pdf(&vec![(612, 792); num_pages])
}

/// Build a PDF whose page `broken_page` points at a content stream that
/// doesn't exist.
pub fn create_broken_pdf(num_pages: usize, broken_page: usize) -> Document {
    build_pdf(&vec![(612, 792); num_pages], |doc, index| {
        if index == broken_page {
            Object::Reference((9999, 0))
        } else {
            Object::Reference(doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec())))
        }
    })
}

pub fn source(id: &str, doc: Document) -> SourceDocument {
    SourceDocument::from_pdf(id, doc)
}

/// Encode a solid-colour PNG
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 50, 50])));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

/// MediaBox width and height of every page
pub fn page_sizes(doc: &Document) -> Vec<(f32, f32)> {
    doc.get_pages()
        .values()
        .map(|&id| {
            let media_box = doc
                .get_dictionary(id)
                .unwrap()
                .get(b"MediaBox")
                .unwrap()
                .as_array()
                .unwrap();
            let n: Vec<f32> = media_box.iter().map(|v| v.as_float().unwrap()).collect();
            (n[2] - n[0], n[3] - n[1])
        })
        .collect()
}

/// Decoded content stream of page `index` (0-based)
pub fn page_content(doc: &Document, index: usize) -> String {
    let page_id = doc.get_pages()[&(index as u32 + 1)];
    String::from_utf8(doc.get_page_content(page_id).unwrap()).unwrap()
}

fn build_pdf(
    sizes: &[(i64, i64)],
    mut contents: impl FnMut(&mut Document, usize) -> Object,
) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for (index, &(width, height)) in sizes.iter().enumerate() {
        let content = contents(&mut doc, index);
        let page_id: ObjectId = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(width),
                    Object::Integer(height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", content),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(sizes.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    doc
}
