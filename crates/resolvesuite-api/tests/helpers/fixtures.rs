//! Test fixtures: attachment payloads and multipart forms.

use axum_test::multipart::{MultipartForm, Part};

/// PNG signature followed by filler, `size` bytes in total.
pub fn png_bytes(size: usize) -> Vec<u8> {
    let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    data.resize(size.max(data.len()), 0xAB);
    data.truncate(size);
    data
}

pub fn file_part(data: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(data)
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string())
}

pub fn single_file_form(data: Vec<u8>, file_name: &str, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part("attachments", file_part(data, file_name, mime_type))
}
