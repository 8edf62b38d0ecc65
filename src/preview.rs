/*
 * SPDX-FileCopyrightText: © 2025 Jinwoo Park (pmnxis@gmail.com)
 *
 * SPDX-License-Identifier: MIT
 */

//! Local preview of the selected image, decoded on the UI thread.

/// Longest side of the preview; larger images are downscaled
const PREVIEW_MAX_SIDE: u32 = 1024;

/// RGBA8 pixels ready to upload as an egui texture
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewImage {
    pub size: [usize; 2],
    pub rgba: Vec<u8>,
}

impl PreviewImage {
    pub fn is_empty(&self) -> bool {
        self.size[0] == 0 || self.size[1] == 0
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(self.size, &self.rgba)
    }
}

pub fn decode_preview(bytes: &[u8]) -> Result<PreviewImage, String> {
    if bytes.is_empty() {
        return Err("empty image".into());
    }
    let img = image::load_from_memory(bytes).map_err(|e| format!("decode failed: {e}"))?;
    let img = if img.width() > PREVIEW_MAX_SIDE || img.height() > PREVIEW_MAX_SIDE {
        img.resize(
            PREVIEW_MAX_SIDE,
            PREVIEW_MAX_SIDE,
            image::imageops::FilterType::Triangle,
        )
    } else {
        img
    };
    let rgba = img.to_rgba8();
    Ok(PreviewImage {
        size: [rgba.width() as usize, rgba.height() as usize],
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
    let mut buf = Vec::new();
    image::DynamicImage::from(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_small_png() {
        let preview = decode_preview(&png_fixture(4, 3)).unwrap();
        assert_eq!(preview.size, [4, 3]);
        assert_eq!(preview.rgba.len(), 4 * 3 * 4);
        assert!(!preview.is_empty());
    }

    #[test]
    fn downscales_large_images() {
        let preview = decode_preview(&png_fixture(2048, 512)).unwrap();
        assert_eq!(preview.size[0], 1024);
        assert!(preview.size[1] <= 256);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_preview(b"not an image").is_err());
        assert!(decode_preview(&[]).is_err());
    }
}
