// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Organization logo decoding.
//
// The logo arrives as encoded bytes (PNG, JPEG, ...) on the organization
// profile. It is decoded once per render and embedded once in the PDF, then
// referenced from every page that shows it.

use image::{DynamicImage, Rgb, RgbImage};
use lembar_core::error::{LembarError, Result};
use printpdf::{Mm, Pt, RawImage, RawImageData, RawImageFormat, XObjectTransform};
use tracing::{debug, instrument};

use lembar_layout::config::Rect;

/// Resolution the logo is placed at before scaling into its box.
pub const LOGO_DPI: f32 = 300.0;

/// A decoded logo, flattened onto white so it prints the same on every
/// backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoImage {
    pub width: u32,
    pub height: u32,
    rgb: Vec<u8>,
}

impl LogoImage {
    /// Decode `bytes` into an opaque RGB image.
    #[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|err| LembarError::ImageError(format!("failed to decode logo: {err}")))?;
        let (width, height) = (decoded.width(), decoded.height());
        if width == 0 || height == 0 {
            return Err(LembarError::ImageError("logo has no pixels".into()));
        }
        let rgb = flatten_on_white(decoded);
        debug!(width, height, "Logo decoded");
        Ok(Self {
            width,
            height,
            rgb: rgb.into_raw(),
        })
    }

    pub fn to_raw_image(&self) -> RawImage {
        RawImage {
            pixels: RawImageData::U8(self.rgb.clone()),
            width: self.width as usize,
            height: self.height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        }
    }

    /// Transform that fits the image inside `rect` (top-left origin, mm),
    /// centred, keeping its aspect ratio. `page_height_mm` flips the y axis.
    pub fn fit_transform(&self, rect: &Rect, page_height_mm: f32) -> XObjectTransform {
        let native_w_pt = self.width as f32 / LOGO_DPI * 72.0;
        let native_h_pt = self.height as f32 / LOGO_DPI * 72.0;
        let box_w_pt = Mm(rect.width_mm).into_pt().0;
        let box_h_pt = Mm(rect.height_mm).into_pt().0;

        let scale = (box_w_pt / native_w_pt).min(box_h_pt / native_h_pt);
        let drawn_w_pt = native_w_pt * scale;
        let drawn_h_pt = native_h_pt * scale;

        let left_pt = Mm(rect.x_mm).into_pt().0 + (box_w_pt - drawn_w_pt) / 2.0;
        let bottom_pt =
            Mm(page_height_mm - rect.bottom_mm()).into_pt().0 + (box_h_pt - drawn_h_pt) / 2.0;

        XObjectTransform {
            translate_x: Some(Pt(left_pt)),
            translate_y: Some(Pt(bottom_pt)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(LOGO_DPI),
            rotate: None,
        }
    }
}

/// Composite any alpha channel over white.
fn flatten_on_white(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| -> u8 {
            let alpha = u16::from(a);
            ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}
