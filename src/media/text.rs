//! Parley-backed text shaping and measurement.
//!
//! Fonts are registered by family name from raw bytes; a style whose family
//! has no registered font still measures through a flat per-character
//! estimate so geometry and hit testing keep working before fonts arrive.

use crate::document::model::{TextStyle, TextTransform};
use std::collections::HashMap;
use std::sync::Arc;

/// RGBA8 brush color carried through Parley layout styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// A shaped text block ready to draw.
pub(crate) struct TextLayout {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    pub(crate) font: vello_cpu::peniko::FontData,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

/// Width factor for the fallback estimate when no font is registered.
const FALLBACK_ADVANCE: f64 = 0.6;

/// Stateful helper for shaping styled text with registered fonts.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fonts: HashMap<String, Arc<Vec<u8>>>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a layout engine with fresh Parley contexts and no fonts.
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
        }
    }

    /// Register font bytes under a family name. Later registrations for the
    /// same family win.
    pub(crate) fn register_font(&mut self, family: impl Into<String>, bytes: Vec<u8>) {
        let family = family.into();
        self.font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        self.fonts.insert(family, Arc::new(bytes));
    }

    /// Text content after the style's case transform.
    pub(crate) fn transformed_content(style: &TextStyle) -> String {
        match style.transform {
            TextTransform::None => style.content.clone(),
            TextTransform::Uppercase => style.content.to_uppercase(),
            TextTransform::Lowercase => style.content.to_lowercase(),
        }
    }

    /// Measure a styled text block in canvas units.
    ///
    /// Falls back to a flat estimate when the family has no registered font.
    /// Height is always line metrics from the style, not the shaped ascent.
    pub(crate) fn measure(&mut self, style: &TextStyle) -> Option<(f64, f64)> {
        let height = style.font_size * style.line_height;
        match self.shape(style, [255, 255, 255, 255]) {
            Some(layout) => Some((layout.width, height)),
            None => {
                let content = Self::transformed_content(style);
                let chars = content.chars().count() as f64;
                let width = chars * style.font_size * FALLBACK_ADVANCE
                    + chars * style.letter_spacing;
                Some((width, height))
            }
        }
    }

    /// Shape a styled text block with the given straight-alpha fill color.
    ///
    /// Returns `None` when the family has no registered font.
    pub(crate) fn shape(&mut self, style: &TextStyle, rgba: [u8; 4]) -> Option<TextLayout> {
        let bytes = self.fonts.get(&style.font_family)?.clone();
        let content = Self::transformed_content(style);
        let brush = TextBrushRgba8 { r: rgba[0], g: rgba[1], b: rgba[2], a: rgba[3] };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &content, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(
                style.font_family.clone(),
            )),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.font_size as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(style.weight as f32),
        ));
        if style.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }
        if style.letter_spacing != 0.0 {
            builder.push_default(parley::style::StyleProperty::LetterSpacing(
                style.letter_spacing as f32,
            ));
        }
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(&content);
        layout.break_all_lines(None);

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        let width = f64::from(layout.width());
        let height = style.font_size * style.line_height;
        Some(TextLayout { layout, font, width, height })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/text.rs"]
mod tests;
