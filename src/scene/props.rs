use crate::assets::AssetKind;
use std::fmt;
use std::str::FromStr;

/// sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0x00, 0x00, 0x00]);
    pub const GREEN: Color = Color([0x00, 0xff, 0x00]);

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}, expected #rrggbb")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| ParseColorError(s.to_string()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Color([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Font {
    #[default]
    Arial,
    Helvetica,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    #[serde(rename = "Courier New")]
    CourierNew,
    Georgia,
    Verdana,
}

impl Font {
    pub const ALL: [Font; 6] = [
        Font::Arial,
        Font::Helvetica,
        Font::TimesNewRoman,
        Font::CourierNew,
        Font::Georgia,
        Font::Verdana,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Font::Arial => "Arial",
            Font::Helvetica => "Helvetica",
            Font::TimesNewRoman => "Times New Roman",
            Font::CourierNew => "Courier New",
            Font::Georgia => "Georgia",
            Font::Verdana => "Verdana",
        }
    }
}

pub const DEFAULT_VIDEO_LOOP: bool = false;
pub const DEFAULT_CHROMA_KEY: Color = Color::GREEN;
pub const DEFAULT_IMAGE_OPACITY: f32 = 1.0;
pub const DEFAULT_TEXT_COLOR: Color = Color::BLACK;
pub const DEFAULT_FONT: Font = Font::Arial;

/// Video playback settings. Absent fields read as their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VideoProps {
    pub looping: Option<bool>,
    pub chroma_key: Option<Color>,
}

impl VideoProps {
    pub fn looping(&self) -> bool {
        self.looping.unwrap_or(DEFAULT_VIDEO_LOOP)
    }

    pub fn chroma_key(&self) -> Color {
        self.chroma_key.unwrap_or(DEFAULT_CHROMA_KEY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageProps {
    pub opacity: Option<f32>,
}

impl ImageProps {
    pub fn opacity(&self) -> f32 {
        self.opacity.unwrap_or(DEFAULT_IMAGE_OPACITY)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextProps {
    pub content: String,
    pub color: Option<Color>,
    pub font: Option<Font>,
}

impl TextProps {
    pub fn color(&self) -> Color {
        self.color.unwrap_or(DEFAULT_TEXT_COLOR)
    }

    pub fn font(&self) -> Font {
        self.font.unwrap_or(DEFAULT_FONT)
    }
}

/// Properties that only exist for one asset kind.
#[derive(Debug, Clone, PartialEq)]
pub enum KindProps {
    Model3D,
    Video(VideoProps),
    Image(ImageProps),
    Text(TextProps),
}

impl KindProps {
    /// Freshly placed objects start with every default written out.
    pub fn initial(kind: AssetKind, asset_name: &str) -> Self {
        match kind {
            AssetKind::Model3D => KindProps::Model3D,
            AssetKind::Video => KindProps::Video(VideoProps {
                looping: Some(DEFAULT_VIDEO_LOOP),
                chroma_key: Some(DEFAULT_CHROMA_KEY),
            }),
            AssetKind::Image => KindProps::Image(ImageProps {
                opacity: Some(DEFAULT_IMAGE_OPACITY),
            }),
            AssetKind::Text => KindProps::Text(TextProps {
                content: asset_name.to_string(),
                color: Some(DEFAULT_TEXT_COLOR),
                font: Some(DEFAULT_FONT),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_parses_and_formats_hex() {
        let color: Color = "#00FF7f".parse().unwrap();
        assert_eq!(color, Color([0x00, 0xff, 0x7f]));
        assert_eq!(color.to_string(), "#00ff7f");
    }

    #[test]
    fn color_rejects_malformed_input() {
        for text in ["00ff00", "#00ff0", "#00ff00aa", "#gg0000", "#é0000"] {
            assert!(text.parse::<Color>().is_err(), "{} should be rejected", text);
        }
    }

    #[test]
    fn color_serializes_as_string() {
        let json = serde_json::to_string(&Color::GREEN).unwrap();
        assert_eq!(json, "\"#00ff00\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::GREEN);
    }

    #[test]
    fn font_names_match_serialized_form() {
        for font in Font::ALL {
            let json = serde_json::to_string(&font).unwrap();
            assert_eq!(json, format!("\"{}\"", font.name()));
        }
    }

    #[test]
    fn absent_fields_read_as_defaults() {
        let video = VideoProps::default();
        assert!(!video.looping());
        assert_eq!(video.chroma_key(), Color::GREEN);
        assert_eq!(ImageProps::default().opacity(), 1.0);
        let text = TextProps::default();
        assert_eq!(text.color(), Color::BLACK);
        assert_eq!(text.font(), Font::Arial);
    }

    #[test]
    fn initial_props_follow_asset_kind() {
        assert_eq!(KindProps::initial(AssetKind::Model3D, "m"), KindProps::Model3D);
        match KindProps::initial(AssetKind::Text, "Hello") {
            KindProps::Text(text) => {
                assert_eq!(text.content, "Hello");
                assert_eq!(text.font, Some(Font::Arial));
            }
            other => panic!("Expected text props, got {:?}", other),
        }
    }
}
