use std::{fmt, str::FromStr};

/// Bundled question illustrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKey {
    Personal1,
    Personal2,
    Behavioral1,
    Behavioral2,
}

impl ImageKey {
    pub const ALL: [ImageKey; 4] = [
        ImageKey::Personal1,
        ImageKey::Personal2,
        ImageKey::Behavioral1,
        ImageKey::Behavioral2,
    ];

    pub const FALLBACK: ImageKey = ImageKey::Personal1;

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personal1 => "personal1",
            Self::Personal2 => "personal2",
            Self::Behavioral1 => "behavioral1",
            Self::Behavioral2 => "behavioral2",
        }
    }

    pub fn asset_path(self) -> &'static str {
        match self {
            Self::Personal1 => "assets/images/questionimg/personal1.jpg",
            Self::Personal2 => "assets/images/questionimg/personal2.jpg",
            Self::Behavioral1 => "assets/images/questionimg/behavioral1.jpg",
            Self::Behavioral2 => "assets/images/questionimg/behavioral2.jpg",
        }
    }

    /// Maps a question's `imagekey` to an image, using [`Self::FALLBACK`]
    /// when it is absent or unknown.
    pub fn resolve(key: Option<&str>) -> Self {
        key.and_then(|k| k.parse().ok()).unwrap_or(Self::FALLBACK)
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownImageKey(pub String);

impl FromStr for ImageKey {
    type Err = UnknownImageKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownImageKey(s.to_string()))
    }
}

pub fn question_image(question: &shared::domain::Question) -> ImageKey {
    ImageKey::resolve(question.image_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::Question;

    #[test]
    fn known_keys_resolve_to_their_assets() {
        assert_eq!(ImageKey::resolve(Some("behavioral2")), ImageKey::Behavioral2);
        assert_eq!(
            ImageKey::Behavioral2.asset_path(),
            "assets/images/questionimg/behavioral2.jpg"
        );
    }

    #[test]
    fn missing_or_unknown_keys_fall_back() {
        assert_eq!(ImageKey::resolve(None), ImageKey::Personal1);
        assert_eq!(ImageKey::resolve(Some("sunset")), ImageKey::Personal1);

        let blank = Question::new("q", "?", ["a"]).with_imagekey("");
        assert_eq!(question_image(&blank), ImageKey::FALLBACK);
        let tagged = Question::new("q", "?", ["a"]).with_imagekey("personal2");
        assert_eq!(question_image(&tagged), ImageKey::Personal2);
    }
}
