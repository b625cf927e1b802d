use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::error::{Error, ErrorKind};

/// Which media descriptors count as downloadable supplementary material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum MediaFilter {
    /// Any media with a non-empty mimetype.
    #[default]
    AnyMimetype,
    /// Only media whose mimetype is `audio` or `video`, with or without a
    /// subtype (`video/mp4`).
    AudioVideo,
}
impl MediaFilter {
    /// Returns `true` if media with this (non-empty) mimetype passes.
    pub fn accepts(&self, mimetype: &str) -> bool {
        match self {
            Self::AnyMimetype => true,
            Self::AudioVideo => {
                let major = mimetype.split('/').next().unwrap_or_default().trim();
                major.eq_ignore_ascii_case("audio") || major.eq_ignore_ascii_case("video")
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnyMimetype => "any-mimetype",
            Self::AudioVideo => "audio-video",
        }
    }
}
impl FromStr for MediaFilter {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sanitized = s.trim().to_lowercase().replace(['-', '_', ' '], "");
        Ok(match sanitized.as_str() {
            "any" | "anymimetype" => Self::AnyMimetype,
            "av" | "audiovideo" => Self::AudioVideo,
            _ => exn::bail!(ErrorKind::ParseError {
                field: "media filter",
                value: s.to_string(),
            }),
        })
    }
}
impl Display for MediaFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("video", true)]
    #[case("audio", true)]
    #[case("video/mp4", true)]
    #[case("Audio/x-wav", true)]
    #[case("application", false)]
    #[case("image/png", false)]
    #[case("text", false)]
    fn test_audio_video(#[case] mimetype: &str, #[case] accepted: bool) {
        assert_eq!(MediaFilter::AudioVideo.accepts(mimetype), accepted);
        assert!(MediaFilter::AnyMimetype.accepts(mimetype));
    }

    #[rstest]
    #[case("any", MediaFilter::AnyMimetype)]
    #[case("any-mimetype", MediaFilter::AnyMimetype)]
    #[case("audio_video", MediaFilter::AudioVideo)]
    #[case(" AV ", MediaFilter::AudioVideo)]
    fn test_from_str(#[case] input: &str, #[case] expected: MediaFilter) {
        assert_eq!(input.parse::<MediaFilter>().unwrap(), expected);
        assert_eq!(expected.to_string().parse::<MediaFilter>().unwrap(), expected);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "images".parse::<MediaFilter>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::ParseError { field: "media filter", .. }));
    }
}
