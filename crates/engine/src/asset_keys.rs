use std::path::PathBuf;

use thiserror::Error;

pub(crate) const IMAGE_EXTENSION: &str = "png";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetKeyError {
    #[error("asset key must not be empty")]
    Empty,
    #[error("asset key '{key}' must be relative to the asset root")]
    Absolute { key: String },
    #[error("asset key '{key}' has an empty segment at position {index}")]
    EmptySegment { key: String, index: usize },
    #[error("asset key '{key}' must not use '.' or '..' segments")]
    RelativeSegment { key: String },
    #[error("asset key '{key}' must not carry a file extension; '.{IMAGE_EXTENSION}' is implied")]
    Extension { key: String },
    #[error("asset key '{key}' contains invalid character {character:?}")]
    InvalidCharacter { key: String, character: char },
}

/// Extension-less, `/`-separated image key such as `sprites/mario`. Each segment is
/// lowercase ASCII letters, digits, `_` or `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AssetKey<'a> {
    segments: Vec<&'a str>,
}

impl<'a> AssetKey<'a> {
    pub(crate) fn parse(key: &'a str) -> Result<Self, AssetKeyError> {
        if key.is_empty() {
            return Err(AssetKeyError::Empty);
        }
        if key.starts_with('/') || key.starts_with('\\') {
            return Err(AssetKeyError::Absolute {
                key: key.to_string(),
            });
        }

        let mut segments = Vec::new();
        for (index, segment) in key.split('/').enumerate() {
            check_segment(key, index, segment)?;
            segments.push(segment);
        }
        Ok(Self { segments })
    }

    /// Path of the image relative to the asset root, built segment by segment so the
    /// platform separator is used.
    pub(crate) fn image_path(&self) -> PathBuf {
        let mut path: PathBuf = self.segments.iter().collect();
        path.set_extension(IMAGE_EXTENSION);
        path
    }
}

fn check_segment(key: &str, index: usize, segment: &str) -> Result<(), AssetKeyError> {
    match segment {
        "" => {
            return Err(AssetKeyError::EmptySegment {
                key: key.to_string(),
                index,
            })
        }
        "." | ".." => {
            return Err(AssetKeyError::RelativeSegment {
                key: key.to_string(),
            })
        }
        _ => {}
    }
    if segment.ends_with(&format!(".{IMAGE_EXTENSION}")) {
        return Err(AssetKeyError::Extension {
            key: key.to_string(),
        });
    }
    match segment
        .chars()
        .find(|ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-')))
    {
        Some(character) => Err(AssetKeyError::InvalidCharacter {
            key: key.to_string(),
            character,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn nested_keys_map_to_png_paths() {
        let key = AssetKey::parse("sprites/mario").expect("valid key");
        assert_eq!(key.image_path(), Path::new("sprites").join("mario.png"));

        let key = AssetKey::parse("cloud-2_big").expect("valid key");
        assert_eq!(key.image_path(), PathBuf::from("cloud-2_big.png"));
    }

    #[test]
    fn rejects_keys_that_leave_the_asset_root() {
        assert_eq!(AssetKey::parse(""), Err(AssetKeyError::Empty));
        assert!(matches!(
            AssetKey::parse("/etc/passwd"),
            Err(AssetKeyError::Absolute { .. })
        ));
        assert!(matches!(
            AssetKey::parse("sprites/../secret"),
            Err(AssetKeyError::RelativeSegment { .. })
        ));
        assert!(matches!(
            AssetKey::parse("./mario"),
            Err(AssetKeyError::RelativeSegment { .. })
        ));
    }

    #[test]
    fn reports_the_offending_segment_or_character() {
        assert_eq!(
            AssetKey::parse("sprites//mario"),
            Err(AssetKeyError::EmptySegment {
                key: "sprites//mario".to_string(),
                index: 1,
            })
        );
        assert!(matches!(
            AssetKey::parse("sprites/mario.png"),
            Err(AssetKeyError::Extension { .. })
        ));
        assert_eq!(
            AssetKey::parse("sprites/Mario"),
            Err(AssetKeyError::InvalidCharacter {
                key: "sprites/Mario".to_string(),
                character: 'M',
            })
        );
        assert!(matches!(
            AssetKey::parse(r"sprites\mario"),
            Err(AssetKeyError::InvalidCharacter {
                character: '\\',
                ..
            })
        ));
    }
}
