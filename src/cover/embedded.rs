//! Extract cover art embedded in audio file tags.
//!
//! - ID3v2 (MP3): first APIC frame in frame order
//! - Vorbis comments (OGG): first `METADATA_BLOCK_PICTURE` value

use crate::metadata::{TagContainer, VorbisComments, frames};

use super::picture_block::{PICTURE_COMMENT_KEY, decode_picture_comment};
use super::{ArtworkBlob, ImageKind};

/// Cover art from an already-parsed tag container.
pub fn from_container(container: &TagContainer) -> Option<ArtworkBlob> {
    match container {
        TagContainer::Id3(tag) => from_id3(tag),
        TagContainer::Vorbis(comments) => from_vorbis(comments),
    }
}

fn from_id3(tag: &id3::Tag) -> Option<ArtworkBlob> {
    let picture = frames::first_picture(tag)?;
    ArtworkBlob::new(picture.data.clone(), &picture.mime_type)
}

fn from_vorbis(comments: &VorbisComments) -> Option<ArtworkBlob> {
    let text = comments.get_first(PICTURE_COMMENT_KEY)?;
    match decode_picture_comment(text) {
        Ok(block) => ArtworkBlob::new(block.data, &block.mime),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to decode picture block");
            None
        }
    }
}

impl ArtworkBlob {
    /// Builds a blob from declared MIME and bytes. Empty data counts as no artwork.
    fn new(data: Vec<u8>, mime: &str) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        let kind = ImageKind::from_mime(mime).unwrap_or_else(|| ImageKind::sniff(&data));
        Some(Self { data, kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ContainerKind;
    use crate::test_utils::{
        JPEG_BYTES, PNG_BYTES, comment_packet, picture_block_base64, write_mp3,
    };
    use id3::TagLike;
    use id3::frame::{Content, Frame, Picture, PictureType};
    use tempfile::tempdir;

    fn apic(mime: &str, picture_type: PictureType, data: &[u8]) -> Frame {
        Frame::with_content(
            "APIC",
            Content::Picture(Picture {
                mime_type: mime.to_string(),
                picture_type,
                description: String::new(),
                data: data.to_vec(),
            }),
        )
    }

    #[test]
    fn test_first_apic_wins() {
        let mut tag = id3::Tag::new();
        tag.add_frame(apic("image/png", PictureType::CoverFront, PNG_BYTES));
        tag.add_frame(apic("image/jpeg", PictureType::Other, JPEG_BYTES));
        assert_eq!(tag.pictures().count(), 2);

        let blob = from_container(&TagContainer::Id3(tag)).unwrap();
        assert_eq!(blob.kind, ImageKind::Png);
        assert_eq!(blob.data, PNG_BYTES);
    }

    #[test]
    fn test_first_apic_in_file_order_wins() {
        let dir = tempdir().unwrap();
        let path = write_mp3(dir.path(), "two-covers.mp3", |tag| {
            tag.add_frame(apic("image/jpeg", PictureType::Other, JPEG_BYTES));
            tag.add_frame(apic("image/png", PictureType::CoverBack, PNG_BYTES));
        });

        let container = TagContainer::open(&path, ContainerKind::Mp3).unwrap();
        let blob = from_container(&container).unwrap();
        assert_eq!(blob.kind, ImageKind::Jpeg);
        assert_eq!(blob.data, JPEG_BYTES);
    }

    #[test]
    fn test_id3_sniffs_unlabelled_mime() {
        let mut tag = id3::Tag::new();
        tag.add_frame(apic("application/octet-stream", PictureType::CoverFront, JPEG_BYTES));
        let blob = from_container(&TagContainer::Id3(tag)).unwrap();
        assert_eq!(blob.kind, ImageKind::Jpeg);
    }

    #[test]
    fn test_id3_without_pictures() {
        let mut tag = id3::Tag::new();
        tag.set_title("No Art");
        assert!(from_container(&TagContainer::Id3(tag)).is_none());
    }

    #[test]
    fn test_vorbis_picture_block() {
        let encoded = picture_block_base64("image/jpeg", "cover", JPEG_BYTES);
        let comments = VorbisComments::parse(&comment_packet(&[
            ("title", "x"),
            ("METADATA_BLOCK_PICTURE", encoded.as_str()),
        ]))
        .unwrap();

        let blob = from_container(&TagContainer::Vorbis(comments)).unwrap();
        assert_eq!(blob.kind, ImageKind::Jpeg);
        assert_eq!(blob.data, JPEG_BYTES);
    }

    #[test]
    fn test_vorbis_bad_base64_is_absent() {
        let comments =
            VorbisComments::parse(&comment_packet(&[("metadata_block_picture", "%%%")])).unwrap();
        assert!(from_container(&TagContainer::Vorbis(comments)).is_none());
    }

    #[test]
    fn test_vorbis_empty_picture_data_is_absent() {
        let encoded = picture_block_base64("image/png", "", b"");
        let comments =
            VorbisComments::parse(&comment_packet(&[("metadata_block_picture", encoded.as_str())]))
                .unwrap();
        assert!(from_container(&TagContainer::Vorbis(comments)).is_none());
    }
}
