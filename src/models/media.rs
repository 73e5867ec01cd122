// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! User media shown inside the canvas.
//!
//! Uploaded files are registered in a [`BlobStore`] and referenced through
//! a transient [`BlobUrl`]. The [`MediaSlot`] holds at most one element and
//! revokes the handle of whatever it replaces.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// A file picked by the user, with the media type it declares.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub name: String,
    pub mime: String,
    pub path: PathBuf,
    pub bytes: Arc<[u8]>,
}

/// How a media file is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify by declared MIME type. Anything that is not `video/*` is
    /// treated as an image.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// Handle to uploaded bytes, valid until revoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlobUrl(u64);

impl fmt::Display for BlobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:safezone/{}", self.0)
    }
}

/// Registry of live blob handles.
#[derive(Debug, Default)]
pub struct BlobStore {
    next_id: u64,
    blobs: HashMap<BlobUrl, Arc<[u8]>>,
}

impl BlobStore {
    pub fn create(&mut self, bytes: Arc<[u8]>) -> BlobUrl {
        let url = BlobUrl(self.next_id);
        self.next_id += 1;
        self.blobs.insert(url, bytes);
        url
    }

    pub fn get(&self, url: BlobUrl) -> Option<&Arc<[u8]>> {
        self.blobs.get(&url)
    }

    pub fn revoke(&mut self, url: BlobUrl) {
        self.blobs.remove(&url);
    }

    pub fn contains(&self, url: BlobUrl) -> bool {
        self.blobs.contains_key(&url)
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }
}

/// Playback behaviour of a video element. Only frames are decoded, so
/// video is always muted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    pub autoplay: bool,
    pub looping: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            autoplay: true,
            looping: true,
        }
    }
}

/// A display element bound to a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaElement {
    Image {
        src: BlobUrl,
    },
    Video {
        src: BlobUrl,
        path: PathBuf,
        playback: Playback,
    },
}

impl MediaElement {
    pub fn src(&self) -> BlobUrl {
        match self {
            MediaElement::Image { src } | MediaElement::Video { src, .. } => *src,
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            MediaElement::Image { .. } => MediaKind::Image,
            MediaElement::Video { .. } => MediaKind::Video,
        }
    }
}

/// Container holding the user's media, at most one element at a time.
#[derive(Debug, Default)]
pub struct MediaSlot {
    element: Option<MediaElement>,
    name: Option<String>,
}

impl MediaSlot {
    pub fn element(&self) -> Option<&MediaElement> {
        self.element.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Remove the current element, revoking its blob.
    pub fn clear(&mut self, blobs: &mut BlobStore) {
        if let Some(old) = self.element.take() {
            blobs.revoke(old.src());
        }
        self.name = None;
    }

    /// Replace the current element with one built for `file`.
    pub fn replace(&mut self, file: MediaFile, blobs: &mut BlobStore) -> &MediaElement {
        self.clear(blobs);
        let src = blobs.create(file.bytes);
        let element = match MediaKind::from_mime(&file.mime) {
            MediaKind::Video => MediaElement::Video {
                src,
                path: file.path,
                playback: Playback::default(),
            },
            MediaKind::Image => MediaElement::Image { src },
        };
        self.name = Some(file.name);
        self.element.insert(element)
    }
}
