/// Page outcome definitions for reporting crawl progress
///
/// Every page the crawler claims ends in exactly one of these outcomes.
use crate::crawler::RejectReason;
use std::fmt;

/// How the processing of one page ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    // ===== Skips =====
    /// The page was already processed earlier in this crawl
    AlreadyVisited,

    // ===== Failures =====
    /// The page fetch was rejected
    Rejected(RejectReason),

    /// No folder could be named or created for the page
    FolderFailed,

    // ===== Normal endings =====
    /// The page has no image tags; no folder was created
    NoImages,

    /// The page had image tags but none could be downloaded; its folder was removed
    NothingDownloaded,

    /// This many images were saved into the page's folder
    Downloaded(usize),
}

impl PageOutcome {
    /// Short stable label, used for statistics
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyVisited => "already_visited",
            Self::Rejected(reason) => reason.label(),
            Self::FolderFailed => "folder_failed",
            Self::NoImages => "no_images",
            Self::NothingDownloaded => "nothing_downloaded",
            Self::Downloaded(_) => "downloaded",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyVisited => write!(f, "already visited"),
            Self::Rejected(reason) => write!(f, "rejected: {}", reason),
            Self::FolderFailed => write!(f, "folder could not be created"),
            Self::NoImages => write!(f, "no images on page"),
            Self::NothingDownloaded => write!(f, "no images downloaded"),
            Self::Downloaded(n) => write!(f, "{} images downloaded", n),
        }
    }
}
