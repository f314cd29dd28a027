/// Crawl state definitions for the pagination loop
///
/// One results page moves through `Ready -> Fetched -> Extracted`, after
/// which the crawl either goes back to `Ready` for the next page or stops.
use std::fmt;

/// Represents where the pagination loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// A page path is known and about to be fetched
    Ready,

    /// The page body was fetched and parsed
    Fetched,

    /// Availability dates and the next-page link were read from the page
    Extracted,

    // ===== Terminal Success States =====
    /// The last page had no "Next" link
    Done,

    // ===== Terminal Stop States =====
    /// A page could not be loaded; the remaining pages are never visited
    Aborted,

    /// The configured page limit was reached before the chain ended
    LimitReached,

    /// The "Next" link pointed back to an already visited page
    CycleDetected,

    // ===== Terminal Failure States =====
    /// A listing on the fetched page had an unreadable date; the crawl
    /// returned an error
    Failed,
}

impl CrawlState {
    /// Returns true if the crawl has finished
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ready | Self::Fetched | Self::Extracted)
    }

    /// Returns true if the pagination chain was followed to its end
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if the crawl stopped before the chain ended
    pub fn is_truncated(&self) -> bool {
        matches!(
            self,
            Self::Aborted | Self::LimitReached | Self::CycleDetected
        )
    }

    /// Returns true if the loop may move from `self` to `next`
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        matches!(
            (self, next),
            (Self::Ready, Self::Fetched)
                | (Self::Ready, Self::Aborted)
                | (Self::Ready, Self::LimitReached)
                | (Self::Fetched, Self::Extracted)
                | (Self::Fetched, Self::Failed)
                | (Self::Extracted, Self::Ready)
                | (Self::Extracted, Self::Done)
                | (Self::Extracted, Self::CycleDetected)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Fetched => "fetched",
            Self::Extracted => "extracted",
            Self::Done => "done",
            Self::Aborted => "aborted",
            Self::LimitReached => "limit_reached",
            Self::CycleDetected => "cycle_detected",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
