//! Last-watched / next-up scan over an ordered child sequence.

use crate::domain::WatchStatus;

/// Positions of the last finished and next unfinished child in a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub last: Option<usize>,
    pub next: Option<usize>,
}

/// Scans child statuses in stored order.
///
/// The first child whose status is not `finished` becomes `next`; `last` is
/// the final child of the finished prefix before it. An unfinished child
/// blocks progress regardless of later finished children, so out-of-order
/// completions never count past the gap. When every child is finished the
/// result is `{ last: final, next: None }`; an empty sequence yields neither.
///
/// Pure and idempotent: scanning the same statuses twice yields the same
/// result.
///
/// # Examples
///
/// ```
/// # use kiroku::models::progress::scan;
/// # use kiroku::domain::WatchStatus;
/// let statuses = [
///     Some(WatchStatus::Finished),
///     None,
///     Some(WatchStatus::Finished),
/// ];
/// let progress = scan(statuses);
/// assert_eq!(progress.last, Some(0));
/// assert_eq!(progress.next, Some(1));
/// ```
pub fn scan<I>(statuses: I) -> Progress
where
    I: IntoIterator<Item = Option<WatchStatus>>,
{
    let mut last = None;
    for (index, status) in statuses.into_iter().enumerate() {
        if status == Some(WatchStatus::Finished) {
            last = Some(index);
        } else {
            return Progress {
                last,
                next: Some(index),
            };
        }
    }
    Progress { last, next: None }
}
