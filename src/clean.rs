//! Cleaner stage.

use itertools::Itertools;
use log::info;

use crate::frame::Frame;

/// Drops exact full-row duplicates, keeping the first occurrence of each row
/// in its original position.
pub fn clean_data(frame: Frame) -> Frame {
    let Frame {
        headers,
        types,
        rows,
        ..
    } = frame;
    let before = rows.len();
    let rows = rows.into_iter().unique().collect::<Vec<_>>();
    info!(
        "Removed {} duplicate row(s); {} row(s) remain",
        before - rows.len(),
        rows.len()
    );
    Frame::new(headers, types, rows)
}
