use crate::subtitle_processor::Subtitle;

/// Result of locating a playback time in the interval list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Lowest index with `start <= time < end`
    pub strict: Option<usize>,
    /// Lowest index with `start <= time < end + slack`, strict matches preferred
    pub extended: Option<usize>,
}

/// Locate `time` in a start-sorted interval list.
///
/// Ties go to the lowest index. Times before the first interval or past the
/// last extended range give `None` for both fields.
pub fn locate(subtitles: &[Subtitle], time: f64, slack: f64) -> Location {
    if !time.is_finite() || subtitles.is_empty() {
        return Location::default();
    }

    // Intervals starting after `time` can never match; the list is sorted by
    // start so everything from `upper` on is out.
    let upper = subtitles.partition_point(|sub| sub.start <= time);

    let mut strict = None;
    let mut first_extended = None;

    for (idx, sub) in subtitles[..upper].iter().enumerate() {
        if time >= sub.end + slack {
            continue;
        }
        if first_extended.is_none() {
            first_extended = Some(idx);
        }
        if time < sub.end {
            strict = Some(idx);
            break;
        }
    }

    Location {
        strict,
        extended: strict.or(first_extended),
    }
}

/// Whether the interval at `index` covers `time` once its end is extended by `slack`
pub fn extended_contains(subtitles: &[Subtitle], index: usize, time: f64, slack: f64) -> bool {
    subtitles
        .get(index)
        .is_some_and(|sub| sub.start <= time && time < sub.end + slack)
}

/// Position of the interval with the given id
pub fn index_of_id(subtitles: &[Subtitle], id: &str) -> Option<usize> {
    subtitles.iter().position(|sub| sub.id == id)
}
