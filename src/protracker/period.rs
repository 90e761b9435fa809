//! Amiga period to note index mapping

use crate::compiler::note::NOTE_COUNT;
use crate::error::RowFault;

/// Amiga periods of C-3 to B-8, one entry per driver note index
pub const PERIODS: [u16; NOTE_COUNT as usize] = [
    1712, 1616, 1524, 1440, 1356, 1280, 1208, 1140, 1076, 1016, 960, 907, //
    856, 808, 762, 720, 678, 640, 604, 570, 538, 508, 480, 453, //
    428, 404, 381, 360, 339, 320, 302, 285, 269, 254, 240, 226, //
    214, 202, 190, 180, 170, 160, 151, 143, 135, 127, 120, 113, //
    107, 101, 95, 90, 85, 80, 75, 71, 67, 63, 60, 56, //
    53, 50, 47, 45, 42, 40, 37, 35, 33, 31, 30, 28, //
];

/// Map a period onto the driver's note table
///
/// Period 0 means "no note". Periods between table entries snap to the
/// nearest one; the first entry wins a tie.
pub fn period_to_note(period: u16) -> Result<Option<u8>, RowFault> {
    if period == 0 {
        return Ok(None);
    }
    if period < PERIODS[PERIODS.len() - 1] {
        return Err(RowFault::NoteTooHigh);
    }
    if period > PERIODS[0] {
        return Err(RowFault::NoteTooLow);
    }

    let mut nearest = 0;
    let mut nearest_distance = u16::MAX;
    for (index, &entry) in PERIODS.iter().enumerate() {
        let distance = period.abs_diff(entry);
        if distance < nearest_distance {
            nearest = index;
            nearest_distance = distance;
        }
    }
    Ok(Some(nearest as u8))
}
