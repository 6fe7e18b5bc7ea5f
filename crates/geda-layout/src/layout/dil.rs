use crate::bbox::BBox;
use crate::error::Result;
use crate::geometry::Point;
use crate::pin::Side;
use crate::pin_list::PinList;

/// Vertical distance between neighbouring DIL pins, in mils.
pub const DIL_PITCH: i64 = 200;
/// Horizontal distance between the two DIL pin columns' body ends, in mils.
pub const DIL_BODY_WIDTH: i64 = 800;

/// Lay `pins` out as a two-column dual-in-line symbol.
///
/// The first `ceil(n/2)` pins go down the left column, the rest down the
/// right column, both top to bottom in source order. The body spans
/// `0..=body_width` horizontally with one pitch of clearance above and below
/// the pin rows. The input list is left untouched.
///
/// Fails with `GeometryOverflow` when the pitch, width or pin count push a
/// coordinate past the output grid range.
pub fn create_dil(pins: &PinList, pitch: i64, body_width: i64) -> Result<PinList> {
    let mut out = pins.empty_like();
    if pins.is_empty() {
        return Ok(out);
    }

    let left_count = pins.len().div_ceil(2);
    let (pitch, width) = (pitch as i128, body_width as i128);
    let top = left_count as i128 * pitch;

    for (i, pin) in pins.iter().enumerate() {
        let length = pin.length as i128;
        let (side, row, x) = if i < left_count {
            (Side::Left, i, -length)
        } else {
            (Side::Right, i - left_count, width + length)
        };
        let y = top - row as i128 * pitch;
        out.push(pin.placed(side, Point::from_wide(x, y)?));
    }

    out.set_body(BBox::from_corners(
        Point::ORIGIN,
        Point::from_wide(width, top + pitch)?,
    ));
    Ok(out)
}
