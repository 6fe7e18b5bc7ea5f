use crate::bbox::BBox;
use crate::error::Result;
use crate::geometry::Point;
use crate::pin::Side;
use crate::pin_list::PinList;
use log::warn;

/// Smallest run length used when sizing the body, so short sides still get a box.
const MIN_RUN: usize = 3;

/// Offset of slot `k` in a run of `n` pins centered on zero.
///
/// Neighbours are exactly `pitch` apart. When `(n - 1) * pitch` is odd the
/// run sits half a unit toward the positive side.
fn centered(k: usize, n: usize, pitch: i128) -> i128 {
    k as i128 * pitch - (n as i128 - 1) * pitch / 2
}

/// Space pins along the side they already declare, centered on the body.
///
/// Within a side, declaration order decides the slot: the first pin gets the
/// lowest coordinate. Pins without a side are placed on the left run. Returns
/// a new list in the input's order, or `GeometryOverflow` when the pitch puts
/// a pin past the output grid range.
pub fn align_to_grid(pins: &PinList, pitch: i64) -> Result<PinList> {
    let side_of = |side: Side| match side {
        Side::Unspecified => Side::Left,
        s => s,
    };

    let count = |side: Side| pins.iter().filter(|p| side_of(p.side) == side).count();
    let (left, right, top, bottom) = (
        count(Side::Left),
        count(Side::Right),
        count(Side::Top),
        count(Side::Bottom),
    );

    let pitch = pitch as i128;
    let rows = left.max(right).max(MIN_RUN) as i128;
    let cols = top.max(bottom).max(MIN_RUN) as i128;
    let half_h = (rows + 1) * pitch / 2;
    let half_w = (cols + 1) * pitch / 2;

    let mut out = pins.empty_like();
    let mut next = [0usize; 4];
    for pin in pins {
        if pin.side == Side::Unspecified {
            warn!("pin {} has no side; placing it on the left", pin.number);
        }
        let side = side_of(pin.side);
        let (slot_index, run) = match side {
            Side::Right => (1, right),
            Side::Top => (2, top),
            Side::Bottom => (3, bottom),
            _ => (0, left),
        };
        let k = next[slot_index];
        next[slot_index] += 1;
        let along = centered(k, run, pitch);
        let length = pin.length as i128;
        let (x, y) = match side {
            Side::Right => (half_w + length, along),
            Side::Top => (along, half_h + length),
            Side::Bottom => (along, -half_h - length),
            _ => (-half_w - length, along),
        };
        out.push(pin.placed(side, Point::from_wide(x, y)?));
    }

    if !out.is_empty() {
        out.set_body(BBox::from_corners(
            Point::from_wide(-half_w, -half_h)?,
            Point::from_wide(half_w, half_h)?,
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::pin::Pin;

    fn sided(sides: &[Side]) -> PinList {
        let mut pins = PinList::new();
        for (i, side) in sides.iter().enumerate() {
            pins.add(Pin::new((i + 1).to_string()).with_side(*side))
                .unwrap();
        }
        pins
    }

    #[test]
    fn test_four_left_pins_symmetric() {
        let aligned = align_to_grid(&sided(&[Side::Left; 4]), 200).unwrap();
        let ys: Vec<i64> = aligned.iter().map(|p| p.position.unwrap().y).collect();
        assert_eq!(ys, vec![-300, -100, 100, 300]);
        for w in ys.windows(2) {
            assert_eq!(w[1] - w[0], 200);
        }
        assert_eq!(ys.iter().sum::<i64>(), 0);
    }

    #[test]
    fn test_sides_keep_membership_and_order() {
        let input = sided(&[Side::Right, Side::Left, Side::Top, Side::Bottom, Side::Left]);
        let aligned = align_to_grid(&input, 200).unwrap();
        let sides: Vec<_> = aligned.iter().map(|p| p.side).collect();
        assert_eq!(
            sides,
            vec![Side::Right, Side::Left, Side::Top, Side::Bottom, Side::Left]
        );
        let numbers: Vec<_> = aligned.iter().map(|p| p.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2", "3", "4", "5"]);
        // the two left pins: first declared is lower
        let left: Vec<_> = aligned
            .iter()
            .filter(|p| p.side == Side::Left)
            .map(|p| p.position.unwrap())
            .collect();
        assert_eq!(left, vec![Point::new(-700, -100), Point::new(-700, 100)]);
        assert!(aligned.check_collisions().is_ok());
    }

    #[test]
    fn test_top_and_bottom_runs() {
        let aligned = align_to_grid(&sided(&[Side::Top, Side::Top, Side::Top, Side::Bottom]), 200).unwrap();
        let pos: Vec<_> = aligned.iter().map(|p| p.position.unwrap()).collect();
        assert_eq!(pos[0], Point::new(-200, 700));
        assert_eq!(pos[1], Point::new(0, 700));
        assert_eq!(pos[2], Point::new(200, 700));
        assert_eq!(pos[3], Point::new(0, -700));
    }

    #[test]
    fn test_body_touches_pin_body_ends() {
        let aligned = align_to_grid(&sided(&[Side::Left, Side::Right, Side::Top]), 200).unwrap();
        let body = aligned.body().unwrap();
        assert_eq!(body, BBox::from_corners(Point::new(-400, -400), Point::new(400, 400)));
        for pin in &aligned {
            let inner = pin.body_end().unwrap();
            let on_edge = inner.x == body.min_x
                || inner.x == body.max_x
                || inner.y == body.min_y
                || inner.y == body.max_y;
            assert!(on_edge, "pin {} not on body edge", pin.number);
        }
    }

    #[test]
    fn test_unspecified_goes_left() {
        let aligned = align_to_grid(&sided(&[Side::Unspecified, Side::Left]), 200).unwrap();
        assert!(aligned.iter().all(|p| p.side == Side::Left));
        assert!(aligned.is_resolved());
    }

    #[test]
    fn test_empty_input() {
        let aligned = align_to_grid(&PinList::new(), 200).unwrap();
        assert!(aligned.is_empty());
        assert!(aligned.body().is_none());
    }

    #[test]
    fn test_odd_pitch_keeps_exact_spacing() {
        let aligned = align_to_grid(&sided(&[Side::Right; 2]), 101).unwrap();
        let ys: Vec<i64> = aligned.iter().map(|p| p.position.unwrap().y).collect();
        assert_eq!(ys, vec![-50, 51]);

        let aligned = align_to_grid(&sided(&[Side::Left; 4]), 101).unwrap();
        let ys: Vec<i64> = aligned.iter().map(|p| p.position.unwrap().y).collect();
        assert_eq!(ys, vec![-151, -50, 51, 152]);
        for w in ys.windows(2) {
            assert_eq!(w[1] - w[0], 101);
        }
    }

    #[test]
    fn test_huge_pitch_is_overflow_not_panic() {
        let err = align_to_grid(&sided(&[Side::Left; 3]), i64::MAX / 2).unwrap_err();
        assert!(matches!(err, LayoutError::GeometryOverflow { .. }));
    }
}
