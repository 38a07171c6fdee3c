use crate::{
    collision::{
        kinematic::StepQuery,
        narrow_phase::classify,
        settings::{STEP_DOWN_VECTOR, STEP_SIZE, STEP_UP_VECTOR},
        types::{Classification, CollisionFlag, CollisionFlags, CollisionPlacement, CollisionSides},
    },
    fixed::Fixed,
    geometry::{AxisBox, Vector2},
    world::CollisionSource,
};

/// Which half-probe's placements survive a landed-state decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Support {
    Neither,
    Left,
    Right,
    Both,
}

/// What `bx` is standing on.
///
/// - A strip `mask_size` thick directly under the box is split into a left and a right half,
///   and each half is classified precisely.
/// - The result is one of `NONE`, `BLOCK`, `TOP_LADDER` or `SLOPE`. For `SLOPE` the
///   returned triangle is the slope being stood on.
/// - When both halves stand on slopes, the left one is reported.
/// - When `placements` is given, only the cells of the half (or halves) that decided the
///   result are appended.
pub fn landed_state<S: CollisionSource + ?Sized>(
    source: &S,
    bx: &AxisBox,
    mask_size: Fixed,
    ignore: CollisionFlags,
    mut placements: Option<&mut Vec<CollisionPlacement>>,
) -> Classification {
    let bottom = bx.clip_top(bx.height() - mask_size);
    let probe = bottom + Vector2::DOWN * mask_size;

    let start = placements.as_ref().map_or(0, |p| p.len());
    let left = classify(
        source,
        &probe.half_left(),
        ignore,
        true,
        CollisionSides::INNER,
        placements.as_deref_mut(),
    );
    let split = placements.as_ref().map_or(0, |p| p.len());
    let right = classify(
        source,
        &probe.half_right(),
        ignore,
        true,
        CollisionSides::INNER,
        placements.as_deref_mut(),
    );

    let (state, support) = resolve_landing(&left, &right);
    if let Some(out) = placements {
        match support {
            Support::Neither => out.truncate(start),
            Support::Left => out.truncate(split),
            Support::Right => {
                out.drain(start..split);
            }
            Support::Both => {}
        }
    }

    state
}

fn resolve_landing(left: &Classification, right: &Classification) -> (Classification, Support) {
    let footing = CollisionFlags::BLOCK | CollisionFlags::TOP_LADDER;
    let flat = |c: &Classification| Classification {
        flags: if c.has(CollisionFlag::Block) {
            CollisionFlags::BLOCK
        } else {
            CollisionFlags::TOP_LADDER
        },
        ..Classification::NONE
    };
    let only = |flags: CollisionFlags| Classification {
        flags,
        ..Classification::NONE
    };

    if left.is_none() && right.is_none() {
        return (Classification::NONE, Support::Neither);
    }

    match (left.has(CollisionFlag::Slope), right.has(CollisionFlag::Slope)) {
        (false, false) => {
            let left_footing = left.flags.intersects(footing);
            let right_footing = right.flags.intersects(footing);
            if left.is_none() && right_footing {
                (flat(right), Support::Right)
            } else if left_footing && right.is_none() {
                (flat(left), Support::Left)
            } else if left_footing && right_footing {
                let either = Classification {
                    flags: left.flags | right.flags,
                    ..Classification::NONE
                };
                (flat(&either), Support::Both)
            } else {
                (Classification::NONE, Support::Neither)
            }
        }
        (false, true) => {
            if left.has(CollisionFlag::Block) {
                (only(CollisionFlags::BLOCK), Support::Left)
            } else if left.has(CollisionFlag::TopLadder) {
                (only(CollisionFlags::TOP_LADDER), Support::Left)
            } else if right.slope.h_sign() > 0 {
                (only_slope(right), Support::Right)
            } else {
                (Classification::NONE, Support::Neither)
            }
        }
        (true, false) => {
            // Exact matches: a ladder next to the block does not count.
            if right.flags == CollisionFlags::BLOCK {
                (only(CollisionFlags::BLOCK), Support::Right)
            } else if right.flags == CollisionFlags::TOP_LADDER {
                (only(CollisionFlags::TOP_LADDER), Support::Right)
            } else if left.slope.h_sign() < 0 {
                (only_slope(left), Support::Left)
            } else {
                (Classification::NONE, Support::Neither)
            }
        }
        (true, true) => (only_slope(left), Support::Both),
    }
}

#[inline]
fn only_slope(c: &Classification) -> Classification {
    Classification {
        flags: CollisionFlags::SLOPE,
        slope: c.slope,
    }
}

#[inline]
fn is_landed<S: CollisionSource + ?Sized>(source: &S, bx: &AxisBox, query: &StepQuery) -> bool {
    !landed_state(source, bx, query.mask_size, query.ignore, None).is_none()
}

/// Drops `bx` until it lands on something.
///
/// Returns the first landed position, or the position reached once `max_distance` is
/// exhausted.
pub fn move_contact_floor<S: CollisionSource + ?Sized>(
    source: &S,
    mut bx: AxisBox,
    query: StepQuery,
) -> AxisBox {
    let mut distance = Fixed::ZERO;
    while distance < query.max_distance {
        if is_landed(source, &bx, &query) {
            return bx;
        }
        distance += STEP_SIZE;
        bx = bx + STEP_DOWN_VECTOR;
    }

    log::debug!(
        "move_contact_floor: no floor within {} below {:?}",
        query.max_distance,
        bx.left_top()
    );
    bx
}

/// Like [`move_contact_floor`] but `None` when no floor is found within `max_distance`.
pub fn try_move_contact_floor<S: CollisionSource + ?Sized>(
    source: &S,
    bx: AxisBox,
    query: StepQuery,
) -> Option<AxisBox> {
    drop_until(source, bx, query, |state| !state.is_none())
}

/// Like [`try_move_contact_floor`] but only a slope counts as landing.
pub fn try_move_contact_slope<S: CollisionSource + ?Sized>(
    source: &S,
    bx: AxisBox,
    query: StepQuery,
) -> Option<AxisBox> {
    drop_until(source, bx, query, |state| state.has(CollisionFlag::Slope))
}

fn drop_until<S, F>(source: &S, mut bx: AxisBox, query: StepQuery, landed: F) -> Option<AxisBox>
where
    S: CollisionSource + ?Sized,
    F: Fn(&Classification) -> bool,
{
    let mut distance = Fixed::ZERO;
    while distance < query.max_distance {
        if landed(&landed_state(source, &bx, query.mask_size, query.ignore, None)) {
            return Some(bx);
        }
        distance += STEP_SIZE;
        bx = bx + STEP_DOWN_VECTOR;
    }
    None
}

/// Lifts a landed box to the highest position where it is still landed.
///
/// A box that is not landed is returned unchanged. The lift is bounded by `max_distance`.
pub fn adjust_on_the_floor<S: CollisionSource + ?Sized>(
    source: &S,
    mut bx: AxisBox,
    query: StepQuery,
) -> AxisBox {
    if !is_landed(source, &bx, &query) {
        return bx;
    }

    let mut distance = Fixed::ZERO;
    while distance < query.max_distance {
        if !is_landed(source, &(bx + STEP_UP_VECTOR), &query) {
            break;
        }
        distance += STEP_SIZE;
        bx = bx + STEP_UP_VECTOR;
    }
    bx
}
