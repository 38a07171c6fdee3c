use crate::{
    collision::{
        narrow_phase::classify,
        settings::{
            MASK_SIZE, QUERY_MAX_DISTANCE, STEP_DOWN_VECTOR, STEP_LEFT_VECTOR, STEP_RIGHT_VECTOR,
            STEP_SIZE, STEP_UP_VECTOR,
        },
        types::{CollisionFlags, CollisionPlacement, CollisionSides},
    },
    fixed::Fixed,
    geometry::{AxisBox, Vector2},
    world::CollisionSource,
};

/// Parameters shared by every step search.
///
/// - `max_distance` bounds the search: at most `max_distance / STEP_SIZE` steps are taken
///   (rounded up), measured along the dominant axis of the step.
/// - `mask_size` is the probe thickness used by landed-state checks.
/// - `ignore` is passed through to every classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepQuery {
    pub max_distance: Fixed,
    pub mask_size: Fixed,
    pub ignore: CollisionFlags,
}

impl StepQuery {
    #[inline]
    pub fn new(max_distance: Fixed, mask_size: Fixed, ignore: CollisionFlags) -> Self {
        Self {
            max_distance,
            mask_size,
            ignore,
        }
    }

    /// `QUERY_MAX_DISTANCE`, `MASK_SIZE`, nothing ignored.
    #[inline]
    pub fn with_defaults() -> Self {
        Self::new(QUERY_MAX_DISTANCE, MASK_SIZE, CollisionFlags::NONE)
    }

    #[inline]
    pub fn max_distance(self, max_distance: Fixed) -> Self {
        Self {
            max_distance,
            ..self
        }
    }

    #[inline]
    pub fn ignoring(self, ignore: CollisionFlags) -> Self {
        Self { ignore, ..self }
    }
}

impl Default for StepQuery {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Per-iteration displacement of a step search along `dir`.
///
/// Axis-aligned directions step `STEP_SIZE` along their axis. Any other direction steps
/// `STEP_SIZE` horizontally and `dir.y / |dir.x| * STEP_SIZE` vertically, so slopes are
/// followed at their own rise over run.
pub fn step_vector(dir: Vector2) -> Vector2 {
    if dir.x.is_zero() {
        return match dir.y.signum() {
            1 => STEP_DOWN_VECTOR,
            -1 => STEP_UP_VECTOR,
            _ => Vector2::ZERO,
        };
    }

    if dir.y.is_zero() {
        return if dir.x.is_positive() {
            STEP_RIGHT_VECTOR
        } else {
            STEP_LEFT_VECTOR
        };
    }

    Vector2::new(
        STEP_SIZE * dir.x.signum(),
        dir.y.mul_div(STEP_SIZE, dir.x.abs()),
    )
}

/// Advances `bx` along `dir` one step at a time until it overlaps something.
///
/// - Stops at the first position where the classification is not empty, or after
///   `max_distance` is exhausted.
/// - Callers move a probe box lying just outside the body (see `BoxCollider`), so the
///   first overlapping probe position is the last position where the body itself is
///   clear.
/// - A zero `dir` returns `bx` unchanged.
pub fn move_until_intersect<S: CollisionSource + ?Sized>(
    source: &S,
    mut bx: AxisBox,
    dir: Vector2,
    query: StepQuery,
    side: CollisionSides,
    mut placements: Option<&mut Vec<CollisionPlacement>>,
) -> AxisBox {
    let delta = step_vector(dir);
    if delta.is_zero() {
        return bx;
    }

    let step = if delta.x.is_zero() {
        delta.y.abs()
    } else {
        delta.x.abs()
    };

    let mut distance = Fixed::ZERO;
    while distance < query.max_distance {
        let hit = classify(
            source,
            &bx,
            query.ignore,
            true,
            side,
            placements.as_deref_mut(),
        );
        if !hit.is_none() {
            return bx;
        }

        distance += step;
        bx = bx + delta;
    }

    log::debug!(
        "move_until_intersect: no contact along {:?} within {}",
        dir,
        query.max_distance
    );
    bx
}
