use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::{
    collision::{
        BoxCollider, CollisionFlag, CollisionFlags, CollisionSides, Direction, Directions,
        Partition, classify, settings::QUERY_MAX_DISTANCE,
    },
    fixed::Fixed,
    geometry::{AxisBox, RightTriangle, Vector2},
    settings::PhysicsSettings,
    world::CollisionSource,
};

/// Kinematic state of one entity. Collision flags are never stored here; they are
/// recomputed from the box and the world every tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub collision_box: AxisBox,
    pub velocity: Vector2,
    #[serde(default)]
    pub no_clip: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub settings: PhysicsSettings,
}

impl Body {
    pub fn new(collision_box: AxisBox) -> Self {
        Self {
            collision_box,
            velocity: Vector2::ZERO,
            no_clip: false,
            is_static: false,
            settings: PhysicsSettings::default(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_settings(mut self, settings: PhysicsSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Contact state of a body as gameplay sees it. `no_clip` bodies touch nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    /// Standing on something and not moving up.
    pub landed: bool,
    pub blocked_up: bool,
    pub blocked_left: bool,
    pub blocked_right: bool,
}

impl Contacts {
    pub fn sample<S: CollisionSource + ?Sized>(collider: &mut BoxCollider<'_, S>, body: &Body) -> Self {
        if body.no_clip {
            return Self::default();
        }
        Self {
            landed: collider.landed() && !body.velocity.y.is_negative(),
            blocked_up: collider.blocked_up(),
            blocked_left: collider.blocked_left(),
            blocked_right: collider.blocked_right(),
        }
    }

    /// Contacts set now that were not set in `before`.
    pub fn started_since(self, before: Contacts) -> Self {
        Self {
            landed: self.landed && !before.landed,
            blocked_up: self.blocked_up && !before.blocked_up,
            blocked_left: self.blocked_left && !before.blocked_left,
            blocked_right: self.blocked_right && !before.blocked_right,
        }
    }
}

/// Result of one [`step_body`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Displacement applied to the body this tick.
    pub delta: Vector2,
    /// Contacts after the tick.
    pub contacts: Contacts,
    /// Contacts that began this tick.
    pub started: Contacts,
}

/// One simulated entity: its id, its body and its collider.
pub struct Actor<'w, S: CollisionSource + ?Sized, Id> {
    pub id: Id,
    pub body: Body,
    pub collider: BoxCollider<'w, S>,
}

impl<'w, S: CollisionSource + ?Sized, Id> Actor<'w, S, Id> {
    pub fn new(world: &'w S, id: Id, body: Body) -> Self {
        let collider =
            BoxCollider::with_world(world, body.collision_box).with_mask_size(body.settings.mask_size);
        Self { id, body, collider }
    }
}

/// Walks `collider` along `slope` by `dx`, keeping it on the surface.
///
/// - The vertical component follows the slope's rise over run for `dx`.
/// - Walking downhill only a wall stops the move; walking uphill the ceiling does too.
/// - With `gravity`, the body is then dropped back onto the ground (up to
///   `slope_snap_distance`), and a landed body is re-seated on the surface.
pub fn move_along_slope<S: CollisionSource + ?Sized>(
    collider: &mut BoxCollider<'_, S>,
    slope: &RightTriangle,
    dx: Fixed,
    gravity: bool,
    settings: &PhysicsSettings,
) {
    if dx.is_zero() || slope.h.is_zero() {
        return;
    }

    let slope_sign = slope.h_sign();
    let dx_sign = dx.signum();
    let going_down = dx_sign == slope_sign;
    let dy = slope.v.mul_div(dx, slope.h).abs() * (dx_sign * slope_sign);

    let vertical = if going_down {
        Directions::NONE
    } else {
        Directions::UP
    };
    let horizontal = if dx_sign > 0 {
        Direction::Right
    } else {
        Direction::Left
    };
    collider.move_contact_solid(
        Vector2::new(dx, dy),
        dx.abs(),
        vertical | horizontal,
        CollisionFlags::SLOPE,
    );

    if gravity {
        collider.move_contact_floor(settings.slope_snap_distance, CollisionFlags::NONE);
    }
    if collider.landed() {
        collider.adjust_on_the_floor(settings.floor_adjust_distance, CollisionFlags::NONE);
    }
}

/// Horizontal pass for a body that is not standing on a slope.
///
/// Moves by `delta_x`, keeps a landed body on the ground, and hands over to
/// [`move_along_slope`] when the move walks onto a slope. A move that would run into a
/// wall stops flush against it. When the step crosses into a slope cell, it is split at
/// the cell edge: the part before the edge uses the old footing and the rest follows the
/// new slope.
pub fn move_x<S: CollisionSource + ?Sized>(
    collider: &mut BoxCollider<'_, S>,
    delta_x: Fixed,
    gravity: bool,
    follow_slopes: bool,
    settings: &PhysicsSettings,
) {
    let Some(world) = collider.world() else {
        panic!("move_x: collider has no world attached");
    };
    if delta_x.is_zero() {
        return;
    }

    let last_box = collider.collision_box();
    let was_landed = collider.landed();
    let was_landed_on_slope = collider.landed_on_slope();
    let last_slope = collider.landed_slope();
    let last_side = if delta_x.is_positive() {
        collider.right_collider()
    } else {
        collider.left_collider()
    };

    collider.translate(Vector2::new(delta_x, Fixed::ZERO));

    if was_landed {
        if collider.landed() {
            collider.adjust_on_the_floor(settings.slope_snap_distance, CollisionFlags::NONE);
        } else if gravity {
            collider.try_move_contact_slope(settings.slope_snap_distance, CollisionFlags::NONE);
        }
    }

    let side = if delta_x.is_positive() {
        collider.right_collider()
    } else {
        collider.left_collider()
    };
    let swept = last_side.union(&side);
    let hit = classify(world, &swept, CollisionFlags::NONE, true, CollisionSides::INNER, None);

    if hit.is_none() {
        if !(gravity && follow_slopes && was_landed) {
            return;
        }

        if collider.landed_on_slope() {
            let slope = collider.landed_slope();
            if slope.h_sign() == delta_x.signum() {
                let edge = if delta_x.is_positive() {
                    slope.left()
                } else {
                    slope.right()
                };
                let to_edge = edge - last_box.origin.x;
                let crosses = if delta_x.is_positive() {
                    to_edge.is_positive() && to_edge <= delta_x
                } else {
                    to_edge.is_negative() && to_edge >= delta_x
                };

                if crosses {
                    collider.set_box(last_box);
                    if was_landed_on_slope {
                        move_along_slope(collider, &last_slope, to_edge, true, settings);
                    } else {
                        collider.translate(Vector2::new(to_edge, Fixed::ZERO));
                    }
                    move_along_slope(collider, &slope, delta_x - to_edge, true, settings);
                    return;
                }
            }

            if was_landed_on_slope {
                collider.set_box(last_box);
                move_along_slope(collider, &last_slope, delta_x, true, settings);
            }
        } else if classify(
            world,
            &collider.down_collider(),
            CollisionFlags::NONE,
            false,
            CollisionSides::INNER,
            None,
        )
        .has(CollisionFlag::Slope)
        {
            collider.move_contact_floor(QUERY_MAX_DISTANCE, CollisionFlags::NONE);
        }
    } else if hit.has(CollisionFlag::Slope) {
        if collider.landed_on_slope() && was_landed_on_slope {
            collider.set_box(last_box);
            move_along_slope(collider, &last_slope, delta_x, true, settings);
        }
    } else {
        collider.set_box(last_box);
        let side = if delta_x.is_positive() {
            Direction::Right
        } else {
            Direction::Left
        };
        collider.move_contact_solid(
            side.unit_vector(),
            delta_x.abs(),
            side.into(),
            CollisionFlags::NONE,
        );
    }
}

/// Vertical pass: falls onto floors and stops under ceilings.
fn move_y<S: CollisionSource + ?Sized>(world: &S, collider: &mut BoxCollider<'_, S>, dy: Fixed) {
    let last_box = collider.collision_box();
    let last_probe = if dy.is_positive() {
        collider.down_collider()
    } else {
        collider.up_collider()
    };

    collider.translate(Vector2::new(Fixed::ZERO, dy));

    let probe = if dy.is_positive() {
        collider.down_collider()
    } else {
        collider.up_collider()
    };
    let swept = last_probe.union(&probe);
    if classify(world, &swept, CollisionFlags::NONE, true, CollisionSides::INNER, None).is_none() {
        return;
    }

    collider.set_box(last_box);
    if dy.is_positive() {
        collider.move_contact_floor(dy.ceil(), CollisionFlags::NONE);
    } else {
        collider.move_contact_solid(
            Vector2::new(Fixed::ZERO, dy),
            (-dy).ceil(),
            Directions::UP,
            CollisionFlags::NONE,
        );
    }
}

/// Shifts `bx` back inside `bounds` on any side it crosses.
fn clamp_into(bx: AxisBox, bounds: &AxisBox) -> AxisBox {
    let mut shift = Vector2::ZERO;
    if bx.left() < bounds.left() {
        shift.x = bounds.left() - bx.left();
    } else if bx.right() > bounds.right() {
        shift.x = bounds.right() - bx.right();
    }
    if bx.top() < bounds.top() {
        shift.y = bounds.top() - bx.top();
    } else if bx.bottom() > bounds.bottom() {
        shift.y = bounds.bottom() - bx.bottom();
    }
    bx + shift
}

/// Advances `body` by one tick.
///
/// Behavior
/// - Horizontal then vertical movement against the world, unless the body is `no_clip`.
///   A body standing on a slope walks along it; without gravity it does not walk downhill.
/// - The resulting box is kept inside the world bounds.
/// - Gravity is then added to `velocity.y`, capped at the terminal speed, and cleared
///   while landed.
pub fn step_body<'w, S: CollisionSource + ?Sized>(
    world: &'w S,
    collider: &mut BoxCollider<'w, S>,
    body: &mut Body,
) -> StepOutcome {
    let settings = body.settings;
    if collider.mask_size() != settings.mask_size {
        collider.set_mask_size(settings.mask_size);
    }
    collider.reset(world, body.collision_box);

    let start = body.collision_box.origin;
    let before = Contacts::sample(collider, body);
    let gravity = settings.gravity;
    let has_gravity = !gravity.is_zero();

    let mut delta = if body.is_static {
        Vector2::ZERO
    } else {
        body.velocity
    };

    if !delta.is_zero() && !body.no_clip {
        if !delta.x.is_zero() {
            if collider.landed_on_slope() {
                let slope = collider.landed_slope();
                let downhill = slope.h_sign() == delta.x.signum();
                if !downhill || has_gravity {
                    move_along_slope(collider, &slope, delta.x, has_gravity, &settings);
                }
            } else {
                move_x(collider, delta.x, has_gravity, true, &settings);
            }
        }

        if !delta.y.is_zero() {
            move_y(world, collider, delta.y);
        }

        delta = collider.collision_box().origin - start;
    }

    if !delta.is_zero() {
        body.collision_box = clamp_into(body.collision_box + delta, &world.bounding_box());
        delta = body.collision_box.origin - start;
        if collider.collision_box() != body.collision_box {
            collider.set_box(body.collision_box);
        }
    }

    if !body.no_clip && !body.is_static {
        if has_gravity {
            body.velocity.y = (body.velocity.y + gravity).min(settings.terminal_downward_speed);
        }
        if collider.landed() && body.velocity.y.is_positive() {
            body.velocity.y = Fixed::ZERO;
        }
    }

    let landed = !body.no_clip && collider.landed() && !body.velocity.y.is_negative();
    if !landed && body.velocity.y > gravity && body.velocity.y < gravity * 2 {
        body.velocity.y = gravity;
    }

    let contacts = Contacts::sample(collider, body);
    log::trace!(
        "step_body: delta {:?} -> {:?}, velocity {:?}, contacts {:?}",
        delta,
        body.collision_box.left_top(),
        body.velocity,
        contacts
    );

    StepOutcome {
        delta,
        contacts,
        started: contacts.started_since(before),
    }
}

/// Advances every actor by one tick, in slice order, and refreshes its partition entry.
///
/// Later actors observe the already-updated boxes of earlier ones through the partition.
pub fn step_bodies<'w, S, Id>(
    world: &'w S,
    actors: &mut [Actor<'w, S, Id>],
    partition: &mut Partition<Id>,
) -> Vec<(Id, StepOutcome)>
where
    S: CollisionSource + ?Sized,
    Id: Copy + Eq + Hash,
{
    let mut outcomes = Vec::with_capacity(actors.len());
    for actor in actors.iter_mut() {
        let outcome = step_body(world, &mut actor.collider, &mut actor.body);
        partition.update(actor.id, actor.body.collision_box);
        outcomes.push((actor.id, outcome));
    }
    log::trace!("step_bodies: {} actors", outcomes.len());
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cell::Cell,
        collision::collision_flags,
        world::{CollisionData, CollisionGrid},
    };

    /// 4x8 maps: floor on row 3, a wall in column 6 above it.
    fn room() -> CollisionGrid {
        let mut g = CollisionGrid::new(4, 8);
        g.fill_row(3, CollisionData::Solid);
        for row in 0..3 {
            g.set(Cell::new(row, 6), CollisionData::Solid);
        }
        g
    }

    /// Flat ground at y = 64 up to x = 48, a two-cell ramp, then a plateau at y = 48.
    fn ramp() -> CollisionGrid {
        let mut g = CollisionGrid::new(5, 8);
        g.fill_row(4, CollisionData::Solid);
        g.set(Cell::new(3, 3), CollisionData::Slope16_8);
        g.set(Cell::new(3, 4), CollisionData::Slope8_0);
        for col in 5..8 {
            g.set(Cell::new(3, col), CollisionData::Solid);
        }
        g
    }

    fn run<'w>(
        world: &'w CollisionGrid,
        body: &mut Body,
        ticks: usize,
    ) -> (BoxCollider<'w, CollisionGrid>, Vec<StepOutcome>) {
        let mut collider = BoxCollider::with_world(world, body.collision_box);
        let outcomes = (0..ticks)
            .map(|_| step_body(world, &mut collider, body))
            .collect();
        (collider, outcomes)
    }

    #[test]
    fn falling_body_lands_flush_and_stops() {
        let world = room();
        let mut body = Body::new(AxisBox::from_ints(16, 8, 16, 16));
        let (_, outcomes) = run(&world, &mut body, 30);

        assert_eq!(body.collision_box, AxisBox::from_ints(16, 32, 16, 16));
        assert_eq!(body.velocity, Vector2::ZERO);
        let landings: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.started.landed)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(landings, vec![14]);
        assert!(outcomes[14..].iter().all(|o| o.contacts.landed));
        assert!(outcomes[15..].iter().all(|o| o.delta.is_zero()));
    }

    #[test]
    fn walking_into_a_wall_stops_flush_against_it() {
        let world = room();
        let mut body = Body::new(AxisBox::from_ints(60, 32, 16, 16))
            .with_velocity(Vector2::from_ints(3, 0));
        let (_, outcomes) = run(&world, &mut body, 10);

        assert_eq!(body.collision_box.right(), Fixed::from_int(96));
        assert_eq!(body.collision_box.bottom(), Fixed::from_int(48));
        assert_eq!(outcomes[6].delta, Vector2::from_ints(2, 0));
        assert!(outcomes[6].started.blocked_right);
        assert_eq!(outcomes.iter().filter(|o| o.started.blocked_right).count(), 1);
        assert!(outcomes[7..].iter().all(|o| o.contacts.blocked_right && o.delta.is_zero()));
        // Horizontal speed is left to the caller.
        assert_eq!(body.velocity.x, Fixed::from_int(3));
    }

    #[test]
    fn jumping_into_the_ceiling_stops_under_it() {
        let mut world = CollisionGrid::new(6, 4);
        world.fill_row(0, CollisionData::Solid);
        world.fill_row(5, CollisionData::Solid);
        let mut body = Body::new(AxisBox::from_ints(16, 24, 16, 16))
            .with_velocity(Vector2::from_ints(0, -4));
        let (_, outcomes) = run(&world, &mut body, 4);

        assert_eq!(body.collision_box.top(), Fixed::from_int(16));
        assert!(outcomes[2].started.blocked_up);
        assert!(!outcomes[3].started.blocked_up && outcomes[3].contacts.blocked_up);
        assert_eq!(body.velocity.y, Fixed::from_int(-3));
    }

    #[test]
    fn walking_uphill_stays_landed_onto_the_plateau() {
        let world = ramp();
        let mut body = Body::new(AxisBox::from_ints(8, 48, 16, 16))
            .with_velocity(Vector2::from_ints(1, 0));
        let mut collider = BoxCollider::with_world(&world, body.collision_box);

        let mut bottom = body.collision_box.bottom();
        let mut on_slope = 0;
        for tick in 0..80 {
            let outcome = step_body(&world, &mut collider, &mut body);
            assert!(outcome.contacts.landed, "airborne on tick {tick}");
            assert!(body.collision_box.bottom() <= bottom, "sank on tick {tick}");
            bottom = body.collision_box.bottom();
            if collider.landed_on_slope() {
                on_slope += 1;
            }
        }

        assert_eq!(body.collision_box, AxisBox::from_ints(88, 32, 16, 16));
        assert!(on_slope > 16);
        assert!(!collider.landed_on_slope());
    }

    #[test]
    fn walking_downhill_follows_the_slope_to_the_floor() {
        let world = ramp();
        let mut body = Body::new(AxisBox::from_ints(52, 42, 16, 16))
            .with_velocity(Vector2::from_ints(-1, 0));
        let mut collider = BoxCollider::with_world(&world, body.collision_box);
        assert!(collider.landed_on_slope());

        let mut bottom = body.collision_box.bottom();
        for tick in 0..30 {
            let outcome = step_body(&world, &mut collider, &mut body);
            assert!(outcome.contacts.landed, "airborne on tick {tick}");
            assert!(body.collision_box.bottom() >= bottom, "rose on tick {tick}");
            // The downhill half of the body never sinks into the ground.
            let downhill_half = body.collision_box.half_left();
            assert!(
                collision_flags(&world, &downhill_half, CollisionFlags::NONE).is_empty(),
                "penetrated on tick {tick}"
            );
            bottom = body.collision_box.bottom();
        }

        assert_eq!(body.collision_box, AxisBox::from_ints(22, 48, 16, 16));
    }

    #[test]
    fn weightless_body_climbs_but_does_not_walk_downhill() {
        let world = ramp();
        let start = AxisBox::from_ints(52, 42, 16, 16);

        let mut down = Body::new(start)
            .with_velocity(Vector2::from_ints(-1, 0))
            .with_settings(PhysicsSettings::weightless());
        let (_, outcomes) = run(&world, &mut down, 3);
        assert_eq!(down.collision_box, start);
        assert!(outcomes.iter().all(|o| o.delta.is_zero() && o.contacts.landed));

        let mut up = Body::new(start)
            .with_velocity(Vector2::from_ints(1, 0))
            .with_settings(PhysicsSettings::weightless());
        run(&world, &mut up, 1);
        assert_eq!(up.collision_box.left(), Fixed::from_int(53));
        assert_eq!(up.collision_box.bottom(), Fixed::from_int(57) + Fixed::HALF);
    }

    #[test]
    fn boxes_are_kept_inside_the_world() {
        let world = CollisionGrid::new(4, 4);
        let mut body = Body::new(AxisBox::from_ints(2, 10, 8, 8))
            .with_velocity(Vector2::from_ints(-4, 0))
            .with_settings(PhysicsSettings::weightless());
        let (_, outcomes) = run(&world, &mut body, 1);

        assert_eq!(body.collision_box.left(), Fixed::ZERO);
        assert_eq!(outcomes[0].delta, Vector2::from_ints(-2, 0));
    }

    #[test]
    fn no_clip_bodies_pass_through_walls_and_touch_nothing() {
        let world = room();
        let mut body = Body::new(AxisBox::from_ints(60, 32, 16, 16))
            .with_velocity(Vector2::from_ints(8, 0));
        body.no_clip = true;
        let (_, outcomes) = run(&world, &mut body, 5);

        assert_eq!(body.collision_box.left(), Fixed::from_int(100));
        assert_eq!(body.velocity, Vector2::from_ints(8, 0));
        assert!(outcomes.iter().all(|o| o.contacts == Contacts::default()));
    }

    #[test]
    fn static_bodies_never_move() {
        let world = room();
        let start = AxisBox::from_ints(16, 8, 16, 16);
        let mut body = Body::new(start).with_velocity(Vector2::from_ints(3, 3));
        body.is_static = true;
        let (_, outcomes) = run(&world, &mut body, 3);

        assert_eq!(body.collision_box, start);
        assert_eq!(body.velocity, Vector2::from_ints(3, 3));
        assert!(outcomes.iter().all(|o| o.delta.is_zero()));
    }

    #[test]
    fn step_bodies_runs_in_order_and_tracks_the_partition() {
        let world = room();
        let mut partition = Partition::new(world.bounding_box(), 2, 2).unwrap();
        let mut actors = vec![
            Actor::new(&world, 1u32, Body::new(AxisBox::from_ints(16, 8, 16, 16))),
            Actor::new(&world, 2u32, Body::new(AxisBox::from_ints(64, 32, 16, 16))),
        ];
        for actor in &actors {
            partition.insert(actor.id, actor.body.collision_box);
        }

        let outcomes = (0..15)
            .map(|_| step_bodies(&world, &mut actors, &mut partition))
            .last()
            .unwrap();

        let ids: Vec<u32> = outcomes.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(outcomes[0].1.started.landed);
        assert_eq!(partition.box_of(1), Some(AxisBox::from_ints(16, 32, 16, 16)));
        assert_eq!(
            partition.query(&AxisBox::from_ints(0, 32, 128, 16), Some(2), &[]),
            vec![1]
        );
    }

    #[test]
    fn body_settings_survive_a_json_round_trip() {
        let body = Body::new(AxisBox::from_ints(1, 2, 3, 4)).with_velocity(Vector2::from_ints(0, 2));
        let json = serde_json::to_string(&body).unwrap();
        let back: Body = serde_json::from_str(&json).unwrap();
        assert_eq!(back, body);

        // Flags and settings may be left out.
        let minimal = r#"{"collision_box":{"origin":{"x":0,"y":0},"mins":{"x":0,"y":0},"maxs":{"x":512,"y":512}},"velocity":{"x":0,"y":0}}"#;
        let parsed: Body = serde_json::from_str(minimal).unwrap();
        assert_eq!(parsed.collision_box, AxisBox::from_ints(0, 0, 1, 1));
        assert!(!parsed.no_clip && !parsed.is_static);
        assert_eq!(parsed.settings, PhysicsSettings::default());
    }
}
