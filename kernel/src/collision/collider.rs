/*!
Per-entity collision cache.

A `BoxCollider` wraps a body's box and four thin probe boxes hugging its sides. The down
probe is resolved eagerly through `ground::landed_state` on every refresh because movement
reads it every tick. The left, up and right probes are classified lazily, the first time
they are asked for after a refresh.

Notes
- Every mutator ends in `refresh()`; nothing here touches velocity.
- While standing on a slope, the uphill side probe is shortened from the bottom so the
  rising ground under the body does not read as a wall.
- World-dependent operations panic when no world is attached.
*/

use crate::{
    collision::{
        ground,
        kinematic::{StepQuery, move_until_intersect},
        narrow_phase::classify,
        settings::MASK_SIZE,
        types::{
            Classification, CollisionFlag, CollisionFlags, CollisionPlacement, CollisionSides,
            Direction, Directions,
        },
    },
    constants::MAP_SIZE,
    fixed::Fixed,
    geometry::{AxisBox, RightTriangle, Vector2},
    world::CollisionSource,
};

/// One lazily classified side probe.
#[derive(Clone, Debug, Default)]
struct SideProbe {
    collider: AxisBox,
    flags: Option<CollisionFlags>,
    placements: Vec<CollisionPlacement>,
}

impl SideProbe {
    fn reset(&mut self, collider: AxisBox) {
        self.collider = collider;
        self.flags = None;
        self.placements.clear();
    }

    fn flags<S: CollisionSource + ?Sized>(&mut self, world: Option<&S>) -> CollisionFlags {
        if let Some(flags) = self.flags {
            return flags;
        }

        let flags = match world {
            Some(world) => {
                self.placements.clear();
                classify(
                    world,
                    &self.collider,
                    CollisionFlags::NONE,
                    true,
                    CollisionSides::INNER,
                    Some(&mut self.placements),
                )
                .flags
            }
            None => CollisionFlags::NONE,
        };
        self.flags = Some(flags);
        flags
    }
}

pub struct BoxCollider<'w, S: CollisionSource + ?Sized> {
    world: Option<&'w S>,
    bx: AxisBox,
    mask_size: Fixed,

    left: SideProbe,
    up: SideProbe,
    right: SideProbe,
    down_collider: AxisBox,

    down: Classification,
    down_placements: Vec<CollisionPlacement>,

    was_landed_on_slope: bool,
    last_landed_slope: RightTriangle,
}

impl<'w, S: CollisionSource + ?Sized> BoxCollider<'w, S> {
    /// Collider with no world: every flag reads `NONE`.
    pub fn new(bx: AxisBox) -> Self {
        let mut collider = Self {
            world: None,
            bx,
            mask_size: MASK_SIZE,
            left: SideProbe::default(),
            up: SideProbe::default(),
            right: SideProbe::default(),
            down_collider: AxisBox::EMPTY,
            down: Classification::NONE,
            down_placements: Vec::new(),
            was_landed_on_slope: false,
            last_landed_slope: RightTriangle::EMPTY,
        };
        collider.refresh();
        collider
    }

    pub fn with_world(world: &'w S, bx: AxisBox) -> Self {
        let mut collider = Self::new(bx);
        collider.set_world(Some(world));
        collider
    }

    pub fn with_mask_size(mut self, mask_size: Fixed) -> Self {
        self.set_mask_size(mask_size);
        self
    }

    #[inline]
    pub fn world(&self) -> Option<&'w S> {
        self.world
    }

    pub fn set_world(&mut self, world: Option<&'w S>) {
        self.world = world;
        self.refresh();
    }

    #[inline]
    pub fn collision_box(&self) -> AxisBox {
        self.bx
    }

    pub fn set_box(&mut self, bx: AxisBox) {
        self.bx = bx;
        self.refresh();
    }

    /// Attaches `world` and moves to `bx` with a single refresh. Slope memory is kept.
    pub fn reset(&mut self, world: &'w S, bx: AxisBox) {
        self.world = Some(world);
        self.bx = bx;
        self.refresh();
    }

    #[inline]
    pub fn mask_size(&self) -> Fixed {
        self.mask_size
    }

    pub fn set_mask_size(&mut self, mask_size: Fixed) {
        self.mask_size = mask_size;
        self.refresh();
    }

    fn attached_world(&self) -> &'w S {
        match self.world {
            Some(world) => world,
            None => panic!("BoxCollider: world-dependent operation with no world attached"),
        }
    }

    /// Rebuilds the probes and the landed state from the current box and world.
    pub fn refresh(&mut self) {
        let bx = self.bx;
        let mask = self.mask_size;

        self.left
            .reset(AxisBox::from_origin_size(bx.left_top(), -mask, bx.height()));
        self.up
            .reset(AxisBox::from_origin_size(bx.left_top(), bx.width(), -mask));
        self.right
            .reset(AxisBox::from_origin_size(bx.right_top(), mask, bx.height()));
        self.down_collider = AxisBox::from_origin_size(bx.left_bottom(), bx.width(), mask);
        self.down_placements.clear();

        let Some(world) = self.world else {
            self.down = Classification::NONE;
            self.was_landed_on_slope = false;
            self.left.flags = Some(CollisionFlags::NONE);
            self.up.flags = Some(CollisionFlags::NONE);
            self.right.flags = Some(CollisionFlags::NONE);
            return;
        };

        self.down = ground::landed_state(
            world,
            &bx,
            mask,
            CollisionFlags::NONE,
            Some(&mut self.down_placements),
        );

        if self.down.flags == CollisionFlags::SLOPE {
            let slope = self.down.slope;
            self.clip_from_slope(&slope);
            self.was_landed_on_slope = true;
            self.last_landed_slope = slope;
            return;
        }

        let under = classify(
            world,
            &self.down_collider,
            CollisionFlags::NONE,
            true,
            CollisionSides::INNER,
            None,
        );
        if under.has(CollisionFlag::Slope) {
            self.clip_from_slope(&under.slope);
        } else if self.was_landed_on_slope && self.down.is_none() {
            let slope = self.last_landed_slope;
            self.clip_from_slope(&slope);
        } else {
            self.was_landed_on_slope = false;
        }
    }

    fn clip_from_slope(&mut self, slope: &RightTriangle) {
        if slope.h.is_zero() {
            return;
        }
        let vclip = slope
            .v
            .mul_div(self.bx.width() + self.mask_size, slope.h)
            .abs();

        let side = if slope.h.is_positive() {
            &mut self.left
        } else {
            &mut self.right
        };
        side.collider = side.collider.clip_bottom(vclip);
    }

    #[inline]
    pub fn left_collider(&self) -> AxisBox {
        self.left.collider
    }

    #[inline]
    pub fn up_collider(&self) -> AxisBox {
        self.up.collider
    }

    #[inline]
    pub fn right_collider(&self) -> AxisBox {
        self.right.collider
    }

    #[inline]
    pub fn down_collider(&self) -> AxisBox {
        self.down_collider
    }

    pub fn left_flags(&mut self) -> CollisionFlags {
        self.left.flags(self.world)
    }

    pub fn up_flags(&mut self) -> CollisionFlags {
        self.up.flags(self.world)
    }

    pub fn right_flags(&mut self) -> CollisionFlags {
        self.right.flags(self.world)
    }

    pub fn left_placements(&mut self) -> &[CollisionPlacement] {
        self.left.flags(self.world);
        &self.left.placements
    }

    pub fn up_placements(&mut self) -> &[CollisionPlacement] {
        self.up.flags(self.world);
        &self.up.placements
    }

    pub fn right_placements(&mut self) -> &[CollisionPlacement] {
        self.right.flags(self.world);
        &self.right.placements
    }

    #[inline]
    pub fn down_placements(&self) -> &[CollisionPlacement] {
        &self.down_placements
    }

    pub fn blocked_left(&mut self) -> bool {
        self.left_flags().has(CollisionFlag::Block)
    }

    pub fn blocked_up(&mut self) -> bool {
        self.up_flags().has(CollisionFlag::Block)
    }

    pub fn blocked_right(&mut self) -> bool {
        self.right_flags().has(CollisionFlag::Block)
    }

    #[inline]
    pub fn down_flags(&self) -> CollisionFlags {
        self.down.flags
    }

    #[inline]
    pub fn landed_on_block(&self) -> bool {
        self.down.flags == CollisionFlags::BLOCK
    }

    #[inline]
    pub fn landed_on_slope(&self) -> bool {
        self.down.flags == CollisionFlags::SLOPE
    }

    #[inline]
    pub fn landed_on_top_ladder(&self) -> bool {
        self.down.flags == CollisionFlags::TOP_LADDER
    }

    #[inline]
    pub fn landed(&self) -> bool {
        self.landed_on_block() || self.landed_on_slope() || self.landed_on_top_ladder()
    }

    /// Slope being stood on, `EMPTY` unless `landed_on_slope`.
    #[inline]
    pub fn landed_slope(&self) -> RightTriangle {
        self.down.slope
    }

    fn query(&self, max_distance: Fixed, ignore: CollisionFlags) -> StepQuery {
        StepQuery::new(max_distance, self.mask_size, ignore)
    }

    pub fn translate(&mut self, delta: Vector2) {
        self.bx = self.bx + delta;
        self.refresh();
    }

    /// Moves along `dir` until the probe facing the motion touches something.
    ///
    /// - The horizontal and vertical components are searched independently with the
    ///   matching probe and the shorter resulting displacement is applied.
    /// - Sides missing from `masks` do not stop the motion.
    /// - Ladders never stop the motion; ladder tops only stop downward motion.
    pub fn move_contact_solid(
        &mut self,
        dir: Vector2,
        max_distance: Fixed,
        masks: Directions,
        ignore: CollisionFlags,
    ) {
        let world = self.attached_world();
        let passable = ignore | CollisionFlags::LADDER | CollisionFlags::TOP_LADDER;

        let search = |probe: AxisBox, side: Direction, ignore: CollisionFlags| {
            if masks.has(side) {
                let moved = move_until_intersect(
                    world,
                    probe,
                    dir,
                    self.query(max_distance, ignore),
                    CollisionSides::INNER,
                    None,
                );
                moved.origin - probe.origin
            } else {
                dir
            }
        };

        let horizontal = if dir.x.is_positive() {
            search(self.right.collider, Direction::Right, passable)
        } else if dir.x.is_negative() {
            search(self.left.collider, Direction::Left, passable)
        } else {
            dir
        };

        let vertical = if dir.y.is_positive() {
            search(self.down_collider, Direction::Down, ignore | CollisionFlags::LADDER)
        } else if dir.y.is_negative() {
            search(self.up.collider, Direction::Up, passable)
        } else {
            horizontal
        };

        let delta = if horizontal.length_squared_raw() < vertical.length_squared_raw() {
            horizontal
        } else {
            vertical
        };
        self.translate(delta);
    }

    pub fn move_contact_floor(&mut self, max_distance: Fixed, ignore: CollisionFlags) {
        let world = self.attached_world();
        self.bx = ground::move_contact_floor(world, self.bx, self.query(max_distance, ignore));
        self.refresh();
    }

    /// Drops onto the floor if one is within `max_distance`. Returns whether it moved.
    pub fn try_move_contact_floor(&mut self, max_distance: Fixed, ignore: CollisionFlags) -> bool {
        let world = self.attached_world();
        match ground::try_move_contact_floor(world, self.bx, self.query(max_distance, ignore)) {
            Some(bx) => {
                self.set_box(bx);
                true
            }
            None => false,
        }
    }

    pub fn try_move_contact_slope(&mut self, max_distance: Fixed, ignore: CollisionFlags) -> bool {
        let world = self.attached_world();
        match ground::try_move_contact_slope(world, self.bx, self.query(max_distance, ignore)) {
            Some(bx) => {
                self.set_box(bx);
                true
            }
            None => false,
        }
    }

    pub fn adjust_on_the_floor(&mut self, max_distance: Fixed, ignore: CollisionFlags) {
        let world = self.attached_world();
        self.bx = ground::adjust_on_the_floor(world, self.bx, self.query(max_distance, ignore));
        self.refresh();
    }

    /// Centres the box horizontally on the ladder column under or above it.
    ///
    /// Uses the ladder top being stood on, otherwise the first ladder cell touched by the
    /// up probe. Returns whether a ladder was found.
    pub fn adjust_on_ladder(&mut self) -> bool {
        let column = if self.landed_on_top_ladder() {
            self.down_placements
                .iter()
                .find(|p| p.flag == CollisionFlag::TopLadder)
                .map(|p| p.bounding_box)
        } else {
            self.up_placements()
                .iter()
                .find(|p| p.flag == CollisionFlag::Ladder)
                .map(|p| p.bounding_box)
        };

        let Some(column) = column else {
            return false;
        };
        let dx = column.left() + Fixed::from_int(MAP_SIZE / 2) - self.bx.left() - self.bx.width() / 2;
        self.translate(Vector2::new(dx, Fixed::ZERO));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cell::Cell,
        collision::settings::STEP_SIZE,
        world::{CollisionData, CollisionGrid},
    };

    /// 8 columns wide, floor on row 3, wall on column 6.
    fn room() -> CollisionGrid {
        let mut g = CollisionGrid::new(4, 8);
        g.fill_row(3, CollisionData::Solid);
        g.fill_rect(Cell::new(0, 6), 3, 1, CollisionData::Solid);
        g
    }

    fn f(n: i32) -> Fixed {
        Fixed::from_int(n)
    }

    #[test]
    fn detached_collider_reports_nothing() {
        let mut c: BoxCollider<'_, CollisionGrid> = BoxCollider::new(AxisBox::from_ints(0, 0, 16, 16));
        assert!(!c.landed());
        assert_eq!(c.left_flags(), CollisionFlags::NONE);
        assert!(!c.blocked_right());
        assert_eq!(c.left_collider(), AxisBox::from_ltwh(-MASK_SIZE, f(0), MASK_SIZE, f(16)));
        assert_eq!(c.down_collider(), AxisBox::from_ltwh(f(0), f(16), f(16), MASK_SIZE));
    }

    #[test]
    #[should_panic(expected = "no world attached")]
    fn world_operations_need_a_world() {
        let mut c: BoxCollider<'_, CollisionGrid> = BoxCollider::new(AxisBox::from_ints(0, 0, 16, 16));
        c.move_contact_floor(f(4), CollisionFlags::NONE);
    }

    #[test]
    fn standing_on_the_floor_is_landed_on_block() {
        let g = room();
        let c = BoxCollider::with_world(&g, AxisBox::from_ints(16, 32, 16, 16));
        assert!(c.landed());
        assert!(c.landed_on_block());
        assert!(!c.landed_on_slope());
        assert_eq!(c.down_placements().len(), 2);
    }

    #[test]
    fn side_flags_are_computed_on_demand_and_reset_on_move() {
        let g = room();
        let mut c = BoxCollider::with_world(&g, AxisBox::from_ints(80, 32, 16, 16));
        assert!(c.blocked_right());
        assert!(!c.blocked_left());
        assert_eq!(c.right_placements()[0].cell, Cell::new(2, 6));

        c.translate(Vector2::from_ints(-1, 0));
        assert!(!c.blocked_right());
    }

    #[test]
    fn move_contact_solid_stops_flush_against_a_wall() {
        let g = room();
        let mut c = BoxCollider::with_world(&g, AxisBox::from_ints(64, 32, 16, 16));
        c.move_contact_solid(Vector2::RIGHT, f(32), Directions::ALL, CollisionFlags::NONE);
        assert_eq!(c.collision_box().right(), f(96));
        assert!(c.blocked_right());
        assert!(c.landed());
    }

    #[test]
    fn masked_out_sides_do_not_stop_the_move() {
        let g = room();
        let mut c = BoxCollider::with_world(&g, AxisBox::from_ints(64, 32, 16, 16));
        c.move_contact_solid(Vector2::from_ints(4, 0), f(4), Directions::LEFT, CollisionFlags::NONE);
        assert_eq!(c.collision_box().left(), f(68));
    }

    #[test]
    fn falling_onto_the_floor_through_move_contact_solid() {
        let g = room();
        let mut c = BoxCollider::with_world(&g, AxisBox::from_ints(16, 0, 16, 16));
        c.move_contact_solid(Vector2::from_ints(0, 64), f(64), Directions::ALL, CollisionFlags::NONE);
        assert_eq!(c.collision_box().bottom(), f(48));
        assert!(c.landed_on_block());
    }

    #[test]
    fn ladders_do_not_block_sideways_moves() {
        let mut g = CollisionGrid::new(2, 4);
        g.fill_row(1, CollisionData::Solid);
        g.set(Cell::new(0, 2), CollisionData::Ladder);
        let mut c = BoxCollider::with_world(&g, AxisBox::from_ints(0, 0, 16, 16));
        c.move_contact_solid(Vector2::from_ints(20, 0), f(20), Directions::ALL, CollisionFlags::NONE);
        assert_eq!(c.collision_box().left(), f(20));
    }

    #[test]
    fn floor_searches_update_the_box() {
        let g = room();
        let mut c = BoxCollider::with_world(&g, AxisBox::from_ints(16, 20, 16, 16));
        assert!(!c.try_move_contact_floor(f(4), CollisionFlags::NONE));
        assert_eq!(c.collision_box().top(), f(20));

        assert!(c.try_move_contact_floor(f(16), CollisionFlags::NONE));
        assert_eq!(c.collision_box().bottom(), f(48));
        assert!(!c.try_move_contact_slope(f(16), CollisionFlags::NONE));

        c.set_box(AxisBox::from_ints(16, 33, 16, 16));
        c.adjust_on_the_floor(f(4), CollisionFlags::NONE);
        assert_eq!(c.collision_box().bottom(), f(48));
    }

    #[test]
    fn standing_on_a_slope_clips_the_uphill_probe() {
        // Slope16_8 rises to the right, so the right probe is the uphill one.
        let mut g = CollisionGrid::new(2, 2);
        g.set(Cell::new(1, 0), CollisionData::Slope16_8);
        g.set(Cell::new(1, 1), CollisionData::Solid);
        let mut c = BoxCollider::with_world(&g, AxisBox::from_ints(2, 0, 8, 8));
        c.move_contact_floor(f(32), CollisionFlags::NONE);
        c.adjust_on_the_floor(f(1), CollisionFlags::NONE);

        assert!(c.landed_on_slope());
        let slope = c.landed_slope();
        assert_eq!(slope.h, f(-16));
        let clip = (f(8) + MASK_SIZE) / 2;
        assert_eq!(c.right_collider().height(), f(8) - clip);
        assert_eq!(c.left_collider().height(), f(8));
    }

    #[test]
    fn ladder_top_recentres_the_body() {
        let mut g = CollisionGrid::new(2, 2);
        g.set(Cell::new(1, 1), CollisionData::TopLadder);
        let mut c = BoxCollider::with_world(&g, AxisBox::from_ints(12, 0, 8, 16));
        assert!(c.landed_on_top_ladder());
        assert!(c.adjust_on_ladder());
        assert_eq!(c.collision_box().center().x, f(24));
    }

    #[test]
    fn ladder_above_recentres_the_body() {
        let mut g = CollisionGrid::new(2, 2);
        g.set(Cell::new(0, 0), CollisionData::Ladder);
        let mut c = BoxCollider::with_world(&g, AxisBox::from_ints(2, 16, 8, 16));
        assert!(!c.landed());
        assert!(c.adjust_on_ladder());
        assert_eq!(c.collision_box().center().x, f(8));

        let mut none = BoxCollider::with_world(&g, AxisBox::from_ints(18, 16, 8, 16));
        assert!(!none.adjust_on_ladder());
    }

    #[test]
    fn smaller_mask_size_thins_the_probes() {
        let g = room();
        let c = BoxCollider::with_world(&g, AxisBox::from_ints(16, 32, 16, 16)).with_mask_size(STEP_SIZE / 2);
        assert_eq!(c.mask_size(), STEP_SIZE / 2);
        assert_eq!(c.up_collider().height(), STEP_SIZE / 2);
    }
}
