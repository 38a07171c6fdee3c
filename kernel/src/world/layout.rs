use serde::{Deserialize, Serialize};

use crate::{
    cell::Cell,
    constants::{SIDE_BLOCKS_PER_SCENE, SIDE_MAPS_PER_BLOCK},
    error::KernelError,
    world::{CollisionData, CollisionGrid, CollisionSource},
};

pub type MapId = usize;
pub type BlockId = usize;
pub type SceneId = usize;

/// Maps per scene along each axis.
pub const SIDE_MAPS_PER_SCENE: usize = SIDE_MAPS_PER_BLOCK * SIDE_BLOCKS_PER_SCENE;

/// 16x16 map. Only its collision matters to the kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDef {
    pub collision: CollisionData,
}

/// 2x2 maps, indexed `[row][col]`. Empty slots have no collision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDef {
    pub maps: [[Option<MapId>; SIDE_MAPS_PER_BLOCK]; SIDE_MAPS_PER_BLOCK],
}

/// 8x8 blocks, indexed `[row][col]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDef {
    pub blocks: [[Option<BlockId>; SIDE_BLOCKS_PER_SCENE]; SIDE_BLOCKS_PER_SCENE],
}

/// Level built from shared map, block and scene palettes.
///
/// Only constructed through [`LayoutBuilder::build`], so every palette index is valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    maps: Vec<MapDef>,
    blocks: Vec<BlockDef>,
    scenes: Vec<SceneDef>,
    scene_rows: usize,
    scene_cols: usize,
    scene_grid: Vec<Option<SceneId>>,
}

impl Layout {
    #[inline]
    pub fn scene_rows(&self) -> usize {
        self.scene_rows
    }

    #[inline]
    pub fn scene_cols(&self) -> usize {
        self.scene_cols
    }

    /// Scene placed at a scene cell, if any.
    pub fn scene_at(&self, cell: Cell) -> Option<&SceneDef> {
        let (row, col) = cell.index_in(self.scene_rows, self.scene_cols)?;
        let id = self.scene_grid[row * self.scene_cols + col]?;
        self.scenes.get(id)
    }

    /// Map placed at a map cell, if any.
    pub fn map_at(&self, cell: Cell) -> Option<&MapDef> {
        let (row, col) = cell.index_in(self.map_row_count(), self.map_col_count())?;
        let scene = self.scene_at(Cell::new(
            (row / SIDE_MAPS_PER_SCENE) as i32,
            (col / SIDE_MAPS_PER_SCENE) as i32,
        ))?;

        let (row, col) = (row % SIDE_MAPS_PER_SCENE, col % SIDE_MAPS_PER_SCENE);
        let block_id = scene.blocks[row / SIDE_MAPS_PER_BLOCK][col / SIDE_MAPS_PER_BLOCK]?;
        let block = self.blocks.get(block_id)?;
        let map_id = block.maps[row % SIDE_MAPS_PER_BLOCK][col % SIDE_MAPS_PER_BLOCK]?;
        self.maps.get(map_id)
    }

    /// Flattens the layout into a [`CollisionGrid`].
    pub fn to_grid(&self) -> CollisionGrid {
        let mut grid = CollisionGrid::new(self.map_row_count(), self.map_col_count());
        for row in 0..self.map_row_count() as i32 {
            for col in 0..self.map_col_count() as i32 {
                let cell = Cell::new(row, col);
                grid.set(cell, self.collision_data_at(cell));
            }
        }
        grid
    }
}

impl CollisionSource for Layout {
    fn map_row_count(&self) -> usize {
        self.scene_rows * SIDE_MAPS_PER_SCENE
    }

    fn map_col_count(&self) -> usize {
        self.scene_cols * SIDE_MAPS_PER_SCENE
    }

    fn collision_data_at(&self, cell: Cell) -> CollisionData {
        self.map_at(cell).map(|m| m.collision).unwrap_or_default()
    }
}

/// Unvalidated layout description. Also the JSON form of a layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutBuilder {
    pub maps: Vec<MapDef>,
    pub blocks: Vec<BlockDef>,
    pub scenes: Vec<SceneDef>,
    pub scene_rows: usize,
    pub scene_cols: usize,
    /// Row-major, `scene_rows * scene_cols` entries.
    pub scene_grid: Vec<Option<SceneId>>,
}

impl LayoutBuilder {
    pub fn new(scene_rows: usize, scene_cols: usize) -> Self {
        Self {
            scene_rows,
            scene_cols,
            scene_grid: vec![None; scene_rows * scene_cols],
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Layout, KernelError> {
        let builder: LayoutBuilder = serde_json::from_str(json)
            .map_err(|e| KernelError::InvalidLayout(e.to_string()))?;
        builder.build()
    }

    pub fn add_map(&mut self, map: MapDef) -> MapId {
        self.maps.push(map);
        self.maps.len() - 1
    }

    pub fn add_block(&mut self, block: BlockDef) -> BlockId {
        self.blocks.push(block);
        self.blocks.len() - 1
    }

    pub fn add_scene(&mut self, scene: SceneDef) -> SceneId {
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    /// Places a scene. Out-of-range cells are reported by [`LayoutBuilder::build`].
    pub fn place_scene(&mut self, cell: Cell, scene: SceneId) -> &mut Self {
        match cell.index_in(self.scene_rows, self.scene_cols) {
            Some((row, col)) => self.scene_grid[row * self.scene_cols + col] = Some(scene),
            None => self.scene_grid.push(Some(scene)),
        }
        self
    }

    pub fn build(self) -> Result<Layout, KernelError> {
        let expected = self.scene_rows * self.scene_cols;
        if self.scene_grid.len() != expected {
            return Err(KernelError::LayoutDimensions {
                expected,
                actual: self.scene_grid.len(),
            });
        }

        for block in &self.blocks {
            for &map in block.maps.iter().flatten().flatten() {
                check_entry("map", map, self.maps.len())?;
            }
        }
        for scene in &self.scenes {
            for &block in scene.blocks.iter().flatten().flatten() {
                check_entry("block", block, self.blocks.len())?;
            }
        }
        for &scene in self.scene_grid.iter().flatten() {
            check_entry("scene", scene, self.scenes.len())?;
        }

        log::debug!(
            "layout built: {}x{} scenes, {} scene defs, {} blocks, {} maps",
            self.scene_rows,
            self.scene_cols,
            self.scenes.len(),
            self.blocks.len(),
            self.maps.len()
        );

        Ok(Layout {
            maps: self.maps,
            blocks: self.blocks,
            scenes: self.scenes,
            scene_rows: self.scene_rows,
            scene_cols: self.scene_cols,
            scene_grid: self.scene_grid,
        })
    }
}

fn check_entry(kind: &'static str, index: usize, len: usize) -> Result<(), KernelError> {
    if index < len {
        Ok(())
    } else {
        Err(KernelError::UnknownPaletteEntry { kind, index })
    }
}
