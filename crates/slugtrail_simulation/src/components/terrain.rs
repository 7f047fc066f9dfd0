//! Поверхность под слизнем: теги хоста и классификация на тик

use bevy::prelude::*;

/// Тег поверхности, который возвращает world query хоста
#[derive(Debug, Clone, PartialEq, Eq, Hash, Reflect)]
pub enum SurfaceTag {
    MoistGround,
    Water,
    SunlightZone,
    /// Любой другой тег движка (камень, дерево и т.д.)
    Other(String),
}

impl SurfaceTag {
    /// Парсит строковый тег движка ("MoistGround", "Water", "SunlightZone")
    pub fn from_engine_tag(tag: &str) -> Self {
        match tag {
            "MoistGround" => SurfaceTag::MoistGround,
            "Water" => SurfaceTag::Water,
            "SunlightZone" => SurfaceTag::SunlightZone,
            other => SurfaceTag::Other(other.to_string()),
        }
    }
}

/// Классификация поверхности
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum TerrainClass {
    #[default]
    Neutral,
    Moist,
    Sunlit,
}

impl TerrainClass {
    pub fn from_tag(tag: &SurfaceTag) -> Self {
        match tag {
            SurfaceTag::MoistGround | SurfaceTag::Water => TerrainClass::Moist,
            SurfaceTag::SunlightZone => TerrainClass::Sunlit,
            SurfaceTag::Other(_) => TerrainClass::Neutral,
        }
    }
}

/// Транзиентные флаги поверхности (перезаписываются каждый тик)
///
/// Флаги независимые: moisture-модель читает оба, поэтому хост
/// может выставить moist + sunlit одновременно.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub struct TerrainContact {
    pub is_moist: bool,
    pub is_sunlit: bool,
}

impl TerrainContact {
    pub const NEUTRAL: Self = Self {
        is_moist: false,
        is_sunlit: false,
    };

    pub fn from_class(class: TerrainClass) -> Self {
        Self {
            is_moist: class == TerrainClass::Moist,
            is_sunlit: class == TerrainClass::Sunlit,
        }
    }

    /// Moist имеет приоритет (влага набирается даже под солнцем)
    pub fn class(&self) -> TerrainClass {
        if self.is_moist {
            TerrainClass::Moist
        } else if self.is_sunlit {
            TerrainClass::Sunlit
        } else {
            TerrainClass::Neutral
        }
    }
}
