//! Asset registry
//!
//! One texture per species and skin, owned by the world and referenced by
//! entities through small copyable handles. Only the metadata the simulation
//! needs (texture dimensions) lives here; pixel data belongs to the renderer.

use glam::Vec2;

use crate::audio::SoundTheme;

/// Entity species that share a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    Fish,
    Turtle,
}

/// Visual skin; the alternate skin is used in shooting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Skin {
    #[default]
    Default,
    Alternate,
}

/// Texture metadata
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    pub name: String,
    pub width: f32,
    pub height: f32,
}

/// Index into the registry's texture table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(usize);

#[derive(Debug, Clone)]
pub struct AssetRegistry {
    textures: Vec<TextureInfo>,
    /// (species, skin) -> texture index
    slots: Vec<((Species, Skin), TextureHandle)>,
    pub sound_theme: SoundTheme,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Species::Fish, Skin::Default, "fish.png", 120.0, 80.0);
        registry.register(Species::Fish, Skin::Alternate, "fish_alt.png", 150.0, 110.0);
        registry.register(Species::Turtle, Skin::Default, "turtle.png", 210.0, 190.0);
        registry.register(Species::Turtle, Skin::Alternate, "turtle_alt.png", 240.0, 200.0);
        registry
    }
}

impl AssetRegistry {
    pub fn empty() -> Self {
        Self {
            textures: Vec::new(),
            slots: Vec::new(),
            sound_theme: SoundTheme::Default,
        }
    }

    /// Register (or replace) the texture for a species/skin pair
    pub fn register(
        &mut self,
        species: Species,
        skin: Skin,
        name: &str,
        width: f32,
        height: f32,
    ) -> TextureHandle {
        let handle = TextureHandle(self.textures.len());
        self.textures.push(TextureInfo {
            name: name.to_string(),
            width,
            height,
        });
        self.slots.retain(|(key, _)| *key != (species, skin));
        self.slots.push(((species, skin), handle));
        handle
    }

    /// Handle for a species/skin pair, falling back to the default skin
    pub fn handle(&self, species: Species, skin: Skin) -> Option<TextureHandle> {
        self.lookup(species, skin)
            .or_else(|| self.lookup(species, Skin::Default))
    }

    fn lookup(&self, species: Species, skin: Skin) -> Option<TextureHandle> {
        self.slots
            .iter()
            .find(|(key, _)| *key == (species, skin))
            .map(|(_, handle)| *handle)
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureInfo> {
        self.textures.get(handle.0)
    }

    /// Texture size scaled by the absolute entity scale (facing-independent)
    pub fn bounding_box(&self, handle: TextureHandle, scale: Vec2) -> Vec2 {
        self.texture(handle)
            .map(|t| Vec2::new(scale.x.abs() * t.width, scale.y.abs() * t.height))
            .unwrap_or(Vec2::ZERO)
    }
}
