//! # Block Material Module
//!
//! This module defines the closed set of materials a placed block can carry,
//! together with the lookup table the renderer and the hotbar read from.

use num_derive::FromPrimitive;

/// The underlying integer type used to store a material in GPU instance data.
pub type MaterialSize = u8;

/// Enumerates every material a block can be built from.
///
/// The discriminants index [`MATERIAL_TABLE`]. `FromPrimitive` allows
/// converting a stored `MaterialSize` back into the enum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Material {
    /// Brown planks.
    Wood = 0,
    /// Plain grey stone.
    Stone = 1,
    /// Bright green turf.
    Grass = 2,
    Dirt = 3,
    /// Pale blue and partly transparent.
    Glass = 4,
}

/// Presentation data for a single material.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MaterialDescriptor {
    /// Short name used in config files.
    pub name: &'static str,
    /// Hotbar label.
    pub label: &'static str,
    /// Packed `0xRRGGBB` sRGB color.
    pub color: u32,
    /// 1.0 for opaque materials.
    pub opacity: f32,
}

/// Maps each material to its descriptor, indexed by `Material as usize`.
pub static MATERIAL_TABLE: [MaterialDescriptor; 5] = [
    MaterialDescriptor { name: "wood", label: "Wood", color: 0x8b4513, opacity: 1.0 },
    MaterialDescriptor { name: "stone", label: "Stone", color: 0x808080, opacity: 1.0 },
    MaterialDescriptor { name: "grass", label: "Grass", color: 0x7cfc00, opacity: 1.0 },
    MaterialDescriptor { name: "dirt", label: "Dirt", color: 0x8b5a2b, opacity: 1.0 },
    MaterialDescriptor { name: "glass", label: "Glass", color: 0xadd8e6, opacity: 0.35 },
];

static MATERIALS_BY_NAME: phf::Map<&'static str, Material> = phf::phf_map! {
    "wood" => Material::Wood,
    "stone" => Material::Stone,
    "grass" => Material::Grass,
    "dirt" => Material::Dirt,
    "glass" => Material::Glass,
};

/// Converts a packed `0xRRGGBB` sRGB color plus an alpha into linear RGBA.
pub fn srgb_hex_to_linear(color: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| {
        let c = ((color >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(16), channel(8), channel(0), alpha]
}

impl Material {
    /// Every material in table order.
    pub fn all() -> [Material; 5] {
        [
            Material::Wood,
            Material::Stone,
            Material::Grass,
            Material::Dirt,
            Material::Glass,
        ]
    }

    /// Looks up a material by its config name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        MATERIALS_BY_NAME
            .get(name.to_ascii_lowercase().as_str())
            .copied()
    }

    /// Converts a stored `MaterialSize` back into a material.
    pub fn from_int(value: MaterialSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(value)
    }

    pub fn descriptor(&self) -> &'static MaterialDescriptor {
        &MATERIAL_TABLE[*self as usize]
    }

    pub fn is_translucent(&self) -> bool {
        self.descriptor().opacity < 1.0
    }

    /// Linear RGBA color used by the renderer.
    pub fn linear_rgba(&self) -> [f32; 4] {
        let descriptor = self.descriptor();
        srgb_hex_to_linear(descriptor.color, descriptor.opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_discriminant() {
        for material in Material::all() {
            assert_eq!(
                Material::from_name(material.descriptor().name),
                Some(material)
            );
            assert_eq!(Material::from_int(material as MaterialSize), Some(material));
        }
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(Material::from_name("Stone"), Some(Material::Stone));
        assert_eq!(Material::from_name("lava"), None);
    }

    #[test]
    fn only_glass_is_translucent() {
        let translucent: Vec<_> = Material::all()
            .into_iter()
            .filter(Material::is_translucent)
            .collect();
        assert_eq!(translucent, vec![Material::Glass]);
    }

    #[test]
    fn hex_conversion_preserves_extremes() {
        assert_eq!(srgb_hex_to_linear(0xffffff, 1.0), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(srgb_hex_to_linear(0x000000, 0.5), [0.0, 0.0, 0.0, 0.5]);
    }
}
