//! # Heads-Up Display
//!
//! Screen-space widgets drawn over the scene: the reticle, the joystick pad,
//! the jump button and one swatch per hotbar slot.
//!
//! The jump button and the swatches are also touch targets. A touch that
//! starts on one of them is turned into a [`UiEvent`] and never reaches the
//! gesture classifier.

use super::{
    gestures::touch::ScreenLayout,
    simulation::UiEvent,
    voxels::block::{material::srgb_hex_to_linear, Material},
};

const SLOT_SIZE: f64 = 50.0;
const SLOT_GAP: f64 = 8.0;
const SELECTED_BORDER: f64 = 3.0;
const JUMP_SIZE: f64 = 60.0;
/// Space between the hotbar row and the controls row below it.
const ROW_GAP: f64 = 10.0;
const RETICLE_LENGTH: f64 = 20.0;
const RETICLE_THICKNESS: f64 = 2.0;
/// Horizontal strips the round joystick pad is built from.
const PAD_ROWS: usize = 24;

const WHITE: u32 = 0xffffff;
const SWATCH_ALPHA: f32 = 0.8;

/// Axis-aligned screen rectangle in physical pixels, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudRect {
    pub min: (f64, f64),
    pub max: (f64, f64),
}

impl HudRect {
    pub fn centered((cx, cy): (f64, f64), width: f64, height: f64) -> Self {
        Self {
            min: (cx - width / 2.0, cy - height / 2.0),
            max: (cx + width / 2.0, cy + height / 2.0),
        }
    }

    pub fn contains(&self, (x, y): (f64, f64)) -> bool {
        x >= self.min.0 && x <= self.max.0 && y >= self.min.1 && y <= self.max.1
    }

    fn grown(&self, by: f64) -> Self {
        Self {
            min: (self.min.0 - by, self.min.1 - by),
            max: (self.max.0 + by, self.max.1 + by),
        }
    }
}

/// A filled rectangle with a linear RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudQuad {
    pub rect: HudRect,
    pub color: [f32; 4],
}

/// Widget placement for the current viewport.
#[derive(Debug, Clone)]
pub struct Hud {
    width: f64,
    height: f64,
    joystick_center: (f64, f64),
    joystick_radius: f64,
    jump: HudRect,
    slots: Vec<HudRect>,
}

impl Hud {
    /// # Arguments
    /// * `layout` - Screen partition the joystick pad is taken from
    /// * `slot_count` - Number of hotbar slots to lay out
    pub fn new(layout: &ScreenLayout, slot_count: usize) -> Self {
        let mut hud = Self {
            width: 0.0,
            height: 0.0,
            joystick_center: (0.0, 0.0),
            joystick_radius: 0.0,
            jump: HudRect::centered((0.0, 0.0), 0.0, 0.0),
            slots: Vec::with_capacity(slot_count),
        };
        hud.arrange(layout, slot_count);
        hud
    }

    pub fn resize(&mut self, layout: &ScreenLayout) {
        let slot_count = self.slots.len();
        self.arrange(layout, slot_count);
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn slots(&self) -> &[HudRect] {
        &self.slots
    }

    pub fn jump_button(&self) -> HudRect {
        self.jump
    }

    /// The joystick pad as stacked strips inscribed in its circle, top to bottom.
    pub fn joystick_pad(&self) -> Vec<HudRect> {
        let (cx, cy) = self.joystick_center;
        let radius = self.joystick_radius;
        let row_height = radius * 2.0 / PAD_ROWS as f64;

        (0..PAD_ROWS)
            .filter_map(|row| {
                let top = cy - radius + row as f64 * row_height;
                let bottom = top + row_height;
                // The edge farther from the center bounds the strip's width.
                let dy = (top - cy).abs().max((bottom - cy).abs());
                let half_width = (radius * radius - dy * dy).max(0.0).sqrt();
                (half_width > 0.0).then_some(HudRect {
                    min: (cx - half_width, top),
                    max: (cx + half_width, bottom),
                })
            })
            .collect()
    }

    /// The UI event for a touch starting at `position`, if it lands on a button.
    pub fn hit_test(&self, position: (f64, f64)) -> Option<UiEvent> {
        if self.jump.contains(position) {
            return Some(UiEvent::JumpPressed);
        }
        self.slots
            .iter()
            .position(|slot| slot.contains(position))
            .map(UiEvent::MaterialSelected)
    }

    /// Every widget as filled quads, back to front.
    pub fn quads(&self, materials: &[Material], selected: usize) -> Vec<HudQuad> {
        let mut quads = Vec::with_capacity(PAD_ROWS + 3 + materials.len() * 2);

        let pad_color = srgb_hex_to_linear(WHITE, 0.1);
        quads.extend(
            self.joystick_pad()
                .into_iter()
                .map(|rect| HudQuad { rect, color: pad_color }),
        );
        quads.push(HudQuad {
            rect: self.jump,
            color: srgb_hex_to_linear(WHITE, 0.2),
        });

        for (index, (slot, material)) in self.slots.iter().zip(materials).enumerate() {
            if index == selected {
                quads.push(HudQuad {
                    rect: slot.grown(SELECTED_BORDER),
                    color: srgb_hex_to_linear(WHITE, 1.0),
                });
            }
            quads.push(HudQuad {
                rect: *slot,
                color: srgb_hex_to_linear(material.descriptor().color, SWATCH_ALPHA),
            });
        }

        let center = (self.width / 2.0, self.height / 2.0);
        for (w, h) in [
            (RETICLE_LENGTH, RETICLE_THICKNESS),
            (RETICLE_THICKNESS, RETICLE_LENGTH),
        ] {
            quads.push(HudQuad {
                rect: HudRect::centered(center, w, h),
                color: srgb_hex_to_linear(WHITE, 1.0),
            });
        }

        quads
    }

    fn arrange(&mut self, layout: &ScreenLayout, slot_count: usize) {
        self.width = layout.width;
        self.height = layout.height;

        let radius = layout.joystick_radius;
        let (pad_x, pad_y) = layout.joystick_center;
        self.joystick_center = layout.joystick_center;
        self.joystick_radius = radius;

        // Mirrors the pad on the right edge.
        let margin = pad_x - radius;
        self.jump = HudRect::centered(
            (layout.width - margin - JUMP_SIZE / 2.0, pad_y),
            JUMP_SIZE,
            JUMP_SIZE,
        );

        let row_width = slot_count as f64 * SLOT_SIZE + slot_count.saturating_sub(1) as f64 * SLOT_GAP;
        let row_y = pad_y - radius - ROW_GAP - SLOT_SIZE / 2.0;
        let first_x = (layout.width - row_width) / 2.0 + SLOT_SIZE / 2.0;

        self.slots = (0..slot_count)
            .map(|index| {
                let x = first_x + index as f64 * (SLOT_SIZE + SLOT_GAP);
                HudRect::centered((x, row_y), SLOT_SIZE, SLOT_SIZE)
            })
            .collect();
    }
}
