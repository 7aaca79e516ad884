//! # Buffer State Module
//!
//! A small registry of named GPU buffers for the renderer.
//!
//! Static geometry is uploaded once with [`BufferState::create_buffer_init`].
//! Per-frame data (instances, HUD quads) goes through
//! [`BufferState::write_growable`], which reuses the buffer while the data fits
//! and reallocates it with power-of-two growth otherwise.

use std::collections::HashMap;

use bytemuck::NoUninit;
use log::debug;
use wgpu::{util::DeviceExt, Buffer, BufferUsages, Device, Queue};

/// Smallest allocation for a growable buffer, in bytes.
const MIN_GROWABLE_SIZE: u64 = 256;

/// Memory bookkeeping for one buffer.
#[derive(Debug, Default, Clone, Copy)]
struct BufferAnalytics {
    allocated_memory: u64,
    used_memory: u64,
}

/// Named GPU buffers.
#[derive(Default)]
pub struct BufferState {
    buffers: HashMap<&'static str, Buffer>,
    buffer_analytics: HashMap<&'static str, BufferAnalytics>,
}

impl BufferState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer holding `contents`.
    pub fn create_buffer_init<T: NoUninit>(
        &mut self,
        device: &Device,
        buffer_name: &'static str,
        contents: &[T],
        usage: BufferUsages,
    ) {
        let bytes: &[u8] = bytemuck::cast_slice(contents);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(buffer_name),
            contents: bytes,
            usage,
        });

        self.buffers.insert(buffer_name, buffer);
        self.buffer_analytics.insert(
            buffer_name,
            BufferAnalytics {
                allocated_memory: bytes.len() as u64,
                used_memory: bytes.len() as u64,
            },
        );
    }

    /// Writes `contents` to the start of the named buffer, reallocating it
    /// first when the buffer is missing or too small. Empty writes are skipped.
    pub fn write_growable<T: NoUninit>(
        &mut self,
        device: &Device,
        queue: &Queue,
        buffer_name: &'static str,
        contents: &[T],
        usage: BufferUsages,
    ) {
        let bytes: &[u8] = bytemuck::cast_slice(contents);
        if bytes.is_empty() {
            return;
        }
        let required = bytes.len() as u64;
        let allocated = self
            .buffer_analytics
            .get(buffer_name)
            .filter(|_| self.buffers.contains_key(buffer_name))
            .map_or(0, |analytics| analytics.allocated_memory);

        if required > allocated {
            let size = grown_capacity(allocated, required);
            debug!("Allocating {size} bytes for {buffer_name}");
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(buffer_name),
                size,
                usage: usage | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.buffers.insert(buffer_name, buffer);
            self.buffer_analytics.insert(
                buffer_name,
                BufferAnalytics {
                    allocated_memory: size,
                    used_memory: 0,
                },
            );
            debug!(
                "{} of {} allocated bytes in use",
                self.total_used_memory(),
                self.total_allocated_memory()
            );
        }

        if let (Some(buffer), Some(analytics)) = (
            self.buffers.get(buffer_name),
            self.buffer_analytics.get_mut(buffer_name),
        ) {
            // Writes must be a multiple of COPY_BUFFER_ALIGNMENT.
            if required % wgpu::COPY_BUFFER_ALIGNMENT == 0 {
                queue.write_buffer(buffer, 0, bytes);
            } else {
                let mut padded = bytes.to_vec();
                padded.resize(align_to_copy(required) as usize, 0);
                queue.write_buffer(buffer, 0, &padded);
            }
            analytics.used_memory = required;
        }
    }

    pub fn get_buffer(&self, buffer_name: &'static str) -> Option<&Buffer> {
        self.buffers.get(buffer_name)
    }

    pub fn total_allocated_memory(&self) -> u64 {
        self.buffer_analytics.values().map(|a| a.allocated_memory).sum()
    }

    pub fn total_used_memory(&self) -> u64 {
        self.buffer_analytics.values().map(|a| a.used_memory).sum()
    }
}

fn align_to_copy(size: u64) -> u64 {
    size.div_ceil(wgpu::COPY_BUFFER_ALIGNMENT) * wgpu::COPY_BUFFER_ALIGNMENT
}

/// Allocation size for a growable buffer that must hold `required` bytes.
fn grown_capacity(current: u64, required: u64) -> u64 {
    align_to_copy(required)
        .max(current.saturating_mul(2))
        .max(MIN_GROWABLE_SIZE)
        .next_power_of_two()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_is_power_of_two_and_bounded_below() {
        assert_eq!(grown_capacity(0, 10), 256);
        assert_eq!(grown_capacity(256, 300), 512);
        assert_eq!(grown_capacity(512, 5000), 8192);
    }

    #[test]
    fn copies_are_aligned() {
        assert_eq!(align_to_copy(0), 0);
        assert_eq!(align_to_copy(5), 8);
        assert_eq!(align_to_copy(8), 8);
    }
}
