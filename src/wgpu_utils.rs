use log::error;
use wgpu::util::DeviceExt;
use wgpu::{Buffer, BufferAddress, BufferUsages, Device, Queue};

/// Views a slice of plain `#[repr(C)]` data as bytes.
pub fn as_u8_slice<T: Copy>(v: &[T]) -> &[u8] {
    let (head, body, tail) = unsafe { v.align_to::<u8>() };
    assert!(head.is_empty());
    assert!(tail.is_empty());
    body
}

pub fn create_buffer<T: Copy>(device: &Device, v: &[T], usage: BufferUsages, label: Option<&str>) -> (Buffer, u64) {
    let mut data = as_u8_slice(v);
    let orig_length = data.len() as u64;
    if orig_length == 0 {
        data = &[0, 0, 0, 0];
    }
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label,
        contents: data,
        usage,
    });

    (buffer, orig_length)
}

/// Runs `f` inside a validation error scope and returns whatever error it raised.
pub fn capture_validation_error<R>(device: &Device, f: impl FnOnce() -> R) -> (R, Option<wgpu::Error>) {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let result = f();
    let error = futures::executor::block_on(device.pop_error_scope());
    (result, error)
}

/// Like [`capture_validation_error`] but only logs the error. The caller carries on either way.
pub fn log_validation_errors<R>(device: &Device, what: &str, f: impl FnOnce() -> R) -> R {
    let (result, error) = capture_validation_error(device, f);
    if let Some(error) = error {
        error!("{}: {}", what, error);
    }
    result
}

/// A GPU buffer that is rewritten every frame and grows when the data outgrows it.
pub struct DynamicBuffer {
    buffer: Buffer,
    capacity: BufferAddress,
    len: BufferAddress,
    usage: BufferUsages,
    label: &'static str,
}

impl DynamicBuffer {
    pub fn new(device: &Device, usage: BufferUsages, label: &'static str) -> DynamicBuffer {
        let usage = usage | BufferUsages::COPY_DST;
        let capacity = 256;
        DynamicBuffer {
            buffer: Self::allocate(device, capacity, usage, label),
            capacity,
            len: 0,
            usage,
            label,
        }
    }

    fn allocate(device: &Device, size: BufferAddress, usage: BufferUsages, label: &str) -> Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        })
    }

    pub fn upload<T: Copy>(&mut self, device: &Device, queue: &Queue, contents: &[T]) {
        let bytes = as_u8_slice(contents);
        let size = bytes.len() as BufferAddress;
        if size > self.capacity {
            self.capacity = size.next_power_of_two();
            log::debug!("Growing {} to {} bytes", self.label, self.capacity);
            self.buffer = Self::allocate(device, self.capacity, self.usage, self.label);
        }
        if size > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = size;
    }

    /// The part of the buffer written by the last upload.
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..self.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::Vertex;

    #[test]
    fn vertex_bytes() {
        let vertices = [Vertex {
            position: [1.0, 2.0, 0.0, 1.0],
            color: [0.0; 4],
        }; 3];
        let bytes = as_u8_slice(&vertices);
        assert_eq!(bytes.len(), 3 * 32);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &2.0f32.to_ne_bytes());
    }

    #[test]
    fn empty_slice() {
        let empty: [Vertex; 0] = [];
        assert!(as_u8_slice(&empty).is_empty());
    }
}
