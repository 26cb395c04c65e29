// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0

use super::value::{SameUpload, UploadTracked};
use crate::gl::DataType;

/// The layout of one client vertex array.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexPointer<Buffer> {
    pub size: i32,
    pub data_type: DataType,
    /// Always false; fixed-function arrays are never normalized.
    pub normalized: bool,
    pub stride: i32,
    pub buffer: Option<Buffer>,
    pub offset: i32,
}

impl<Buffer> VertexPointer<Buffer> {
    pub fn new(size: i32, data_type: DataType, stride: i32, buffer: Option<Buffer>, offset: i32) -> Self {
        VertexPointer {
            size,
            data_type,
            normalized: false,
            stride,
            buffer,
            offset,
        }
    }
}

impl<Buffer: PartialEq> SameUpload for VertexPointer<Buffer> {
    fn same_upload(&self, other: &Self) -> bool {
        self == other
    }
}

/// Client-side state of one vertex attribute.
///
/// Both the enable bit and the pointer are tracked against what the current
/// program last saw.
#[derive(Debug, Clone)]
pub struct AttributeState<Buffer> {
    pub(crate) enabled: UploadTracked<bool>,
    pub(crate) pointer: UploadTracked<VertexPointer<Buffer>>,
    /// Slot in the current program, `None` when the program doesn't declare it.
    pub(crate) location: Option<u32>,
}

impl<Buffer> AttributeState<Buffer> {
    pub(crate) fn new(size: i32) -> Self {
        AttributeState {
            enabled: UploadTracked::new(false),
            pointer: UploadTracked::new(VertexPointer::new(size, DataType::Float, 0, None, 0)),
            location: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.get()
    }

    pub fn pointer(&self) -> &VertexPointer<Buffer> {
        self.pointer.get()
    }

    pub fn location(&self) -> Option<u32> {
        self.location
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled.update(enabled);
    }

    pub(crate) fn set_pointer(&mut self, pointer: VertexPointer<Buffer>) {
        self.pointer.update(pointer);
    }

    /// Program switch: the new program has fresh vertex state.
    pub(crate) fn set_location(&mut self, location: Option<u32>) {
        self.location = location;
        self.enabled.invalidate();
        self.pointer.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
    fn pointer_uploads_track_changes() {
        let mut attribute = AttributeState::<u32>::new(4);
        assert!(attribute.pointer.is_dirty());
        attribute.pointer.mark_submitted();
        attribute.set_pointer(VertexPointer::new(4, DataType::Float, 0, None, 0));
        assert!(!attribute.pointer.is_dirty());
        attribute.set_pointer(VertexPointer::new(3, DataType::Float, 12, Some(7), 0));
        assert!(attribute.pointer.is_dirty());
        attribute.pointer.mark_submitted();
        attribute.set_location(Some(2));
        assert!(attribute.pointer.is_dirty());
        assert!(!attribute.pointer().normalized);
    }
}
