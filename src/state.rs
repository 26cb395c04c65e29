// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Emulated fixed-function state.

Every piece of state is a uniform slot identified by a [`UniformId`].  The
shader-affecting slots (booleans and small enumerations) decide which program
variant a draw needs; the rest only feed uniform uploads.  Slots can hang off
a boolean parent through the [`graph`], in which case they are ignored for
variant selection while the parent is false.
*/

mod attribute;
pub mod graph;
pub mod ids;
mod model;
mod value;

pub use attribute::{AttributeState, VertexPointer};
pub use ids::{AttributeId, UniformId};
pub use model::StateModel;
pub use value::{SameUpload, UniformValue, UploadTracked};
