//! Resource identity and the collaborators a table model drives.
//!
//! A table model never talks to the resource store directly. It resolves an
//! [`Accessor`] and a [`Renderer`] for its [`ResourceKind`] through a
//! [`Registry`], lists or gets raw [`Object`]s and hands them to the renderer.

mod accessor;
mod kind;
mod registry;
mod renderer;

pub use accessor::*;
pub use kind::ResourceKind;
pub use registry::Registry;
pub use registry::ResourceMeta;
pub use renderer::Renderer;
pub use renderer::ViewSetting;
