//! The solar system: its script, camera, viewer modes, procedural geometry,
//! shader programs, and the composer that draws it through an off-screen
//! target and a post-processing composite.

pub mod body;
pub mod camera;
pub mod composer;
pub mod error;
pub mod flags;
pub mod orbit;
pub mod plan;
pub mod programs;
pub mod sphere;
pub mod starfield;
pub mod text;
pub mod textures;

pub use body::{BodyDescriptor, BodyKind, SOLAR_SYSTEM, body_transforms, normal_matrix};
pub use camera::CameraController;
pub use composer::{SceneComposer, SceneSettings};
pub use error::SceneError;
pub use flags::{EffectFlags, ModeState, ShadingFlags};
pub use plan::{FrameInputs, FramePlan, plan_frame};
pub use starfield::StarField;
pub use textures::{ImageDirSource, ProceduralSource, TextureSource};
