//! Domain records returned by the platform and the decoders that build them.

pub mod configuration;
pub mod group;
pub mod id;
pub mod preset;
pub mod project;
pub mod report;
pub mod scan;
pub mod user;

pub use configuration::*;
pub use group::*;
pub use id::*;
pub use preset::*;
pub use project::*;
pub use report::*;
pub use scan::*;
pub use user::*;
