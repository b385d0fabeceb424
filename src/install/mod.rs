//! Install pipeline
//!
//! Checks out a resolved version, builds it through a [`builder::Builder`] and
//! lays the result out below the version manager's install path.
//!
//! - [`builder`]: Builder capability and the external-command builder
//! - [`checkout`]: Source checkout of a tag
//! - [`error`]: Build and install errors
//! - [`installer`]: The pipeline itself and the install layout
//! - [`platform`]: Host OS and architecture detection
//! - [`shim`]: Wrapper script written as the tool's entry point

pub mod builder;
pub mod checkout;
pub mod error;
pub mod installer;
pub mod platform;
pub mod shim;
