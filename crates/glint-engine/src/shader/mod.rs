//! Asynchronous shader program construction.
//!
//! Programs are built off the session thread: sources are read from disk,
//! each module is compiled, and the pipeline is linked, all under validation
//! error scopes. The session polls a readiness flag; a failed build logs the
//! error once and leaves the flag down for good.

mod program;

pub use program::{
    BindingProfile, BuiltProgram, ProgramBuilder, ProgramConfig, ProgramError, ProgramSources,
};
