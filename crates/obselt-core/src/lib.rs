//! obselt-core: annotated SQL script loading
//!
//! This library splits SQL scripts into statements, reads the directive
//! comment on top of each one (`-- @ddl('command name')`) and collects the
//! results into a registry of named, parameterized commands. It never talks
//! to a warehouse itself.

pub mod command;
pub mod error;
pub mod loader;
pub mod params;
pub mod script;
pub mod trace;
pub mod verb;

pub use command::{CommandRegistry, ParsedCommand};
pub use error::{Error, Location, Result};
pub use loader::{DuplicatePolicy, Loader};
pub use params::{ParamType, QueryParam};
pub use script::{split, Extracted, Extractor, StatementBlock};
pub use trace::{trace_id, trace_param};
pub use verb::{Verb, VerbSet};
