//! The scripted terminal: a closed table of builtin commands over the
//! service directory, a record history and an up/down recall buffer.

pub mod builtin;
pub mod files;
pub mod interpreter;
pub mod recall;

pub use builtin::{
    builtin_commands, find_builtin_command, BuiltinCommand, CommandAction, CommandContext,
    CommandHandler,
};
pub use interpreter::{CommandRecord, Execution, Terminal};
pub use recall::RecallBuffer;
