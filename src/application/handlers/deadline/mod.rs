mod deadline_handlers;

pub use deadline_handlers::{
    DeadlineHandler, DeadlineView, GetDeadlineQuery, RemoveDeadlineCommand, SetDeadlineCommand,
};
