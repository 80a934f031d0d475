//! # Models
//!
//! The task document, its embedded sub-documents and the request payloads
//! that create and mutate it.
//!
//! - [`task`] - `Task`, enums, embedded records and the derived `TaskView`
//! - [`task_request`] - create/patch/comment/attachment/template payloads
//! - [`history`] - change tracking between two versions of a task

pub mod history;
pub mod task;
pub mod task_request;

pub use task::{
    Attachment, Comment, HistoryEntry, Task, TaskPriority, TaskStatus, TaskView,
};
pub use task_request::{
    CreateFromTemplateRequest, NewAttachment, NewComment, NewTask, TaskPatch,
    TemplateCustomizations,
};
