pub mod todo;

pub use todo::{NewTodoRequest, Priority, Todo, UpdateTodoRequest};
