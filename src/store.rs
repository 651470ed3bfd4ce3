use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{NewTodoRequest, Todo, UpdateTodoRequest};

/// Authoritative in-memory todo collection, insertion-ordered. Handlers run
/// on a multi-threaded runtime, so every operation takes the lock; none of
/// them holds it across an await.
#[derive(Default)]
pub struct TodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, id: &str) -> Option<Todo> {
        self.todos.read().await.iter().find(|t| t.id == id).cloned()
    }

    pub async fn list(&self) -> Vec<Todo> {
        self.todos.read().await.clone()
    }

    pub async fn create(&self, req: NewTodoRequest) -> Todo {
        // One clock read so createdAt and updatedAt start out equal.
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            completed: req.completed,
            created_at: now,
            updated_at: now,
            due_date: req.due_date,
            priority: req.priority,
        };

        self.todos.write().await.push(todo.clone());
        todo
    }

    pub async fn update(&self, id: &str, req: UpdateTodoRequest) -> Option<Todo> {
        let mut todos = self.todos.write().await;
        let current = todos.iter_mut().find(|t| t.id == id)?;

        if let Some(title) = req.title {
            current.title = title;
        }
        if let Some(description) = req.description {
            current.description = Some(description);
        }
        if let Some(completed) = req.completed {
            current.completed = completed;
        }
        if let Some(due_date) = req.due_date {
            current.due_date = Some(due_date);
        }
        if let Some(priority) = req.priority {
            current.priority = Some(priority);
        }
        current.updated_at = Utc::now();

        Some(current.clone())
    }

    pub async fn delete(&self, id: &str) -> bool {
        let mut todos = self.todos.write().await;
        match todos.iter().position(|t| t.id == id) {
            Some(index) => {
                todos.remove(index);
                true
            }
            None => false,
        }
    }
}
