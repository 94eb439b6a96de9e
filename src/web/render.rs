//! HTML rendering for the task page.
//!
//! The template is embedded at compile time using `include_str!` and rendered
//! with `minijinja`. Its name ends in `.html`, which turns on HTML
//! auto-escaping for every interpolated value.

use crate::types::Task;
use minijinja::{Environment, context};

/// The task list page template.
pub const INDEX_TEMPLATE: &str = include_str!("templates/index.html");

const INDEX_TEMPLATE_NAME: &str = "index.html";

/// Renders the task list page.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    /// Compile the embedded templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the full HTML document for `tasks`.
    pub fn render(&self, page_title: &str, tasks: &[Task]) -> Result<String, minijinja::Error> {
        self.env
            .get_template(INDEX_TEMPLATE_NAME)?
            .render(context! { page_title, tasks })
    }
}
