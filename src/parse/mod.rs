pub mod frontmatter;
pub mod slug;

pub use frontmatter::{ParseError, parse_task, render_task, split_frontmatter};
pub use slug::{generate_file_name, slugify};
