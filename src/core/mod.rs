pub mod renderer;
pub mod template;
