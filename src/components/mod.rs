pub mod component;
pub mod environment_editor;
pub mod response_pane;
pub mod response_timer;
pub mod tags;
pub mod viewers;
