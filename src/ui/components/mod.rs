pub mod input_pane;
pub mod typing_area;
