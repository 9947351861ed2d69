pub mod align;
pub mod autocorrect;
pub mod highlight;
pub mod paste;
pub mod position;
pub mod punctuation;
