//! Thank-you letter rendering and output.

pub mod template;
pub mod writer;

pub use template::LetterTemplate;
pub use writer::LetterWriter;
