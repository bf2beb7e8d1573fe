pub mod reader;

pub use reader::read_document;
