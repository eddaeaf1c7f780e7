pub use super::factories::{ConcatPartialFactory, RowFactory};

pub struct Factory;

impl Factory {
    pub fn row() -> RowFactory {
        RowFactory::new()
    }

    pub fn concat_partial() -> ConcatPartialFactory {
        ConcatPartialFactory::new()
    }
}
