pub mod concat_partial_factory;
pub mod row_factory;

pub use concat_partial_factory::ConcatPartialFactory;
pub use row_factory::RowFactory;

#[cfg(test)]
mod concat_partial_factory_test;
#[cfg(test)]
mod row_factory_test;
